//! Navigation controller — the listing → detail → listing cycle for one
//! item, with bounded retry and layered recovery.
//!
//! The controller owns no parsed data: it captures the card's outer markup
//! before clicking and the full page markup once the detail settles, and
//! hands both snapshots upstream. If it reports a verified return, the
//! session is provably on the listing again — presence of the anchor's
//! listing selector is re-checked after every recovery action, never
//! assumed.

use crate::config::HarvestConfig;
use crate::harvest::{ItemVisit, ReturnPath, SessionAnchor};
use crate::session::{BrowserSession, ClickOutcome};
use anyhow::Result;
use tracing::{debug, warn};

/// Drives per-item navigation against one anchor.
pub struct NavigationController<'a> {
    config: &'a HarvestConfig,
    anchor: &'a SessionAnchor,
}

impl<'a> NavigationController<'a> {
    pub fn new(config: &'a HarvestConfig, anchor: &'a SessionAnchor) -> Self {
        Self { config, anchor }
    }

    /// Visit item `index`: confirm the listing, snapshot the card, click
    /// through, snapshot the detail, and return to the listing.
    ///
    /// Never errors for recoverable conditions — exhausted retries yield
    /// an [`ItemVisit`] with `detail: None` and a failure reason.
    pub async fn visit_item(
        &self,
        session: &mut dyn BrowserSession,
        index: usize,
    ) -> ItemVisit {
        let mut last_failure = String::from("unknown");

        for attempt in 1..=self.config.max_item_attempts {
            match self.attempt_visit(session, index, attempt).await {
                Ok(AttemptOutcome::Visited(visit)) => return visit,
                Ok(AttemptOutcome::ListingShrank { available }) => {
                    // The card is gone for good; retrying cannot bring it back.
                    return ItemVisit {
                        index,
                        attempts: attempt,
                        preview: None,
                        detail: None,
                        return_path: None,
                        uncertain_return: false,
                        failure: Some(format!(
                            "item {index} not realized (only {available} cards available)"
                        )),
                    };
                }
                Ok(AttemptOutcome::Retry(reason)) => {
                    debug!(index, attempt, %reason, "item attempt failed, retrying");
                    last_failure = reason;
                }
                Err(e) => {
                    warn!(index, attempt, error = %e, "item attempt errored");
                    last_failure = format!("{e:#}");
                    // Re-anchor before the next attempt; drift after an
                    // error is the common case.
                    let _ = self.force_to_anchor(session).await;
                }
            }
        }

        ItemVisit {
            index,
            attempts: self.config.max_item_attempts,
            preview: None,
            detail: None,
            return_path: None,
            uncertain_return: false,
            failure: Some(last_failure),
        }
    }

    async fn attempt_visit(
        &self,
        session: &mut dyn BrowserSession,
        index: usize,
        attempt: u32,
    ) -> Result<AttemptOutcome> {
        if !self.confirm_on_listing(session).await? {
            return Ok(AttemptOutcome::Retry("listing unreachable".to_string()));
        }

        // Re-resolve the card collection fresh: handles from a previous
        // iteration are invalid after any navigation.
        let card = &self.config.selectors.result_card;
        let available = session.count(card).await?;
        if index >= available {
            return Ok(AttemptOutcome::ListingShrank { available });
        }

        let preview = session.outer_markup(card, index).await?;

        let _ = session.scroll_into_view(card, index).await?;
        tokio::time::sleep(self.config.waits.pre_click).await;

        match session.click(card, index).await? {
            ClickOutcome::Clicked => {}
            ClickOutcome::Intercepted => {
                debug!(index, "click intercepted, forcing synthetic click");
                if !session.force_click(card, index).await? {
                    return Ok(AttemptOutcome::Retry("card vanished mid-click".to_string()));
                }
            }
            ClickOutcome::Missing => {
                return Ok(AttemptOutcome::Retry("card reference went stale".to_string()));
            }
        }

        // Detail readiness has no single reliable marker across layouts;
        // a tuned settle delay is the dependable option.
        tokio::time::sleep(self.config.waits.detail_settle).await;
        let detail = session.page_markup().await?;

        let return_path = self.return_to_listing(session).await?;
        if return_path.is_none() {
            warn!(index, attempt, "return to listing unverified, keeping data");
        }

        Ok(AttemptOutcome::Visited(ItemVisit {
            index,
            attempts: attempt,
            preview,
            detail: Some(detail),
            uncertain_return: return_path.is_none(),
            return_path,
            failure: None,
        }))
    }

    /// The single re-entry point that bounds drift: verify listing
    /// presence, hard-navigating to the anchor URL first if needed.
    pub async fn confirm_on_listing(&self, session: &mut dyn BrowserSession) -> Result<bool> {
        let listing = &self.anchor.listing_selector;
        if session
            .wait_for_presence(listing, self.config.waits.listing_probe)
            .await?
        {
            return Ok(true);
        }

        debug!("listing not detectable, re-navigating to anchor");
        self.force_to_anchor(session).await?;
        session
            .wait_for_presence(listing, self.config.waits.listing_recover)
            .await
    }

    async fn force_to_anchor(&self, session: &mut dyn BrowserSession) -> Result<()> {
        session.navigate(&self.anchor.origin_url).await?;
        tokio::time::sleep(self.config.waits.after_recovery_nav).await;
        Ok(())
    }

    /// Re-establish the listing after a detail visit, trying four
    /// strategies in strict priority order. Returns which one verified,
    /// or `None` when all four failed.
    async fn return_to_listing(
        &self,
        session: &mut dyn BrowserSession,
    ) -> Result<Option<ReturnPath>> {
        // 1. Labeled back controls
        for control in &self.config.selectors.back_controls {
            if session.count(control).await? == 0 {
                continue;
            }
            if session.click(control, 0).await? != ClickOutcome::Clicked {
                continue;
            }
            tokio::time::sleep(self.config.waits.after_return).await;
            if self.listing_present(session).await? {
                return Ok(Some(ReturnPath::BackControl));
            }
        }

        // 2. Escape key
        session.send_key("Escape").await?;
        tokio::time::sleep(self.config.waits.after_return).await;
        if self.listing_present(session).await? {
            return Ok(Some(ReturnPath::EscapeKey));
        }

        // 3. Session history
        session.history_back().await?;
        tokio::time::sleep(self.config.waits.after_return).await;
        if self.listing_present(session).await? {
            return Ok(Some(ReturnPath::HistoryBack));
        }

        // 4. Hard navigation to the anchor
        self.force_to_anchor(session).await?;
        if session
            .wait_for_presence(
                &self.anchor.listing_selector,
                self.config.waits.listing_recover,
            )
            .await?
        {
            return Ok(Some(ReturnPath::AnchorReload));
        }

        Ok(None)
    }

    async fn listing_present(&self, session: &mut dyn BrowserSession) -> Result<bool> {
        session
            .wait_for_presence(
                &self.anchor.listing_selector,
                self.config.waits.listing_probe,
            )
            .await
    }
}

enum AttemptOutcome {
    /// The full cycle completed; snapshots captured.
    Visited(ItemVisit),
    /// The listing holds fewer cards than the requested index; terminal.
    ListingShrank { available: usize },
    /// Recoverable failure; restart the attempt.
    Retry(String),
}
