//! Pipeline orchestrator — search, anchor, load, then one item at a time.
//!
//! The orchestrator exclusively owns the browser session for the duration
//! of a run. All navigation and extraction is strictly sequential: the
//! session's current page is shared mutable state, and item `i + 1` never
//! starts before item `i`'s outcome is recorded.

use crate::config::HarvestConfig;
use crate::events::{EventBus, HarvestEvent};
use crate::extract::{self, reconcile};
use crate::harvest::{
    loader, navigator::NavigationController, BusinessRecord, ExtractionSource, HarvestError,
    ItemOutcome, PartialExtraction, SessionAnchor,
};
use crate::session::{BrowserSession, ClickOutcome};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Bounded wait for the search surface and the first listing render.
const SEARCH_SURFACE_TIMEOUT: Duration = Duration::from_secs(10);

/// One harvest request.
#[derive(Debug, Clone)]
pub struct HarvestRequest {
    pub query: String,
    pub location: Option<String>,
    pub max_results: usize,
}

impl HarvestRequest {
    /// The phrase submitted to the directory's search box.
    pub fn search_phrase(&self) -> String {
        match &self.location {
            Some(location) if !location.is_empty() => format!("{} in {}", self.query, location),
            _ => self.query.clone(),
        }
    }
}

/// Result of a completed run: the validated records in listing order plus
/// the full per-item diagnostic trail (failures included).
#[derive(Debug, Clone)]
pub struct HarvestOutcome {
    pub records: Vec<BusinessRecord>,
    pub outcomes: Vec<ItemOutcome>,
}

/// Drives a whole harvest run over one exclusively-owned session.
pub struct Harvester {
    config: HarvestConfig,
    events: EventBus,
    abort: Arc<AtomicBool>,
}

impl Harvester {
    pub fn new(config: HarvestConfig) -> Self {
        Self {
            config,
            events: EventBus::new(256),
            abort: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Subscribe to progress events for this harvester.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<HarvestEvent> {
        self.events.subscribe()
    }

    /// Handle that aborts the run at the next item or scroll boundary;
    /// partial results are returned.
    pub fn abort_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.abort)
    }

    /// Run the pipeline. The only error is [`HarvestError::SessionUnavailable`];
    /// every per-item failure is absorbed into the outcome list.
    pub async fn run(
        &self,
        session: &mut dyn BrowserSession,
        request: &HarvestRequest,
    ) -> Result<HarvestOutcome, HarvestError> {
        let run_id = uuid::Uuid::new_v4().to_string();
        let started = Instant::now();
        let requested = request.max_results.max(1);

        self.events.emit(HarvestEvent::RunStarted {
            run_id: run_id.clone(),
            query: request.query.clone(),
            location: request.location.clone(),
            requested,
        });

        let anchor = self.open_listing(session, request, &run_id).await?;

        let realized = loader::load(session, &anchor, &self.config, requested, &self.abort)
            .await
            .map_err(|e| HarvestError::SessionUnavailable(format!("{e:#}")))?;
        info!(realized, requested, "listing loaded");
        self.events.emit(HarvestEvent::ListingLoaded {
            run_id: run_id.clone(),
            realized,
            requested,
        });

        let controller = NavigationController::new(&self.config, &anchor);
        let mut records = Vec::new();
        let mut outcomes = Vec::new();

        for index in 0..requested.min(realized) {
            if self.abort.load(Ordering::Relaxed) {
                self.events.emit(HarvestEvent::RunAborted {
                    run_id: run_id.clone(),
                    processed: outcomes.len(),
                });
                break;
            }

            self.events.emit(HarvestEvent::ItemStarted {
                run_id: run_id.clone(),
                index,
            });

            let visit = controller.visit_item(session, index).await;

            let preview = match &visit.preview {
                Some(markup) => {
                    extract::extract(markup, ExtractionSource::Preview, &self.config.extractor)
                }
                None => PartialExtraction::empty(ExtractionSource::Preview),
            };
            self.events.emit(HarvestEvent::ItemPreviewed {
                run_id: run_id.clone(),
                index,
                name: (!preview.name.is_empty()).then(|| preview.name.clone()),
            });

            // Exactly one extraction per source per item: a failed visit
            // still contributes an (empty) detail extraction.
            let detail = match &visit.detail {
                Some(markup) => {
                    extract::extract(markup, ExtractionSource::Detail, &self.config.extractor)
                }
                None => PartialExtraction::empty(ExtractionSource::Detail),
            };

            let outcome = if visit.detail.is_some() {
                let record = reconcile::merge(&preview, &detail, &self.config.extractor);
                self.events.emit(HarvestEvent::ItemExtracted {
                    run_id: run_id.clone(),
                    index,
                    name: record.name.clone(),
                    has_phone: !record.phone.is_empty(),
                    has_address: !record.address.is_empty(),
                    has_website: !record.website.is_empty(),
                });
                if visit.uncertain_return {
                    self.events.emit(HarvestEvent::ReturnUncertain {
                        run_id: run_id.clone(),
                        index,
                    });
                }
                records.push(record.clone());
                ItemOutcome {
                    index,
                    extracted: true,
                    record: Some(record),
                    attempts: visit.attempts,
                    failure: None,
                    return_path: visit.return_path,
                    uncertain_return: visit.uncertain_return,
                }
            } else {
                let reason = visit
                    .failure
                    .clone()
                    .unwrap_or_else(|| "navigation failed".to_string());
                warn!(index, %reason, "item written off");
                self.events.emit(HarvestEvent::ItemFailed {
                    run_id: run_id.clone(),
                    index,
                    attempts: visit.attempts,
                    reason: reason.clone(),
                });
                ItemOutcome {
                    index,
                    extracted: false,
                    record: None,
                    attempts: visit.attempts,
                    failure: Some(reason),
                    return_path: visit.return_path,
                    uncertain_return: visit.uncertain_return,
                }
            };
            outcomes.push(outcome);

            // Fixed inter-item pause regardless of outcome, trading
            // throughput for reduced rate-limit exposure.
            tokio::time::sleep(self.config.waits.between_items).await;
        }

        self.events.emit(HarvestEvent::RunComplete {
            run_id,
            records: records.len(),
            failures: outcomes.iter().filter(|o| !o.extracted).count(),
            elapsed_ms: started.elapsed().as_millis() as u64,
        });

        Ok(HarvestOutcome { records, outcomes })
    }

    /// Open the directory, clear any consent interstitial, submit the
    /// search, and capture the session anchor once the listing renders.
    async fn open_listing(
        &self,
        session: &mut dyn BrowserSession,
        request: &HarvestRequest,
        run_id: &str,
    ) -> Result<SessionAnchor, HarvestError> {
        let selectors = &self.config.selectors;

        session
            .navigate(&self.config.directory_url)
            .await
            .map_err(|e| HarvestError::SessionUnavailable(format!("{e:#}")))?;

        self.dismiss_consent(session, run_id).await;

        let search_ready = session
            .wait_for_presence(&selectors.search_input, SEARCH_SURFACE_TIMEOUT)
            .await
            .unwrap_or(false);
        if !search_ready {
            return Err(HarvestError::SessionUnavailable(
                "search input never appeared".to_string(),
            ));
        }

        let phrase = request.search_phrase();
        let filled = session
            .fill(&selectors.search_input, &phrase)
            .await
            .unwrap_or(false);
        let clicked = matches!(
            session.click(&selectors.search_button, 0).await,
            Ok(ClickOutcome::Clicked)
        );
        if !filled || !clicked {
            return Err(HarvestError::SessionUnavailable(
                "search box could not be driven".to_string(),
            ));
        }
        self.events.emit(HarvestEvent::SearchSubmitted {
            run_id: run_id.to_string(),
            phrase,
        });
        tokio::time::sleep(self.config.waits.after_search).await;

        let listing_ready = session
            .wait_for_presence(&selectors.listing_panel, SEARCH_SURFACE_TIMEOUT)
            .await
            .unwrap_or(false);
        if !listing_ready {
            return Err(HarvestError::SessionUnavailable(
                "results listing never appeared".to_string(),
            ));
        }

        // Captured once, read-only for the rest of the run.
        let origin_url = session
            .current_url()
            .await
            .map_err(|e| HarvestError::SessionUnavailable(format!("{e:#}")))?;
        Ok(SessionAnchor::new(
            origin_url,
            selectors.listing_panel.clone(),
        ))
    }

    /// Best-effort consent dismissal; absence of an interstitial is the
    /// common case and not an error.
    async fn dismiss_consent(&self, session: &mut dyn BrowserSession, run_id: &str) {
        for selector in &self.config.selectors.consent_buttons {
            match session.count(selector).await {
                Ok(n) if n > 0 => {
                    if matches!(session.click(selector, 0).await, Ok(ClickOutcome::Clicked)) {
                        self.events.emit(HarvestEvent::ConsentDismissed {
                            run_id: run_id.to_string(),
                        });
                        tokio::time::sleep(self.config.waits.after_consent).await;
                        return;
                    }
                }
                _ => continue,
            }
        }
    }
}
