//! Listing loader — grow the results feed until enough items exist.
//!
//! The feed realizes items lazily as it scrolls. Each iteration counts the
//! realized cards, then issues a scroll-to-bottom on the feed plus a
//! scroll-into-view of the last card (lazy renderers often need the
//! element-level nudge) and a fixed pixel nudge. Zero growth is a valid
//! terminal state, not an error: the caller simply gets fewer items than
//! requested.

use crate::config::HarvestConfig;
use crate::harvest::SessionAnchor;
use crate::session::BrowserSession;
use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// Pixel delta for the secondary scroll nudge.
const SCROLL_NUDGE_PX: i64 = 1000;

/// Scroll the listing until `target` cards are realized, growth stalls,
/// or the iteration cap is hit. Returns the realized card count.
pub async fn load(
    session: &mut dyn BrowserSession,
    anchor: &SessionAnchor,
    config: &HarvestConfig,
    target: usize,
    abort: &AtomicBool,
) -> Result<usize> {
    let card = &config.selectors.result_card;
    let mut last_count = 0usize;
    let mut stalled_iterations = 0u32;

    for iteration in 0..config.scroll_iteration_cap {
        if abort.load(Ordering::Relaxed) {
            break;
        }

        let count = session.count(card).await?;
        debug!(iteration, count, target, "listing scroll");

        if count >= target {
            return Ok(count);
        }

        if count == last_count {
            stalled_iterations += 1;
            if stalled_iterations >= config.scroll_stall_threshold {
                debug!(count, "listing growth stalled");
                return Ok(count);
            }
        } else {
            stalled_iterations = 0;
        }
        last_count = count;

        session.scroll_to_bottom(&anchor.listing_selector).await?;
        tokio::time::sleep(config.waits.scroll_settle).await;

        if count > 0 {
            let _ = session.scroll_into_view(card, count - 1).await;
            tokio::time::sleep(config.waits.nudge_settle).await;
        }

        session
            .scroll_by(&anchor.listing_selector, SCROLL_NUDGE_PX)
            .await?;
        tokio::time::sleep(config.waits.scroll_settle).await;
    }

    session.count(card).await
}
