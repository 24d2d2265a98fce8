//! Harvest configuration: selectors, waits, retry bounds, extraction vocabularies.
//!
//! Every tunable the pipeline consults lives here rather than as a constant
//! buried in a strategy function. The defaults target the Google Maps layout
//! and US-English label vocabulary; other directories or locales are a matter
//! of constructing a different profile.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Top-level configuration for one harvest run.
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    /// Entry URL of the directory front-end.
    pub directory_url: String,
    /// CSS selectors for the directory's UI surfaces.
    pub selectors: SelectorProfile,
    /// Pause and timeout durations.
    pub waits: WaitProfile,
    /// Full per-item attempts before the item is written off.
    pub max_item_attempts: u32,
    /// Hard cap on listing scroll iterations.
    pub scroll_iteration_cap: u32,
    /// Consecutive zero-growth scroll iterations before the listing is
    /// considered fully loaded.
    pub scroll_stall_threshold: u32,
    /// Field extraction thresholds and vocabularies.
    pub extractor: ExtractorConfig,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            directory_url: "https://www.google.com/maps".to_string(),
            selectors: SelectorProfile::default(),
            waits: WaitProfile::default(),
            max_item_attempts: 3,
            scroll_iteration_cap: 50,
            scroll_stall_threshold: 3,
            extractor: ExtractorConfig::default(),
        }
    }
}

/// CSS selectors for the directory UI. Defaults match the Google Maps
/// results layout as of early 2026.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorProfile {
    /// The scrollable results feed. Presence of this element defines
    /// "we are on the listing".
    pub listing_panel: String,
    /// One collapsed result card inside the feed.
    pub result_card: String,
    /// The search input box.
    pub search_input: String,
    /// The search submit button.
    pub search_button: String,
    /// Consent/cookie interstitial accept buttons, tried in order.
    pub consent_buttons: Vec<String>,
    /// "Back to results" controls on the detail view, tried in order.
    pub back_controls: Vec<String>,
}

impl Default for SelectorProfile {
    fn default() -> Self {
        Self {
            listing_panel: "div[role='feed'], div[aria-label*='Results for']".to_string(),
            result_card: "div.Nv2PK".to_string(),
            search_input: "#searchboxinput".to_string(),
            search_button: "#searchbox-searchbutton".to_string(),
            consent_buttons: vec![
                "button[aria-label*='Accept all']".to_string(),
                "#introAgreeButton".to_string(),
                "form[action*='consent'] button".to_string(),
            ],
            back_controls: vec![
                "button[aria-label*='Back']".to_string(),
                "button[aria-label*='back']".to_string(),
                "button[data-value='Back']".to_string(),
                "[data-value='back']".to_string(),
            ],
        }
    }
}

/// Pause and timeout durations for the pipeline.
///
/// Coarse fixed pauses, not condition polling: across the directory's
/// layouts there is no single DOM-readiness signal worth waiting on. The
/// two `listing_*` values are the exception — listing presence has one
/// reliable anchor element and gets a bounded wait-for-presence.
#[derive(Debug, Clone)]
pub struct WaitProfile {
    /// After submitting the search.
    pub after_search: Duration,
    /// After dismissing a consent interstitial.
    pub after_consent: Duration,
    /// After a scroll-to-bottom of the results feed.
    pub scroll_settle: Duration,
    /// After the secondary scroll nudge.
    pub nudge_settle: Duration,
    /// Between scrolling a card into view and clicking it.
    pub pre_click: Duration,
    /// For the detail view to settle after a click.
    pub detail_settle: Duration,
    /// After a back-navigation action, before re-verifying the listing.
    pub after_return: Duration,
    /// After a hard navigation to the anchor URL.
    pub after_recovery_nav: Duration,
    /// Bounded wait for listing presence during routine checks.
    pub listing_probe: Duration,
    /// Bounded wait for listing presence after a hard recovery navigation.
    pub listing_recover: Duration,
    /// Between items, regardless of outcome.
    pub between_items: Duration,
}

impl Default for WaitProfile {
    fn default() -> Self {
        Self {
            after_search: Duration::from_secs(8),
            after_consent: Duration::from_secs(3),
            scroll_settle: Duration::from_secs(2),
            nudge_settle: Duration::from_secs(1),
            pre_click: Duration::from_secs(2),
            detail_settle: Duration::from_secs(6),
            after_return: Duration::from_secs(3),
            after_recovery_nav: Duration::from_secs(5),
            listing_probe: Duration::from_secs(5),
            listing_recover: Duration::from_secs(10),
            between_items: Duration::from_secs(2),
        }
    }
}

impl WaitProfile {
    /// All-zero profile for scripted-session tests.
    pub fn instant() -> Self {
        Self {
            after_search: Duration::ZERO,
            after_consent: Duration::ZERO,
            scroll_settle: Duration::ZERO,
            nudge_settle: Duration::ZERO,
            pre_click: Duration::ZERO,
            detail_settle: Duration::ZERO,
            after_return: Duration::ZERO,
            after_recovery_nav: Duration::ZERO,
            listing_probe: Duration::ZERO,
            listing_recover: Duration::ZERO,
            between_items: Duration::ZERO,
        }
    }
}

/// Thresholds and vocabularies for field extraction and validation.
///
/// US-English defaults. International locales swap the vocabularies here
/// instead of patching strategy code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// The listing's generic heading text; never a valid business name.
    pub placeholder_heading: String,
    /// Sentinel written when no name survives validation. Downstream
    /// consumers rely on `name` always being populated.
    pub name_sentinel: String,
    /// Name candidates longer than this are markup noise, not names.
    pub max_name_len: usize,
    /// Minimum length for an address candidate.
    pub min_address_len: usize,
    /// Whole-word tokens that mark a text line as rating/hours/category
    /// chrome rather than an address.
    pub address_blocklist: Vec<String>,
    /// Label prefixes stripped off address candidates.
    pub address_prefixes: Vec<String>,
    /// Host fragments excluded when hunting for the business website
    /// (the directory's own domains plus social platforms).
    pub excluded_link_domains: Vec<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            placeholder_heading: "results".to_string(),
            name_sentinel: "Business Name Not Found".to_string(),
            max_name_len: 200,
            min_address_len: 10,
            address_blocklist: [
                "rating", "ratings", "review", "reviews", "star", "stars", "open", "opens",
                "closed", "closes", "hour", "hours", "minute", "minutes", "directions",
                "website", "call", "service",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            address_prefixes: [
                "Address:",
                "address:",
                "Directions to",
                "Get directions to",
                "Navigate to",
                "Located at",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            excluded_link_domains: [
                "google.com",
                "maps.google",
                "gstatic.com",
                "googleusercontent.com",
                "facebook.com",
                "instagram.com",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bounds() {
        let config = HarvestConfig::default();
        assert_eq!(config.max_item_attempts, 3);
        assert_eq!(config.scroll_iteration_cap, 50);
        assert_eq!(config.scroll_stall_threshold, 3);
        assert!(config.extractor.min_address_len > 0);
    }

    #[test]
    fn test_instant_waits_are_zero() {
        let waits = WaitProfile::instant();
        assert_eq!(waits.detail_settle, Duration::ZERO);
        assert_eq!(waits.between_items, Duration::ZERO);
    }

    #[test]
    fn test_blocklist_covers_hours_chrome() {
        let extractor = ExtractorConfig::default();
        for token in ["open", "hours", "star"] {
            assert!(extractor.address_blocklist.iter().any(|t| t == token));
        }
    }
}
