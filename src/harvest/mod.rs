//! Harvest pipeline core — data model and the listing → detail → listing
//! machinery.
//!
//! The pipeline is strictly sequential over one exclusively-owned browser
//! session: load the listing, then for each item navigate in, capture
//! snapshots, navigate back, and reconcile the two extractions into one
//! validated record. Navigation failures are absorbed per item; only the
//! loss of the session itself aborts a run.

pub mod loader;
pub mod navigator;
pub mod orchestrator;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One validated business record.
///
/// `name` is always populated — a genuine value or the configured
/// sentinel. Every other field is an empty string when nothing validated.
/// Identity is structural; downstream consumers dedupe on
/// name/phone/address equality.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessRecord {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub website: String,
    pub email: String,
}

/// Which view a partial extraction was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtractionSource {
    /// The collapsed listing card, before navigation.
    Preview,
    /// The full detail view, after navigation.
    Detail,
}

/// A best-effort extraction from a single snapshot. Every field may be
/// empty; created per item and consumed immediately by reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialExtraction {
    pub source: ExtractionSource,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub website: String,
    pub email: String,
}

impl PartialExtraction {
    /// An all-empty extraction from the given source.
    pub fn empty(source: ExtractionSource) -> Self {
        Self {
            source,
            name: String::new(),
            phone: String::new(),
            address: String::new(),
            website: String::new(),
            email: String::new(),
        }
    }
}

/// The recorded identity of the originating search.
///
/// Captured once after the listing first renders and read-only for the
/// rest of the run. Every recovery path re-derives "on listing" from this
/// anchor instead of assuming prior navigation succeeded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionAnchor {
    /// URL of the search results page.
    pub origin_url: String,
    /// Selector whose presence defines "on the listing".
    pub listing_selector: String,
}

impl SessionAnchor {
    pub fn new(origin_url: String, listing_selector: String) -> Self {
        Self {
            origin_url,
            listing_selector,
        }
    }
}

/// Which recovery strategy re-established the listing after a detail visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReturnPath {
    /// A labeled back control on the detail view.
    BackControl,
    /// An Escape keypress.
    EscapeKey,
    /// Session history back.
    HistoryBack,
    /// Hard navigation to the anchor URL.
    AnchorReload,
}

impl std::fmt::Display for ReturnPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BackControl => write!(f, "back control"),
            Self::EscapeKey => write!(f, "escape key"),
            Self::HistoryBack => write!(f, "history back"),
            Self::AnchorReload => write!(f, "anchor reload"),
        }
    }
}

/// Raw result of one item's navigation cycle: the snapshots captured at
/// the only moments they are observable. Parsing happens downstream.
#[derive(Debug, Clone)]
pub struct ItemVisit {
    pub index: usize,
    /// Full attempts consumed (1-based; equals the cap when exhausted).
    pub attempts: u32,
    /// Outer markup of the listing card, captured before the click.
    pub preview: Option<String>,
    /// Full page markup of the detail view. `None` means the detail was
    /// never reached and the item failed.
    pub detail: Option<String>,
    /// How the listing was re-established, if it was.
    pub return_path: Option<ReturnPath>,
    /// All recovery strategies failed; extracted data was kept anyway.
    pub uncertain_return: bool,
    /// Why the item failed, when `detail` is `None`.
    pub failure: Option<String>,
}

/// Diagnostic outcome for one processed item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemOutcome {
    pub index: usize,
    pub extracted: bool,
    pub record: Option<BusinessRecord>,
    pub attempts: u32,
    pub failure: Option<String>,
    pub return_path: Option<ReturnPath>,
    pub uncertain_return: bool,
}

/// Run-aborting failures.
///
/// Everything else the pipeline encounters is absorbed into per-item
/// outcomes or diagnostic events.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// The browser session cannot be created or the search surface never
    /// appeared; the run produced zero records.
    #[error("browser session unavailable: {0}")]
    SessionUnavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_structural_equality() {
        let a = BusinessRecord {
            name: "Davie Sign Co".to_string(),
            phone: "(407) 555-1212".to_string(),
            ..Default::default()
        };
        let b = a.clone();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_partial_has_source() {
        let p = PartialExtraction::empty(ExtractionSource::Detail);
        assert_eq!(p.source, ExtractionSource::Detail);
        assert!(p.name.is_empty());
    }

    #[test]
    fn test_outcome_serializes() {
        let outcome = ItemOutcome {
            index: 2,
            extracted: false,
            record: None,
            attempts: 3,
            failure: Some("listing unreachable".to_string()),
            return_path: None,
            uncertain_return: false,
        };
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("listing unreachable"));
    }
}
