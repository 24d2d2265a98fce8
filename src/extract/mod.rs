//! Field extraction from listing-card and detail-view snapshots.
//!
//! Raw markup goes in, a best-effort [`PartialExtraction`] comes out. For
//! each field a priority-ordered list of pure strategy functions is tried
//! until one yields a validated value; a strategy failing is silent and an
//! all-empty result is valid data, never an error. The mode only changes
//! the ordering — detail mode trusts the detail view's structured
//! selectors first, preview mode trusts card-level accessible labels.

pub mod fields;
pub mod reconcile;

use crate::config::ExtractorConfig;
use crate::harvest::{ExtractionSource, PartialExtraction};
use scraper::{Html, Selector};

/// A parsed snapshot: the DOM plus its rendered-ish text chunks.
pub struct Snapshot {
    html: Html,
    text_lines: Vec<String>,
}

impl Snapshot {
    /// Parse raw markup. Works for both card fragments and full documents.
    pub fn parse(markup: &str) -> Self {
        let html = Html::parse_document(markup);
        let text_lines = html
            .root_element()
            .text()
            .map(|chunk| chunk.trim())
            .filter(|chunk| !chunk.is_empty())
            .map(|chunk| chunk.to_string())
            .collect();
        Self { html, text_lines }
    }

    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Non-empty text chunks in document order.
    pub fn text_lines(&self) -> &[String] {
        &self.text_lines
    }

    /// Trimmed text of the first element matching `selector`, if any.
    /// Invalid selectors yield `None`.
    pub fn first_text(&self, selector: &str) -> Option<String> {
        let sel = Selector::parse(selector).ok()?;
        self.html
            .select(&sel)
            .map(|el| el.text().collect::<String>().trim().to_string())
            .find(|text| !text.is_empty())
    }
}

/// A pure extraction strategy for one field.
pub type FieldStrategy = fn(&Snapshot, &ExtractorConfig) -> Option<String>;

/// Extract a partial record from one snapshot.
pub fn extract(
    markup: &str,
    source: ExtractionSource,
    config: &ExtractorConfig,
) -> PartialExtraction {
    let snapshot = Snapshot::parse(markup);

    let name_order: &[FieldStrategy] = match source {
        ExtractionSource::Detail => &[
            fields::name_from_detail_headings,
            fields::name_from_card_headings,
            fields::name_from_first_line,
        ],
        ExtractionSource::Preview => &[
            fields::name_from_card_headings,
            fields::name_from_detail_headings,
            fields::name_from_first_line,
        ],
    };
    let phone_order: &[FieldStrategy] = match source {
        ExtractionSource::Detail => &[
            fields::phone_from_tel_link,
            fields::phone_from_labels,
            fields::phone_from_text,
        ],
        ExtractionSource::Preview => &[
            fields::phone_from_labels,
            fields::phone_from_tel_link,
            fields::phone_from_text,
        ],
    };
    let address_order: &[FieldStrategy] =
        &[fields::address_from_labels, fields::address_from_text_lines];
    let website_order: &[FieldStrategy] = &[
        fields::website_from_labels,
        fields::website_from_any_external,
    ];
    let email_order: &[FieldStrategy] =
        &[fields::email_from_mailto, fields::email_from_text];

    PartialExtraction {
        source,
        name: first_yield(name_order, &snapshot, config),
        phone: first_yield(phone_order, &snapshot, config),
        address: first_yield(address_order, &snapshot, config),
        website: first_yield(website_order, &snapshot, config),
        email: first_yield(email_order, &snapshot, config),
    }
}

/// Run strategies in priority order; first non-empty value wins.
fn first_yield(
    strategies: &[FieldStrategy],
    snapshot: &Snapshot,
    config: &ExtractorConfig,
) -> String {
    strategies
        .iter()
        .find_map(|strategy| strategy(snapshot, config))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harvest::ExtractionSource;

    #[test]
    fn test_extract_full_detail_snapshot() {
        let markup = r#"
            <html><body>
              <h1 class="DUwDvf">Superior Auto Wraps</h1>
              <a href="tel:+14075551212">Call</a>
              <button aria-label="Address: 10388 W State Rd 84, Davie, FL 33328">addr</button>
              <a aria-label="Website: superiorwraps.com" href="https://superiorwraps.com">site</a>
            </body></html>"#;
        let partial = extract(markup, ExtractionSource::Detail, &ExtractorConfig::default());
        assert_eq!(partial.name, "Superior Auto Wraps");
        assert_eq!(partial.phone, "+14075551212");
        assert_eq!(partial.address, "10388 W State Rd 84, Davie, FL 33328");
        assert_eq!(partial.website, "https://superiorwraps.com");
    }

    #[test]
    fn test_extract_empty_markup_is_all_empty() {
        let partial = extract("", ExtractionSource::Preview, &ExtractorConfig::default());
        assert!(partial.name.is_empty());
        assert!(partial.phone.is_empty());
        assert!(partial.address.is_empty());
        assert!(partial.website.is_empty());
        assert!(partial.email.is_empty());
    }

    #[test]
    fn test_preview_prefers_card_headline() {
        let markup = r#"
            <div class="Nv2PK">
              <div class="fontHeadlineSmall">Card Name Co</div>
            </div>"#;
        let partial = extract(markup, ExtractionSource::Preview, &ExtractorConfig::default());
        assert_eq!(partial.name, "Card Name Co");
    }
}
