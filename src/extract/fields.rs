//! Per-field extraction strategies.
//!
//! Each function is one rung of a priority ladder: pure, silent on
//! failure, returning a validated value or nothing. The hardcoded
//! selector lists track the directory's markup; the vocabularies and
//! thresholds come from [`ExtractorConfig`] so locales can be swapped
//! without touching this file.

use super::Snapshot;
use crate::config::ExtractorConfig;
use regex::Regex;
use scraper::Selector;
use std::sync::OnceLock;
use url::Url;

/// Detail-view name selectors, decreasing specificity.
const DETAIL_NAME_SELECTORS: &[&str] = &[
    "h1.DUwDvf",
    "h1",
    ".x3AX1-LfntMc-header-title-title",
    ".fontHeadlineLarge",
    ".fontHeadlineSmall",
    "[data-attrid='title']",
];

/// Listing-card name selectors, decreasing specificity.
const CARD_NAME_SELECTORS: &[&str] = &[
    ".fontHeadlineSmall",
    ".fontHeadlineLarge",
    "[data-value='Business name']",
    ".qBF1Pd",
    "h3",
    "h2",
];

fn phone_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(\+?1?[\s\-]?\(?\d{3}\)?[\s\-]?\d{3}[\s\-]?\d{4})").unwrap()
    })
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap())
}

fn street_suffix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\d+\s+\w+.*\b(?:street|st|avenue|ave|road|rd|boulevard|blvd|drive|dr|lane|ln|way|pkwy|parkway|circle|cir|court|ct|place|pl)\b",
        )
        .unwrap()
    })
}

fn directional_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+\s+[NSEW]\s+\w+").unwrap())
}

fn suite_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\d+.*(?:suite|ste|#)\s*\d+").unwrap())
}

fn postal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b\d{5}(?:-\d{4})?\b").unwrap())
}

// ── Name ────────────────────────────────────────────────────────────────────

pub fn name_from_detail_headings(snapshot: &Snapshot, config: &ExtractorConfig) -> Option<String> {
    name_from_selectors(DETAIL_NAME_SELECTORS, snapshot, config)
}

pub fn name_from_card_headings(snapshot: &Snapshot, config: &ExtractorConfig) -> Option<String> {
    name_from_selectors(CARD_NAME_SELECTORS, snapshot, config)
}

/// Last resort: the first text chunk of the snapshot is usually the name
/// on a listing card.
pub fn name_from_first_line(snapshot: &Snapshot, config: &ExtractorConfig) -> Option<String> {
    let line = snapshot.text_lines().first()?;
    valid_name(line, config).then(|| line.clone())
}

fn name_from_selectors(
    selectors: &[&str],
    snapshot: &Snapshot,
    config: &ExtractorConfig,
) -> Option<String> {
    selectors
        .iter()
        .filter_map(|sel| snapshot.first_text(sel))
        .find(|text| valid_name(text, config))
}

fn valid_name(text: &str, config: &ExtractorConfig) -> bool {
    !text.is_empty() && text.len() < config.max_name_len && !is_placeholder(text, config)
}

/// Whether a candidate is the listing's generic heading, not a business
/// name.
pub fn is_placeholder(text: &str, config: &ExtractorConfig) -> bool {
    text.trim()
        .to_lowercase()
        .starts_with(&config.placeholder_heading)
}

// ── Phone ───────────────────────────────────────────────────────────────────

pub fn phone_from_tel_link(snapshot: &Snapshot, _config: &ExtractorConfig) -> Option<String> {
    static SEL: OnceLock<Selector> = OnceLock::new();
    let sel = SEL.get_or_init(|| Selector::parse("a[href^='tel:']").unwrap());
    snapshot
        .html()
        .select(sel)
        .filter_map(|el| el.value().attr("href"))
        .map(|href| href.trim_start_matches("tel:").trim().to_string())
        .find(|phone| phone.len() >= 10)
}

pub fn phone_from_labels(snapshot: &Snapshot, _config: &ExtractorConfig) -> Option<String> {
    labeled_values(snapshot, &["phone", "call"])
        .find_map(|label| capture_phone(&label))
}

pub fn phone_from_text(snapshot: &Snapshot, _config: &ExtractorConfig) -> Option<String> {
    snapshot
        .text_lines()
        .iter()
        .find_map(|line| capture_phone(line))
}

fn capture_phone(text: &str) -> Option<String> {
    phone_re()
        .captures(text)
        .map(|caps| caps[1].trim().to_string())
}

// ── Address ─────────────────────────────────────────────────────────────────

pub fn address_from_labels(snapshot: &Snapshot, config: &ExtractorConfig) -> Option<String> {
    labeled_values(snapshot, &["address", "directions"])
        .map(|label| strip_address_prefixes(&label, config))
        .find(|addr| addr.len() > config.min_address_len)
}

pub fn address_from_text_lines(snapshot: &Snapshot, config: &ExtractorConfig) -> Option<String> {
    snapshot
        .text_lines()
        .iter()
        .filter(|line| !blocklisted(line, config))
        .find(|line| is_address_line(line, config))
        .map(|line| strip_address_prefixes(line, config))
}

/// Whether a free-text line plausibly holds a street address.
pub fn is_address_line(line: &str, config: &ExtractorConfig) -> bool {
    if line.len() <= config.min_address_len || line.len() > 150 {
        return false;
    }
    if !line.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }
    street_suffix_re().is_match(line)
        || directional_re().is_match(line)
        || suite_re().is_match(line)
        || postal_re().is_match(line)
}

/// Whole-word test against the rating/hours/category vocabulary.
fn blocklisted(line: &str, config: &ExtractorConfig) -> bool {
    line.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .any(|token| config.address_blocklist.iter().any(|t| t == token))
}

fn strip_address_prefixes(text: &str, config: &ExtractorConfig) -> String {
    let mut out = text.trim();
    for prefix in &config.address_prefixes {
        if let Some(rest) = out.strip_prefix(prefix.as_str()) {
            out = rest.trim();
        }
    }
    out.to_string()
}

// ── Website ─────────────────────────────────────────────────────────────────

pub fn website_from_labels(snapshot: &Snapshot, config: &ExtractorConfig) -> Option<String> {
    static SEL: OnceLock<Selector> = OnceLock::new();
    let sel = SEL.get_or_init(|| Selector::parse("a[aria-label][href]").unwrap());
    snapshot
        .html()
        .select(sel)
        .filter(|el| {
            el.value()
                .attr("aria-label")
                .is_some_and(|label| label.to_lowercase().contains("website"))
        })
        .filter_map(|el| el.value().attr("href"))
        .find(|href| external_link(href, config))
        .map(|href| href.to_string())
}

pub fn website_from_any_external(snapshot: &Snapshot, config: &ExtractorConfig) -> Option<String> {
    static SEL: OnceLock<Selector> = OnceLock::new();
    let sel = SEL.get_or_init(|| Selector::parse("a[href]").unwrap());
    snapshot
        .html()
        .select(sel)
        .filter_map(|el| el.value().attr("href"))
        .find(|href| external_link(href, config))
        .map(|href| href.to_string())
}

/// An http(s) link whose host is neither the directory's own domain nor a
/// known social platform.
fn external_link(href: &str, config: &ExtractorConfig) -> bool {
    if !href.starts_with("http") {
        return false;
    }
    let Ok(url) = Url::parse(href) else {
        return false;
    };
    let Some(host) = url.host_str() else {
        return false;
    };
    !config
        .excluded_link_domains
        .iter()
        .any(|domain| host.contains(domain.as_str()))
}

// ── Email ───────────────────────────────────────────────────────────────────

pub fn email_from_mailto(snapshot: &Snapshot, _config: &ExtractorConfig) -> Option<String> {
    static SEL: OnceLock<Selector> = OnceLock::new();
    let sel = SEL.get_or_init(|| Selector::parse("a[href^='mailto:']").unwrap());
    snapshot
        .html()
        .select(sel)
        .filter_map(|el| el.value().attr("href"))
        .map(|href| href.trim_start_matches("mailto:").trim().to_string())
        .find(|addr| email_re().is_match(addr))
}

pub fn email_from_text(snapshot: &Snapshot, _config: &ExtractorConfig) -> Option<String> {
    snapshot
        .text_lines()
        .iter()
        .find_map(|line| email_re().find(line).map(|m| m.as_str().to_string()))
}

// ── Shared helpers ──────────────────────────────────────────────────────────

/// Aria-label values whose lowercased text contains any of `needles`.
fn labeled_values<'a>(
    snapshot: &'a Snapshot,
    needles: &'a [&str],
) -> impl Iterator<Item = String> + 'a {
    static SEL: OnceLock<Selector> = OnceLock::new();
    let sel = SEL.get_or_init(|| Selector::parse("[aria-label]").unwrap());
    snapshot
        .html()
        .select(sel)
        .filter_map(|el| el.value().attr("aria-label"))
        .filter(move |label| {
            let lower = label.to_lowercase();
            needles.iter().any(|needle| lower.contains(needle))
        })
        .map(|label| label.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Snapshot;

    fn config() -> ExtractorConfig {
        ExtractorConfig::default()
    }

    #[test]
    fn test_phone_pattern_in_free_text() {
        let snap = Snapshot::parse("<div>Call us: (407) 555-1212 today</div>");
        let phone = phone_from_text(&snap, &config());
        assert_eq!(phone.as_deref(), Some("(407) 555-1212"));
    }

    #[test]
    fn test_phone_from_tel_link_strips_scheme() {
        let snap = Snapshot::parse(r#"<a href="tel:+14075551212">Call</a>"#);
        let phone = phone_from_tel_link(&snap, &config());
        assert_eq!(phone.as_deref(), Some("+14075551212"));
    }

    #[test]
    fn test_phone_short_tel_link_rejected() {
        let snap = Snapshot::parse(r#"<a href="tel:911">Call</a>"#);
        assert_eq!(phone_from_tel_link(&snap, &config()), None);
    }

    #[test]
    fn test_phone_from_aria_label() {
        let snap =
            Snapshot::parse(r#"<button aria-label="Phone: (804) 555-0001">p</button>"#);
        let phone = phone_from_labels(&snap, &config());
        assert_eq!(phone.as_deref(), Some("(804) 555-0001"));
    }

    #[test]
    fn test_address_line_accepts_street_address() {
        assert!(is_address_line("10388 W State Rd 84, Davie, FL 33328", &config()));
    }

    #[test]
    fn test_address_line_rejects_rating_chrome() {
        let snap = Snapshot::parse("<div><span>4.8 (82) Open 24 hours</span></div>");
        assert_eq!(address_from_text_lines(&snap, &config()), None);
    }

    #[test]
    fn test_address_text_scan_finds_street_line() {
        let snap = Snapshot::parse(
            "<div><span>4.8 (82) Open 24 hours</span><span>10388 W State Rd 84, Davie, FL 33328</span></div>",
        );
        let addr = address_from_text_lines(&snap, &config());
        assert_eq!(addr.as_deref(), Some("10388 W State Rd 84, Davie, FL 33328"));
    }

    #[test]
    fn test_address_label_prefix_stripped() {
        let snap = Snapshot::parse(
            r#"<button aria-label="Directions to 123 Main Street, Richmond, VA">d</button>"#,
        );
        let addr = address_from_labels(&snap, &config());
        assert_eq!(addr.as_deref(), Some("123 Main Street, Richmond, VA"));
    }

    #[test]
    fn test_name_rejects_listing_placeholder() {
        let snap = Snapshot::parse("<h1>Results</h1>");
        assert_eq!(name_from_detail_headings(&snap, &config()), None);
    }

    #[test]
    fn test_name_detail_heading_wins() {
        let snap = Snapshot::parse(
            r#"<h1 class="DUwDvf">Superior Auto Wraps</h1><h2>Sponsored</h2>"#,
        );
        let name = name_from_detail_headings(&snap, &config());
        assert_eq!(name.as_deref(), Some("Superior Auto Wraps"));
    }

    #[test]
    fn test_website_excludes_directory_and_social() {
        let snap = Snapshot::parse(
            r#"<a href="https://www.google.com/maps/place/x">maps</a>
               <a href="https://facebook.com/bizpage">fb</a>
               <a href="https://superiorwraps.com/contact">site</a>"#,
        );
        let site = website_from_any_external(&snap, &config());
        assert_eq!(site.as_deref(), Some("https://superiorwraps.com/contact"));
    }

    #[test]
    fn test_website_label_preferred() {
        let snap = Snapshot::parse(
            r#"<a href="https://other.example.com">elsewhere</a>
               <a aria-label="Website: superiorwraps.com" href="https://superiorwraps.com">w</a>"#,
        );
        let site = website_from_labels(&snap, &config());
        assert_eq!(site.as_deref(), Some("https://superiorwraps.com"));
    }

    #[test]
    fn test_email_from_mailto() {
        let snap = Snapshot::parse(r#"<a href="mailto:info@superiorwraps.com">mail</a>"#);
        let email = email_from_mailto(&snap, &config());
        assert_eq!(email.as_deref(), Some("info@superiorwraps.com"));
    }

    #[test]
    fn test_email_from_text() {
        let snap = Snapshot::parse("<p>Reach us at sales@wrapco.net for quotes.</p>");
        let email = email_from_text(&snap, &config());
        assert_eq!(email.as_deref(), Some("sales@wrapco.net"));
    }
}
