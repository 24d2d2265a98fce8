//! Reconciliation — merge preview and detail extractions into one record.
//!
//! Per field the detail value wins when non-empty, then the preview value,
//! then empty. `name` is the exception: the winner must survive
//! placeholder rejection, both sources are searched for an alternate, and
//! a fixed sentinel is written when none is found — downstream consumers
//! rely on `name` always being present. No other field gets a sentinel.

use super::fields::is_placeholder;
use crate::config::ExtractorConfig;
use crate::harvest::{BusinessRecord, PartialExtraction};

/// Merge a preview and a detail extraction into one validated record.
pub fn merge(
    preview: &PartialExtraction,
    detail: &PartialExtraction,
    config: &ExtractorConfig,
) -> BusinessRecord {
    BusinessRecord {
        name: merge_name(preview, detail, config),
        phone: pick(&detail.phone, &preview.phone),
        address: pick(&detail.address, &preview.address),
        website: pick(&detail.website, &preview.website),
        email: pick(&detail.email, &preview.email),
    }
}

fn pick(detail: &str, preview: &str) -> String {
    if !detail.is_empty() {
        detail.to_string()
    } else {
        preview.to_string()
    }
}

fn merge_name(
    preview: &PartialExtraction,
    detail: &PartialExtraction,
    config: &ExtractorConfig,
) -> String {
    // Detail first, then preview — same precedence as every other field,
    // but candidates must not be the listing's generic heading.
    [&detail.name, &preview.name]
        .into_iter()
        .find(|name| !name.is_empty() && !is_placeholder(name, config))
        .cloned()
        .unwrap_or_else(|| config.name_sentinel.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harvest::ExtractionSource;

    fn config() -> ExtractorConfig {
        ExtractorConfig::default()
    }

    fn partial(source: ExtractionSource, name: &str, phone: &str) -> PartialExtraction {
        PartialExtraction {
            source,
            name: name.to_string(),
            phone: phone.to_string(),
            address: String::new(),
            website: String::new(),
            email: String::new(),
        }
    }

    #[test]
    fn test_merge_identical_sources_is_identity() {
        let p = partial(ExtractionSource::Preview, "Wrap City", "(804) 555-0001");
        let d = PartialExtraction {
            source: ExtractionSource::Detail,
            ..p.clone()
        };
        let merged = merge(&p, &d, &config());
        assert_eq!(merged.name, p.name);
        assert_eq!(merged.phone, p.phone);
        assert_eq!(merged.address, p.address);
    }

    #[test]
    fn test_merge_empty_preview_yields_detail() {
        let p = PartialExtraction::empty(ExtractionSource::Preview);
        let d = partial(ExtractionSource::Detail, "Wrap City", "(804) 555-0001");
        let merged = merge(&p, &d, &config());
        assert_eq!(merged.name, "Wrap City");
        assert_eq!(merged.phone, "(804) 555-0001");
    }

    #[test]
    fn test_detail_precedence_per_field() {
        let p = partial(ExtractionSource::Preview, "Preview Name", "(111) 111-1111");
        let d = partial(ExtractionSource::Detail, "Detail Name", "(222) 222-2222");
        let merged = merge(&p, &d, &config());
        assert_eq!(merged.name, "Detail Name");
        assert_eq!(merged.phone, "(222) 222-2222");
    }

    #[test]
    fn test_empty_detail_field_falls_back_to_preview() {
        let p = partial(ExtractionSource::Preview, "Preview Name", "(111) 111-1111");
        let d = partial(ExtractionSource::Detail, "Detail Name", "");
        let merged = merge(&p, &d, &config());
        assert_eq!(merged.phone, "(111) 111-1111");
    }

    #[test]
    fn test_placeholder_detail_name_replaced_by_preview() {
        let p = partial(ExtractionSource::Preview, "Wrap City", "");
        let d = partial(ExtractionSource::Detail, "Results", "");
        let merged = merge(&p, &d, &config());
        assert_eq!(merged.name, "Wrap City");
    }

    #[test]
    fn test_no_valid_name_yields_sentinel() {
        let p = partial(ExtractionSource::Preview, "Results", "");
        let d = partial(ExtractionSource::Detail, "", "(222) 222-2222");
        let merged = merge(&p, &d, &config());
        assert_eq!(merged.name, config().name_sentinel);
        assert_eq!(merged.phone, "(222) 222-2222");
    }
}
