//! Serialize harvested records for downstream consumers.
//!
//! CSV uses a semicolon delimiter: business names and addresses routinely
//! contain commas, and the spreadsheet tools these exports feed default to
//! splitting on them.

use crate::harvest::BusinessRecord;
use anyhow::{Context, Result};
use chrono::Local;
use std::fs::File;
use std::path::Path;

/// Write records as semicolon-delimited CSV with a header row.
pub fn write_csv(records: &[BusinessRecord], path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut wtr = csv::WriterBuilder::new().delimiter(b';').from_writer(file);

    wtr.write_record(["name", "phone", "address", "website", "email"])?;
    for record in records {
        wtr.write_record([
            &record.name,
            &record.phone,
            &record.address,
            &record.website,
            &record.email,
        ])?;
    }
    wtr.flush().context("failed to flush CSV")?;
    Ok(())
}

/// Write records as a pretty-printed JSON array.
pub fn write_json(records: &[BusinessRecord], path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(file, records).context("failed to write JSON")?;
    Ok(())
}

/// Derive an output file name from the search, e.g.
/// `car_wraps_virginia_20260804.csv`.
pub fn default_file_name(query: &str, location: Option<&str>, extension: &str) -> String {
    let mut stem = slug(query);
    if let Some(location) = location {
        if !location.is_empty() {
            stem.push('_');
            stem.push_str(&slug(location));
        }
    }
    format!("{stem}_{}.{extension}", Local::now().format("%Y%m%d"))
}

fn slug(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<BusinessRecord> {
        vec![BusinessRecord {
            name: "Superior Auto Wraps".to_string(),
            phone: "(407) 555-1212".to_string(),
            address: "10388 W State Rd 84, Davie, FL 33328".to_string(),
            website: "https://superiorwraps.com".to_string(),
            email: String::new(),
        }]
    }

    #[test]
    fn test_csv_is_semicolon_delimited() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_csv(&sample(), &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next().unwrap(), "name;phone;address;website;email");
        let row = lines.next().unwrap();
        assert!(row.starts_with("Superior Auto Wraps;(407) 555-1212;"));
        // The comma-laden address must stay in one field
        assert!(row.contains("10388 W State Rd 84, Davie, FL 33328"));
    }

    #[test]
    fn test_json_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_json(&sample(), &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<BusinessRecord> = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed, sample());
    }

    #[test]
    fn test_default_file_name_slugs_search() {
        let name = default_file_name("Car Wraps", Some("Virginia"), "csv");
        assert!(name.starts_with("car_wraps_virginia_"));
        assert!(name.ends_with(".csv"));
    }
}
