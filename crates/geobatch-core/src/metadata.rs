//! Aggregated run metadata over converted `GeoJSON` files.
//!
//! After a batch run, each written output is summarized by re-reading it from
//! disk and the summaries are collected into a single `metadata.json`
//! document for map viewers to index. Summaries are derived from the files
//! themselves rather than from in-memory conversion state, so the document
//! always reflects what is actually on disk.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::{info, warn};

use crate::error::{FormatError, IoErrorExt, Result};
use crate::formats::VectorFormat;
use crate::types::{FileSummary, MetadataDocument};

/// Summarizes a single converted `GeoJSON` file.
///
/// The file is parsed as plain JSON and read tolerantly: a missing `type`
/// member is recorded as `"Unknown"`, a missing `features` array yields a
/// count of zero, and `sample_properties` lists the first feature's property
/// keys in document order (empty when there are no features).
///
/// # Errors
///
/// Returns an error if the file cannot be opened or is not valid JSON.
pub fn summarize_file(path: &Path) -> Result<FileSummary> {
    let format = VectorFormat::GeoJson.short_name();
    let file = File::open(path).with_read_context(format, path)?;
    let document: serde_json::Value =
        serde_json::from_reader(BufReader::new(file)).map_err(|e| FormatError::Parse {
            format: format.to_string(),
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let collection_type = document
        .get("type")
        .and_then(serde_json::Value::as_str)
        .unwrap_or("Unknown")
        .to_string();
    let features = document
        .get("features")
        .and_then(serde_json::Value::as_array);
    let features_count = features.map_or(0, Vec::len);
    let sample_properties = features
        .and_then(|features| features.first())
        .and_then(|feature| feature.get("properties"))
        .and_then(serde_json::Value::as_object)
        .map(|properties| properties.keys().cloned().collect())
        .unwrap_or_default();

    Ok(FileSummary {
        filename,
        features_count,
        collection_type,
        sample_properties,
    })
}

/// Builds the metadata document for the given converted files.
///
/// Outputs that can no longer be summarized (removed or rewritten since
/// conversion, or not valid JSON) are skipped with a warning; a bad output
/// file never fails the run. `total_files` counts the files actually
/// summarized. The conversion date is the day the aggregation runs.
#[must_use]
pub fn aggregate(outputs: &[PathBuf]) -> MetadataDocument {
    let mut files = Vec::with_capacity(outputs.len());
    for path in outputs {
        match summarize_file(path) {
            Ok(summary) => files.push(summary),
            Err(error) => warn!("Skipping {} in metadata: {error}", path.display()),
        }
    }
    MetadataDocument::new(conversion_date(), files)
}

/// Writes the metadata document to `path`, replacing any existing file.
///
/// The document is written even for a run that converted nothing, so a stale
/// document from an earlier run never survives.
///
/// # Errors
///
/// Returns an error if the file cannot be created or serialization fails.
pub fn write_metadata(document: &MetadataDocument, path: &Path) -> Result<()> {
    let file = File::create(path).with_write_context("metadata", path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, document).with_write_context("metadata", path)?;
    writer.flush().with_write_context("metadata", path)?;
    info!("Metadata saved to: {}", path.display());
    Ok(())
}

/// Today's date in `YYYY-MM-DD` form.
fn conversion_date() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    fn write_geojson(path: &Path, text: &str) {
        fs::write(path, text).unwrap();
    }

    const TWO_FEATURES: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "geometry": { "type": "Point", "coordinates": [1.0, 2.0] },
      "properties": { "zebra": 1, "apple": 2 }
    },
    {
      "type": "Feature",
      "geometry": null,
      "properties": { "zebra": 3, "apple": 4 }
    }
  ]
}"#;

    #[test]
    fn test_summarize_reports_count_and_type() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("regions.geojson");
        write_geojson(&path, TWO_FEATURES);

        let summary = summarize_file(&path).unwrap();
        assert_eq!(summary.filename, "regions.geojson");
        assert_eq!(summary.features_count, 2);
        assert_eq!(summary.collection_type, "FeatureCollection");
    }

    #[test]
    fn test_summarize_preserves_property_order() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("regions.geojson");
        write_geojson(&path, TWO_FEATURES);

        let summary = summarize_file(&path).unwrap();
        // "zebra" appears before "apple" in the document and must stay first
        assert_eq!(summary.sample_properties, vec!["zebra", "apple"]);
    }

    #[test]
    fn test_summarize_defaults_for_missing_members() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bare.geojson");
        write_geojson(&path, "{}");

        let summary = summarize_file(&path).unwrap();
        assert_eq!(summary.collection_type, "Unknown");
        assert_eq!(summary.features_count, 0);
        assert!(summary.sample_properties.is_empty());
    }

    #[test]
    fn test_summarize_empty_collection_has_no_samples() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.geojson");
        write_geojson(&path, r#"{ "type": "FeatureCollection", "features": [] }"#);

        let summary = summarize_file(&path).unwrap();
        assert_eq!(summary.features_count, 0);
        assert_eq!(summary.collection_type, "FeatureCollection");
        assert!(summary.sample_properties.is_empty());
    }

    #[test]
    fn test_summarize_rejects_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("mangled.geojson");
        write_geojson(&path, "{ not json");

        assert!(summarize_file(&path).is_err());
    }

    #[test]
    fn test_summarize_missing_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        assert!(summarize_file(&temp_dir.path().join("absent.geojson")).is_err());
    }

    #[test]
    fn test_aggregate_skips_unreadable_outputs() {
        let temp_dir = TempDir::new().unwrap();
        let good = temp_dir.path().join("good.geojson");
        write_geojson(&good, TWO_FEATURES);
        let missing = temp_dir.path().join("missing.geojson");

        let document = aggregate(&[good, missing]);
        assert_eq!(document.conversion_info.total_files, 1);
        assert_eq!(document.conversion_info.files[0].filename, "good.geojson");
    }

    #[test]
    fn test_aggregate_empty_run_still_produces_document() {
        let document = aggregate(&[]);
        assert_eq!(document.conversion_info.total_files, 0);
        assert!(document.conversion_info.files.is_empty());
        // The date must be a real calendar date, not a fixed placeholder
        assert!(
            NaiveDate::parse_from_str(&document.conversion_info.conversion_date, "%Y-%m-%d").is_ok()
        );
    }

    #[test]
    fn test_aggregate_is_repeatable() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("regions.geojson");
        write_geojson(&path, TWO_FEATURES);
        let outputs = vec![path];

        let first = aggregate(&outputs);
        let second = aggregate(&outputs);
        assert_eq!(first.conversion_info.files, second.conversion_info.files);
        assert_eq!(
            first.conversion_info.total_files,
            second.conversion_info.total_files
        );
    }

    #[test]
    fn test_write_metadata_replaces_previous_document() {
        let temp_dir = TempDir::new().unwrap();
        let metadata_path = temp_dir.path().join("metadata.json");

        let stale = MetadataDocument::new(
            "2001-01-01".to_string(),
            vec![FileSummary {
                filename: "stale.geojson".to_string(),
                features_count: 99,
                collection_type: "FeatureCollection".to_string(),
                sample_properties: vec!["old".to_string()],
            }],
        );
        write_metadata(&stale, &metadata_path).unwrap();

        let fresh = MetadataDocument::new("2025-08-25".to_string(), Vec::new());
        write_metadata(&fresh, &metadata_path).unwrap();

        let text = fs::read_to_string(&metadata_path).unwrap();
        let parsed: MetadataDocument = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, fresh);
        assert!(!text.contains("stale.geojson"));
    }
}
