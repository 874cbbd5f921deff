//! End-to-end conversion pipeline.
//!
//! Ties the batch converter and the metadata aggregator together: convert
//! every discovered shapefile, then summarize the written outputs into
//! `metadata.json`. The run is fully sequential; files are converted one at
//! a time in discovery order.

use std::path::PathBuf;

use log::info;

use crate::config::PipelineConfig;
use crate::convert;
use crate::error::Result;
use crate::metadata;
use crate::types::RunReport;

/// Runs a complete batch conversion.
///
/// Converts every shapefile in the configured input directory, then writes
/// the metadata document describing the converted outputs. The document is
/// written even when nothing was converted, replacing whatever an earlier
/// run left behind.
///
/// # Errors
///
/// Returns an error for structural failures only: an unreadable input
/// directory, an uncreatable output directory, or an unwritable metadata
/// document. Per-file conversion failures are reported in the returned
/// [`RunReport`], not raised.
pub fn run(config: &PipelineConfig) -> Result<RunReport> {
    info!(
        "Converting shapefiles in {} to GeoJSON in {}",
        config.input_dir.display(),
        config.output_dir.display()
    );

    let results = convert::convert_directory(config)?;

    let outputs: Vec<PathBuf> = results
        .iter()
        .filter_map(|result| result.as_converted())
        .map(|converted| converted.output_path.clone())
        .collect();
    let metadata = metadata::aggregate(&outputs);

    let metadata_path = config.metadata_path();
    metadata::write_metadata(&metadata, &metadata_path)?;

    Ok(RunReport {
        results,
        metadata,
        metadata_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MetadataDocument;
    use shapefile::dbase::{FieldName, FieldValue, Record, TableWriterBuilder};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    /// Writes a point shapefile with a single `name` column.
    fn create_test_shapefile(path: &Path, names: &[&str]) {
        let table =
            TableWriterBuilder::new().add_character_field(FieldName::try_from("name").unwrap(), 20);
        let mut writer = shapefile::Writer::from_path(path, table).unwrap();
        for (index, name) in names.iter().enumerate() {
            let mut record = Record::default();
            record.insert(
                "name".to_string(),
                FieldValue::Character(Some((*name).to_string())),
            );
            let point = shapefile::Point::new(f64::from(index as u32), 0.0);
            writer.write_shape_and_record(&point, &record).unwrap();
        }
    }

    fn read_metadata(path: &Path) -> MetadataDocument {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_run_mixed_batch() {
        let temp_dir = TempDir::new().unwrap();
        let input_dir = temp_dir.path().join("in");
        fs::create_dir(&input_dir).unwrap();
        create_test_shapefile(&input_dir.join("a.shp"), &["one", "two", "three"]);
        fs::write(input_dir.join("b.shp"), b"truncated garbage").unwrap();
        fs::write(input_dir.join("b.dbf"), b"truncated garbage").unwrap();

        let config = PipelineConfig::new(&input_dir, temp_dir.path().join("out"));
        let report = run(&config).unwrap();

        assert_eq!(report.converted_count(), 1);
        assert_eq!(report.failed_count(), 1);
        assert!(report.results[0].is_converted());
        assert!(!report.results[1].is_converted());

        let info = &report.metadata.conversion_info;
        assert_eq!(info.total_files, 1);
        assert_eq!(info.files[0].filename, "a.geojson");
        assert_eq!(info.files[0].features_count, 3);
        assert_eq!(info.files[0].collection_type, "FeatureCollection");
        assert_eq!(info.files[0].sample_properties, vec!["name"]);

        // The document on disk matches the one in the report
        assert_eq!(read_metadata(&report.metadata_path), report.metadata);
    }

    #[test]
    fn test_run_with_missing_input_dir_writes_empty_metadata() {
        let temp_dir = TempDir::new().unwrap();
        let config = PipelineConfig::new(
            temp_dir.path().join("never_created"),
            temp_dir.path().join("out"),
        );

        let report = run(&config).unwrap();
        assert!(report.results.is_empty());
        assert_eq!(report.metadata.conversion_info.total_files, 0);

        let on_disk = read_metadata(&report.metadata_path);
        assert_eq!(on_disk.conversion_info.total_files, 0);
        assert!(on_disk.conversion_info.files.is_empty());
    }

    #[test]
    fn test_run_replaces_stale_metadata() {
        let temp_dir = TempDir::new().unwrap();
        let input_dir = temp_dir.path().join("in");
        fs::create_dir(&input_dir).unwrap();
        let output_dir = temp_dir.path().join("out");
        fs::create_dir(&output_dir).unwrap();
        fs::write(
            output_dir.join("metadata.json"),
            r#"{"conversion_info":{"total_files":7,"conversion_date":"2001-01-01","files":[{"filename":"stale.geojson","features_count":9,"type":"FeatureCollection","sample_properties":[]}]}}"#,
        )
        .unwrap();

        let config = PipelineConfig::new(&input_dir, &output_dir);
        let report = run(&config).unwrap();
        assert!(report.results.is_empty());

        let text = fs::read_to_string(report.metadata_path).unwrap();
        assert!(!text.contains("stale.geojson"));
        let parsed: MetadataDocument = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.conversion_info.total_files, 0);
    }

    #[test]
    fn test_run_twice_yields_same_summaries() {
        let temp_dir = TempDir::new().unwrap();
        let input_dir = temp_dir.path().join("in");
        fs::create_dir(&input_dir).unwrap();
        create_test_shapefile(&input_dir.join("towns.shp"), &["x", "y"]);

        let config = PipelineConfig::new(&input_dir, temp_dir.path().join("out"));
        let first = run(&config).unwrap();
        let second = run(&config).unwrap();

        assert_eq!(
            first.metadata.conversion_info.files,
            second.metadata.conversion_info.files
        );
        assert_eq!(second.metadata.conversion_info.total_files, 1);
    }
}
