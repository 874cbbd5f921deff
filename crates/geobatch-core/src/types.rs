//! Data types for batch conversion results and run metadata.
//!
//! This module defines the data structures produced by a conversion run: the
//! per-file outcome of the batch converter and the aggregated metadata
//! document written next to the converted files.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Geographic extent as `(min_x, min_y, max_x, max_y)`.
pub type Bounds = (f64, f64, f64, f64);

/// Summary of one successfully converted dataset.
#[derive(Debug, Clone)]
pub struct ConvertedFile {
    /// Path of the source shapefile
    pub input: PathBuf,
    /// Path of the written `GeoJSON` file
    pub output_path: PathBuf,
    /// Number of features in the dataset
    pub feature_count: usize,
    /// Coordinate reference system, when the source declares one
    pub crs: Option<String>,
    /// Attribute column names, in schema order
    pub columns: Vec<String>,
    /// Combined extent of all feature geometries, when any geometry is present
    pub bounds: Option<Bounds>,
}

/// Outcome of converting a single input file.
///
/// A batch run yields one `ConversionResult` per discovered input, in
/// discovery order. Failures carry a message instead of aborting the batch,
/// so one broken dataset never hides the rest.
#[derive(Debug, Clone)]
pub enum ConversionResult {
    /// The file converted successfully.
    Converted(ConvertedFile),
    /// The file could not be converted.
    Failed {
        /// Path of the source shapefile
        input: PathBuf,
        /// Human-readable description of what went wrong
        error_message: String,
    },
}

impl ConversionResult {
    /// Path of the source file this result describes.
    #[must_use]
    pub fn input(&self) -> &Path {
        match self {
            ConversionResult::Converted(converted) => &converted.input,
            ConversionResult::Failed { input, .. } => input,
        }
    }

    /// Returns `true` for a successful conversion.
    #[must_use]
    pub fn is_converted(&self) -> bool {
        matches!(self, ConversionResult::Converted(_))
    }

    /// The converted-file summary, or `None` for a failure.
    #[must_use]
    pub fn as_converted(&self) -> Option<&ConvertedFile> {
        match self {
            ConversionResult::Converted(converted) => Some(converted),
            ConversionResult::Failed { .. } => None,
        }
    }
}

/// Summary of one converted `GeoJSON` file, as recorded in the metadata document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSummary {
    /// File name of the converted output (not a full path)
    pub filename: String,
    /// Number of features in the file
    pub features_count: usize,
    /// Top-level `GeoJSON` type, `"Unknown"` when the file does not declare one
    #[serde(rename = "type")]
    pub collection_type: String,
    /// Property keys of the first feature, in their original order
    pub sample_properties: Vec<String>,
}

/// Payload of the metadata document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionInfo {
    /// Number of summarized files; always equals `files.len()`
    pub total_files: usize,
    /// ISO 8601 date (`YYYY-MM-DD`) of the conversion run
    pub conversion_date: String,
    /// Per-file summaries, in conversion output order
    pub files: Vec<FileSummary>,
}

/// The aggregated metadata document written next to the converted files.
///
/// Serializes to the shape consumed by downstream map viewers:
///
/// ```json
/// {
///   "conversion_info": {
///     "total_files": 2,
///     "conversion_date": "2025-08-25",
///     "files": [ { "filename": "...", "features_count": 42, "type": "FeatureCollection", "sample_properties": ["..."] } ]
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataDocument {
    /// The single top-level section of the document
    pub conversion_info: ConversionInfo,
}

impl MetadataDocument {
    /// Builds a document for the given summaries, filling in `total_files`.
    #[must_use]
    pub fn new(conversion_date: String, files: Vec<FileSummary>) -> Self {
        Self {
            conversion_info: ConversionInfo {
                total_files: files.len(),
                conversion_date,
                files,
            },
        }
    }
}

/// Everything a completed batch run produced.
#[derive(Debug)]
pub struct RunReport {
    /// Per-file outcomes, in discovery order
    pub results: Vec<ConversionResult>,
    /// The metadata document that was written
    pub metadata: MetadataDocument,
    /// Where the metadata document was written
    pub metadata_path: PathBuf,
}

impl RunReport {
    /// Number of successfully converted files.
    #[must_use]
    pub fn converted_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_converted()).count()
    }

    /// Number of files that failed to convert.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.results.len() - self.converted_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_summary() -> FileSummary {
        FileSummary {
            filename: "regions.geojson".to_string(),
            features_count: 3,
            collection_type: "FeatureCollection".to_string(),
            sample_properties: vec!["name".to_string(), "code".to_string()],
        }
    }

    #[test]
    fn test_new_document_counts_files() {
        let document = MetadataDocument::new("2025-08-25".to_string(), vec![sample_summary()]);
        assert_eq!(document.conversion_info.total_files, 1);
        assert_eq!(document.conversion_info.files.len(), 1);

        let empty = MetadataDocument::new("2025-08-25".to_string(), Vec::new());
        assert_eq!(empty.conversion_info.total_files, 0);
        assert!(empty.conversion_info.files.is_empty());
    }

    #[test]
    fn test_document_serializes_to_expected_shape() {
        let document = MetadataDocument::new("2025-08-25".to_string(), vec![sample_summary()]);
        let json = serde_json::to_value(&document).unwrap();

        let info = &json["conversion_info"];
        assert_eq!(info["total_files"], 1);
        assert_eq!(info["conversion_date"], "2025-08-25");

        let file = &info["files"][0];
        assert_eq!(file["filename"], "regions.geojson");
        assert_eq!(file["features_count"], 3);
        // The GeoJSON type is serialized under the key "type"
        assert_eq!(file["type"], "FeatureCollection");
        assert!(file.get("collection_type").is_none());
        assert_eq!(file["sample_properties"][0], "name");
        assert_eq!(file["sample_properties"][1], "code");
    }

    #[test]
    fn test_document_round_trips_through_serde() {
        let document = MetadataDocument::new("2025-08-25".to_string(), vec![sample_summary()]);
        let text = serde_json::to_string(&document).unwrap();
        let parsed: MetadataDocument = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, document);
    }

    #[test]
    fn test_conversion_result_accessors() {
        let converted = ConversionResult::Converted(ConvertedFile {
            input: PathBuf::from("in/a.shp"),
            output_path: PathBuf::from("out/a.geojson"),
            feature_count: 2,
            crs: None,
            columns: vec!["name".to_string()],
            bounds: Some((0.0, 0.0, 1.0, 1.0)),
        });
        assert!(converted.is_converted());
        assert_eq!(converted.input(), Path::new("in/a.shp"));
        assert_eq!(converted.as_converted().unwrap().feature_count, 2);

        let failed = ConversionResult::Failed {
            input: PathBuf::from("in/b.shp"),
            error_message: "broken header".to_string(),
        };
        assert!(!failed.is_converted());
        assert_eq!(failed.input(), Path::new("in/b.shp"));
        assert!(failed.as_converted().is_none());
    }

    #[test]
    fn test_run_report_counts() {
        let report = RunReport {
            results: vec![
                ConversionResult::Converted(ConvertedFile {
                    input: PathBuf::from("a.shp"),
                    output_path: PathBuf::from("a.geojson"),
                    feature_count: 0,
                    crs: None,
                    columns: Vec::new(),
                    bounds: None,
                }),
                ConversionResult::Failed {
                    input: PathBuf::from("b.shp"),
                    error_message: "unreadable".to_string(),
                },
            ],
            metadata: MetadataDocument::new("2025-08-25".to_string(), Vec::new()),
            metadata_path: PathBuf::from("out/metadata.json"),
        };
        assert_eq!(report.converted_count(), 1);
        assert_eq!(report.failed_count(), 1);
    }
}
