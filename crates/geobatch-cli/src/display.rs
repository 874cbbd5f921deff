//! Display utilities for formatting CLI output.
//!
//! This module provides table row structures and formatting functions
//! for presenting batch conversion results and dataset information in a
//! human-readable format.

use tabled::{Table, Tabled};

use geobatch_core::formats::VectorFormat;
use geobatch_core::types::{Bounds, ConversionResult, RunReport};

/// Table row representation for a successfully converted file.
#[derive(Tabled)]
pub struct ConvertedRow {
    /// Source file name.
    #[tabled(rename = "File")]
    pub file: String,
    /// Number of features written.
    #[tabled(rename = "Features")]
    pub features: usize,
    /// Coordinate Reference System of the source.
    #[tabled(rename = "CRS")]
    pub crs: String,
    /// Combined geometry extent.
    #[tabled(rename = "Bounds")]
    pub bounds: String,
    /// Output file name.
    #[tabled(rename = "Output")]
    pub output: String,
}

/// Table row representation for a file that failed to convert.
#[derive(Tabled)]
pub struct FailedRow {
    /// Source file name.
    #[tabled(rename = "File")]
    pub file: String,
    /// Why the conversion failed.
    #[tabled(rename = "Error")]
    pub error: String,
}

/// Table row representation for an input dataset listing.
#[derive(Tabled)]
pub struct InputRow {
    /// Primary file name.
    #[tabled(rename = "File")]
    pub file: String,
    /// Size of the primary file in bytes.
    #[tabled(rename = "Size (bytes)")]
    pub size_bytes: String,
    /// Sidecar files present next to the primary file.
    #[tabled(rename = "Sidecars")]
    pub sidecars: String,
}

/// Table row representation for a fully inspected dataset.
#[derive(Tabled)]
pub struct DatasetRow {
    /// Primary file name.
    #[tabled(rename = "File")]
    pub file: String,
    /// Number of features, or `-` when the dataset could not be read.
    #[tabled(rename = "Features")]
    pub features: String,
    /// Coordinate Reference System.
    #[tabled(rename = "CRS")]
    pub crs: String,
    /// Combined geometry extent.
    #[tabled(rename = "Bounds")]
    pub bounds: String,
    /// `OK`, or the error that prevented reading.
    #[tabled(rename = "Status")]
    pub status: String,
}

/// Table row representation for a format registry entry.
#[derive(Tabled)]
pub struct FormatRow {
    /// Short identifier for the format.
    #[tabled(rename = "Short Name")]
    pub short_name: String,
    /// Full descriptive name of the format.
    #[tabled(rename = "Long Name")]
    pub long_name: String,
    /// Primary file extension.
    #[tabled(rename = "Extension")]
    pub extension: String,
    /// Whether files of this format can be summarized.
    #[tabled(rename = "Info")]
    pub info: String,
    /// Whether files of this format can be read.
    #[tabled(rename = "Read")]
    pub read: String,
    /// Whether files of this format can be written.
    #[tabled(rename = "Write")]
    pub write: String,
}

/// Display the outcome of a batch conversion run.
///
/// Prints a table of converted files, a table of failures (when any), the
/// `N succeeded, M failed` summary line, and where the metadata document
/// was written.
pub fn display_run_report(report: &RunReport) {
    let converted_rows: Vec<ConvertedRow> = report
        .results
        .iter()
        .filter_map(ConversionResult::as_converted)
        .map(|converted| ConvertedRow {
            file: file_name(&converted.input),
            features: converted.feature_count,
            crs: crs_label(converted.crs.as_deref()),
            bounds: format_bounds(converted.bounds),
            output: file_name(&converted.output_path),
        })
        .collect();

    if !converted_rows.is_empty() {
        println!("\n=== Converted Files ===");
        let table = Table::new(converted_rows).to_string();
        println!("{table}");
    }

    let failed_rows: Vec<FailedRow> = report
        .results
        .iter()
        .filter_map(|result| match result {
            ConversionResult::Failed {
                input,
                error_message,
            } => Some(FailedRow {
                file: file_name(input),
                error: error_message.clone(),
            }),
            ConversionResult::Converted(_) => None,
        })
        .collect();

    if !failed_rows.is_empty() {
        println!("\n=== Failures ===");
        let table = Table::new(failed_rows).to_string();
        println!("{table}");
    }

    println!(
        "\n{} succeeded, {} failed",
        report.converted_count(),
        report.failed_count()
    );
    println!("Metadata: {}", report.metadata_path.display());
}

/// Display the format registry in a formatted table.
pub fn display_formats(formats: &[VectorFormat]) {
    println!("\nKnown Formats ({} total):\n", formats.len());

    let rows: Vec<FormatRow> = formats
        .iter()
        .map(|format| FormatRow {
            short_name: format.short_name().to_string(),
            long_name: format.long_name().to_string(),
            extension: format!(".{}", format.extension()),
            info: yes_no(format.supports_info()),
            read: yes_no(format.supports_read()),
            write: yes_no(format.supports_write()),
        })
        .collect();

    let table = Table::new(rows).to_string();
    println!("{table}");
}

/// Display the input directory listing.
pub fn display_input_listing(rows: Vec<InputRow>) {
    let table = Table::new(rows).to_string();
    println!("{table}");
}

/// Display per-dataset details gathered by reading each input.
pub fn display_dataset_details(rows: Vec<DatasetRow>) {
    let table = Table::new(rows).to_string();
    println!("{table}");
}

/// Renders bounds as `[min_x, min_y, max_x, max_y]` with six decimal places.
#[must_use]
pub fn format_bounds(bounds: Option<Bounds>) -> String {
    match bounds {
        Some((min_x, min_y, max_x, max_y)) => {
            format!("[{min_x:.6}, {min_y:.6}, {max_x:.6}, {max_y:.6}]")
        },
        None => "N/A".to_string(),
    }
}

/// Renders a CRS for table output, truncating long WKT descriptions.
#[must_use]
pub fn crs_label(crs: Option<&str>) -> String {
    match crs {
        None => "Not defined".to_string(),
        Some(crs) if crs.chars().count() > 40 => {
            let prefix: String = crs.chars().take(37).collect();
            format!("{prefix}...")
        },
        Some(crs) => crs.to_string(),
    }
}

fn yes_no(supported: bool) -> String {
    if supported { "Yes" } else { "No" }.to_string()
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |name| {
            name.to_string_lossy().into_owned()
        })
}
