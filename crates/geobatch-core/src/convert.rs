//! Batch conversion of shapefile datasets to `GeoJSON`.
//!
//! This module discovers the shapefiles in an input directory and converts
//! them one at a time, in discovery order. A file that fails to convert is
//! recorded and the batch moves on; one broken dataset never aborts the run.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::error::{IoError, Result};
use crate::formats::VectorFormat;
use crate::types::{ConversionResult, ConvertedFile};
use crate::vector_io;

/// Finds the shapefiles in `input_dir`, non-recursively.
///
/// A missing input directory is not an error; scanning it yields an empty
/// list. Matches are sorted by path so repeated runs over the same directory
/// process files in the same order.
///
/// # Errors
///
/// Returns an error if the directory exists but cannot be listed.
pub fn discover_inputs(input_dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = match fs::read_dir(input_dir) {
        Ok(entries) => entries,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            info!("Input directory {} does not exist", input_dir.display());
            return Ok(Vec::new());
        },
        Err(error) => {
            return Err(IoError::ListDir {
                path: input_dir.to_path_buf(),
                source: error,
            }
            .into());
        },
    };

    let mut inputs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| IoError::ListDir {
            path: input_dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if path.is_file() && VectorFormat::from_path(&path) == Some(VectorFormat::Shapefile) {
            inputs.push(path);
        }
    }
    inputs.sort();
    debug!("Discovered {} shapefile(s) in {}", inputs.len(), input_dir.display());
    Ok(inputs)
}

/// Converts a single shapefile to a `GeoJSON` file in `output_dir`.
///
/// The output file name defaults to the input stem with a `.geojson`
/// extension; `output_name` overrides it. An existing output file with the
/// same name is replaced, so two inputs mapping to the same output name
/// resolve to whichever was converted last.
///
/// # Errors
///
/// Returns an error if the input cannot be read or the output cannot be
/// written.
pub fn convert_file(
    input: &Path,
    output_dir: &Path,
    output_name: Option<&str>,
) -> Result<ConvertedFile> {
    info!("Reading shapefile: {}", input.display());
    let dataset = vector_io::read_vector_file(input)?;

    let file_name = match output_name {
        Some(name) => name.to_string(),
        None => {
            let stem = input
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            format!("{stem}.{}", VectorFormat::GeoJson.extension())
        },
    };
    let output_path = output_dir.join(file_name);

    info!("Converting to GeoJSON: {}", output_path.display());
    vector_io::write_vector_file(&dataset, &output_path)?;

    info!("Features: {}", dataset.feature_count());
    info!("CRS: {}", dataset.crs().unwrap_or("Not defined"));
    debug!("Columns: {:?}", dataset.columns());
    if let Some((min_x, min_y, max_x, max_y)) = dataset.bounds() {
        info!("Bounds: [{min_x:.6}, {min_y:.6}, {max_x:.6}, {max_y:.6}]");
    }

    Ok(ConvertedFile {
        input: input.to_path_buf(),
        output_path,
        feature_count: dataset.feature_count(),
        crs: dataset.crs().map(str::to_string),
        columns: dataset.columns().to_vec(),
        bounds: dataset.bounds(),
    })
}

/// Converts every shapefile in the configured input directory.
///
/// Produces one [`ConversionResult`] per discovered file, in discovery
/// order. The output directory is created up front, before any file is
/// touched.
///
/// # Errors
///
/// Returns an error if the output directory cannot be created or the input
/// directory cannot be listed. Per-file conversion failures are captured in
/// the returned results, not raised.
pub fn convert_directory(config: &PipelineConfig) -> Result<Vec<ConversionResult>> {
    fs::create_dir_all(&config.output_dir).map_err(|e| IoError::CreateDir {
        path: config.output_dir.clone(),
        source: e,
    })?;

    let inputs = discover_inputs(&config.input_dir)?;
    if inputs.is_empty() {
        info!("No shapefiles found in {}", config.input_dir.display());
        return Ok(Vec::new());
    }
    info!("Found {} shapefile(s) to convert", inputs.len());

    let mut results = Vec::with_capacity(inputs.len());
    for input in inputs {
        match convert_file(&input, &config.output_dir, None) {
            Ok(converted) => {
                info!("Successfully converted {}", input.display());
                results.push(ConversionResult::Converted(converted));
            },
            Err(error) => {
                warn!("Failed to convert {}: {error}", input.display());
                results.push(ConversionResult::Failed {
                    input,
                    error_message: error.user_message(),
                });
            },
        }
    }
    Ok(results)
}
