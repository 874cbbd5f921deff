//! Pipeline configuration.
//!
//! All paths the pipeline touches are carried explicitly in a [`PipelineConfig`]
//! rather than read from process-wide state, so callers can run conversions
//! against any pair of directories.

use std::path::PathBuf;

/// Default directory scanned for input shapefiles.
pub const DEFAULT_INPUT_DIR: &str = "input_shapefiles";

/// Default directory that receives converted `GeoJSON` files.
pub const DEFAULT_OUTPUT_DIR: &str = "geojson_output";

/// File name of the aggregated metadata document, relative to the output directory.
pub const METADATA_FILE_NAME: &str = "metadata.json";

/// Configuration for a batch conversion run.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use geobatch_core::config::PipelineConfig;
///
/// let config = PipelineConfig::new("shapefiles", "out");
/// assert_eq!(config.metadata_path(), Path::new("out").join("metadata.json"));
///
/// let defaults = PipelineConfig::default();
/// assert_eq!(defaults.input_dir, Path::new("input_shapefiles"));
/// ```
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory scanned (non-recursively) for `.shp` files.
    pub input_dir: PathBuf,
    /// Directory that receives converted files and the metadata document.
    pub output_dir: PathBuf,
}

impl PipelineConfig {
    /// Creates a configuration for the given input and output directories.
    #[must_use]
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Full path of the metadata document for this configuration.
    #[must_use]
    pub fn metadata_path(&self) -> PathBuf {
        self.output_dir.join(METADATA_FILE_NAME)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new(DEFAULT_INPUT_DIR, DEFAULT_OUTPUT_DIR)
    }
}
