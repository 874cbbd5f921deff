//! Custom error types for `geobatch` operations.
//!
//! This module provides structured error handling using `thiserror`, replacing
//! generic `anyhow::Error` with domain-specific error types that preserve context
//! and enable better error messages and recovery strategies.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for `geobatch` operations.
///
/// This is the root error type that encompasses all domain-specific errors.
/// It uses `#[error(transparent)]` to delegate display formatting to the
/// underlying error variants.
#[derive(Debug, Error)]
pub enum GeoBatchError {
    /// I/O errors (file read/write, directory listing and creation)
    #[error(transparent)]
    Io(#[from] IoError),

    /// Format parsing and geometry validation errors
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Generic errors from dependencies
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// I/O related errors.
///
/// These errors occur during file or directory operations, including
/// reading, writing, listing, and directory creation.
#[derive(Debug, Error)]
pub enum IoError {
    /// Failed to read from a file
    #[error("Failed to read {format} file '{path}': {source}")]
    Read {
        /// The format being read (e.g., "Shapefile", "`GeoJSON`")
        format: String,
        /// The file path
        path: PathBuf,
        /// The underlying error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to write to a file
    #[error("Failed to write {format} file '{path}': {source}")]
    Write {
        /// The format being written
        format: String,
        /// The file path
        path: PathBuf,
        /// The underlying error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to create a directory
    #[error("Failed to create directory '{path}': {source}")]
    CreateDir {
        /// The directory path
        path: PathBuf,
        /// The underlying error
        #[source]
        source: std::io::Error,
    },

    /// Failed to list a directory
    #[error("Failed to list directory '{path}': {source}")]
    ListDir {
        /// The directory path
        path: PathBuf,
        /// The underlying error
        #[source]
        source: std::io::Error,
    },
}

/// Format parsing and geometry validation errors.
///
/// These errors occur when decoding a source dataset or converting its
/// geometries to the output representation.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Failed to parse a dataset
    #[error("Failed to parse {format} file '{path}': {message}")]
    Parse {
        /// The format being parsed
        format: String,
        /// The file path
        path: PathBuf,
        /// Description of the parse error
        message: String,
    },

    /// A feature's geometry could not be converted
    #[error("Invalid geometry in '{path}' (feature {feature_index}): {message}")]
    Geometry {
        /// The file path
        path: PathBuf,
        /// Zero-based index of the offending feature
        feature_index: usize,
        /// Description of the geometry problem
        message: String,
    },
}

/// Type alias for Results using `GeoBatchError`.
pub type Result<T> = std::result::Result<T, GeoBatchError>;

impl GeoBatchError {
    /// Get a user-friendly error message.
    ///
    /// This formats the error in a way that's helpful for end users,
    /// including context and actionable information.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Io(e) => e.user_message(),
            Self::Format(e) => e.user_message(),
            Self::Other(e) => format!("Error: {e}"),
        }
    }

    /// Get recovery suggestions if available.
    ///
    /// Returns helpful suggestions on how to fix or work around the error.
    #[must_use]
    pub fn recovery_suggestion(&self) -> Option<String> {
        match self {
            Self::Io(e) => e.recovery_suggestion(),
            Self::Format(e) => e.recovery_suggestion(),
            Self::Other(_) => None,
        }
    }
}

impl IoError {
    fn user_message(&self) -> String {
        match self {
            Self::Read { format, path, .. } => {
                format!("Failed to read {} file: {}", format, path.display())
            },
            Self::Write { format, path, .. } => {
                format!("Failed to write {} file: {}", format, path.display())
            },
            _ => self.to_string(),
        }
    }

    fn recovery_suggestion(&self) -> Option<String> {
        match self {
            Self::CreateDir { .. } => {
                Some("Check that the parent directory is writable.".to_string())
            },
            Self::ListDir { .. } => {
                Some("Check that the input directory exists and is readable.".to_string())
            },
            Self::Read { .. } | Self::Write { .. } => None,
        }
    }
}

impl FormatError {
    fn user_message(&self) -> String {
        match self {
            Self::Parse {
                format,
                path,
                message,
            } => {
                format!("Parse error in {} file {}: {}", format, path.display(), message)
            },
            Self::Geometry {
                path,
                feature_index,
                message,
            } => {
                format!(
                    "Invalid geometry in {} (feature {}): {}",
                    path.display(),
                    feature_index,
                    message
                )
            },
        }
    }

    fn recovery_suggestion(&self) -> Option<String> {
        match self {
            Self::Parse { .. } => Some(
                "Check the file format and ensure the required sidecar files are present."
                    .to_string(),
            ),
            Self::Geometry { .. } => {
                Some("Validate geometries using a GIS tool before converting.".to_string())
            },
        }
    }
}

/// Extension trait for adding I/O context to errors.
///
/// This trait provides convenient methods to wrap errors with file and format
/// context, creating more informative error messages.
pub trait IoErrorExt<T> {
    /// Add read context to an error.
    ///
    /// # Errors
    ///
    /// Returns an [`IoError::Read`] if the underlying operation fails.
    fn with_read_context(self, format: &str, path: impl Into<PathBuf>) -> Result<T>;

    /// Add write context to an error.
    ///
    /// # Errors
    ///
    /// Returns an [`IoError::Write`] if the underlying operation fails.
    fn with_write_context(self, format: &str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T, E> IoErrorExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_read_context(self, format: &str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| {
            GeoBatchError::Io(IoError::Read {
                format: format.to_string(),
                path: path.into(),
                source: Box::new(e),
            })
        })
    }

    fn with_write_context(self, format: &str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| {
            GeoBatchError::Io(IoError::Write {
                format: format.to_string(),
                path: path.into(),
                source: Box::new(e),
            })
        })
    }
}
