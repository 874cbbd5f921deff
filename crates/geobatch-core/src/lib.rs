//! `geobatch-core` is the core library for the `geobatch` project, providing batch
//! conversion of ESRI shapefiles to `GeoJSON` for web mapping backends.
//!
//! This crate includes:
//! - **Format Registry**: The vector formats the pipeline understands and their capabilities.
//! - **Batch Conversion**: Non-recursive discovery of input shapefiles and per-file conversion
//!   with failure isolation.
//! - **Metadata Aggregation**: A `metadata.json` document summarizing every converted file,
//!   derived by re-reading the outputs from disk.
//!
//! The `pipeline` module ties the stages together into the single entry point consumed by
//! the CLI.

pub mod config;
pub mod convert;
pub mod error;
pub mod formats;
pub mod metadata;
pub mod pipeline;
pub mod types;
pub mod vector_io;
