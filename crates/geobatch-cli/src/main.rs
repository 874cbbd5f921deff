//! Command-line interface for `geobatch`, a batch shapefile to `GeoJSON` converter.
//!
//! This binary provides a user-friendly CLI to interact with the [`geobatch_core`]
//! library, converting every shapefile in an input directory to `GeoJSON` and
//! writing a `metadata.json` document that summarizes the converted files.
//!
//! # Architecture
//!
//! The CLI is built using [`clap`] for argument parsing and [`tracing`] for structured logging.
//! It acts as a thin façade that parses arguments, configures logging, and delegates to the
//! pipeline in `geobatch-core`. Per-file conversion failures are part of a successful run and
//! do not change the exit code; only structural problems (an unwritable output directory, an
//! unreadable input directory) make the process exit nonzero.
//!
//! # Available Commands
//!
//! - `convert` - Convert every shapefile in the input directory to GeoJSON
//! - `info` - Display the shapefiles waiting in the input directory
//! - `formats` - List the vector formats known to the pipeline
//! - `clean` - Remove the output directory from a previous run

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use tracing::{Level, info, warn};
use tracing_log::LogTracer;
use tracing_subscriber::FmtSubscriber;

use geobatch_core::config::{DEFAULT_INPUT_DIR, DEFAULT_OUTPUT_DIR, PipelineConfig};
use geobatch_core::formats::VectorFormat;
use geobatch_core::pipeline;

mod display;

#[derive(Parser)]
#[command(
    name = "geobatch",
    version,
    about = "Batch shapefile to GeoJSON conversion",
    long_about = "geobatch converts every shapefile in an input directory to GeoJSON and\n\
                  writes a metadata.json document summarizing the converted files."
)]
/// Command-line arguments and options for the `geobatch` CLI.
///
/// This struct defines the top-level CLI interface, including global flags for
/// logging verbosity and the subcommand to execute.
struct Cli {
    /// Enable verbose (INFO level) logging output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug (DEBUG level) logging output with detailed diagnostics.
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands for the `geobatch` CLI.
#[derive(Subcommand)]
enum Commands {
    /// Converts every shapefile in the input directory to `GeoJSON`.
    ///
    /// Files that fail to convert are reported in the run summary and the
    /// batch continues past them. The metadata document is rewritten at the
    /// end of every run, even a run that converted nothing.
    Convert {
        /// Directory scanned (non-recursively) for .shp files.
        #[arg(short, long, value_name = "DIR", default_value = DEFAULT_INPUT_DIR)]
        input_dir: PathBuf,

        /// Directory that receives the GeoJSON files and metadata.json.
        #[arg(short, long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
        output_dir: PathBuf,
    },

    /// Displays the shapefiles waiting in the input directory.
    ///
    /// The plain listing shows each dataset's size and which sidecar files
    /// are present next to it; `--detailed` additionally opens every dataset
    /// and reports its feature count, CRS, and bounds.
    Info {
        /// Directory to inspect.
        #[arg(value_name = "DIR", default_value = DEFAULT_INPUT_DIR)]
        input_dir: PathBuf,

        /// Reads each dataset and shows feature counts, CRS and bounds.
        #[arg(long)]
        detailed: bool,
    },

    /// Lists the vector formats known to the pipeline.
    ///
    /// This command provides an overview of which formats can be read from,
    /// written to, and summarized.
    Formats,

    /// Removes the output directory and everything in it.
    Clean {
        /// Directory to remove.
        #[arg(value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
        output_dir: PathBuf,
    },
}

/// Entry point for the `geobatch` command-line interface.
///
/// This function parses command-line arguments, configures the logging system based on
/// verbosity flags, and dispatches to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if command execution fails or if the logging system cannot be initialized.
fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity flags
    let log_level = if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else {
        Level::WARN
    };

    // Bridge logs from the `log` crate to the `tracing` ecosystem.
    LogTracer::init()?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true) // Show module paths for better context
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Execute the command
    match cli.command {
        Commands::Convert {
            input_dir,
            output_dir,
        } => {
            info!(
                "Converting shapefiles from {} into {}",
                input_dir.display(),
                output_dir.display()
            );
            handle_convert(input_dir, output_dir)?;
        },
        Commands::Info {
            input_dir,
            detailed,
        } => {
            handle_info(&input_dir, detailed)?;
        },
        Commands::Formats => {
            handle_formats();
        },
        Commands::Clean { output_dir } => {
            handle_clean(&output_dir)?;
        },
    }

    Ok(())
}

use geobatch_core::convert;
use geobatch_core::vector_io;

/// Runs the conversion pipeline and prints the run report.
///
/// Per-file failures are part of a successful run; an `Err` here means the
/// run itself could not proceed.
fn handle_convert(input_dir: PathBuf, output_dir: PathBuf) -> Result<()> {
    let config = PipelineConfig::new(input_dir, output_dir);
    match pipeline::run(&config) {
        Ok(report) => {
            display::display_run_report(&report);
            Ok(())
        },
        Err(error) => {
            if let Some(suggestion) = error.recovery_suggestion() {
                warn!("{suggestion}");
            }
            Err(anyhow!(error.user_message()))
        },
    }
}

/// Lists the input directory, optionally reading every dataset.
fn handle_info(input_dir: &Path, detailed: bool) -> Result<()> {
    let inputs = convert::discover_inputs(input_dir)?;

    println!("Input directory: {}", input_dir.display());
    if inputs.is_empty() {
        println!("No shapefiles found.");
        return Ok(());
    }
    println!("Found {} shapefile(s)", inputs.len());

    if detailed {
        let rows: Vec<display::DatasetRow> = inputs.iter().map(|path| dataset_row(path)).collect();
        display::display_dataset_details(rows);
    } else {
        let rows: Vec<display::InputRow> = inputs.iter().map(|path| input_row(path)).collect();
        display::display_input_listing(rows);
    }

    Ok(())
}

/// Prints the format registry.
fn handle_formats() {
    display::display_formats(&VectorFormat::ALL);
}

/// Removes the output directory if it exists.
fn handle_clean(output_dir: &Path) -> Result<()> {
    if output_dir.exists() {
        fs::remove_dir_all(output_dir)
            .map_err(|e| anyhow!("Failed to remove {}: {e}", output_dir.display()))?;
        println!("Removed output directory: {}", output_dir.display());
    } else {
        println!("Output directory already clean: {}", output_dir.display());
    }
    Ok(())
}

fn input_row(path: &Path) -> display::InputRow {
    let size_bytes = fs::metadata(path).map_or_else(|_| "?".to_string(), |meta| meta.len().to_string());
    let sidecars: Vec<&str> = VectorFormat::Shapefile
        .sidecar_extensions()
        .iter()
        .copied()
        .filter(|ext| path.with_extension(ext).is_file())
        .collect();

    display::InputRow {
        file: file_label(path),
        size_bytes,
        sidecars: if sidecars.is_empty() {
            "-".to_string()
        } else {
            sidecars.join(", ")
        },
    }
}

fn dataset_row(path: &Path) -> display::DatasetRow {
    let file = file_label(path);
    match vector_io::read_vector_file(path) {
        Ok(dataset) => display::DatasetRow {
            file,
            features: dataset.feature_count().to_string(),
            crs: display::crs_label(dataset.crs()),
            bounds: display::format_bounds(dataset.bounds()),
            status: "OK".to_string(),
        },
        Err(error) => display::DatasetRow {
            file,
            features: "-".to_string(),
            crs: "-".to_string(),
            bounds: "-".to_string(),
            status: error.user_message(),
        },
    }
}

fn file_label(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}
