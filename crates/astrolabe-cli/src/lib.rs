//! Astrolabe CLI library
//!
//! This module contains the core CLI logic for the Astrolabe edit-script
//! driver.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::info;

use astrolabe::{AstrolabeError, Workbench};

/// Run the Astrolabe CLI application
///
/// This function replays the input script on a fresh model and writes the
/// model outline to the output file, or prints it when no output is given.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `AstrolabeError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed scripts and failing steps
/// - Metamodel errors
pub fn run(args: &Args) -> Result<(), AstrolabeError> {
    info!(
        input_path = args.input,
        output_path:? = args.output;
        "Processing script"
    );

    // Load configuration
    let app_config = config::load_config(args.config.as_ref())?;

    // Read input file
    let source = fs::read_to_string(&args.input)?;

    let workbench = Workbench::new(app_config);
    let model = workbench.run(&source)?;
    let report = workbench.report(&model)?;

    match &args.output {
        Some(output) => {
            fs::write(output, report)?;
            info!(output_file = output, elements = model.len(); "Report exported successfully");
        }
        None => print!("{report}"),
    }

    Ok(())
}
