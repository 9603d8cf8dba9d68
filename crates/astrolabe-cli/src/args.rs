//! Command-line argument definitions for the Astrolabe CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control the script and report paths,
//! configuration file selection, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the Astrolabe edit-script driver
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the edit script (TOML)
    #[arg(help = "Path to the input script")]
    pub input: String,

    /// Path to the report file; the report is printed when omitted
    #[arg(short, long)]
    pub output: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
