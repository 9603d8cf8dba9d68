//! The `astrolabe` binary.

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use astrolabe::AstrolabeError;
use astrolabe_cli::{Args, error_adapter::to_reportables};

/// Falls back to `warn` when `--log-level` is not a level name.
fn log_level(requested: &str) -> LevelFilter {
    LevelFilter::from_str(requested).unwrap_or_else(|_| {
        eprintln!("Unknown log level `{requested}`, logging warnings and errors only");
        LevelFilter::Warn
    })
}

/// Logs every diagnostic of `err` as a rendered miette report.
fn report_failure(err: &AstrolabeError) {
    let handler = miette::GraphicalReportHandler::new();
    for reportable in to_reportables(err) {
        let mut rendered = String::new();
        match handler.render_report(&mut rendered, &reportable) {
            Ok(()) => error!("{rendered}"),
            Err(_) => error!("{reportable}"),
        }
    }
}

fn main() {
    miette::set_panic_hook();

    let args = Args::parse();
    let level = log_level(&args.log_level);
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(level)
        .init();

    info!(level:?, input = args.input; "Astrolabe starting");
    debug!(args:?; "Command line");

    match astrolabe_cli::run(&args) {
        Ok(()) => info!("Done"),
        Err(err) => {
            report_failure(&err);
            process::exit(1);
        }
    }
}
