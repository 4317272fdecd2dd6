//! Questree CLI binary.
//!
//! Command-line interface for quest project resource tree management.

use clap::Parser;
use questree::logging::{init_logging, LoggingConfig};
use questree::tooling::cli::{Cli, CliContext};
use std::process;

fn main() {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::default();
    if let Some(level) = cli.log_level.clone() {
        logging.level = level;
    }
    if let Some(format) = cli.log_format.clone() {
        logging.format = format;
    }
    if let Err(e) = init_logging(&logging) {
        eprintln!("Error initializing logging: {}", e);
        process::exit(1);
    }

    // Open the project
    let context = match CliContext::new(cli.project.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error opening project: {}", e);
            process::exit(1);
        }
    };

    // Execute command
    match context.execute(&cli.command) {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    }
}
