//! Mailsnap CLI Binary
//!
//! Command-line interface for mailbox snapshot extraction.

use clap::Parser;
use mailsnap::tooling::cli::{Cli, CliContext};
use std::process;

fn main() {
    let cli = Cli::parse();

    let context = match CliContext::new(
        cli.config.clone(),
        cli.log_level.clone(),
        cli.log_format.clone(),
    ) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error initializing: {}", e);
            process::exit(1);
        }
    };

    match context.execute(&cli.command) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
