// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (RUST_LOG controls the diagnostics on stderr)
// 3. Read the websites (input file, or the sites given on the command line)
// 4. Crawl them and append the results to the CSV file
// 5. Exit with proper code (0 = success, 1 = bad input file, 2 = error)
// =============================================================================

mod cli;
mod extract;
mod input;
mod output;
mod runner;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use extract::HttpBrowser;
use output::{CsvSaver, CSV_HEADERS};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging();

    let websites = if cli.sites.is_empty() {
        match input::read_websites(&cli.input, &cli.default_scheme) {
            Ok(websites) => websites,
            Err(e) => {
                println!("Error: {:#}", e);
                return Ok(1);
            }
        }
    } else {
        input::normalize_lines(cli.sites.iter().map(String::as_str), &cli.default_scheme)
    };

    let settings = cli.settings();
    let browser = Arc::new(HttpBrowser::new(settings.timeout)?);
    let saver = CsvSaver::new(&settings.output, &CSV_HEADERS);

    let summary = runner::run(&settings, websites, browser, &saver).await;
    if summary.websites > 0 {
        runner::print_summary(&summary, cli.json)?;
    }

    Ok(0)
}

// Diagnostics go to stderr so they never mix with the progress output.
// Default: only warnings from this crate.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("email_harvest=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
