// src/runner.rs
// =============================================================================
// The main loop: crawl every website and save what came out of it.
//
// For each website exactly one of these happens:
// - emails found       -> one row per (page, email)
// - no emails found    -> one placeholder row
// - something failed   -> one error row (and we move on to the next website)
//
// With --jobs > 1 several websites are crawled at once, but results are
// consumed (and written) in input order.
// =============================================================================

use crate::extract::{Browser, ExtractError, ExtractorFactory, PageData, Worker};
use crate::output::{error_row, placeholder_row, CsvSaver};
use anyhow::{Error, Result};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

// Settings for one run, built from the command line
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub output: PathBuf,
    pub depth: usize,
    pub max_links_from_page: usize,
    pub timeout: Duration,
    pub delay: Duration,
    pub jobs: usize,
}

// What happened to one website
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteOutcome {
    /// Emails found, this many rows saved
    Saved(usize),
    /// Nothing found, placeholder row saved
    Placeholder,
    /// Processing failed
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub websites: usize,
    pub with_emails: usize,
    pub placeholders: usize,
    pub errors: usize,
    pub rows_written: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: SiteOutcome) {
        self.websites += 1;
        match outcome {
            SiteOutcome::Saved(rows) => {
                self.with_emails += 1;
                self.rows_written += rows;
            }
            SiteOutcome::Placeholder => {
                self.placeholders += 1;
                self.rows_written += 1;
            }
            SiteOutcome::Failed => self.errors += 1,
        }
    }
}

// Crawls all websites and appends the results to the saver's file
pub async fn run(
    config: &RunConfig,
    websites: Vec<String>,
    browser: Arc<dyn Browser>,
    saver: &CsvSaver,
) -> RunSummary {
    let mut summary = RunSummary::default();

    if websites.is_empty() {
        println!("No valid websites found in the input file. Exiting.");
        return summary;
    }

    println!("Output will be appended to {}", saver.path().display());
    println!("Using CSV headers: {}", saver.headers().join(", "));
    println!(
        "Starting email extraction (depth={}, max_links={})...",
        config.depth, config.max_links_from_page
    );

    let total = websites.len();

    let crawls = websites.into_iter().map(|website| {
        let browser = browser.clone();
        async move {
            let result = crawl_website(config, &website, browser).await;
            (website, result)
        }
    });

    // buffered() (not buffer_unordered) keeps results in input order, and
    // everything a website prints happens here so output stays grouped per site
    let mut results = stream::iter(crawls)
        .buffered(config.jobs.max(1))
        .enumerate();

    while let Some((index, (website, result))) = results.next().await {
        println!("{}", processing_banner(index + 1, total, &website));
        let outcome = save_outcome(saver, &website, result);
        summary.record(outcome);
    }

    println!("\n--- Processing finished ---");
    summary
}

fn processing_banner(position: usize, total: usize, website: &str) -> String {
    format!("\n--- Processing website {}/{}: {} ---", position, total, website)
}

// Runs the extraction contract for one website:
// factory -> worker -> get_data()
pub async fn crawl_website(
    config: &RunConfig,
    website: &str,
    browser: Arc<dyn Browser>,
) -> Result<Vec<PageData>, ExtractError> {
    let factory = ExtractorFactory::new(website, browser, config.depth, config.max_links_from_page)?
        .with_delay(config.delay);
    let worker = Worker::new(factory);
    worker.get_data().await
}

// Saves the rows for one website and reports what happened
//
// Any failure, whether while crawling or while saving data rows, ends in an
// attempt to save an error row instead.
pub fn save_outcome(
    saver: &CsvSaver,
    website: &str,
    result: Result<Vec<PageData>, ExtractError>,
) -> SiteOutcome {
    let failure: Error = match result {
        Ok(records) if !records.is_empty() => {
            println!("  Data found: {} entries. Saving directly...", records.len());
            match saver.save(&records) {
                Ok(rows) => {
                    println!("  Data saved for {}", website);
                    return SiteOutcome::Saved(rows);
                }
                Err(e) => e,
            }
        }
        Ok(_) => {
            println!(
                "  No data returned by worker for {}. Saving placeholder row.",
                website
            );
            match saver.save(&[placeholder_row(website)]) {
                Ok(_) => {
                    println!("  Placeholder row saved for {}", website);
                    return SiteOutcome::Placeholder;
                }
                Err(e) => e,
            }
        }
        Err(e) => e.into(),
    };

    println!("!! Error processing {}: {:#}", website, failure);

    let row = error_row(website, error_kind(&failure), &format!("{:#}", failure));
    match saver.save(&[row]) {
        Ok(_) => println!("  Error placeholder row saved for {}", website),
        Err(save_err) => {
            warn!(website, error = %save_err, "error row not saved");
            println!(
                "!! Could not save error placeholder for {}: {:#}",
                website, save_err
            );
        }
    }

    SiteOutcome::Failed
}

// Short name of an error for the CSV error row
fn error_kind(error: &Error) -> &'static str {
    if let Some(e) = error.downcast_ref::<ExtractError>() {
        e.kind()
    } else if error.downcast_ref::<csv::Error>().is_some() {
        "CsvError"
    } else if error.downcast_ref::<std::io::Error>().is_some() {
        "IoError"
    } else {
        "Error"
    }
}

// Prints the end-of-run summary, either human-readable or as JSON
pub fn print_summary(summary: &RunSummary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    println!();
    println!("📊 Summary:");
    println!("   🌐 Websites: {}", summary.websites);
    println!("   ✅ With emails: {}", summary.with_emails);
    println!("   ➖ No emails: {}", summary.placeholders);
    println!("   ❌ Errors: {}", summary.errors);
    println!("   📋 Rows written: {}", summary.rows_written);

    Ok(())
}
