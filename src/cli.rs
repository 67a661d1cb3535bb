// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Every option has a default, so running `email-harvest` with no arguments
// reads websites.txt and appends to output.csv.
// =============================================================================

use crate::runner::RunConfig;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "email-harvest",
    version,
    about = "Crawl a list of websites for contact email addresses and append them to a CSV file",
    long_about = "email-harvest reads one website per line from an input file, crawls each site \
                  a few links deep looking for email addresses, and appends one CSV row per \
                  email found. Websites without emails get a placeholder row, websites that \
                  fail get an error row."
)]
pub struct Cli {
    /// File with one website per line ('#' starts a comment)
    #[arg(short, long, default_value = "websites.txt")]
    pub input: PathBuf,

    /// CSV file the results are appended to
    #[arg(short, long, default_value = "output.csv")]
    pub output: PathBuf,

    /// How many link levels to crawl (1 = only the start page)
    #[arg(long, default_value_t = 10)]
    pub depth: usize,

    /// How many new links to follow from each page
    #[arg(long, default_value_t = 1)]
    pub max_links: usize,

    /// Scheme added to websites that don't have one
    #[arg(long, default_value = "https", value_parser = ["http", "https"])]
    pub default_scheme: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// Pause between two page fetches of the same website, in milliseconds
    #[arg(long, default_value_t = 100)]
    pub delay_ms: u64,

    /// How many websites to crawl at the same time
    ///
    /// Rows are still written in input order.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
    pub jobs: u16,

    /// Print the final summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Websites to crawl instead of reading the input file
    ///
    /// Example: email-harvest example.com https://example.org
    pub sites: Vec<String>,
}

impl Cli {
    pub fn settings(&self) -> RunConfig {
        RunConfig {
            output: self.output.clone(),
            depth: self.depth,
            max_links_from_page: self.max_links,
            timeout: Duration::from_secs(self.timeout),
            delay: Duration::from_millis(self.delay_ms),
            jobs: usize::from(self.jobs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["email-harvest"]);
        assert_eq!(cli.input, PathBuf::from("websites.txt"));
        assert_eq!(cli.output, PathBuf::from("output.csv"));
        assert_eq!(cli.default_scheme, "https");
        assert!(cli.sites.is_empty());

        let settings = cli.settings();
        assert_eq!(settings.depth, 10);
        assert_eq!(settings.max_links_from_page, 1);
        assert_eq!(settings.timeout, Duration::from_secs(10));
        assert_eq!(settings.delay, Duration::from_millis(100));
        assert_eq!(settings.jobs, 1);
    }

    #[test]
    fn test_overrides_and_sites() {
        let cli = Cli::parse_from([
            "email-harvest",
            "-o",
            "leads.csv",
            "--depth",
            "3",
            "--max-links",
            "2",
            "--jobs",
            "4",
            "--json",
            "example.com",
            "https://example.org",
        ]);
        assert_eq!(cli.output, PathBuf::from("leads.csv"));
        assert!(cli.json);
        assert_eq!(cli.sites, vec!["example.com", "https://example.org"]);
        assert_eq!(cli.settings().jobs, 4);
    }

    #[test]
    fn test_rejects_zero_jobs() {
        assert!(Cli::try_parse_from(["email-harvest", "--jobs", "0"]).is_err());
    }
}
