// src/input.rs
// =============================================================================
// Reads the list of websites to crawl.
//
// File format: one URL per line.
// - Blank lines and lines starting with '#' are ignored
// - Lines without a scheme get the default scheme ("example.com" ->
//   "https://example.com")
// - Only http and https are crawled, other schemes are skipped with a warning
// =============================================================================

use anyhow::{bail, Context, Result};
use std::path::Path;

// What happened to a single input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// Blank line or comment
    Ignored,
    /// Already an http(s) URL, kept as-is
    Accepted(String),
    /// Had no scheme, the default one was prepended
    Formatted(String),
    /// Has a scheme we don't crawl (ftp:, mailto:, ...)
    Unsupported,
}

// Reads and normalizes the websites listed in a file
//
// Returns an error if the file doesn't exist or isn't valid UTF-8.
pub fn read_websites(path: &Path, default_scheme: &str) -> Result<Vec<String>> {
    if !path.is_file() {
        bail!("Input file '{}' not found.", path.display());
    }

    println!("Reading websites from {}...", path.display());

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read input file '{}'", path.display()))?;

    let websites = normalize_lines(content.lines(), default_scheme);
    println!("Found {} websites to process.", websites.len());

    Ok(websites)
}

// Normalizes a list of raw lines (from a file or the command line),
// printing what happened to the ones that were changed or dropped
pub fn normalize_lines<'a, I>(lines: I, default_scheme: &str) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut websites = Vec::new();

    for line in lines {
        match normalize_line(line, default_scheme) {
            LineOutcome::Ignored => {}
            LineOutcome::Accepted(url) => websites.push(url),
            LineOutcome::Formatted(url) => {
                println!("  Formatted URL: {} -> {}", line.trim(), url);
                websites.push(url);
            }
            LineOutcome::Unsupported => {
                println!(
                    "  Warning: Skipping URL with unsupported scheme: {}",
                    line.trim()
                );
            }
        }
    }

    websites
}

pub fn normalize_line(line: &str, default_scheme: &str) -> LineOutcome {
    let url = line.trim();
    if url.is_empty() || url.starts_with('#') {
        return LineOutcome::Ignored;
    }

    match scheme_of(url) {
        None => LineOutcome::Formatted(format!("{}://{}", default_scheme, url)),
        Some(scheme) if scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https") => {
            LineOutcome::Accepted(url.to_string())
        }
        Some(_) => LineOutcome::Unsupported,
    }
}

// Returns the scheme of a URL-ish string, if it has one
//
// A scheme is a letter followed by letters, digits, '+', '-' or '.',
// terminated by ':'. So "example.com:8080" has the scheme "example.com",
// while "example.com/contact" has none.
fn scheme_of(url: &str) -> Option<&str> {
    let (candidate, _) = url.split_once(':')?;

    let mut chars = candidate.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    if chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        Some(candidate)
    } else {
        None
    }
}
