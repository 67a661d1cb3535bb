// src/output.rs
// =============================================================================
// Appends result records to the output CSV file.
//
// - The file is opened in append mode, so earlier runs are kept
// - The header row is only written when the file is new or empty
// - Columns are written in the order of the configured headers; each header
//   is looked up as a field on the record (missing fields become empty)
// =============================================================================

use crate::extract::PageData;
use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// Column order of the output file.
pub const CSV_HEADERS: [&str; 3] = ["page", "email", "website"];

/// Marker written in the `page` column when a website could not be processed.
pub const ERROR_PAGE: &str = "ERROR_DURING_PROCESSING";

// Error rows carry at most this many characters in the email column
const MAX_ERROR_LEN: usize = 200;

#[derive(Debug, Clone)]
pub struct CsvSaver {
    path: PathBuf,
    headers: Vec<String>,
}

impl CsvSaver {
    pub fn new(path: impl Into<PathBuf>, headers: &[&str]) -> Self {
        Self {
            path: path.into(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    // Appends records to the file
    //
    // Returns the number of data rows written (the header isn't counted).
    pub fn save(&self, records: &[PageData]) -> Result<usize> {
        // A missing or empty file needs the header first
        let needs_header = std::fs::metadata(&self.path)
            .map(|meta| meta.len() == 0)
            .unwrap_or(true);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Could not open output file '{}'", self.path.display()))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if needs_header {
            writer.write_record(&self.headers)?;
        }

        for record in records {
            writer.write_record(
                self.headers
                    .iter()
                    .map(|header| record.field(header).unwrap_or("")),
            )?;
        }

        writer
            .flush()
            .with_context(|| format!("Could not write to '{}'", self.path.display()))?;

        Ok(records.len())
    }
}

// Row saved when a website was crawled but no email was found
pub fn placeholder_row(website: &str) -> PageData {
    PageData {
        page: website.to_string(),
        email: None,
        website: website.to_string(),
    }
}

// Row saved when processing a website failed
//
// The email column holds "ERROR: <kind>: <message>", cut to 200 characters.
pub fn error_row(website: &str, kind: &str, message: &str) -> PageData {
    let text: String = format!("ERROR: {}: {}", kind, message)
        .chars()
        .take(MAX_ERROR_LEN)
        .collect();

    PageData {
        page: ERROR_PAGE.to_string(),
        email: Some(text),
        website: website.to_string(),
    }
}
