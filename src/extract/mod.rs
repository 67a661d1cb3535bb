// src/extract/mod.rs
// =============================================================================
// This module is the email extraction engine.
//
// The rest of the program only talks to it through a small contract:
// 1. Build an ExtractorFactory (website URL, browser, depth, link limit)
// 2. Build a Worker from the factory
// 3. Call worker.get_data() and get back zero or more PageData records
//
// Submodules:
// - browser: fetches page HTML (the Browser trait + an HTTP implementation)
// - links: picks which links on a page are worth following
// - emails: finds email addresses in a page
// - worker: the level-by-level crawl that ties it all together
// =============================================================================

mod browser;
mod emails;
mod links;
mod worker;

pub use browser::{Browser, HttpBrowser};
pub use emails::EmailExtractor;
pub use links::LinkFilter;
pub use worker::{ExtractorFactory, Worker};

use thiserror::Error;

// One result record: an email found on a page of a website
//
// email is None for placeholder rows, and is written as an empty field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageData {
    /// The page the email was found on
    pub page: String,
    /// The email address (lowercased)
    pub email: Option<String>,
    /// The website the crawl started from
    pub website: String,
}

impl PageData {
    // Looks up a column by its header name
    //
    // Unknown headers return None, so a CSV column that doesn't map to a
    // field is simply left empty.
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            "page" => Some(&self.page),
            "email" => self.email.as_deref(),
            "website" => Some(&self.website),
            _ => None,
        }
    }
}

/// Everything that can go wrong while extracting emails from a website.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("{reason}: {url}")]
    Request {
        url: String,
        reason: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("{0}")]
    Browser(String),
}

impl ExtractError {
    // Short, stable name of the failure, written into CSV error rows
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractError::InvalidUrl { .. } => "InvalidUrl",
            ExtractError::Client(_) => "ClientError",
            ExtractError::Request { .. } => "RequestError",
            ExtractError::HttpStatus { .. } => "HttpStatusError",
            ExtractError::Browser(_) => "BrowserError",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_lookup() {
        let record = PageData {
            page: "https://example.com/contact".to_string(),
            email: None,
            website: "https://example.com".to_string(),
        };
        assert_eq!(record.field("page"), Some("https://example.com/contact"));
        assert_eq!(record.field("email"), None);
        assert_eq!(record.field("website"), Some("https://example.com"));
        assert_eq!(record.field("phone"), None);
    }

    #[test]
    fn test_error_kind_and_message() {
        let err = ExtractError::HttpStatus {
            url: "https://example.com/".to_string(),
            status: 503,
        };
        assert_eq!(err.kind(), "HttpStatusError");
        assert_eq!(err.to_string(), "HTTP 503 from https://example.com/");
    }
}
