// src/extract/browser.rs
// =============================================================================
// A "browser" is anything that can turn a URL into page HTML.
//
// The crawl worker only knows about the Browser trait, so the fetch strategy
// is pluggable: HttpBrowser uses reqwest, tests use an in-memory fake.
// =============================================================================

use super::ExtractError;
use async_trait::async_trait;
use reqwest::{redirect, Client};
use std::time::Duration;

// How many redirects we follow before giving up on a page
const MAX_REDIRECTS: usize = 5;

#[async_trait]
pub trait Browser: Send + Sync {
    /// Fetches `url` and returns the response body as text.
    async fn get_page_content(&self, url: &str) -> Result<String, ExtractError>;
}

// Fetches pages over HTTP(S) with a shared reqwest client
//
// The client is created once and reused for every page of every website,
// so connections are pooled.
#[derive(Debug, Clone)]
pub struct HttpBrowser {
    client: Client,
}

impl HttpBrowser {
    pub fn new(timeout: Duration) -> Result<Self, ExtractError> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(concat!("email-harvest/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ExtractError::Client)?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Browser for HttpBrowser {
    async fn get_page_content(&self, url: &str) -> Result<String, ExtractError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| request_error(url, source))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok());
        check_content_type(url, content_type)?;

        response
            .text()
            .await
            .map_err(|source| request_error(url, source))
    }
}

// Only markup and plain text can hold emails; images, PDFs and the like
// aren't worth downloading. A missing Content-Type is given the benefit of
// the doubt.
fn check_content_type(url: &str, content_type: Option<&str>) -> Result<(), ExtractError> {
    let Some(content_type) = content_type else {
        return Ok(());
    };

    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    if mime.starts_with("text/") || mime.contains("html") || mime.contains("xml") {
        Ok(())
    } else {
        Err(ExtractError::Browser(format!(
            "Unsupported content type '{}' at {}",
            mime, url
        )))
    }
}

// Wraps a reqwest error with a human-readable reason
//
// reqwest errors can happen for many reasons (timeouts, DNS failures,
// TLS problems, redirect loops) and the raw message is often long, so we
// pick a short reason up front and keep the original as the source.
fn request_error(url: &str, source: reqwest::Error) -> ExtractError {
    ExtractError::Request {
        url: url.to_string(),
        reason: describe_request_error(&source),
        source,
    }
}

fn describe_request_error(error: &reqwest::Error) -> &'static str {
    let error_string = error.to_string().to_lowercase();

    if error.is_timeout() {
        "Request timed out"
    } else if error.is_redirect() {
        "Too many redirects"
    } else if error.is_connect() {
        if error_string.contains("dns") {
            "Could not resolve hostname"
        } else {
            "Connection failed"
        }
    } else if error_string.contains("certificate") || error_string.contains("ssl") {
        "SSL certificate error"
    } else if error.is_decode() || error.is_body() {
        "Could not read response body"
    } else {
        "Request failed"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builds() {
        assert!(HttpBrowser::new(Duration::from_secs(5)).is_ok());
    }

    #[test]
    fn test_content_type_check() {
        let url = "https://example.com/";
        assert!(check_content_type(url, None).is_ok());
        assert!(check_content_type(url, Some("text/html; charset=UTF-8")).is_ok());
        assert!(check_content_type(url, Some("application/xhtml+xml")).is_ok());

        let err = check_content_type(url, Some("image/png")).unwrap_err();
        assert_eq!(err.kind(), "BrowserError");
        assert_eq!(
            err.to_string(),
            "Unsupported content type 'image/png' at https://example.com/"
        );
    }

    #[tokio::test]
    async fn test_unresolvable_host_is_request_error() {
        let browser = HttpBrowser::new(Duration::from_secs(5)).unwrap();
        // .invalid is reserved and never resolves (RFC 2606)
        let err = browser
            .get_page_content("http://email-harvest.invalid/")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "RequestError");
        assert!(err.to_string().ends_with("http://email-harvest.invalid/"));
    }
}
