// src/extract/worker.rs
// =============================================================================
// The crawl itself: a level-by-level walk of one website.
//
// How it works:
// 1. Level 0 is the website URL itself
// 2. Fetch every page of the current level, extract its emails
// 3. From each page take at most `max_links_from_page` new same-site links
// 4. Those links form the next level
// 5. Stop after `depth` levels, or earlier when a level is empty
//
// A failure on the start page fails the whole website. Failures on deeper
// pages are logged and skipped.
// =============================================================================

use super::{Browser, EmailExtractor, ExtractError, LinkFilter, PageData};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

// Delay between two page fetches of the same website
const DEFAULT_DELAY: Duration = Duration::from_millis(100);

// Everything a worker needs to crawl one website
pub struct ExtractorFactory {
    website_url: String,
    start: Url,
    browser: Arc<dyn Browser>,
    depth: usize,
    max_links_from_page: usize,
    delay: Duration,
}

impl ExtractorFactory {
    // Validates the website URL and bundles the crawl parameters
    //
    // Parameters:
    //   website_url: absolute http(s) URL of the site (e.g. "https://example.com")
    //   browser: how pages are fetched
    //   depth: number of link levels to visit (1 = only the start page)
    //   max_links_from_page: how many new links to follow from each page
    pub fn new(
        website_url: &str,
        browser: Arc<dyn Browser>,
        depth: usize,
        max_links_from_page: usize,
    ) -> Result<Self, ExtractError> {
        let invalid = |reason: &str| ExtractError::InvalidUrl {
            url: website_url.to_string(),
            reason: reason.to_string(),
        };

        let start = Url::parse(website_url).map_err(|e| invalid(&e.to_string()))?;

        if start.scheme() != "http" && start.scheme() != "https" {
            return Err(invalid("only http and https are supported"));
        }
        if start.host_str().map_or(true, str::is_empty) {
            return Err(invalid("URL has no host"));
        }

        Ok(Self {
            website_url: website_url.to_string(),
            start,
            browser,
            depth,
            max_links_from_page,
            delay: DEFAULT_DELAY,
        })
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn link_filter(&self) -> LinkFilter {
        LinkFilter::new(&self.start)
    }

    pub fn email_extractor(&self) -> EmailExtractor {
        EmailExtractor::new()
    }
}

pub struct Worker {
    factory: ExtractorFactory,
    link_filter: LinkFilter,
    email_extractor: EmailExtractor,
}

impl Worker {
    pub fn new(factory: ExtractorFactory) -> Self {
        let link_filter = factory.link_filter();
        let email_extractor = factory.email_extractor();

        Self {
            factory,
            link_filter,
            email_extractor,
        }
    }

    /// Crawls the website and returns one record per email per page.
    pub async fn get_data(&self) -> Result<Vec<PageData>, ExtractError> {
        let factory = &self.factory;
        let mut results = Vec::new();
        // Every URL ever put on a level, so each page is queued (and fetched) once
        let mut queued: HashSet<String> = HashSet::new();
        let mut level = vec![factory.start.to_string()];
        queued.insert(factory.start.to_string());
        let mut fetched = 0usize;

        for depth in 0..factory.depth {
            if level.is_empty() {
                break;
            }

            let mut next_level: Vec<String> = Vec::new();

            for page_url in level {
                // Polite crawling: small delay between requests
                if fetched > 0 && !factory.delay.is_zero() {
                    tokio::time::sleep(factory.delay).await;
                }
                fetched += 1;

                debug!(depth, url = %page_url, "fetching page");

                let html = match factory.browser.get_page_content(&page_url).await {
                    Ok(html) => html,
                    Err(e) if depth == 0 => return Err(e),
                    Err(e) => {
                        warn!(url = %page_url, error = %e, "skipping page");
                        continue;
                    }
                };

                for email in self.email_extractor.extract(&html) {
                    results.push(PageData {
                        page: page_url.clone(),
                        email: Some(email),
                        website: factory.website_url.clone(),
                    });
                }

                // Only look for links if there is a next level to visit
                if depth + 1 >= factory.depth {
                    continue;
                }

                let mut taken = 0;
                for link in self.link_filter.filter(&html, &page_url) {
                    if taken >= factory.max_links_from_page {
                        break;
                    }
                    // Already fetched or waiting on some level: doesn't use a slot
                    if !queued.insert(link.clone()) {
                        continue;
                    }
                    next_level.push(link);
                    taken += 1;
                }
            }

            level = next_level;
        }

        debug!(
            website = %factory.website_url,
            pages = fetched,
            records = results.len(),
            "crawl finished"
        );

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    // In-memory browser: serves canned pages and records every request
    #[derive(Default)]
    struct FakeBrowser {
        pages: HashMap<String, String>,
        requests: Mutex<Vec<String>>,
    }

    impl FakeBrowser {
        fn with_pages(pages: &[(&str, &str)]) -> Arc<Self> {
            Arc::new(Self {
                pages: pages
                    .iter()
                    .map(|(url, html)| (url.to_string(), html.to_string()))
                    .collect(),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Browser for FakeBrowser {
        async fn get_page_content(&self, url: &str) -> Result<String, ExtractError> {
            self.requests.lock().unwrap().push(url.to_string());
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| ExtractError::HttpStatus {
                    url: url.to_string(),
                    status: 404,
                })
        }
    }

    async fn crawl(
        browser: Arc<FakeBrowser>,
        website: &str,
        depth: usize,
        max_links: usize,
    ) -> Result<Vec<PageData>, ExtractError> {
        let factory = ExtractorFactory::new(website, browser, depth, max_links)
            .unwrap()
            .with_delay(Duration::ZERO);
        Worker::new(factory).get_data().await
    }

    fn site() -> Arc<FakeBrowser> {
        FakeBrowser::with_pages(&[
            (
                "https://example.com/",
                r#"<p>info@example.com</p>
                   <a href="/contact">Contact</a>
                   <a href="/about">About</a>"#,
            ),
            (
                "https://example.com/contact",
                r#"<p>sales@example.com</p><a href="/team">Team</a>"#,
            ),
            ("https://example.com/about", r#"<p>about@example.com</p>"#),
            ("https://example.com/team", r#"<p>jane@example.com</p>"#),
        ])
    }

    #[tokio::test]
    async fn test_depth_one_only_fetches_start_page() {
        let browser = site();
        let data = crawl(browser.clone(), "https://example.com", 1, 5)
            .await
            .unwrap();

        assert_eq!(browser.requests(), vec!["https://example.com/"]);
        assert_eq!(
            data,
            vec![PageData {
                page: "https://example.com/".to_string(),
                email: Some("info@example.com".to_string()),
                website: "https://example.com".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_follows_one_link_per_page() {
        let browser = site();
        let data = crawl(browser.clone(), "https://example.com", 10, 1)
            .await
            .unwrap();

        assert_eq!(
            browser.requests(),
            vec![
                "https://example.com/",
                "https://example.com/contact",
                "https://example.com/team",
            ]
        );
        let emails: Vec<_> = data.iter().filter_map(|d| d.email.clone()).collect();
        assert_eq!(
            emails,
            vec!["info@example.com", "sales@example.com", "jane@example.com"]
        );
    }

    #[tokio::test]
    async fn test_never_fetches_a_page_twice() {
        let browser = FakeBrowser::with_pages(&[
            ("https://example.com/", r#"<a href="/a">A</a>"#),
            ("https://example.com/a", r#"<a href="/">Home</a><a href="/a">Self</a>"#),
        ]);
        let data = crawl(browser.clone(), "https://example.com/", 10, 3)
            .await
            .unwrap();

        assert!(data.is_empty());
        assert_eq!(
            browser.requests(),
            vec!["https://example.com/", "https://example.com/a"]
        );
    }

    #[tokio::test]
    async fn test_queued_links_do_not_use_link_slots() {
        let browser = FakeBrowser::with_pages(&[
            ("https://example.com/", r#"<a href="/a">A</a><a href="/b">B</a>"#),
            (
                "https://example.com/a",
                r#"<a href="/b">B</a><a href="/x">X</a><a href="/c">C</a>"#,
            ),
            ("https://example.com/b", "<p>b@example.com</p>"),
            ("https://example.com/x", "<p>x@example.com</p>"),
            ("https://example.com/c", "<p>c@example.com</p>"),
        ]);
        let data = crawl(browser.clone(), "https://example.com", 3, 2)
            .await
            .unwrap();

        assert_eq!(
            browser.requests(),
            vec![
                "https://example.com/",
                "https://example.com/a",
                "https://example.com/b",
                "https://example.com/x",
                "https://example.com/c",
            ]
        );
        let emails: Vec<_> = data.iter().filter_map(|d| d.email.clone()).collect();
        assert_eq!(emails, vec!["b@example.com", "x@example.com", "c@example.com"]);
    }

    #[tokio::test]
    async fn test_start_page_failure_fails_website() {
        let browser = FakeBrowser::with_pages(&[]);
        let err = crawl(browser, "https://example.com", 3, 1)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "HttpStatusError");
    }

    #[tokio::test]
    async fn test_deeper_failures_are_skipped() {
        let browser = FakeBrowser::with_pages(&[(
            "https://example.com/",
            r#"<p>info@example.com</p><a href="/missing">Gone</a>"#,
        )]);
        let data = crawl(browser.clone(), "https://example.com", 3, 1)
            .await
            .unwrap();

        assert_eq!(data.len(), 1);
        assert_eq!(browser.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_depth_zero_fetches_nothing() {
        let browser = site();
        let data = crawl(browser.clone(), "https://example.com", 0, 1)
            .await
            .unwrap();
        assert!(data.is_empty());
        assert!(browser.requests().is_empty());
    }

    #[test]
    fn test_factory_rejects_bad_urls() {
        let browser: Arc<dyn Browser> = FakeBrowser::with_pages(&[]);
        for url in ["example.com", "ftp://example.com", "not a url"] {
            let err = ExtractorFactory::new(url, browser.clone(), 1, 1)
                .err()
                .unwrap();
            assert_eq!(err.kind(), "InvalidUrl", "{url}");
        }
    }
}
