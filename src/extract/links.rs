// src/extract/links.rs
// =============================================================================
// Decides which links on a page the crawler may follow.
//
// Rules:
// - Only http/https links
// - Only links on the same site (www. prefix is ignored when comparing)
// - No anchors, mailto:, tel: or javascript: links
// - No static assets (images, stylesheets, archives, ...)
// - Fragments are stripped and duplicates removed, keeping page order
// =============================================================================

use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

// File extensions that never contain contact information worth parsing
const SKIPPED_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "svg", "webp", "ico", "bmp", "css", "js", "json", "xml", "pdf",
    "zip", "gz", "tar", "rar", "7z", "mp3", "mp4", "avi", "mov", "webm", "woff", "woff2", "ttf",
    "eot", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "exe", "dmg",
];

#[derive(Debug, Clone)]
pub struct LinkFilter {
    site: String,
    anchors: Selector,
}

impl LinkFilter {
    pub fn new(website: &Url) -> Self {
        let site = website.host_str().map(site_key).unwrap_or_default();

        Self {
            site,
            // Constant selector, known to be valid
            anchors: Selector::parse("a[href]").expect("valid anchor selector"),
        }
    }

    // Extracts the followable links from a page, in document order
    //
    // Parameters:
    //   html: the page HTML
    //   page_url: the URL the page was fetched from (for relative links)
    pub fn filter(&self, html: &str, page_url: &str) -> Vec<String> {
        let mut links = Vec::new();

        let base = match Url::parse(page_url) {
            Ok(url) => url,
            Err(_) => return links,
        };

        let document = Html::parse_document(html);
        let mut seen = HashSet::new();

        for element in document.select(&self.anchors) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            let Some(url) = resolve_link(&base, href) else {
                continue;
            };

            if self.is_followable(&url) && seen.insert(url.to_string()) {
                links.push(url.to_string());
            }
        }

        links
    }

    fn is_followable(&self, url: &Url) -> bool {
        if url.scheme() != "http" && url.scheme() != "https" {
            return false;
        }

        match url.host_str() {
            Some(host) if site_key(host) == self.site => {}
            _ => return false,
        }

        !has_skipped_extension(url.path())
    }
}

// Resolves a link (possibly relative) to an absolute URL without fragment
fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();

    // Skip anchors and special protocols
    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("javascript:")
    {
        return None;
    }

    let mut url = base.join(href).ok()?;
    url.set_fragment(None);
    Some(url)
}

// Hosts compare case-insensitively and without a leading "www."
fn site_key(host: &str) -> String {
    let host = host.to_ascii_lowercase();
    match host.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => host,
    }
}

fn has_skipped_extension(path: &str) -> bool {
    let last_segment = path.rsplit('/').next().unwrap_or("");
    match last_segment.rsplit_once('.') {
        Some((_, ext)) => SKIPPED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()),
        None => false,
    }
}
