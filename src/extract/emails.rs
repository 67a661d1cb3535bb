// src/extract/emails.rs
// Finds email addresses in a page: visible text first, then mailto: links.

use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;

// Things that look like emails in page text but are really file names,
// e.g. "logo@2x.png"
const ASSET_SUFFIXES: &[&str] = &[".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp", ".css", ".js"];

const MAILTO: &str = "mailto:";

#[derive(Debug, Clone)]
pub struct EmailExtractor {
    email_regex: Regex,
    links: Selector,
}

impl Default for EmailExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl EmailExtractor {
    pub fn new() -> Self {
        Self {
            email_regex: Regex::new(r"(?i)\b[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}\b")
                .expect("valid email regex"),
            links: Selector::parse("a[href]").expect("valid anchor selector"),
        }
    }

    /// Returns the unique, lowercased emails of a page in first-seen order.
    pub fn extract(&self, html: &str) -> Vec<String> {
        let document = Html::parse_document(html);
        let mut seen = HashSet::new();
        let mut emails = Vec::new();

        let text = document.root_element().text().collect::<Vec<_>>().join(" ");
        self.collect(&text, &mut seen, &mut emails);

        for element in document.select(&self.links) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            // mailto:someone@example.com?subject=Hello, scheme in any case
            let href = href.trim();
            let is_mailto = href
                .get(..MAILTO.len())
                .is_some_and(|scheme| scheme.eq_ignore_ascii_case(MAILTO));
            if !is_mailto {
                continue;
            }
            let target = href[MAILTO.len()..].split('?').next().unwrap_or("");
            self.collect(target, &mut seen, &mut emails);
        }

        emails
    }

    fn collect(&self, haystack: &str, seen: &mut HashSet<String>, out: &mut Vec<String>) {
        for found in self.email_regex.find_iter(haystack) {
            let email = found.as_str().to_lowercase();
            if is_asset_name(&email) {
                continue;
            }
            if seen.insert(email.clone()) {
                out.push(email);
            }
        }
    }
}

fn is_asset_name(email: &str) -> bool {
    ASSET_SUFFIXES.iter().any(|suffix| email.ends_with(suffix))
}
