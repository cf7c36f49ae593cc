// src/services/extractor.rs

//! Heading fingerprint extraction.
//!
//! Reduces a page to the sorted, deduplicated set of its `h1`-`h3` texts.
//! Headings inside page chrome (`nav`, `header`, `footer`, `aside`) and text
//! inside `script`/`style` never contribute.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::models::ExtractConfig;

/// Elements whose whole subtree is ignored.
const STRIPPED_TAGS: [&str; 6] = ["script", "style", "nav", "footer", "header", "aside"];

static HEADINGS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1, h2, h3").expect("static heading selector"));

/// Extracts the canonical heading digest from markup.
#[derive(Debug, Clone)]
pub struct ContentExtractor {
    min_heading_length: usize,
}

impl ContentExtractor {
    /// Create an extractor with the given settings.
    pub fn new(config: &ExtractConfig) -> Self {
        Self {
            min_heading_length: config.min_heading_length,
        }
    }

    /// Newline-joined, sorted, unique heading texts. Empty when nothing qualifies.
    pub fn extract(&self, markup: &str) -> String {
        if markup.trim().is_empty() {
            return String::new();
        }

        let document = Html::parse_document(markup);
        let headings: BTreeSet<String> = document
            .select(&HEADINGS)
            .filter(|heading| !inside_stripped(heading))
            .map(heading_text)
            .filter(|text| text.chars().count() >= self.min_heading_length)
            .collect();

        headings.into_iter().collect::<Vec<_>>().join("\n")
    }
}

impl Default for ContentExtractor {
    fn default() -> Self {
        Self::new(&ExtractConfig::default())
    }
}

fn is_stripped_element(name: &str) -> bool {
    STRIPPED_TAGS.contains(&name)
}

/// Whether any ancestor of `element` is a stripped subtree.
fn inside_stripped(element: &ElementRef<'_>) -> bool {
    element.ancestors().any(|node| {
        node.value()
            .as_element()
            .is_some_and(|e| is_stripped_element(e.name()))
    })
}

/// Text nodes of a heading, trimmed and joined with single spaces.
fn heading_text(heading: ElementRef<'_>) -> String {
    heading
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let stripped = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|e| is_stripped_element(e.name()))
            });
            (!stripped).then_some(text.trim())
        })
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
