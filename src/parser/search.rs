use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use super::patterns::{brand_of, slug_from_href, strip_tags};

/// Upper bound on candidates returned from one results page.
pub const MAX_CANDIDATES: usize = 20;

static MAKERS_LIST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<div class="makers"[^>]*>[\s\S]*?<ul>([\s\S]*?)</ul>"#).unwrap()
});
static MAKERS_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)<li[^>]*>[\s\S]*?<a href="([^"]+)"[^>]*>[\s\S]*?<span[^>]*>[\s\S]*?<br\s*/?>\s*([^<]+)</span>"#,
    )
    .unwrap()
});
static STRONG_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)<a href="([a-z0-9_-]+\.php)"[^>]*>[\s\S]*?<strong>[\s\S]*?<span>([^<]+)</span>"#,
    )
    .unwrap()
});
static DEVICE_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)href="([a-z][a-z0-9_]+-\d+\.php)"[^>]*>([^<]*(?:<[^a]*>[^<]*)*)</a>"#)
        .unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchCandidate {
    pub name: String,
    pub brand: String,
    #[serde(rename = "slug")]
    pub identifier: String,
}

impl SearchCandidate {
    fn new(href: &str, name: &str) -> Option<Self> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            brand: brand_of(name),
            identifier: slug_from_href(href),
        })
    }
}

type Strategy = fn(&str) -> Vec<SearchCandidate>;

/// Ordered from most to least structured; the first one with hits wins.
const STRATEGIES: &[(&str, Strategy)] = &[
    ("makers_list", from_makers_list),
    ("strong_links", from_strong_links),
    ("device_links", from_device_links),
];

/// Extract up to [`MAX_CANDIDATES`] phones from a search results page, in
/// document order. An empty result means no strategy matched anything.
pub fn extract_candidates(html: &str) -> Vec<SearchCandidate> {
    for (label, strategy) in STRATEGIES {
        let found = strategy(html);
        if !found.is_empty() {
            debug!(strategy = label, count = found.len(), "search results matched");
            return found;
        }
    }
    debug!("no search strategy matched");
    Vec::new()
}

fn from_makers_list(html: &str) -> Vec<SearchCandidate> {
    let Some(list) = MAKERS_LIST_RE.captures(html).and_then(|c| c.get(1)) else {
        return Vec::new();
    };
    MAKERS_ITEM_RE
        .captures_iter(list.as_str())
        .filter_map(|c| SearchCandidate::new(&c[1], &c[2]))
        .take(MAX_CANDIDATES)
        .collect()
}

fn from_strong_links(html: &str) -> Vec<SearchCandidate> {
    STRONG_LINK_RE
        .captures_iter(html)
        .filter_map(|c| SearchCandidate::new(&c[1], &c[2]))
        .take(MAX_CANDIDATES)
        .collect()
}

fn from_device_links(html: &str) -> Vec<SearchCandidate> {
    DEVICE_LINK_RE
        .captures_iter(html)
        .filter_map(|c| {
            let name = strip_tags(&c[2]);
            let name = name.trim();
            if name.chars().count() <= 2 || name.contains("Compare") || name.contains("Pictures") {
                return None;
            }
            SearchCandidate::new(&c[1], name)
        })
        .take(MAX_CANDIDATES)
        .collect()
}
