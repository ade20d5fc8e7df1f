use std::fmt;

use reqwest::Url;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use crate::fetch::{FetchError, PageFetcher};
use crate::notch::{classify, NotchCategory};
use crate::parser::search::{extract_candidates, SearchCandidate};
use crate::parser::specs::{extract_spec, DisplaySpec};

pub const NO_RESULTS_MESSAGE: &str = "No phones found. Try a different search term.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Search,
    SpecLookup,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Search => "Failed to search GSMArena. Please try again.",
            Operation::SpecLookup => "Failed to get phone details. Please try again.",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    InvalidInput,
    UpstreamUnavailable,
}

/// Operation-level failures. The message of `UpstreamUnavailable` is generic;
/// the cause is only reachable through `source()` and the logs.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("{0}")]
    InvalidInput(&'static str),
    #[error("{operation}")]
    UpstreamUnavailable {
        operation: Operation,
        #[source]
        source: FetchError,
    },
}

impl LookupError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LookupError::InvalidInput(_) => ErrorKind::InvalidInput,
            LookupError::UpstreamUnavailable { .. } => ErrorKind::UpstreamUnavailable,
        }
    }

    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::InvalidInput => 400,
            ErrorKind::UpstreamUnavailable => 500,
        }
    }
}

/// Search result; an empty results page is not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(Vec<SearchCandidate>),
    NoResults,
}

impl SearchOutcome {
    pub fn message(&self) -> Option<&'static str> {
        match self {
            SearchOutcome::Found(_) => None,
            SearchOutcome::NoResults => Some(NO_RESULTS_MESSAGE),
        }
    }
}

/// Parsed specs with the classified cutout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhoneView {
    #[serde(flatten)]
    pub spec: DisplaySpec,
    pub notch: NotchCategory,
}

impl PhoneView {
    pub fn new(spec: DisplaySpec) -> Self {
        let notch = classify(&spec.name);
        Self { spec, notch }
    }
}

/// Search → pick → spec lookup against the upstream site. Holds no state
/// between calls beyond the fetcher and base URL.
pub struct Lookup<F> {
    fetcher: F,
    base_url: Url,
}

impl<F: PageFetcher> Lookup<F> {
    /// `base_url` should come from [`crate::config::parse_base_url`].
    pub fn new(fetcher: F, base_url: Url) -> Self {
        Self { fetcher, base_url }
    }

    pub fn search_url(&self, query: &str) -> String {
        let mut url = self.page_url("results.php3");
        url.query_pairs_mut()
            .append_pair("sQuickSearch", "yes")
            .append_pair("sName", query);
        url.to_string()
    }

    /// The slug is one encoded path segment, so `/`, `?` and `#` stay inside it.
    pub fn phone_url(&self, slug: &str) -> String {
        self.page_url(&format!("{}.php", slug)).to_string()
    }

    fn page_url(&self, page: &str) -> Url {
        let mut url = self.base_url.clone();
        // http(s) URLs always have path segments.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(page);
        }
        url
    }

    pub async fn search(&self, query: &str) -> Result<SearchOutcome, LookupError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(LookupError::InvalidInput("No search query provided"));
        }

        let url = self.search_url(query);
        let html = self.fetch(Operation::Search, &url).await?;
        let candidates = extract_candidates(&html);
        info!(query, count = candidates.len(), "search finished");

        if candidates.is_empty() {
            Ok(SearchOutcome::NoResults)
        } else {
            Ok(SearchOutcome::Found(candidates))
        }
    }

    pub async fn spec(&self, slug: &str) -> Result<DisplaySpec, LookupError> {
        let slug = slug.trim();
        if slug.is_empty() {
            return Err(LookupError::InvalidInput("No phone slug provided"));
        }

        let url = self.phone_url(slug);
        let html = self.fetch(Operation::SpecLookup, &url).await?;
        let spec = extract_spec(&html, slug);
        info!(slug, name = %spec.name, "spec lookup finished");
        Ok(spec)
    }

    /// Spec lookup plus notch classification of the resolved name.
    pub async fn phone(&self, slug: &str) -> Result<PhoneView, LookupError> {
        self.spec(slug).await.map(PhoneView::new)
    }

    async fn fetch(&self, operation: Operation, url: &str) -> Result<String, LookupError> {
        self.fetcher.fetch_text(url).await.map_err(|source| {
            error!(url, error = %source, "upstream fetch failed");
            LookupError::UpstreamUnavailable { operation, source }
        })
    }
}
