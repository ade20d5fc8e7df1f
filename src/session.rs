use tracing::warn;

use crate::fetch::PageFetcher;
use crate::lookup::{Lookup, SearchOutcome};
use crate::notch::{classify, NotchCategory};
use crate::parser::search::SearchCandidate;
use crate::parser::specs::DisplaySpec;

/// Everything the interactive flow shows, passed explicitly to each handler.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub query: String,
    pub loading: bool,
    pub error: Option<String>,
    pub results: Vec<SearchCandidate>,
    pub selected: Option<DisplaySpec>,
    pub notch: NotchCategory,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            query: String::new(),
            loading: false,
            error: None,
            results: Vec::new(),
            selected: None,
            notch: NotchCategory::PunchHole,
        }
    }
}

/// Run a search for `state.query`. Blank queries are ignored.
pub async fn submit_search<F: PageFetcher>(state: &mut ViewState, lookup: &Lookup<F>) {
    if state.query.trim().is_empty() {
        return;
    }

    state.loading = true;
    state.error = None;
    state.results.clear();
    state.selected = None;

    match lookup.search(&state.query).await {
        Ok(SearchOutcome::Found(candidates)) => state.results = candidates,
        Ok(outcome @ SearchOutcome::NoResults) => {
            state.error = outcome.message().map(str::to_string);
        }
        Err(e) => state.error = Some(e.to_string()),
    }

    state.loading = false;
}

/// Load specs for the candidate at `index` in `state.results`.
pub async fn select_phone<F: PageFetcher>(
    state: &mut ViewState,
    lookup: &Lookup<F>,
    index: usize,
) {
    let Some(candidate) = state.results.get(index).cloned() else {
        warn!(index, available = state.results.len(), "selection out of range");
        return;
    };

    state.loading = true;
    state.error = None;

    match lookup.spec(&candidate.identifier).await {
        Ok(spec) => {
            state.notch = classify(&spec.name);
            state.selected = Some(spec);
            state.results.clear();
        }
        Err(e) => state.error = Some(e.to_string()),
    }

    state.loading = false;
}

/// Replace the displayed cutout; the parsed specs are left alone.
pub fn override_notch(state: &mut ViewState, notch: NotchCategory) {
    state.notch = notch;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::tests::{base, stocked_fetcher, FakeFetcher};
    use crate::lookup::NO_RESULTS_MESSAGE;

    fn state_with(query: &str) -> ViewState {
        ViewState {
            query: query.to_string(),
            ..ViewState::default()
        }
    }

    #[tokio::test]
    async fn blank_query_is_ignored() {
        let lookup = Lookup::new(stocked_fetcher(), base());
        let mut state = state_with("   ");
        submit_search(&mut state, &lookup).await;
        assert!(state.results.is_empty());
        assert!(state.error.is_none());
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn search_then_select_then_override() {
        let page = r#"<h1 class="specs-phone-name-title">Samsung Galaxy S24 Ultra</h1>
            <h2>Display</h2><table><tr><td>6.8 inches (~88.5% screen-to-body ratio)</td></tr></table>"#;
        let fetcher = stocked_fetcher()
            .with_page("https://gsm.test/samsung_galaxy_s24_ultra-12771.php", page);
        let lookup = Lookup::new(fetcher, base());
        let mut state = state_with("galaxy s24");

        submit_search(&mut state, &lookup).await;
        assert_eq!(state.results.len(), 3);
        assert!(state.error.is_none());

        select_phone(&mut state, &lookup, 0).await;
        let spec = state.selected.clone().unwrap();
        assert_eq!(spec.name, "Samsung Galaxy S24 Ultra");
        assert_eq!(spec.display_size.as_str(), "6.8\"");
        assert!(state.results.is_empty());
        assert_eq!(state.notch, NotchCategory::PunchHole);

        override_notch(&mut state, NotchCategory::Pill);
        assert_eq!(state.notch, NotchCategory::Pill);
        assert_eq!(state.selected, Some(spec));
    }

    #[tokio::test]
    async fn no_results_sets_message() {
        let url = "https://gsm.test/results.php3?sQuickSearch=yes&sName=nokia+3310";
        let fetcher = FakeFetcher::default().with_page(url, "<p>nothing here</p>");
        let lookup = Lookup::new(fetcher, base());
        let mut state = state_with("nokia 3310");
        submit_search(&mut state, &lookup).await;
        assert_eq!(state.error.as_deref(), Some(NO_RESULTS_MESSAGE));
        assert!(state.results.is_empty());
    }

    #[tokio::test]
    async fn failed_selection_keeps_results() {
        let lookup = Lookup::new(stocked_fetcher(), base());
        let mut state = state_with("galaxy s24");
        submit_search(&mut state, &lookup).await;

        // Detail pages are not stocked, so the fetch fails.
        select_phone(&mut state, &lookup, 1).await;
        assert_eq!(
            state.error.as_deref(),
            Some("Failed to get phone details. Please try again.")
        );
        assert_eq!(state.results.len(), 3);
        assert!(state.selected.is_none());
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn new_search_clears_selection() {
        let lookup = Lookup::new(stocked_fetcher(), base());
        let mut state = state_with("galaxy s24");
        state.selected = Some(crate::parser::specs::extract_spec("", "old_phone-1"));
        submit_search(&mut state, &lookup).await;
        assert!(state.selected.is_none());
        assert_eq!(state.results.len(), 3);
    }
}
