//! Debounced query handling.
//!
//! Each text change restarts a quiet-period timer; only the text present
//! when the timer fires is searched. Starting a search aborts the previous
//! in-flight search task and advances the search generation, so a response
//! that still slips through is dropped in `finish_search`.

use tracing::debug;

use super::{SearchSession, SessionState};
use crate::external_catalog::SearchSummary;
use crate::metrics::SEARCH_CANCELLATIONS;

impl SearchSession {
    /// Record a keystroke. Schedules a search after the debounce period.
    ///
    /// Blank text clears the results immediately.
    pub fn set_query(&self, text: impl Into<String>) {
        let text = text.into();
        let mut state = self.lock();
        state.query = text;
        state.query_revision += 1;
        if let Some(handle) = state.pending_search.take() {
            handle.abort();
        }

        if state.query.trim().is_empty() {
            self.reset_search(&mut state);
            self.publish(&mut state);
            return;
        }

        let revision = state.query_revision;
        let debounce = self.shared.debounce;
        let weak = self.downgrade();
        state.pending_search = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if let Some(session) = Self::upgrade(&weak) {
                session.start_search(revision);
            }
        }));
        self.publish(&mut state);
    }

    /// Clear the query and results synchronously.
    ///
    /// A debounced search that has not fired yet is dropped and an in-flight
    /// search is cancelled; neither can repopulate the results.
    pub fn clear_query(&self) {
        let mut state = self.lock();
        state.query.clear();
        state.query_revision += 1;
        if let Some(handle) = state.pending_search.take() {
            handle.abort();
        }
        self.reset_search(&mut state);
        self.publish(&mut state);
    }

    /// Debounce timer fired for `revision`.
    fn start_search(&self, revision: u64) {
        let mut state = self.lock();
        if state.query_revision != revision {
            // A newer keystroke owns the timer now.
            return;
        }
        state.pending_search = None;

        state.search_generation += 1;
        let generation = state.search_generation;
        if let Some(handle) = state.in_flight.take() {
            debug!("Cancelling in-flight search, superseded by '{}'", state.query);
            handle.abort();
            SEARCH_CANCELLATIONS.with_label_values(&["superseded"]).inc();
        }

        let query = state.query.clone();
        if !self.shared.catalog.is_searchable(&query) {
            debug!("Query '{}' too short, clearing results", query);
            state.raw_results.clear();
            state.searching = false;
            let pending = self.recompute(&mut state);
            debug_assert!(pending.is_empty(), "empty results need no backfill");
            self.publish(&mut state);
            return;
        }

        debug!("Starting search #{} for '{}'", generation, query);
        state.searching = true;
        let catalog = self.shared.catalog.clone();
        let weak = self.downgrade();
        state.in_flight = Some(tokio::spawn(async move {
            let results = catalog.search(&query).await;
            if let Some(session) = Self::upgrade(&weak) {
                session.finish_search(generation, results);
            }
        }));
        self.publish(&mut state);
    }

    fn finish_search(&self, generation: u64, results: Vec<SearchSummary>) {
        let pending = {
            let mut state = self.lock();
            if state.search_generation != generation {
                debug!(
                    "Discarding results of search #{} (current #{})",
                    generation, state.search_generation
                );
                SEARCH_CANCELLATIONS.with_label_values(&["stale"]).inc();
                return;
            }

            state.in_flight = None;
            state.searching = false;
            state.raw_results = results;
            let pending = self.recompute(&mut state);
            self.publish(&mut state);
            pending
        };
        self.spawn_backfills(pending);
    }

    /// Cancel any search and empty the results. Caller publishes.
    fn reset_search(&self, state: &mut SessionState) {
        state.search_generation += 1;
        if let Some(handle) = state.in_flight.take() {
            debug!("Cancelling in-flight search, query cleared");
            handle.abort();
            SEARCH_CANCELLATIONS.with_label_values(&["cleared"]).inc();
        }
        state.searching = false;
        state.raw_results.clear();
        state.filtered.clear();
    }
}
