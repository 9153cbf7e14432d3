//! Search session: the state behind one search page.
//!
//! A [`SearchSession`] owns the catalog client, the detail cache and the
//! query/filter/modal state. Every change recomputes the displayed list and
//! publishes a [`SessionSnapshot`] on a watch channel.
//!
//! Work is split across tasks:
//! - Query changes are debounced and at most one catalog search runs at a
//!   time (see `query.rs`).
//! - Ratings missing from the cache are back-filled in the background, at
//!   most one fetch per identifier, and each completed fetch triggers a
//!   recomputation.
//! - Detail modal lookups run on their own task (see `modal.rs`).
//!
//! Methods that may spawn tasks must be called from within a tokio runtime.

mod modal;
mod query;
mod types;

pub use types::*;

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::detail_cache::DetailCache;
use crate::external_catalog::{CatalogClient, DetailRecord, SearchSummary};
use crate::filter::{apply_filters, FilterCriteria, ListedMovie, SortOrder};

/// Handle to a search session. Cheap to clone.
#[derive(Clone)]
pub struct SearchSession {
    shared: Arc<SessionShared>,
}

struct SessionShared {
    catalog: CatalogClient,
    cache: Arc<DetailCache>,
    debounce: Duration,
    state: Mutex<SessionState>,
    updates: watch::Sender<SessionSnapshot>,
}

#[derive(Default)]
struct SessionState {
    query: String,
    /// Bumped on every query change; a debounce timer only fires for the
    /// revision it was scheduled for.
    query_revision: u64,
    /// Bumped whenever a search starts or is cleared; completions carrying
    /// an older value are discarded.
    search_generation: u64,
    /// Same, for detail modal lookups.
    modal_generation: u64,
    raw_results: Vec<SearchSummary>,
    criteria: FilterCriteria,
    filtered: Vec<ListedMovie>,
    searching: bool,
    details_loading: bool,
    modal: Option<DetailRecord>,
    pending_search: Option<JoinHandle<()>>,
    in_flight: Option<JoinHandle<()>>,
    backfills: HashSet<String>,
    version: u64,
}

impl SessionState {
    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            version: self.version,
            query: self.query.clone(),
            results: self.filtered.clone(),
            total_results: self.raw_results.len(),
            loading: self.searching || self.details_loading,
            criteria: self.criteria.clone(),
            modal: self.modal.as_ref().map(ModalView::from),
        }
    }
}

impl Drop for SessionShared {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        for handle in [state.pending_search.take(), state.in_flight.take()]
            .into_iter()
            .flatten()
        {
            handle.abort();
        }
    }
}

impl SearchSession {
    /// Create a session with its own, empty detail cache.
    pub fn new(catalog: CatalogClient, config: &SessionConfig) -> Self {
        let catalog = catalog.with_min_query_len(config.min_query_len);
        let cache = Arc::new(DetailCache::new(catalog.clone()));
        let (updates, _) = watch::channel(SessionSnapshot::default());

        Self {
            shared: Arc::new(SessionShared {
                catalog,
                cache,
                debounce: config.debounce(),
                state: Mutex::new(SessionState::default()),
                updates,
            }),
        }
    }

    /// The session's detail cache.
    pub fn cache(&self) -> &Arc<DetailCache> {
        &self.shared.cache
    }

    /// Current state.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.lock().snapshot()
    }

    /// Receive a snapshot after every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.shared.updates.subscribe()
    }

    pub fn criteria(&self) -> FilterCriteria {
        self.lock().criteria.clone()
    }

    /// Replace all filter criteria at once.
    pub fn set_criteria(&self, criteria: FilterCriteria) {
        self.update_criteria(|current| {
            *current = criteria;
            current.min_rating = current.min_rating.max(0.0);
        });
    }

    pub fn set_sort(&self, sort: SortOrder) {
        self.update_criteria(|criteria| criteria.sort = sort);
    }

    /// Set inclusive year bounds; `None` removes a bound.
    pub fn set_year_range(&self, year_from: Option<i32>, year_to: Option<i32>) {
        self.update_criteria(|criteria| {
            criteria.year_from = year_from;
            criteria.year_to = year_to;
        });
    }

    /// Set the minimum rating; 0 disables the rating filter.
    pub fn set_min_rating(&self, min_rating: f32) {
        self.update_criteria(|criteria| criteria.min_rating = min_rating.max(0.0));
    }

    /// Reset sort, year bounds and minimum rating to defaults.
    pub fn reset_filters(&self) {
        self.set_criteria(FilterCriteria::default());
    }

    fn update_criteria(&self, update: impl FnOnce(&mut FilterCriteria)) {
        let pending = {
            let mut state = self.lock();
            update(&mut state.criteria);
            debug!("Filter criteria changed: {:?}", state.criteria);
            let pending = self.recompute(&mut state);
            self.publish(&mut state);
            pending
        };
        self.spawn_backfills(pending);
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn downgrade(&self) -> Weak<SessionShared> {
        Arc::downgrade(&self.shared)
    }

    fn upgrade(weak: &Weak<SessionShared>) -> Option<Self> {
        weak.upgrade().map(|shared| Self { shared })
    }

    /// Rebuild the displayed list from raw results, criteria and the cache.
    ///
    /// Returns the identifiers that need a rating backfill and are not
    /// already being fetched; they are marked as in flight.
    fn recompute(&self, state: &mut SessionState) -> Vec<String> {
        let outcome = self
            .shared
            .cache
            .with_entries(|entries| apply_filters(&state.raw_results, &state.criteria, entries));

        state.filtered = outcome.items;
        outcome
            .pending_ratings
            .into_iter()
            .filter(|id| state.backfills.insert(id.clone()))
            .collect()
    }

    fn publish(&self, state: &mut SessionState) {
        state.version += 1;
        self.shared.updates.send_replace(state.snapshot());
    }

    /// Fetch missing ratings in the background and recompute on success.
    fn spawn_backfills(&self, ids: Vec<String>) {
        for imdb_id in ids {
            debug!("Back-filling rating for {}", imdb_id);
            let cache = Arc::clone(&self.shared.cache);
            let weak = self.downgrade();
            tokio::spawn(async move {
                let fetched = cache.fetch_and_cache(&imdb_id).await.is_some();
                if let Some(session) = Self::upgrade(&weak) {
                    session.finish_backfill(&imdb_id, fetched);
                }
            });
        }
    }

    fn finish_backfill(&self, imdb_id: &str, fetched: bool) {
        let pending = {
            let mut state = self.lock();
            state.backfills.remove(imdb_id);
            if !fetched {
                // Nothing changed; a later recomputation may retry.
                return;
            }
            let pending = self.recompute(&mut state);
            self.publish(&mut state);
            pending
        };
        self.spawn_backfills(pending);
    }
}
