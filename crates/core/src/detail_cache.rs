//! Session-scoped cache of short-plot detail records.
//!
//! Entries are never evicted; the cache lives exactly as long as the search
//! session that owns it. The cache does not de-duplicate concurrent fetches
//! for the same identifier: two overlapping `fetch_and_cache` calls may both
//! reach the network, and the first successful write is kept.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use tracing::debug;

use crate::external_catalog::{CatalogClient, DetailRecord, PlotLength};
use crate::metrics::DETAIL_CACHE_LOOKUPS;

/// What the cache knows about an identifier's rating.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CachedRating {
    /// A record is cached and carries a numeric rating.
    Known(f32),
    /// A record is cached but the catalog has no rating for it.
    Unrated,
    /// No record cached yet.
    Missing,
}

/// Read access to cached ratings, used by the filter engine.
pub trait RatingLookup {
    fn cached_rating(&self, imdb_id: &str) -> CachedRating;
}

impl RatingLookup for HashMap<String, DetailRecord> {
    fn cached_rating(&self, imdb_id: &str) -> CachedRating {
        match self.get(imdb_id) {
            Some(record) => record
                .rating()
                .map(CachedRating::Known)
                .unwrap_or(CachedRating::Unrated),
            None => CachedRating::Missing,
        }
    }
}

/// Identifier → detail record cache backed by the catalog client.
pub struct DetailCache {
    catalog: CatalogClient,
    entries: RwLock<HashMap<String, DetailRecord>>,
}

impl DetailCache {
    pub fn new(catalog: CatalogClient) -> Self {
        Self {
            catalog,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Synchronous lookup. Never touches the network.
    pub fn get(&self, imdb_id: &str) -> Option<DetailRecord> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(imdb_id).cloned()
    }

    /// Return the cached record, or fetch the short-plot record and cache it.
    ///
    /// Failures return `None` and store nothing, so a later call may retry.
    pub async fn fetch_and_cache(&self, imdb_id: &str) -> Option<DetailRecord> {
        if imdb_id.trim().is_empty() {
            return None;
        }

        if let Some(record) = self.get(imdb_id) {
            DETAIL_CACHE_LOOKUPS.with_label_values(&["hit"]).inc();
            return Some(record);
        }
        DETAIL_CACHE_LOOKUPS.with_label_values(&["miss"]).inc();

        let record = self
            .catalog
            .get_details(imdb_id, PlotLength::Short)
            .await?;

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let stored = entries.entry(imdb_id.to_string()).or_insert(record);
        debug!(
            "Cached details for {} (rating {})",
            imdb_id, stored.imdb_rating
        );
        Some(stored.clone())
    }

    /// Number of cached records.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run `f` against the current entries while holding the read lock.
    pub fn with_entries<R>(&self, f: impl FnOnce(&HashMap<String, DetailRecord>) -> R) -> R {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        f(&entries)
    }
}

impl RatingLookup for DetailCache {
    fn cached_rating(&self, imdb_id: &str) -> CachedRating {
        self.with_entries(|entries| entries.cached_rating(imdb_id))
    }
}
