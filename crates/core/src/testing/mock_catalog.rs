//! Mock movie catalog for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::external_catalog::{
    CatalogError, DetailRecord, MovieCatalog, PlotLength, SearchSummary,
};

/// A recorded catalog query for test assertions.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCatalogQuery {
    Search { query: String },
    Details { imdb_id: String, plot: PlotLength },
}

/// Mock implementation of the MovieCatalog trait.
///
/// Provides controllable behavior for testing:
/// - Canned search results per query and detail records per identifier
/// - Artificial latency, to exercise debounce and cancellation
/// - Query recording and one-shot error injection
///
/// Every call is recorded before its delay and error are applied, so a
/// failed or cancelled call still counts.
#[derive(Debug, Default)]
pub struct MockCatalog {
    /// Search results keyed by exact query text.
    search_results: Arc<RwLock<HashMap<String, Vec<SearchSummary>>>>,
    /// Detail records by IMDb identifier.
    details: Arc<RwLock<HashMap<String, DetailRecord>>>,
    /// Latency per search query.
    query_delays: Arc<RwLock<HashMap<String, Duration>>>,
    /// Latency for every detail lookup.
    detail_delay: Arc<RwLock<Option<Duration>>>,
    /// Recorded queries.
    queries: Arc<RwLock<Vec<RecordedCatalogQuery>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<CatalogError>>>,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Results returned for an exact (trimmed) query.
    pub async fn set_search_results(&self, query: &str, results: Vec<SearchSummary>) {
        self.search_results
            .write()
            .await
            .insert(query.to_string(), results);
    }

    /// Add a detail record, served for both plot lengths.
    pub async fn add_details(&self, record: DetailRecord) {
        self.details
            .write()
            .await
            .insert(record.imdb_id.clone(), record);
    }

    /// Delay responses to `query` by `delay`.
    pub async fn set_query_delay(&self, query: &str, delay: Duration) {
        self.query_delays
            .write()
            .await
            .insert(query.to_string(), delay);
    }

    /// Delay every detail lookup by `delay`.
    pub async fn set_detail_delay(&self, delay: Duration) {
        *self.detail_delay.write().await = Some(delay);
    }

    /// Get all recorded queries.
    pub async fn recorded_queries(&self) -> Vec<RecordedCatalogQuery> {
        self.queries.read().await.clone()
    }

    /// Clear recorded queries.
    pub async fn clear_recorded(&self) {
        self.queries.write().await.clear();
    }

    /// Number of calls of either kind.
    pub async fn query_count(&self) -> usize {
        self.queries.read().await.len()
    }

    /// Search query texts, in call order.
    pub async fn search_queries(&self) -> Vec<String> {
        self.queries
            .read()
            .await
            .iter()
            .filter_map(|q| match q {
                RecordedCatalogQuery::Search { query } => Some(query.clone()),
                _ => None,
            })
            .collect()
    }

    /// Detail lookups, in call order.
    pub async fn detail_lookups(&self) -> Vec<(String, PlotLength)> {
        self.queries
            .read()
            .await
            .iter()
            .filter_map(|q| match q {
                RecordedCatalogQuery::Details { imdb_id, plot } => Some((imdb_id.clone(), *plot)),
                _ => None,
            })
            .collect()
    }

    /// Number of detail lookups for one identifier.
    pub async fn detail_count(&self, imdb_id: &str) -> usize {
        self.detail_lookups()
            .await
            .iter()
            .filter(|(id, _)| id == imdb_id)
            .count()
    }

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: CatalogError) {
        *self.next_error.write().await = Some(error);
    }

    /// Clear any pending error.
    pub async fn clear_next_error(&self) {
        *self.next_error.write().await = None;
    }

    async fn take_error(&self) -> Option<CatalogError> {
        self.next_error.write().await.take()
    }

    async fn record(&self, query: RecordedCatalogQuery) {
        self.queries.write().await.push(query);
    }
}

#[async_trait]
impl MovieCatalog for MockCatalog {
    async fn search_movies(&self, query: &str) -> Result<Vec<SearchSummary>, CatalogError> {
        self.record(RecordedCatalogQuery::Search {
            query: query.to_string(),
        })
        .await;

        let delay = self.query_delays.read().await.get(query).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.search_results
            .read()
            .await
            .get(query)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound("Movie not found!".to_string()))
    }

    async fn get_details(
        &self,
        imdb_id: &str,
        plot: PlotLength,
    ) -> Result<DetailRecord, CatalogError> {
        self.record(RecordedCatalogQuery::Details {
            imdb_id: imdb_id.to_string(),
            plot,
        })
        .await;

        let delay = *self.detail_delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.details
            .read()
            .await
            .get(imdb_id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound("Incorrect IMDb ID.".to_string()))
    }
}
