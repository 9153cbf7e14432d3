//! External movie catalog integration (OMDb).
//!
//! [`MovieCatalog`] is the raw backend seam: it reports every failure as a
//! [`CatalogError`]. [`CatalogClient`] sits on top of it and implements the
//! degrade-to-no-data contract the search session relies on: failures are
//! logged and counted, callers only ever see an empty list or `None`.

mod omdb;
mod types;

pub use omdb::{OmdbClient, OmdbConfig};
pub use types::*;

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

use crate::metrics::{CATALOG_REQUESTS, CATALOG_REQUEST_DURATION};

/// Default minimum query length, counted after trimming.
pub const DEFAULT_MIN_QUERY_LEN: usize = 2;

/// Errors that can occur when talking to the movie catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The catalog reported no match (`Response: "False"`).
    #[error("Not found: {0}")]
    NotFound(String),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not configured (missing or rejected API key).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

impl CatalogError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            CatalogError::HttpError(_) => "http_error",
            CatalogError::NotFound(_) => "not_found",
            CatalogError::ApiError { .. } => "api_error",
            CatalogError::ParseError(_) => "parse_error",
            CatalogError::NotConfigured(_) => "not_configured",
        }
    }
}

/// Backend for movie catalog lookups.
///
/// Implemented by [`OmdbClient`] and by the test mock.
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Search movies by title (first page only).
    async fn search_movies(&self, query: &str) -> Result<Vec<SearchSummary>, CatalogError>;

    /// Get a single movie by catalog identifier.
    async fn get_details(
        &self,
        imdb_id: &str,
        plot: PlotLength,
    ) -> Result<DetailRecord, CatalogError>;
}

/// Check whether a query is long enough to be sent upstream.
pub fn is_searchable(query: &str, min_len: usize) -> bool {
    query.trim().chars().count() >= min_len
}

/// Infallible catalog client used by the search session.
#[derive(Clone)]
pub struct CatalogClient {
    backend: Arc<dyn MovieCatalog>,
    min_query_len: usize,
}

impl CatalogClient {
    pub fn new(backend: Arc<dyn MovieCatalog>) -> Self {
        Self {
            backend,
            min_query_len: DEFAULT_MIN_QUERY_LEN,
        }
    }

    /// Override the minimum query length.
    pub fn with_min_query_len(mut self, min_query_len: usize) -> Self {
        self.min_query_len = min_query_len;
        self
    }

    pub fn min_query_len(&self) -> usize {
        self.min_query_len
    }

    /// Whether `query` would reach the network.
    pub fn is_searchable(&self, query: &str) -> bool {
        is_searchable(query, self.min_query_len)
    }

    /// Search movies by title.
    ///
    /// Short queries return an empty list without a network call. Failures
    /// are logged and also return an empty list.
    pub async fn search(&self, query: &str) -> Vec<SearchSummary> {
        if !self.is_searchable(query) {
            debug!("Skipping search for short query '{}'", query);
            CATALOG_REQUESTS.with_label_values(&["search", "skipped"]).inc();
            return Vec::new();
        }

        let query = query.trim();
        let start = Instant::now();
        let result = self.backend.search_movies(query).await;
        CATALOG_REQUEST_DURATION
            .with_label_values(&["search"])
            .observe(start.elapsed().as_secs_f64());

        match result {
            Ok(results) => {
                debug!("Search '{}' returned {} results", query, results.len());
                CATALOG_REQUESTS.with_label_values(&["search", "ok"]).inc();
                results
            }
            Err(e) => {
                warn!("Search '{}' failed: {}", query, e);
                CATALOG_REQUESTS.with_label_values(&["search", e.kind()]).inc();
                Vec::new()
            }
        }
    }

    /// Look up one movie. Any failure yields `None`; there is no retry.
    pub async fn get_details(&self, imdb_id: &str, plot: PlotLength) -> Option<DetailRecord> {
        if imdb_id.trim().is_empty() {
            return None;
        }

        let start = Instant::now();
        let result = self.backend.get_details(imdb_id, plot).await;
        CATALOG_REQUEST_DURATION
            .with_label_values(&["details"])
            .observe(start.elapsed().as_secs_f64());

        match result {
            Ok(record) => {
                CATALOG_REQUESTS.with_label_values(&["details", "ok"]).inc();
                Some(record)
            }
            Err(e) => {
                warn!("Detail lookup for {} ({}) failed: {}", imdb_id, plot.as_str(), e);
                CATALOG_REQUESTS
                    .with_label_values(&["details", e.kind()])
                    .inc();
                None
            }
        }
    }
}
