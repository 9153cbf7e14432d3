//! OMDb (Open Movie Database) API client.
//!
//! OMDb requires an API key for access. Every response carries a
//! `Response` flag; `"False"` means no data regardless of the HTTP status.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::{available, split_genres, DetailRecord, PlotLength, SearchSummary, NOT_AVAILABLE};
use super::{CatalogError, MovieCatalog};

/// Default OMDb endpoint.
pub const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com/";

/// OMDb API client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OmdbConfig {
    /// OMDb API key. Empty means not configured.
    #[serde(default)]
    pub api_key: String,
    /// Base URL (default: https://www.omdbapi.com/).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Request timeout in seconds. Unset keeps the transport default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl OmdbConfig {
    /// Whether an API key is present.
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

/// OMDb API client.
pub struct OmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    /// Create a new OMDb client.
    pub fn new(config: OmdbConfig) -> Result<Self, CatalogError> {
        if !config.is_configured() {
            return Err(CatalogError::NotConfigured(
                "OMDb API key is required".to_string(),
            ));
        }

        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        let base_url = config
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key,
        })
    }

    /// Send a GET with the given parameters and decode the body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        params: &[(&str, &str)],
    ) -> Result<T, CatalogError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("apikey", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if status == 401 {
            return Err(CatalogError::NotConfigured(
                "Invalid OMDb API key".to_string(),
            ));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| CatalogError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl MovieCatalog for OmdbClient {
    async fn search_movies(&self, query: &str) -> Result<Vec<SearchSummary>, CatalogError> {
        debug!("OMDb movie search: query='{}'", query);

        let response: OmdbSearchResponse = self
            .get_json(&[("s", query), ("type", "movie"), ("page", "1")])
            .await?;

        if !response.is_success() {
            return Err(CatalogError::NotFound(
                response
                    .error
                    .unwrap_or_else(|| format!("No results for '{}'", query)),
            ));
        }

        Ok(response.search.into_iter().map(Into::into).collect())
    }

    async fn get_details(
        &self,
        imdb_id: &str,
        plot: PlotLength,
    ) -> Result<DetailRecord, CatalogError> {
        debug!("OMDb get details: id={}, plot={}", imdb_id, plot.as_str());

        let response: OmdbDetailResponse = self
            .get_json(&[("i", imdb_id), ("plot", plot.as_str())])
            .await?;

        if response.response.as_deref() != Some("True") {
            return Err(CatalogError::NotFound(
                response
                    .error
                    .unwrap_or_else(|| format!("Movie ID {}", imdb_id)),
            ));
        }

        response.into_record(imdb_id)
    }
}

// ============================================================================
// OMDb API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct OmdbSearchResponse {
    #[serde(rename = "Search", default)]
    search: Vec<OmdbSearchItem>,
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
}

impl OmdbSearchResponse {
    fn is_success(&self) -> bool {
        self.response == "True"
    }
}

#[derive(Debug, Deserialize)]
struct OmdbSearchItem {
    #[serde(rename = "imdbID")]
    imdb_id: String,
    #[serde(rename = "Title", default)]
    title: String,
    #[serde(rename = "Year", default)]
    year: String,
    #[serde(rename = "Poster")]
    poster: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OmdbDetailResponse {
    #[serde(rename = "imdbID")]
    imdb_id: Option<String>,
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "Plot")]
    plot: Option<String>,
    #[serde(rename = "Genre")]
    genre: Option<String>,
    #[serde(rename = "Rated")]
    rated: Option<String>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
    #[serde(rename = "Runtime")]
    runtime: Option<String>,
    #[serde(rename = "Director")]
    director: Option<String>,
    #[serde(rename = "Actors")]
    actors: Option<String>,
    #[serde(rename = "Poster")]
    poster: Option<String>,
    #[serde(rename = "Response")]
    response: Option<String>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

// ============================================================================
// Conversions
// ============================================================================

impl From<OmdbSearchItem> for SearchSummary {
    fn from(item: OmdbSearchItem) -> Self {
        Self {
            imdb_id: item.imdb_id,
            title: item.title,
            year: item.year,
            poster_url: available(item.poster),
        }
    }
}

impl OmdbDetailResponse {
    fn into_record(self, requested_id: &str) -> Result<DetailRecord, CatalogError> {
        let title = self.title.ok_or_else(|| {
            CatalogError::ParseError(format!("Detail response for {} has no title", requested_id))
        })?;

        Ok(DetailRecord {
            imdb_id: self.imdb_id.unwrap_or_else(|| requested_id.to_string()),
            title,
            year: self.year.unwrap_or_default(),
            plot: available(self.plot),
            genres: self.genre.as_deref().map(split_genres).unwrap_or_default(),
            rated: available(self.rated),
            imdb_rating: self
                .imdb_rating
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            runtime: available(self.runtime),
            director: available(self.director),
            actors: available(self.actors),
            poster_url: available(self.poster),
        })
    }
}
