//! Types for movie catalog records.

use serde::{Deserialize, Serialize};

/// Sentinel the catalog uses for a missing value.
pub const NOT_AVAILABLE: &str = "N/A";

/// Poster shown for list entries without an image.
pub const PLACEHOLDER_POSTER: &str = "https://via.placeholder.com/300x450?text=No+Image";

/// Poster shown in the detail view without an image.
pub const PLACEHOLDER_POSTER_LARGE: &str = "https://via.placeholder.com/500x750?text=No+Image";

/// Plot length hint for detail lookups.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PlotLength {
    Short,
    Full,
}

impl PlotLength {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlotLength::Short => "short",
            PlotLength::Full => "full",
        }
    }
}

/// A lightweight search result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchSummary {
    /// Catalog identifier (IMDb id, e.g. `tt0133093`).
    pub imdb_id: String,
    /// Movie title.
    pub title: String,
    /// Release year as reported upstream. May be a range or contain noise.
    pub year: String,
    /// Poster URL, `None` when upstream has no image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
}

impl SearchSummary {
    /// Poster URL, falling back to the list placeholder.
    pub fn poster_or_placeholder(&self) -> &str {
        self.poster_url.as_deref().unwrap_or(PLACEHOLDER_POSTER)
    }
}

/// Full metadata for one movie.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetailRecord {
    /// Catalog identifier.
    pub imdb_id: String,
    /// Movie title.
    pub title: String,
    /// Release year as reported upstream.
    pub year: String,
    /// Plot text, short or full depending on the lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plot: Option<String>,
    /// Genre tags.
    #[serde(default)]
    pub genres: Vec<String>,
    /// Content rating (e.g. "PG-13").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rated: Option<String>,
    /// IMDb rating exactly as reported, possibly `N/A`.
    pub imdb_rating: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    /// Cast, comma separated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actors: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
}

impl DetailRecord {
    /// Numeric rating, `None` when upstream reports `N/A` or garbage.
    pub fn rating(&self) -> Option<f32> {
        if self.imdb_rating == NOT_AVAILABLE {
            return None;
        }
        self.imdb_rating.trim().parse().ok()
    }

    /// Link to the movie's IMDb page.
    pub fn imdb_url(&self) -> String {
        format!("https://www.imdb.com/title/{}/", self.imdb_id)
    }

    /// Poster URL, falling back to the detail placeholder.
    pub fn poster_or_placeholder(&self) -> &str {
        self.poster_url
            .as_deref()
            .unwrap_or(PLACEHOLDER_POSTER_LARGE)
    }
}

/// Split the catalog's comma-delimited genre string into tags.
pub fn split_genres(genre: &str) -> Vec<String> {
    genre
        .split(',')
        .map(str::trim)
        .filter(|g| !g.is_empty() && *g != NOT_AVAILABLE)
        .map(str::to_string)
        .collect()
}

/// Map the catalog's `N/A` sentinel (and empty strings) to `None`.
pub(crate) fn available(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty() && v != NOT_AVAILABLE)
}
