//! Testing utilities and a mock movie catalog.
//!
//! Lets the session, cache and server be exercised without reaching OMDb.
//!
//! # Example
//!
//! ```rust,ignore
//! use moviesearch_core::testing::{fixtures, MockCatalog};
//!
//! let catalog = MockCatalog::new();
//! catalog.set_search_results("matrix", vec![fixtures::matrix()]).await;
//! catalog.add_details(fixtures::detail("tt0133093", "The Matrix", "1999", "8.7")).await;
//! ```

mod mock_catalog;

pub use mock_catalog::{MockCatalog, RecordedCatalogQuery};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::external_catalog::{split_genres, DetailRecord, SearchSummary};

    /// A search summary with a poster URL derived from the identifier.
    pub fn summary(imdb_id: &str, title: &str, year: &str) -> SearchSummary {
        SearchSummary {
            imdb_id: imdb_id.to_string(),
            title: title.to_string(),
            year: year.to_string(),
            poster_url: Some(format!("https://img.example/{}.jpg", imdb_id)),
        }
    }

    /// The canonical example result.
    pub fn matrix() -> SearchSummary {
        summary("tt0133093", "The Matrix", "1999")
    }

    /// A detail record; `rating` is the raw catalog string (`"N/A"` for unrated).
    pub fn detail(imdb_id: &str, title: &str, year: &str, rating: &str) -> DetailRecord {
        DetailRecord {
            imdb_id: imdb_id.to_string(),
            title: title.to_string(),
            year: year.to_string(),
            plot: Some(format!("The story of {}.", title)),
            genres: split_genres("Action, Sci-Fi"),
            rated: Some("R".to_string()),
            imdb_rating: rating.to_string(),
            runtime: Some("120 min".to_string()),
            director: Some("Jane Doe".to_string()),
            actors: Some("A. Actor, B. Actor".to_string()),
            poster_url: None,
        }
    }
}
