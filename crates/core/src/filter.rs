//! Year/rating filtering and title sorting of search results.
//!
//! [`apply_filters`] is a pure function of (results, criteria, cache
//! snapshot). Items whose rating is not cached yet are kept and reported in
//! [`FilterOutcome::pending_ratings`]; the caller decides whether to fetch
//! them and recompute.

use std::cmp::Ordering;

use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::detail_cache::{CachedRating, RatingLookup};
use crate::external_catalog::SearchSummary;

static YEAR_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}").unwrap());

/// Title sort order.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    #[serde(rename = "title-asc")]
    TitleAsc,
    #[serde(rename = "title-desc")]
    TitleDesc,
}

/// User-selected filters.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FilterCriteria {
    #[serde(default)]
    pub sort: SortOrder,
    /// Inclusive lower year bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_from: Option<i32>,
    /// Inclusive upper year bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_to: Option<i32>,
    /// Minimum IMDb rating. 0 disables the rating filter.
    #[serde(default)]
    pub min_rating: f32,
}

impl FilterCriteria {
    pub fn has_year_bounds(&self) -> bool {
        self.year_from.is_some() || self.year_to.is_some()
    }

    pub fn has_rating_filter(&self) -> bool {
        self.min_rating > 0.0
    }

    fn year_in_range(&self, year: i32) -> bool {
        self.year_from.map_or(true, |from| year >= from)
            && self.year_to.map_or(true, |to| year <= to)
    }
}

/// A displayed list entry.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ListedMovie {
    #[serde(flatten)]
    pub summary: SearchSummary,
    /// Poster to display; the placeholder when upstream has no image.
    pub poster: String,
    /// Cached rating, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
}

/// Result of one filter pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOutcome {
    pub items: Vec<ListedMovie>,
    /// Identifiers kept optimistically because their rating is not cached.
    pub pending_ratings: Vec<String>,
}

/// Extract the first run of four digits from a free-form year field.
///
/// `"1999"` → 1999, `"2019–2021"` → 2019, `"N/A"` → None.
pub fn parse_year(year: &str) -> Option<i32> {
    YEAR_REGEX
        .find(year)
        .and_then(|m| m.as_str().parse().ok())
}

/// Filter and sort `results` against `criteria`.
pub fn apply_filters(
    results: &[SearchSummary],
    criteria: &FilterCriteria,
    ratings: &impl RatingLookup,
) -> FilterOutcome {
    let mut pending_ratings = Vec::new();
    let mut items = Vec::with_capacity(results.len());

    for summary in results {
        if criteria.has_year_bounds() {
            match parse_year(&summary.year) {
                Some(year) if criteria.year_in_range(year) => {}
                _ => continue,
            }
        }

        let cached = ratings.cached_rating(&summary.imdb_id);

        if criteria.has_rating_filter() {
            match cached {
                CachedRating::Known(rating) if rating < criteria.min_rating => continue,
                CachedRating::Missing => {
                    if !pending_ratings.contains(&summary.imdb_id) {
                        pending_ratings.push(summary.imdb_id.clone());
                    }
                }
                _ => {}
            }
        }

        items.push(ListedMovie {
            summary: summary.clone(),
            poster: summary.poster_or_placeholder().to_string(),
            rating: match cached {
                CachedRating::Known(rating) => Some(rating),
                _ => None,
            },
        });
    }

    sort_by_title(&mut items, criteria.sort);

    FilterOutcome {
        items,
        pending_ratings,
    }
}

/// Stable, case-insensitive title sort.
fn sort_by_title(items: &mut [ListedMovie], order: SortOrder) {
    items.sort_by(|a, b| {
        let ordering = compare_titles(a, b);
        match order {
            SortOrder::TitleAsc => ordering,
            SortOrder::TitleDesc => ordering.reverse(),
        }
    });
}

fn compare_titles(a: &ListedMovie, b: &ListedMovie) -> Ordering {
    a.summary
        .title
        .to_lowercase()
        .cmp(&b.summary.title.to_lowercase())
}
