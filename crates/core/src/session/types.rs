use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::external_catalog::{DetailRecord, DEFAULT_MIN_QUERY_LEN};
use crate::filter::{FilterCriteria, ListedMovie};

/// Search session configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SessionConfig {
    /// Quiet period before a keystroke turns into a search, in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Minimum trimmed query length that reaches the catalog
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,
}

impl SessionConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_query_len: default_min_query_len(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    350
}

fn default_min_query_len() -> usize {
    DEFAULT_MIN_QUERY_LEN
}

/// How the detail modal was dismissed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ModalDismissal {
    /// Escape key.
    Escape,
    /// Click outside the modal content.
    Backdrop,
    /// Explicit close control.
    CloseButton,
}

impl ModalDismissal {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModalDismissal::Escape => "escape",
            ModalDismissal::Backdrop => "backdrop",
            ModalDismissal::CloseButton => "close_button",
        }
    }
}

/// Everything the presentation layer renders, as of one state change.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct SessionSnapshot {
    /// Increments on every published change.
    pub version: u64,
    /// Raw query text as typed.
    pub query: String,
    /// Filtered and sorted results.
    pub results: Vec<ListedMovie>,
    /// Number of raw results before filtering.
    pub total_results: usize,
    /// A search or detail lookup is running.
    pub loading: bool,
    pub criteria: FilterCriteria,
    /// Record shown in the detail modal; `None` when closed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modal: Option<ModalView>,
}

/// The detail modal's content: the full-plot record plus display links.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ModalView {
    #[serde(flatten)]
    pub record: DetailRecord,
    /// Poster to display; the large placeholder when upstream has no image.
    pub poster: String,
    pub imdb_url: String,
}

impl From<&DetailRecord> for ModalView {
    fn from(record: &DetailRecord) -> Self {
        Self {
            poster: record.poster_or_placeholder().to_string(),
            imdb_url: record.imdb_url(),
            record: record.clone(),
        }
    }
}

impl SessionSnapshot {
    pub fn modal_open(&self) -> bool {
        self.modal.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external_catalog::{PLACEHOLDER_POSTER, PLACEHOLDER_POSTER_LARGE};
    use crate::testing::fixtures;

    #[test]
    fn test_snapshot_json_carries_posters_and_imdb_link() {
        let mut summary = fixtures::summary("tt1", "No Poster", "2000");
        summary.poster_url = None;
        let snapshot = SessionSnapshot {
            version: 1,
            results: vec![ListedMovie {
                poster: summary.poster_or_placeholder().to_string(),
                summary,
                rating: None,
            }],
            total_results: 1,
            modal: Some(ModalView::from(&fixtures::detail(
                "tt1",
                "No Poster",
                "2000",
                "N/A",
            ))),
            ..Default::default()
        };

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["results"][0]["poster"], PLACEHOLDER_POSTER);
        assert!(json["results"][0].get("poster_url").is_none());
        assert_eq!(json["modal"]["poster"], PLACEHOLDER_POSTER_LARGE);
        assert_eq!(json["modal"]["imdb_url"], "https://www.imdb.com/title/tt1/");
        assert_eq!(json["modal"]["title"], "No Poster");
    }

    #[test]
    fn test_modal_view_keeps_upstream_poster() {
        let mut record = fixtures::detail("tt2", "Poster", "2001", "7.1");
        record.poster_url = Some("https://img.example/tt2.jpg".to_string());

        let view = ModalView::from(&record);
        assert_eq!(view.poster, "https://img.example/tt2.jpg");
        assert_eq!(view.record, record);
    }
}
