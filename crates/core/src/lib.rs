pub mod config;
pub mod detail_cache;
pub mod external_catalog;
pub mod filter;
pub mod metrics;
pub mod session;
pub mod testing;

pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, Config,
    ConfigError, SanitizedConfig, ServerConfig,
};
pub use detail_cache::{CachedRating, DetailCache, RatingLookup};
pub use external_catalog::{
    CatalogClient, CatalogError, DetailRecord, MovieCatalog, OmdbClient, OmdbConfig, PlotLength,
    SearchSummary,
};
pub use filter::{apply_filters, parse_year, FilterCriteria, FilterOutcome, ListedMovie, SortOrder};
pub use session::{ModalDismissal, ModalView, SearchSession, SessionConfig, SessionSnapshot};
