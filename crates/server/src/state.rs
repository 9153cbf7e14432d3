use moviesearch_core::{Config, SanitizedConfig, SearchSession};

/// Shared application state
pub struct AppState {
    config: Config,
    /// `None` when no OMDb API key is configured.
    session: Option<SearchSession>,
}

impl AppState {
    pub fn new(config: Config, session: Option<SearchSession>) -> Self {
        Self { config, session }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn session(&self) -> Option<&SearchSession> {
        self.session.as_ref()
    }

    pub fn is_configured(&self) -> bool {
        self.session.is_some()
    }
}
