use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Debounce period and minimum query length are not 0
///
/// A missing OMDb key is not an error; the server starts unconfigured.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.session.debounce_ms == 0 {
        return Err(ConfigError::ValidationError(
            "session.debounce_ms cannot be 0".to_string(),
        ));
    }

    if config.session.min_query_len == 0 {
        return Err(ConfigError::ValidationError(
            "session.min_query_len cannot be 0".to_string(),
        ));
    }

    if let Some(base_url) = &config.omdb.base_url {
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::ValidationError(format!(
                "omdb.base_url must be an http(s) URL, got '{}'",
                base_url
            )));
        }
    }

    Ok(())
}
