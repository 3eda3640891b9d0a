use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Chains may hold at least one seat
/// - Exclusions live for a non-zero time
/// - A locale is set
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.selection.max_chain_size == 0 {
        return Err(ConfigError::ValidationError(
            "selection.max_chain_size cannot be 0".to_string(),
        ));
    }

    if config.selection.locale.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "selection.locale cannot be empty".to_string(),
        ));
    }

    if config.exclusion.ttl_secs == 0 {
        return Err(ConfigError::ValidationError(
            "exclusion.ttl_secs cannot be 0".to_string(),
        ));
    }

    Ok(())
}
