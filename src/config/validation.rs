//! Configuration validation.
//!
//! Semantic checks on top of serde's syntactic ones. Pure function over the
//! config, returning every violation rather than the first.

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid bind address '{0}'")]
    InvalidBindAddress(String),

    #[error("invalid upstream origin '{0}': {1}")]
    InvalidUpstreamOrigin(String, String),

    #[error("upstream origin '{0}' must use http or https")]
    UnsupportedUpstreamScheme(String),

    #[error("cache name must not be empty")]
    EmptyCacheName,

    #[error("max body size must be greater than zero")]
    ZeroMaxBodySize,
}

/// Validate a parsed configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config
        .listener
        .bind_address
        .parse::<std::net::SocketAddr>()
        .is_err()
    {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    match Url::parse(&config.upstream.origin) {
        Ok(url) if url.scheme() != "http" && url.scheme() != "https" => {
            errors.push(ValidationError::UnsupportedUpstreamScheme(
                config.upstream.origin.clone(),
            ));
        }
        Ok(_) => {}
        Err(e) => {
            errors.push(ValidationError::InvalidUpstreamOrigin(
                config.upstream.origin.clone(),
                e.to_string(),
            ));
        }
    }

    if config.cache.name.trim().is_empty() {
        errors.push(ValidationError::EmptyCacheName);
    }

    if config.upstream.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroMaxBodySize);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&GatewayConfig::default()).is_ok());
    }

    #[test]
    fn test_all_violations_are_collected() {
        let mut config = GatewayConfig::default();
        config.listener.bind_address = "nonsense".to_string();
        config.upstream.origin = "ftp://files.example.com".to_string();
        config.cache.name = "  ".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
