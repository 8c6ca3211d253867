//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0) and endpoint shapes
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before the config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::AppConfig;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid bind address '{0}'")]
    BindAddress(String),

    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),

    #[error("no broker bootstrap servers configured")]
    NoBootstrapServers,

    #[error("empty broker bootstrap server entry")]
    EmptyBootstrapServer,

    #[error("invalid compute-master URL '{0}'")]
    MasterUrl(String),

    #[error("probe timeout must be greater than zero")]
    ZeroProbeTimeout,

    #[error("tick interval must be greater than zero")]
    ZeroTickInterval,
}

pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if config.broker.bootstrap_servers.is_empty() {
        errors.push(ValidationError::NoBootstrapServers);
    } else if config.broker.bootstrap_servers.iter().any(String::is_empty) {
        errors.push(ValidationError::EmptyBootstrapServer);
    }

    if Url::parse(&config.compute_master.url).is_err() {
        errors.push(ValidationError::MasterUrl(config.compute_master.url.clone()));
    }

    if config.health.probe_timeout_secs == 0 {
        errors.push(ValidationError::ZeroProbeTimeout);
    }
    if config.health.tick_interval_secs == 0 {
        errors.push(ValidationError::ZeroTickInterval);
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
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = AppConfig::default();
        config.listener.bind_address = "not-an-address".to_string();
        config.broker.bootstrap_servers.clear();
        config.health.probe_timeout_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_rejects_bad_master_url() {
        let mut config = AppConfig::default();
        config.compute_master.url = "not a url".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors[0], ValidationError::MasterUrl(_)));
    }
}
