//! Middleware configuration for the HTTP server.

use anyhow::{Result as AnyhowResult, anyhow};
use clap::Args;
use flowsight_server::middleware::{CorsConfig, RecoveryConfig};
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

/// Middleware configuration combining CORS and recovery settings.
#[derive(Debug, Clone, Default, Args, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// CORS preflight caching.
    #[clap(flatten)]
    pub cors: CorsConfig,

    /// Panic recovery and optional request timeout.
    #[clap(flatten)]
    pub recovery: RecoveryConfig,
}

impl MiddlewareConfig {
    /// Validates the request timeout, when one is set.
    pub fn validate(&self) -> AnyhowResult<()> {
        if let Some(timeout) = self.recovery.request_timeout
            && !(1..=300).contains(&timeout)
        {
            return Err(anyhow!(
                "Request timeout {timeout} seconds is invalid. Must be between 1 and 300 seconds."
            ));
        }

        Ok(())
    }

    /// Logs middleware configuration at info level.
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            cors_max_age_secs = self.cors.max_age_seconds,
            request_timeout_secs = ?self.recovery.request_timeout,
            "Middleware configuration"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_timeout_is_optional() {
        assert!(MiddlewareConfig::default().validate().is_ok());

        let mut config = MiddlewareConfig::default();
        config.recovery = RecoveryConfig::with_timeout_secs(0);
        assert!(config.validate().is_err());

        config.recovery = RecoveryConfig::with_timeout_secs(301);
        assert!(config.validate().is_err());

        config.recovery = RecoveryConfig::with_timeout_secs(120);
        assert!(config.validate().is_ok());
    }
}
