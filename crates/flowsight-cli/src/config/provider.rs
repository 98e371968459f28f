//! Reasoning service provider configuration.

use anyhow::{Context, Result as AnyhowResult, anyhow};
use flowsight_core::analysis::ReasoningService;
use flowsight_core::reqwest::{ReqwestConfig, ReqwestProvider};

use super::Cli;
use crate::TRACING_TARGET_CONFIG;

/// Checks the reasoning client settings without contacting the service.
///
/// # Errors
///
/// Returns an error if the timeout is outside 1-600 seconds or the base URL
/// is not an http(s) URL.
pub fn validate_reasoning(config: &ReqwestConfig) -> AnyhowResult<()> {
    if config.timeout_secs == 0 || config.timeout_secs > 600 {
        return Err(anyhow!(
            "Reasoning timeout {} seconds is invalid. Must be between 1 and 600 seconds.",
            config.timeout_secs
        ));
    }

    let base_url = config.base_url.to_ascii_lowercase();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(anyhow!(
            "Reasoning base URL '{}' must start with http:// or https://",
            config.base_url
        ));
    }

    Ok(())
}

/// Creates the reasoning service from CLI configuration.
///
/// Returns `None` when no API key is configured: the server still starts
/// and answers analysis requests with an error.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be initialized.
pub fn create_reasoning_service(cli: &Cli) -> AnyhowResult<Option<ReasoningService>> {
    #[cfg(feature = "mock")]
    {
        tracing::warn!(
            target: TRACING_TARGET_CONFIG,
            status = cli.mock.mock_status,
            "Using mock reasoning service"
        );
        return Ok(Some(cli.mock.clone().into_service()));
    }

    #[cfg(not(feature = "mock"))]
    create_reqwest_service(&cli.reasoning)
}

#[cfg_attr(feature = "mock", allow(dead_code))]
fn create_reqwest_service(config: &ReqwestConfig) -> AnyhowResult<Option<ReasoningService>> {
    if !config.has_credentials() {
        tracing::warn!(
            target: TRACING_TARGET_CONFIG,
            "OPENAI_API_KEY is not set; analysis requests will fail until it is configured"
        );
        return Ok(None);
    }

    let provider =
        ReqwestProvider::new(config.clone()).context("failed to create reasoning client")?;

    tracing::info!(
        target: TRACING_TARGET_CONFIG,
        endpoint = %provider.endpoint_url(),
        model = %config.model,
        "Reasoning service configured"
    );

    Ok(Some(provider.into_service()))
}
