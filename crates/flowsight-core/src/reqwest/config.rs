//! Reasoning service client configuration.

use std::fmt;
use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

/// Default base URL of the OpenAI-compatible API.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default vision-capable model.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Default transport timeout: 120 seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Configuration for the reasoning service HTTP client.
///
/// The timeout is the only time limit on an analysis: nothing above the
/// transport enforces one.
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct ReqwestConfig {
    /// API key sent as a bearer token
    #[cfg_attr(feature = "config", arg(long = "api-key", env = "OPENAI_API_KEY"))]
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[cfg_attr(
        feature = "config",
        arg(
            long = "reasoning-base-url",
            env = "REASONING_BASE_URL",
            default_value = DEFAULT_BASE_URL
        )
    )]
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Vision-capable model used for analysis
    #[cfg_attr(
        feature = "config",
        arg(long = "reasoning-model", env = "REASONING_MODEL", default_value = DEFAULT_MODEL)
    )]
    #[serde(default = "default_model")]
    pub model: String,

    /// Transport timeout in seconds
    #[cfg_attr(
        feature = "config",
        arg(long = "reasoning-timeout", env = "REASONING_TIMEOUT", default_value = "120")
    )]
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent header to send with requests
    #[cfg_attr(
        feature = "config",
        arg(long = "reasoning-user-agent", env = "REASONING_USER_AGENT")
    )]
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_owned()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_owned()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ReqwestConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            user_agent: None,
        }
    }
}

impl fmt::Debug for ReqwestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReqwestConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl ReqwestConfig {
    /// Creates a configuration with the given API key and defaults elsewhere.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// Returns `true` if a non-blank API key is present.
    pub fn has_credentials(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.trim().is_empty())
    }

    /// Returns the effective timeout, using the default if zero.
    pub fn effective_timeout(&self) -> Duration {
        if self.timeout_secs == 0 {
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        } else {
            Duration::from_secs(self.timeout_secs)
        }
    }

    /// Returns the effective user agent, using the default if not set.
    pub fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("flowsight/{}", env!("CARGO_PKG_VERSION")))
    }

    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the timeout in seconds.
    #[must_use]
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ReqwestConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.effective_timeout(), Duration::from_secs(120));
        assert!(!config.has_credentials());
    }

    #[test]
    fn blank_key_is_not_a_credential() {
        assert!(!ReqwestConfig::new("  ").has_credentials());
        assert!(ReqwestConfig::new("sk-test").has_credentials());
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = ReqwestConfig::new("sk-secret");
        let debug = format!("{config:?}");

        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn zero_timeout_uses_default() {
        let config = ReqwestConfig::default().with_timeout(0);
        assert_eq!(
            config.effective_timeout(),
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        );
    }

    #[test]
    fn default_user_agent_names_project() {
        assert!(ReqwestConfig::default().effective_user_agent().starts_with("flowsight/"));
    }
}
