//! Mock reasoning provider for testing.
//!
//! # Feature Flag
//!
//! This module is only available when the `test-utils` feature is enabled:
//!
//! ```toml
//! [dev-dependencies]
//! flowsight-core = { version = "...", features = ["test-utils"] }
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use flowsight_core::mock::MockProvider;
//!
//! // Replies with a complete sample analysis.
//! let service = MockProvider::default().into_service();
//!
//! // Replies with non-JSON content.
//! let provider = MockProvider::with_content("I could not read the chart");
//!
//! // Replies with an upstream failure.
//! let provider = MockProvider::with_status(429, r#"{"error":"rate limited"}"#);
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::analysis::{AnalysisRequest, RawServiceResponse, ReasoningProvider, ReasoningService};
use crate::{Result, ServiceHealth};

/// A complete analysis used when no content is configured.
pub const SAMPLE_ANALYSIS: &str = r#"{"title":"Sample flow","description":"A start node leading to a decision with two exits.","states":[{"id":"start","label":"Start","type":"start","description":"Entry point"},{"id":"check","label":"Valid?","type":"conditional","description":"Validates input"},{"id":"done","label":"Done","type":"end","description":"Success exit"},{"id":"failed","label":"Failed","type":"end","description":"Failure exit"}],"transitions":[{"from":"start","to":"check"},{"from":"check","to":"done","condition":"yes"},{"from":"check","to":"failed","condition":"no"}],"steps":["Receive input","Validate","Finish"],"gaps":[{"node":"Valid?","issue":"No timeout on validation","suggestion":"Add a timeout branch"}],"suggestions":[{"title":"Add timeout","description":"Bound the validation step","type":"timeout"}],"codeLogic":{"typescript":"export const run = () => 'done';"},"confidence":"high"}"#;

/// Configuration for the mock provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct MockConfig {
    /// HTTP status the mock reasoning service answers with.
    #[cfg_attr(
        feature = "config",
        arg(long = "mock-status", env = "MOCK_STATUS", default_value = "200")
    )]
    #[serde(default = "default_status")]
    pub mock_status: u16,

    /// Message content for success replies, or the error body otherwise.
    #[cfg_attr(feature = "config", arg(long = "mock-content", env = "MOCK_CONTENT"))]
    #[serde(default)]
    pub mock_content: Option<String>,
}

fn default_status() -> u16 {
    200
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            mock_status: default_status(),
            mock_content: None,
        }
    }
}

impl MockConfig {
    /// Converts this configuration into a reasoning service.
    pub fn into_service(self) -> ReasoningService {
        MockProvider::new(self).into_service()
    }
}

/// Scripted reasoning provider.
///
/// Success statuses wrap the configured content in a chat-completion
/// envelope. Other statuses return the content as the raw error body.
/// Clones share the call counter and the last recorded request.
#[derive(Clone, Debug)]
pub struct MockProvider {
    config: Arc<MockConfig>,
    calls: Arc<AtomicUsize>,
    last_request: Arc<Mutex<Option<AnalysisRequest>>>,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new(MockConfig::default())
    }
}

impl MockProvider {
    /// Creates a new mock provider with the given configuration.
    pub fn new(config: MockConfig) -> Self {
        Self {
            config: Arc::new(config),
            calls: Arc::new(AtomicUsize::new(0)),
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    /// Creates a provider answering 200 with the given message content.
    pub fn with_content(content: impl Into<String>) -> Self {
        Self::new(MockConfig {
            mock_content: Some(content.into()),
            ..Default::default()
        })
    }

    /// Creates a provider answering with the given status and body.
    pub fn with_status(status: u16, body: impl Into<String>) -> Self {
        Self::new(MockConfig {
            mock_status: status,
            mock_content: Some(body.into()),
        })
    }

    /// Number of requests received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The most recent request received.
    pub fn last_request(&self) -> Option<AnalysisRequest> {
        self.last_request.lock().ok().and_then(|guard| guard.clone())
    }

    /// Converts this provider into a [`ReasoningService`].
    pub fn into_service(self) -> ReasoningService {
        ReasoningService::new(self)
    }

    fn reply(&self) -> RawServiceResponse {
        let status = self.config.mock_status;
        let content = self.config.mock_content.as_deref().unwrap_or(SAMPLE_ANALYSIS);

        if (200..300).contains(&status) {
            let envelope = json!({
                "id": "chatcmpl-mock",
                "object": "chat.completion",
                "choices": [{
                    "index": 0,
                    "message": { "role": "assistant", "content": content },
                    "finish_reason": "stop"
                }]
            });
            RawServiceResponse::new(status, envelope.to_string())
        } else {
            RawServiceResponse::new(status, content)
        }
    }
}

#[async_trait::async_trait]
impl ReasoningProvider for MockProvider {
    async fn complete(&self, request: &AnalysisRequest) -> Result<RawServiceResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(request.clone());
        }
        Ok(self.reply())
    }

    async fn health_check(&self) -> Result<ServiceHealth> {
        Ok(ServiceHealth::healthy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Outcome;

    #[tokio::test]
    async fn default_reply_is_clean_analysis() {
        let provider = MockProvider::default();
        let outcome = provider.clone().into_service().analyze("aGVsbG8=", None).await.unwrap();

        match outcome {
            Outcome::Validated { report, .. } => assert!(report.is_clean(), "{report:?}"),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(provider.calls(), 1);
        assert!(provider.last_request().is_some());
    }

    #[tokio::test]
    async fn error_status_returns_body() {
        let provider = MockProvider::with_status(503, "overloaded");
        let outcome = provider.into_service().analyze("aGVsbG8=", None).await.unwrap();

        assert_eq!(
            outcome,
            Outcome::UpstreamError {
                status: 503,
                body: "overloaded".into()
            }
        );
    }

    #[test]
    fn sample_analysis_decodes() {
        let value: serde_json::Value = serde_json::from_str(SAMPLE_ANALYSIS).unwrap();
        let analysis: crate::schema::FlowAnalysisResult = serde_json::from_value(value).unwrap();
        assert_eq!(analysis.states.len(), 4);
    }
}
