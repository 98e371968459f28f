//! Reqwest-based provider for OpenAI-compatible chat completion endpoints.

use std::sync::Arc;

use ::reqwest::Client;
use ::reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use url::Url;

use super::{Error, ReqwestConfig, TRACING_TARGET};
use crate::analysis::{AnalysisRequest, RawServiceResponse, ReasoningProvider, ReasoningService};
use crate::{Result, ServiceHealth};

struct ReqwestProviderInner {
    http: Client,
    endpoint: Url,
    api_key: String,
    config: ReqwestConfig,
}

/// Sends analysis requests to `{base_url}/chat/completions`.
///
/// The response status and body are returned verbatim. Each request is sent
/// exactly once.
#[derive(Clone)]
pub struct ReqwestProvider {
    inner: Arc<ReqwestProviderInner>,
}

impl std::fmt::Debug for ReqwestProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestProvider")
            .field("endpoint", &self.inner.endpoint.as_str())
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    #[serde(flatten)]
    request: &'a AnalysisRequest,
}

impl ReqwestProvider {
    /// Creates a new provider.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error when the API key is missing or the
    /// base URL is not an http(s) URL.
    pub fn new(config: ReqwestConfig) -> Result<Self> {
        let api_key = match config.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => key.to_owned(),
            _ => {
                return Err(crate::Error::configuration()
                    .with_message("Reasoning service API key is not configured"));
            }
        };

        let endpoint = Self::endpoint(&config.base_url)?;
        let timeout = config.effective_timeout();

        tracing::debug!(
            target: TRACING_TARGET,
            endpoint = %endpoint,
            model = %config.model,
            timeout_ms = timeout.as_millis(),
            "Creating reqwest provider"
        );

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(config.effective_user_agent())
            .build()
            .map_err(Error::from)?;

        Ok(Self {
            inner: Arc::new(ReqwestProviderInner {
                http,
                endpoint,
                api_key,
                config,
            }),
        })
    }

    /// Resolves the chat completions endpoint from a base URL.
    fn endpoint(base_url: &str) -> Result<Url> {
        let base = Url::parse(base_url).map_err(Error::from)?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(crate::Error::configuration()
                .with_message(format!("Unsupported base URL scheme: {}", base.scheme())));
        }

        let endpoint = format!("{}/chat/completions", base.as_str().trim_end_matches('/'));
        Ok(Url::parse(&endpoint).map_err(Error::from)?)
    }

    /// Gets the provider configuration.
    pub fn config(&self) -> &ReqwestConfig {
        &self.inner.config
    }

    /// Gets the resolved endpoint.
    pub fn endpoint_url(&self) -> &Url {
        &self.inner.endpoint
    }

    /// Converts this provider into a [`ReasoningService`].
    pub fn into_service(self) -> ReasoningService {
        ReasoningService::new(self)
    }
}

#[async_trait::async_trait]
impl ReasoningProvider for ReqwestProvider {
    async fn complete(&self, request: &AnalysisRequest) -> Result<RawServiceResponse> {
        let body = ChatCompletionBody {
            model: &self.inner.config.model,
            request,
        };
        let payload = serde_json::to_vec(&body).map_err(Error::from)?;

        tracing::debug!(
            target: TRACING_TARGET,
            request_id = %request.request_id,
            endpoint = %self.inner.endpoint,
            payload_size = payload.len(),
            "Posting chat completion"
        );

        let response = self
            .inner
            .http
            .post(self.inner.endpoint.clone())
            .bearer_auth(&self.inner.api_key)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(Error::from)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(Error::from)?;

        tracing::debug!(
            target: TRACING_TARGET,
            request_id = %request.request_id,
            status,
            body_len = body.len(),
            "Chat completion received"
        );

        Ok(RawServiceResponse::new(status, body))
    }

    async fn health_check(&self) -> Result<ServiceHealth> {
        // Credentials were checked at construction and probing would spend quota.
        Ok(ServiceHealth::healthy())
    }
}
