//! Reasoning service wrapper with observability.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::analysis::{
    AnalysisRequest, ImagePayload, Outcome, ReasoningProvider, TRACING_TARGET, handle_response,
};
use crate::{Result, ServiceHealth};

/// Reasoning service wrapper with structured logging.
///
/// The provider is held in an `Arc`, so the service is cheap to clone into
/// request handlers.
#[derive(Clone)]
pub struct ReasoningService {
    inner: Arc<dyn ReasoningProvider>,
}

impl ReasoningService {
    /// Creates a new service from a provider.
    pub fn new<P>(provider: P) -> Self
    where
        P: ReasoningProvider + 'static,
    {
        Self {
            inner: Arc::new(provider),
        }
    }

    /// Creates a new service from a shared provider.
    pub fn from_arc(provider: Arc<dyn ReasoningProvider>) -> Self {
        Self { inner: provider }
    }

    /// Analyzes a flowchart image.
    ///
    /// Builds the request, sends it once and classifies the response.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidInput` for an empty image (no call is made),
    /// with the provider's error on transport failure and with
    /// `Serialization` for a malformed success envelope.
    pub async fn analyze(
        &self,
        image: impl Into<ImagePayload>,
        mime_type: Option<&str>,
    ) -> Result<Outcome> {
        let request = AnalysisRequest::build(image, mime_type)?;
        self.execute(&request).await
    }

    /// Sends a prepared request and classifies the response.
    pub async fn execute(&self, request: &AnalysisRequest) -> Result<Outcome> {
        let start = Instant::now();

        tracing::debug!(
            target: TRACING_TARGET,
            request_id = %request.request_id,
            mime_type = %request.mime_type,
            "Sending analysis request"
        );

        let raw = match self.inner.complete(request).await {
            Ok(raw) => raw,
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    request_id = %request.request_id,
                    error = %error,
                    elapsed_ms = start.elapsed().as_millis(),
                    "Reasoning service call failed"
                );
                return Err(error);
            }
        };

        let upstream_status = raw.status;
        let outcome = handle_response(raw)?;

        tracing::info!(
            target: TRACING_TARGET,
            request_id = %request.request_id,
            upstream_status,
            outcome = outcome.kind_str(),
            elapsed_ms = start.elapsed().as_millis(),
            "Analysis completed"
        );

        Ok(outcome)
    }

    /// Performs a health check on the underlying provider.
    ///
    /// The elapsed time is recorded unless the provider measured it itself.
    pub async fn health_check(&self) -> Result<ServiceHealth> {
        let start = Instant::now();
        let health = self.inner.health_check().await?;

        match health.response {
            Some(_) => Ok(health),
            None => Ok(health.with_response_time(start.elapsed())),
        }
    }
}

impl fmt::Debug for ReasoningService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReasoningService").finish_non_exhaustive()
    }
}
