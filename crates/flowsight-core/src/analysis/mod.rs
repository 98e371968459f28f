//! Flowchart analysis against an external reasoning service.
//!
//! An analysis is a single hop: [`AnalysisRequest::build`] packages the
//! image with the schema instructions, a [`ReasoningProvider`] sends it, and
//! [`handle_response`] classifies what comes back into an [`Outcome`].
//! Nothing is retried.

mod request;
mod response;
mod service;

use async_trait::async_trait;

pub use crate::analysis::request::{
    AnalysisRequest, ChatMessage, ContentPart, DEFAULT_MIME_TYPE, ImagePayload, ImageUrl,
    MAX_OUTPUT_TOKENS, ResponseFormat, TEMPERATURE,
};
pub use crate::analysis::response::{
    Outcome, RawServiceResponse, UNPARSEABLE_WARNING, handle_response,
};
pub use crate::analysis::service::ReasoningService;
use crate::{Result, ServiceHealth};

/// Tracing target for analysis operations.
pub const TRACING_TARGET: &str = "flowsight_core::analysis";

/// Transport to a reasoning service.
///
/// Implementations send the request once and return the status and body
/// untouched. Interpreting the body is left to [`handle_response`].
#[async_trait]
pub trait ReasoningProvider: Send + Sync {
    /// Sends the request and returns the raw response.
    ///
    /// Errors are reserved for transport failures. A non-success status is a
    /// successful call.
    async fn complete(&self, request: &AnalysisRequest) -> Result<RawServiceResponse>;

    /// Reports whether the provider is able to serve requests.
    async fn health_check(&self) -> Result<ServiceHealth>;
}
