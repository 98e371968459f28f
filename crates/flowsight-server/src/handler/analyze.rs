//! Flowchart analysis endpoint.

use axum::Router;
use axum::extract::State;
use axum::routing::post;
use flowsight_core::analysis::{DEFAULT_MIME_TYPE, ReasoningService};

use crate::extract::Json;
use crate::handler::request::AnalyzeRequest;
use crate::handler::response::AnalyzeResponse;
use crate::handler::{ErrorKind, Result};
use crate::service::ServiceState;

/// Tracing target for analysis requests.
const TRACING_TARGET: &str = "flowsight_server::handler::analyze";

/// Analyzes a base64-encoded flowchart image.
///
/// Credentials are checked before the body is read. The reasoning reply is
/// forwarded as produced: parsed JSON as-is, unparseable text with a
/// warning, upstream failures with their own status.
#[tracing::instrument(skip_all)]
async fn analyze(
    State(reasoning): State<Option<ReasoningService>>,
    request: Result<Json<AnalyzeRequest>>,
) -> Result<AnalyzeResponse> {
    let Some(reasoning) = reasoning else {
        tracing::error!(target: TRACING_TARGET, "Analysis requested without reasoning credentials");
        return Err(ErrorKind::MissingCredentials.into_error());
    };

    let Json(request) = request.inspect_err(|error| {
        tracing::debug!(target: TRACING_TARGET, error = %error, "Rejected analysis request body");
    })?;
    let image = request.image()?;

    tracing::info!(
        target: TRACING_TARGET,
        mime_type = request.mime_type().unwrap_or(DEFAULT_MIME_TYPE),
        image_len = image.len(),
        "Analysis requested"
    );

    let outcome = reasoning.analyze(image, request.mime_type()).await?;
    let response = AnalyzeResponse::from(outcome);

    tracing::info!(
        target: TRACING_TARGET,
        status = response.status_code().as_u16(),
        "Analysis answered"
    );

    Ok(response)
}

/// Answers every method other than `POST` (and preflight `OPTIONS`).
async fn method_not_allowed() -> ErrorKind {
    ErrorKind::MethodNotAllowed
}

/// Returns a [`Router`] with the analysis route.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/api/analyze", post(analyze).fallback(method_not_allowed))
}
