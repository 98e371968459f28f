//! Health check endpoint.

use axum::Router;
use axum::extract::State;
use axum::routing::get;
use flowsight_core::analysis::ReasoningService;
use flowsight_core::ServiceHealth;
use jiff::Timestamp;

use crate::extract::Json;
use crate::handler::response::HealthResponse;
use crate::service::ServiceState;

/// Tracing target for monitor operations.
const TRACING_TARGET: &str = "flowsight_server::handler::monitors";

/// Reports liveness and whether analysis requests can be served.
///
/// Always `200`: a missing or failing reasoning service degrades the
/// status, it does not take the server down.
async fn health_status(
    State(reasoning): State<Option<ReasoningService>>,
) -> Json<HealthResponse> {
    let health = match reasoning.as_ref() {
        Some(service) => service.health_check().await.unwrap_or_else(|error| {
            tracing::warn!(target: TRACING_TARGET, error = %error, "Reasoning health check failed");
            ServiceHealth::unhealthy(error.to_string())
        }),
        None => ServiceHealth::degraded("Reasoning service credentials are not configured"),
    };

    tracing::debug!(
        target: TRACING_TARGET,
        status = ?health.status,
        reasoning_configured = reasoning.is_some(),
        "Health status checked"
    );

    Json(HealthResponse {
        status: health.status,
        reasoning_configured: reasoning.is_some(),
        message: health.message,
        response_time_ms: health
            .response
            .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)),
        checked_at: Timestamp::now(),
    })
}

/// Returns a [`Router`] with the health route.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/api/health", get(health_status))
}
