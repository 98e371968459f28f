use flowsight_core::ServiceStatus;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Liveness report of the server.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Overall status: the reasoning service status when configured.
    pub status: ServiceStatus,
    /// Whether reasoning service credentials are configured.
    pub reasoning_configured: bool,
    /// Details reported by the reasoning service health check.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Duration of the reasoning service health check, in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
    pub checked_at: Timestamp,
}

impl HealthResponse {
    /// Whether the server can currently answer analysis requests.
    pub fn is_operational(&self) -> bool {
        self.reasoning_configured && self.status != ServiceStatus::Unhealthy
    }
}
