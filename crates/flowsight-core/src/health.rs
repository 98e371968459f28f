//! Health reporting for reasoning providers.

use std::time::Duration;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Represents the operational status of a provider.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    /// Provider is operating normally.
    #[default]
    Healthy,
    /// Provider is reachable but not fully functional.
    Degraded,
    /// Provider is not operational.
    Unhealthy,
}

/// Health information for a provider.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceHealth {
    /// Current provider status.
    pub status: ServiceStatus,
    /// Response time of the health check, if measured.
    pub response: Option<Duration>,
    /// Optional message describing the current state.
    pub message: Option<String>,
    /// When the health check was performed.
    pub checked_at: Timestamp,
}

impl ServiceHealth {
    /// Creates a new healthy report.
    pub fn healthy() -> Self {
        Self {
            status: ServiceStatus::Healthy,
            checked_at: Timestamp::now(),
            ..Default::default()
        }
    }

    /// Creates a new degraded report.
    pub fn degraded(message: impl Into<String>) -> Self {
        Self {
            status: ServiceStatus::Degraded,
            message: Some(message.into()),
            checked_at: Timestamp::now(),
            ..Default::default()
        }
    }

    /// Creates a new unhealthy report.
    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self {
            status: ServiceStatus::Unhealthy,
            message: Some(message.into()),
            checked_at: Timestamp::now(),
            ..Default::default()
        }
    }

    /// Sets the response time for this health check.
    pub fn with_response_time(mut self, response_time: Duration) -> Self {
        self.response = Some(response_time);
        self
    }

    /// Returns whether the provider can serve requests.
    pub fn is_operational(&self) -> bool {
        !matches!(self.status, ServiceStatus::Unhealthy)
    }
}
