use axum::Json;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use flowsight_core::analysis::Outcome;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Header carrying the number of schema deviations found in an analysis.
pub const SCHEMA_ISSUES_HEADER: HeaderName = HeaderName::from_static("x-schema-issues");

/// Message used when the reasoning service answered with a failure status.
pub const UPSTREAM_ERROR_MESSAGE: &str = "Reasoning service error";

/// Body returned when the reasoning service replied with non-JSON content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnparseableAnalysis {
    pub warning: String,
    /// Content exactly as the service produced it.
    pub raw: String,
}

/// Body returned when the reasoning service failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamFailure {
    pub error: String,
    /// Upstream error body, verbatim.
    pub details: String,
}

/// Response of the analyze endpoint.
#[must_use]
#[derive(Debug, Clone, PartialEq)]
pub enum AnalyzeResponse {
    /// Parsed analysis, forwarded as produced.
    Analysis { value: Value, issues: usize },
    Unparseable(UnparseableAnalysis),
    Upstream {
        status: StatusCode,
        body: UpstreamFailure,
    },
}

impl AnalyzeResponse {
    /// Returns the HTTP status this response is sent with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Analysis { .. } | Self::Unparseable(_) => StatusCode::OK,
            Self::Upstream { status, .. } => *status,
        }
    }
}

impl From<Outcome> for AnalyzeResponse {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Validated { value, report } => Self::Analysis {
                value,
                issues: report.len(),
            },
            Outcome::Unparseable { raw, warning } => Self::Unparseable(UnparseableAnalysis {
                warning: warning.to_owned(),
                raw,
            }),
            Outcome::UpstreamError { status, body } => Self::Upstream {
                status: StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                body: UpstreamFailure {
                    error: UPSTREAM_ERROR_MESSAGE.to_owned(),
                    details: body,
                },
            },
        }
    }
}

impl IntoResponse for AnalyzeResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Analysis { value, issues } => (
                StatusCode::OK,
                [(SCHEMA_ISSUES_HEADER, HeaderValue::from(issues))],
                Json(value),
            )
                .into_response(),
            Self::Unparseable(body) => (StatusCode::OK, Json(body)).into_response(),
            Self::Upstream { status, body } => (status, Json(body)).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use flowsight_core::analysis::UNPARSEABLE_WARNING;

    use super::*;

    #[test]
    fn upstream_status_is_kept() {
        let response = AnalyzeResponse::from(Outcome::UpstreamError {
            status: 429,
            body: "slow down".into(),
        });

        assert_eq!(response.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            response,
            AnalyzeResponse::Upstream {
                status: StatusCode::TOO_MANY_REQUESTS,
                body: UpstreamFailure {
                    error: UPSTREAM_ERROR_MESSAGE.into(),
                    details: "slow down".into(),
                },
            }
        );
    }

    #[test]
    fn invalid_upstream_status_becomes_bad_gateway() {
        let response = AnalyzeResponse::from(Outcome::UpstreamError {
            status: 42,
            body: String::new(),
        });
        assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn unparseable_keeps_raw_text() {
        let response = AnalyzeResponse::from(Outcome::Unparseable {
            raw: "Sorry, no chart here".into(),
            warning: UNPARSEABLE_WARNING,
        });

        assert_eq!(response.status_code(), StatusCode::OK);
        let AnalyzeResponse::Unparseable(body) = response else {
            panic!("expected unparseable response");
        };
        assert_eq!(body.raw, "Sorry, no chart here");
        assert_eq!(body.warning, UNPARSEABLE_WARNING);
    }

    #[test]
    fn analysis_sets_issue_header() {
        let response = AnalyzeResponse::Analysis {
            value: serde_json::json!({}),
            issues: 3,
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[&SCHEMA_ISSUES_HEADER], "3");
    }
}
