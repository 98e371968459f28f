use std::borrow::Cow;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// JSON body of every error produced by this server.
///
/// Serialized as `{ "error": <message>, "code": <name>, "details"?: <context> }`.
/// The status code travels in the response line only.
#[must_use = "error responses do nothing unless serialized"]
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse<'a> {
    /// Human-readable error message.
    #[serde(rename = "error")]
    pub message: Cow<'a, str>,
    /// Stable snake_case identifier of the error.
    #[serde(rename = "code")]
    pub name: Cow<'a, str>,
    /// Underlying cause, when one is worth showing.
    #[serde(rename = "details", skip_serializing_if = "Option::is_none")]
    pub context: Option<Cow<'a, str>>,
    #[serde(skip)]
    pub status: StatusCode,
}

impl<'a> ErrorResponse<'a> {
    // 4xx Client Errors
    pub const BAD_REQUEST: Self = Self::new(
        "bad_request",
        "The request could not be processed due to invalid data",
        StatusCode::BAD_REQUEST,
    );
    pub const METHOD_NOT_ALLOWED: Self = Self::new(
        "method_not_allowed",
        "Method not allowed",
        StatusCode::METHOD_NOT_ALLOWED,
    );
    pub const NOT_FOUND: Self = Self::new(
        "not_found",
        "The requested resource was not found",
        StatusCode::NOT_FOUND,
    );
    pub const PAYLOAD_TOO_LARGE: Self = Self::new(
        "payload_too_large",
        "The request body is too large",
        StatusCode::PAYLOAD_TOO_LARGE,
    );
    // 5xx Server Errors
    pub const INTERNAL_SERVER_ERROR: Self = Self::new(
        "internal_server_error",
        "An internal server error occurred",
        StatusCode::INTERNAL_SERVER_ERROR,
    );
    pub const MISSING_CREDENTIALS: Self = Self::new(
        "missing_credentials",
        "Reasoning service credentials are not configured",
        StatusCode::INTERNAL_SERVER_ERROR,
    );

    /// Creates a new error response.
    #[inline]
    pub const fn new(name: &'a str, message: &'a str, status: StatusCode) -> Self {
        Self {
            name: Cow::Borrowed(name),
            message: Cow::Borrowed(message),
            context: None,
            status,
        }
    }

    /// Replaces the message.
    pub fn with_message(mut self, message: impl Into<Cow<'a, str>>) -> Self {
        self.message = message.into();
        self
    }

    /// Attaches details, merging with existing ones.
    pub fn with_context(mut self, context: impl Into<Cow<'a, str>>) -> Self {
        let new_context = context.into();
        self.context = Some(match self.context {
            Some(existing) => Cow::Owned(format!("{existing}; {new_context}")),
            None => new_context,
        });
        self
    }
}

impl Default for ErrorResponse<'_> {
    #[inline]
    fn default() -> Self {
        Self::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for ErrorResponse<'_> {
    #[inline]
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn message_is_replaced() {
        let response = ErrorResponse::BAD_REQUEST.with_message("Missing required field: image");
        assert_eq!(response.message, "Missing required field: image");
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn context_is_merged() {
        let response = ErrorResponse::INTERNAL_SERVER_ERROR
            .with_context("connection refused")
            .with_context("no retry attempted");

        assert_eq!(
            response.context.as_deref(),
            Some("connection refused; no retry attempted")
        );
    }

    #[test]
    fn serializes_wire_shape() {
        let value = serde_json::to_value(ErrorResponse::NOT_FOUND).unwrap();
        assert_eq!(
            value,
            json!({ "error": "The requested resource was not found", "code": "not_found" })
        );

        let value =
            serde_json::to_value(ErrorResponse::INTERNAL_SERVER_ERROR.with_context("boom")).unwrap();
        assert_eq!(value["details"], "boom");
        assert!(value.get("status").is_none());
    }
}
