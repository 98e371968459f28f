//! Structured error handling for analysis operations.

use strum::{AsRefStr, Display, EnumString, IntoStaticStr};
use thiserror::Error;

/// Type alias for boxed dynamic errors that can be sent across threads.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Type alias for Results with our custom Error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Categories of errors that can occur while building, sending or
/// interpreting an analysis request.
///
/// Upstream non-success responses and non-JSON model output are not errors:
/// they are reported as [`Outcome`] variants.
///
/// [`Outcome`]: crate::analysis::Outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// Input validation failed (e.g. missing image payload).
    InvalidInput,
    /// Required configuration or credentials are missing or invalid.
    Configuration,
    /// The reasoning service could not be reached.
    NetworkError,
    /// The transport gave up waiting for the reasoning service.
    Timeout,
    /// A payload could not be encoded or decoded.
    Serialization,
    /// Decoded content does not match the flow analysis schema.
    Format,
    /// Unexpected failure anywhere in the request path.
    #[default]
    InternalError,
}

/// Structured error type with classification and an optional source.
#[must_use]
#[derive(Debug, Error)]
#[error("[{kind}]{}", message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Primary error message.
    pub message: Option<String>,
    /// Underlying source error, if any.
    #[source]
    pub source: Option<BoxedError>,
}

impl Error {
    /// Creates a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            source: None,
        }
    }

    /// Creates a new error from a source error.
    pub fn from_source(kind: ErrorKind, source: impl Into<BoxedError>) -> Self {
        Self {
            kind,
            message: None,
            source: Some(source.into()),
        }
    }

    /// Adds a message to this error.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the source of the error.
    pub fn with_source(mut self, source: impl Into<BoxedError>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Creates a new invalid input error.
    pub fn invalid_input() -> Self {
        Self::new(ErrorKind::InvalidInput)
    }

    /// Creates a new configuration error.
    pub fn configuration() -> Self {
        Self::new(ErrorKind::Configuration)
    }

    /// Creates a new network error.
    pub fn network_error() -> Self {
        Self::new(ErrorKind::NetworkError)
    }

    /// Creates a new timeout error.
    pub fn timeout() -> Self {
        Self::new(ErrorKind::Timeout)
    }

    /// Creates a new serialization error.
    pub fn serialization() -> Self {
        Self::new(ErrorKind::Serialization)
    }

    /// Creates a new format error.
    pub fn format() -> Self {
        Self::new(ErrorKind::Format)
    }

    /// Creates a new internal error.
    pub fn internal_error() -> Self {
        Self::new(ErrorKind::InternalError)
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error kind as a string.
    pub fn kind_str(&self) -> &'static str {
        self.kind.into()
    }

    /// Returns the message, falling back to the kind name.
    pub fn detail(&self) -> String {
        match &self.message {
            Some(message) => message.clone(),
            None => self.kind.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::from_source(ErrorKind::Serialization, error).with_message("JSON encoding failed")
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn error_builder_pattern() {
        let error = Error::invalid_input().with_message("Image payload is missing");

        assert_eq!(error.kind(), ErrorKind::InvalidInput);
        assert_eq!(error.message.as_deref(), Some("Image payload is missing"));
        assert!(error.source.is_none());
    }

    #[test]
    fn error_display_includes_kind_and_message() {
        let error = Error::network_error().with_message("Connection failed");
        let display = error.to_string();

        assert!(display.contains("network_error"));
        assert!(display.contains("Connection failed"));
    }

    #[test]
    fn detail_falls_back_to_kind() {
        assert_eq!(Error::timeout().detail(), "timeout");
        assert_eq!(Error::timeout().with_message("slow").detail(), "slow");
    }

    #[test]
    fn error_from_serde() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = Error::from(source);

        assert_eq!(error.kind(), ErrorKind::Serialization);
        assert!(error.source.is_some());
    }

    #[test]
    fn kind_from_str() {
        assert_eq!(
            ErrorKind::from_str("invalid_input").unwrap(),
            ErrorKind::InvalidInput
        );
        assert_eq!(ErrorKind::from_str("format").unwrap(), ErrorKind::Format);
        assert!(ErrorKind::from_str("retryable").is_err());
        assert_eq!(ErrorKind::default(), ErrorKind::InternalError);
    }
}
