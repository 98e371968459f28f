//! Analysis error to HTTP error conversion.

use std::error::Error as _;

use flowsight_core::{Error as CoreError, ErrorKind as CoreErrorKind};

use super::http_error::{Error as HttpError, ErrorKind};

/// Tracing target for analysis errors surfacing at the HTTP boundary.
const TRACING_TARGET: &str = "flowsight_server::handler::error";

/// Renders the error and its source chain as one line.
fn stringify_cause(error: &CoreError) -> String {
    let mut cause = error.detail();
    let mut source = error.source();
    while let Some(inner) = source {
        cause.push_str(": ");
        cause.push_str(&inner.to_string());
        source = inner.source();
    }
    cause
}

impl From<CoreError> for HttpError<'static> {
    fn from(error: CoreError) -> Self {
        let cause = stringify_cause(&error);

        match error.kind() {
            CoreErrorKind::InvalidInput => {
                tracing::debug!(target: TRACING_TARGET, cause = %cause, "Rejected analysis input");
                ErrorKind::BadRequest.with_message(cause)
            }
            CoreErrorKind::Configuration => {
                tracing::error!(target: TRACING_TARGET, cause = %cause, "Reasoning service misconfigured");
                ErrorKind::InternalServerError
                    .with_message("Reasoning service is misconfigured")
                    .with_context(cause)
            }
            CoreErrorKind::NetworkError => {
                tracing::error!(target: TRACING_TARGET, cause = %cause, "Reasoning service unreachable");
                ErrorKind::InternalServerError
                    .with_message("Reasoning service is unreachable")
                    .with_context(cause)
            }
            CoreErrorKind::Timeout => {
                tracing::error!(target: TRACING_TARGET, cause = %cause, "Reasoning service timed out");
                ErrorKind::InternalServerError
                    .with_message("Reasoning service timed out")
                    .with_context(cause)
            }
            CoreErrorKind::Serialization | CoreErrorKind::Format => {
                tracing::error!(target: TRACING_TARGET, cause = %cause, "Unreadable reasoning service reply");
                ErrorKind::InternalServerError
                    .with_message("Reasoning service reply could not be read")
                    .with_context(cause)
            }
            CoreErrorKind::InternalError => {
                tracing::error!(target: TRACING_TARGET, cause = %cause, "Analysis failed");
                ErrorKind::InternalServerError.with_context(cause)
            }
        }
    }
}
