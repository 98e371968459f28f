//! Classification of reasoning service responses.

use serde::Deserialize;
use serde_json::Value;

use crate::analysis::TRACING_TARGET;
use crate::schema::{FlowAnalysisResult, ValidationReport, validate};
use crate::{Error, Result};

/// Warning attached to successful responses whose content is not JSON.
pub const UNPARSEABLE_WARNING: &str =
    "The model response could not be parsed as JSON. The raw output is included as-is.";

/// Status and body exactly as returned by the reasoning service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawServiceResponse {
    pub status: u16,
    pub body: String,
}

impl RawServiceResponse {
    /// Creates a new raw response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Terminal classification of a single analysis request.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The service answered with a non-success status.
    UpstreamError { status: u16, body: String },
    /// The service succeeded but its content is not JSON.
    Unparseable { raw: String, warning: &'static str },
    /// Content decoded as JSON, forwarded as-is.
    Validated {
        value: Value,
        report: ValidationReport,
    },
}

impl Outcome {
    /// Short name used in logs.
    pub fn kind_str(&self) -> &'static str {
        match self {
            Self::UpstreamError { .. } => "upstream_error",
            Self::Unparseable { .. } => "unparseable",
            Self::Validated { .. } => "validated",
        }
    }

    /// Decodes a validated value into a typed result.
    ///
    /// # Errors
    ///
    /// Returns a [`Format`] error for any outcome other than a value that
    /// satisfies [`FlowAnalysisResult`].
    ///
    /// [`Format`]: crate::ErrorKind::Format
    pub fn into_analysis(self) -> Result<FlowAnalysisResult> {
        match self {
            Self::Validated { value, .. } => serde_json::from_value(value).map_err(|e| {
                Error::format()
                    .with_message("Response does not match the analysis schema")
                    .with_source(e)
            }),
            Self::Unparseable { .. } => {
                Err(Error::format().with_message("Response content is not JSON"))
            }
            Self::UpstreamError { status, .. } => Err(Error::format()
                .with_message(format!("Reasoning service responded with status {status}"))),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CompletionEnvelope {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

/// Classifies a raw service response.
///
/// Non-success statuses are passed through verbatim. Message content is
/// decoded strictly: no fence stripping, no extraction from surrounding
/// prose. A decoded value is never rejected or rewritten; structural issues
/// are only reported.
///
/// # Errors
///
/// Returns a [`Serialization`] error when a success response is not a
/// chat-completion envelope or carries no message content.
///
/// [`Serialization`]: crate::ErrorKind::Serialization
pub fn handle_response(raw: RawServiceResponse) -> Result<Outcome> {
    if !raw.is_success() {
        tracing::warn!(
            target: TRACING_TARGET,
            status = raw.status,
            body_len = raw.body.len(),
            "Reasoning service returned an error status"
        );
        return Ok(Outcome::UpstreamError {
            status: raw.status,
            body: raw.body,
        });
    }

    let envelope: CompletionEnvelope = serde_json::from_str(&raw.body).map_err(|e| {
        Error::serialization()
            .with_message("Malformed chat completion response")
            .with_source(e)
    })?;

    let content = envelope
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| {
            Error::serialization().with_message("Chat completion response has no message content")
        })?;

    match serde_json::from_str::<Value>(&content) {
        Ok(value) => {
            let report = validate(&value);
            for issue in report.iter() {
                tracing::warn!(
                    target: TRACING_TARGET,
                    issue = %issue,
                    "Analysis result departs from schema"
                );
            }
            Ok(Outcome::Validated { value, report })
        }
        Err(error) => {
            tracing::warn!(
                target: TRACING_TARGET,
                error = %error,
                content_len = content.len(),
                "Model content is not valid JSON"
            );
            Ok(Outcome::Unparseable {
                raw: content,
                warning: UNPARSEABLE_WARNING,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ErrorKind;

    fn envelope(content: &str) -> String {
        json!({
            "id": "chatcmpl-1",
            "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }]
        })
        .to_string()
    }

    #[test]
    fn upstream_error_is_verbatim() {
        let body = r#"{"error":{"message":"rate limited"}}"#;
        let outcome = handle_response(RawServiceResponse::new(429, body)).unwrap();

        assert_eq!(
            outcome,
            Outcome::UpstreamError {
                status: 429,
                body: body.to_owned()
            }
        );
        assert_eq!(outcome.kind_str(), "upstream_error");
    }

    #[test]
    fn non_json_content_is_unparseable_with_exact_raw() {
        let content = "```json\n{\"title\": \"x\"}\n```";
        let outcome = handle_response(RawServiceResponse::new(200, envelope(content))).unwrap();

        match outcome {
            Outcome::Unparseable { raw, warning } => {
                assert_eq!(raw, content);
                assert_eq!(warning, UNPARSEABLE_WARNING);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn json_content_is_forwarded_untouched() {
        let value = json!({ "title": "partial", "confidence": "unsure" });
        let outcome =
            handle_response(RawServiceResponse::new(200, envelope(&value.to_string()))).unwrap();

        match outcome {
            Outcome::Validated { value: forwarded, report } => {
                assert_eq!(forwarded, value);
                assert!(!report.is_clean());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn malformed_envelope_is_serialization_error() {
        let error = handle_response(RawServiceResponse::new(200, "not json")).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Serialization);

        let empty = json!({ "choices": [] }).to_string();
        let error = handle_response(RawServiceResponse::new(200, empty)).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Serialization);
    }

    #[test]
    fn into_analysis_reports_format_errors() {
        let outcome = Outcome::Unparseable {
            raw: "oops".into(),
            warning: UNPARSEABLE_WARNING,
        };
        assert_eq!(outcome.into_analysis().unwrap_err().kind(), ErrorKind::Format);

        let outcome = Outcome::Validated {
            value: json!({ "title": "only" }),
            report: ValidationReport::default(),
        };
        assert_eq!(outcome.into_analysis().unwrap_err().kind(), ErrorKind::Format);
    }

    #[test]
    fn into_analysis_decodes_complete_value() {
        let value = json!({
            "title": "t", "description": "d",
            "states": [], "transitions": [], "steps": [], "gaps": [], "suggestions": [],
            "codeLogic": {}, "confidence": "low"
        });
        let outcome = Outcome::Validated {
            report: validate(&value),
            value,
        };

        let analysis = outcome.into_analysis().unwrap();
        assert_eq!(analysis.title, "t");
    }
}
