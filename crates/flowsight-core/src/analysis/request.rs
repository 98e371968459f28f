//! Outbound analysis request construction.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::TRACING_TARGET;
use crate::schema::{SYSTEM_INSTRUCTIONS, USER_INSTRUCTION};
use crate::{Error, Result};

/// Mime type assumed when the caller does not supply one.
pub const DEFAULT_MIME_TYPE: &str = "image/png";

/// Sampling temperature; low to favor deterministic structure.
pub const TEMPERATURE: f32 = 0.1;

/// Upper bound on generated tokens.
pub const MAX_OUTPUT_TOKENS: u32 = 4096;

/// Raster image handed to the request builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImagePayload {
    /// Raw image bytes.
    Bytes(Bytes),
    /// Image already encoded as base64 text.
    Base64(String),
}

impl ImagePayload {
    /// Returns `true` if the payload carries no data.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Bytes(bytes) => bytes.is_empty(),
            Self::Base64(text) => text.trim().is_empty(),
        }
    }

    /// Size of the payload as received, in bytes.
    pub fn len(&self) -> usize {
        match self {
            Self::Bytes(bytes) => bytes.len(),
            Self::Base64(text) => text.len(),
        }
    }

    /// Returns the payload as base64 text.
    ///
    /// Pre-encoded payloads are passed through untouched: malformed base64 is
    /// left for the reasoning service to reject.
    pub fn to_base64(&self) -> String {
        match self {
            Self::Bytes(bytes) => STANDARD.encode(bytes),
            Self::Base64(text) => text.trim().to_owned(),
        }
    }
}

impl From<Bytes> for ImagePayload {
    fn from(bytes: Bytes) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<Vec<u8>> for ImagePayload {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(Bytes::from(bytes))
    }
}

impl From<&'static [u8]> for ImagePayload {
    fn from(bytes: &'static [u8]) -> Self {
        Self::Bytes(Bytes::from_static(bytes))
    }
}

impl From<String> for ImagePayload {
    fn from(text: String) -> Self {
        Self::Base64(text)
    }
}

impl From<&str> for ImagePayload {
    fn from(text: &str) -> Self {
        Self::Base64(text.to_owned())
    }
}

/// A chat message in the outbound request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum ChatMessage {
    System { content: String },
    User { content: Vec<ContentPart> },
}

/// One part of a multi-part user message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

/// Image reference, always a `data:` URI here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

/// Response-format hint sent to the reasoning service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseFormat {
    /// Ask for a single JSON object.
    JsonObject,
}

/// A single-shot request to the reasoning service.
///
/// Sampling parameters are fixed policy constants. The model name is not
/// part of the request: providers add it when sending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisRequest {
    /// Correlation id used in logs only.
    #[serde(skip)]
    pub request_id: Uuid,
    /// Mime type of the embedded image.
    #[serde(skip)]
    pub mime_type: String,
    /// System instructions followed by the image message.
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub response_format: ResponseFormat,
}

impl AnalysisRequest {
    /// Builds the request for a flowchart image.
    ///
    /// `mime_type` defaults to [`DEFAULT_MIME_TYPE`] when absent or blank.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidInput`] if the image payload is empty.
    ///
    /// [`ErrorKind::InvalidInput`]: crate::ErrorKind::InvalidInput
    pub fn build(image: impl Into<ImagePayload>, mime_type: Option<&str>) -> Result<Self> {
        let image = image.into();
        if image.is_empty() {
            return Err(Error::invalid_input().with_message("Image payload is missing"));
        }

        let mime_type = mime_type
            .map(str::trim)
            .filter(|mime| !mime.is_empty())
            .unwrap_or(DEFAULT_MIME_TYPE)
            .to_owned();

        let request_id = Uuid::now_v7();
        tracing::debug!(
            target: TRACING_TARGET,
            request_id = %request_id,
            mime_type = %mime_type,
            payload_size = image.len(),
            "Building analysis request"
        );

        let data_uri = format!("data:{mime_type};base64,{}", image.to_base64());
        let messages = vec![
            ChatMessage::System {
                content: SYSTEM_INSTRUCTIONS.to_owned(),
            },
            ChatMessage::User {
                content: vec![
                    ContentPart::Text {
                        text: USER_INSTRUCTION.to_owned(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl { url: data_uri },
                    },
                ],
            },
        ];

        Ok(Self {
            request_id,
            mime_type,
            messages,
            temperature: TEMPERATURE,
            max_tokens: MAX_OUTPUT_TOKENS,
            response_format: ResponseFormat::JsonObject,
        })
    }

    /// Returns the `data:` URI of the embedded image.
    pub fn image_url(&self) -> Option<&str> {
        self.messages.iter().find_map(|message| match message {
            ChatMessage::User { content } => content.iter().find_map(|part| match part {
                ContentPart::ImageUrl { image_url } => Some(image_url.url.as_str()),
                ContentPart::Text { .. } => None,
            }),
            ChatMessage::System { .. } => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ErrorKind;

    #[test]
    fn empty_payload_is_invalid_input() {
        let error = AnalysisRequest::build(Vec::new(), None).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidInput);

        let error = AnalysisRequest::build("  ", Some("image/jpeg")).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn mime_type_defaults_to_png() {
        let request = AnalysisRequest::build(&b"\x89PNG"[..], None).unwrap();
        assert_eq!(request.mime_type, DEFAULT_MIME_TYPE);

        let request = AnalysisRequest::build("aGVsbG8=", Some(" ")).unwrap();
        assert_eq!(request.image_url(), Some("data:image/png;base64,aGVsbG8="));
    }

    #[test]
    fn bytes_are_encoded_into_data_uri() {
        let request = AnalysisRequest::build(b"hello".to_vec(), Some("image/jpeg")).unwrap();
        assert_eq!(request.image_url(), Some("data:image/jpeg;base64,aGVsbG8="));
    }

    #[test]
    fn malformed_base64_is_forwarded() {
        let request = AnalysisRequest::build("not base64!", None).unwrap();
        assert_eq!(request.image_url(), Some("data:image/png;base64,not base64!"));
    }

    #[test]
    fn serializes_chat_completion_body() {
        let request = AnalysisRequest::build("aGVsbG8=", Some("image/webp")).unwrap();
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], SYSTEM_INSTRUCTIONS);
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(
            body["messages"][1]["content"],
            json!([
                { "type": "text", "text": USER_INSTRUCTION },
                { "type": "image_url", "image_url": { "url": "data:image/webp;base64,aGVsbG8=" } }
            ])
        );
        assert_eq!(body["max_tokens"], MAX_OUTPUT_TOKENS);
        assert_eq!(body["response_format"], json!({ "type": "json_object" }));
        assert!(body.get("request_id").is_none());
        assert!(body.get("mime_type").is_none());
    }
}
