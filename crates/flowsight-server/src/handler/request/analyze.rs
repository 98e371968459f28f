use serde::{Deserialize, Serialize};

use crate::handler::{ErrorKind, Result};

/// Body of `POST /api/analyze`.
#[must_use]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    /// Base64-encoded image, without a data-URI prefix.
    #[serde(default)]
    pub image: Option<String>,
    /// Image MIME type; PNG when absent.
    #[serde(default)]
    pub mime_type: Option<String>,
}

impl AnalyzeRequest {
    /// Returns the image, rejecting a missing or empty one.
    pub fn image(&self) -> Result<&str> {
        match self.image.as_deref() {
            Some(image) if !image.is_empty() => Ok(image),
            _ => Err(ErrorKind::BadRequest.with_message("Missing required field: image")),
        }
    }

    /// Returns the MIME type, treating an empty one as absent.
    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref().filter(|mime| !mime.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_camel_case_body() {
        let request: AnalyzeRequest =
            serde_json::from_str(r#"{"image":"aGk=","mimeType":"image/jpeg"}"#).unwrap();
        assert_eq!(request.image().unwrap(), "aGk=");
        assert_eq!(request.mime_type(), Some("image/jpeg"));
    }

    #[test]
    fn missing_or_empty_image_is_rejected() {
        let missing: AnalyzeRequest = serde_json::from_str("{}").unwrap();
        let error = missing.image().unwrap_err();
        assert_eq!(error.kind(), ErrorKind::BadRequest);
        assert!(error.message().unwrap().contains("image"));

        let empty = AnalyzeRequest {
            image: Some(String::new()),
            mime_type: Some(String::new()),
        };
        assert!(empty.image().is_err());
        assert_eq!(empty.mime_type(), None);
    }
}
