//! Messages exchanged between the plugin UI and the session.
//!
//! Both directions are JSON objects tagged by a `type` field in
//! SCREAMING_SNAKE_CASE, with camelCase payload fields.

use serde::{Deserialize, Serialize};

use crate::host::CanvasNode;

/// Messages sent by the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InboundMessage {
    /// Export the current selection.
    ExportSelection,
    /// Record a version checkpoint.
    SaveVersion {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
    /// Describe the current selection.
    GetSelectionInfo,
    /// End the session.
    Close,
    /// Any other `type`; logged and ignored.
    #[serde(other)]
    Unrecognized,
}

impl InboundMessage {
    /// Parses a message from JSON text.
    pub fn from_text(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

/// Messages sent to the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutboundMessage {
    #[serde(rename_all = "camelCase")]
    ExportSuccess { base64: String, node_count: usize },
    ExportError { error: String },
    VersionSaved { label: String },
    VersionError { error: String },
    SelectionInfo { nodes: Vec<CanvasNode> },
    /// Emitted on every host selection change.
    SelectionChanged { count: usize, names: Vec<String> },
}

impl OutboundMessage {
    /// Builds a selection change notification.
    pub fn selection_changed(nodes: &[CanvasNode]) -> Self {
        Self::SelectionChanged {
            count: nodes.len(),
            names: nodes.iter().map(|node| node.name.clone()).collect(),
        }
    }

    /// Serializes the message to JSON text.
    pub fn to_text(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_inbound_messages() {
        assert_eq!(
            InboundMessage::from_text(r#"{"type":"EXPORT_SELECTION"}"#).unwrap(),
            InboundMessage::ExportSelection
        );
        assert_eq!(
            InboundMessage::from_text(r#"{"type":"SAVE_VERSION"}"#).unwrap(),
            InboundMessage::SaveVersion { label: None }
        );
        assert_eq!(
            InboundMessage::from_text(r#"{"type":"SAVE_VERSION","label":"v2"}"#).unwrap(),
            InboundMessage::SaveVersion {
                label: Some("v2".into())
            }
        );
        assert_eq!(
            InboundMessage::from_text(r#"{"type":"CLOSE"}"#).unwrap(),
            InboundMessage::Close
        );
    }

    #[test]
    fn unknown_type_is_unrecognized() {
        assert_eq!(
            InboundMessage::from_text(r#"{"type":"RESIZE","width":300}"#).unwrap(),
            InboundMessage::Unrecognized
        );
        assert!(InboundMessage::from_text(r#"{"label":"no type"}"#).is_err());
    }

    #[test]
    fn serializes_outbound_messages() {
        let message = OutboundMessage::ExportSuccess {
            base64: "cG5n".into(),
            node_count: 2,
        };
        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({ "type": "EXPORT_SUCCESS", "base64": "cG5n", "nodeCount": 2 })
        );

        let nodes = vec![
            CanvasNode::new("1:1", "Login", "FRAME"),
            CanvasNode::new("1:2", "Signup", "GROUP"),
        ];
        assert_eq!(
            serde_json::to_value(OutboundMessage::selection_changed(&nodes)).unwrap(),
            json!({ "type": "SELECTION_CHANGED", "count": 2, "names": ["Login", "Signup"] })
        );
        assert_eq!(
            serde_json::to_value(OutboundMessage::SelectionInfo { nodes }).unwrap()["nodes"][0],
            json!({ "id": "1:1", "name": "Login", "type": "FRAME" })
        );
    }
}
