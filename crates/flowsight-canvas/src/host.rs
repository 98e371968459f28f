//! Canvas host capability surface.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::broadcast;

/// Scale applied to every export.
pub const EXPORT_SCALE: f32 = 2.0;

/// A node on the host canvas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasNode {
    pub id: String,
    pub name: String,
    /// Host-specific node type, e.g. `FRAME` or `GROUP`.
    #[serde(rename = "type")]
    pub node_type: String,
}

impl CanvasNode {
    /// Creates a new node.
    pub fn new(id: impl Into<String>, name: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            node_type: node_type.into(),
        }
    }
}

/// What to rasterize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportTarget {
    /// A single node, by id.
    Node(String),
    /// The whole current page.
    CurrentPage,
}

/// Raster format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    #[default]
    Png,
}

impl ImageFormat {
    /// Mime type of the format.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
        }
    }
}

/// Export constraints passed to the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportSettings {
    pub format: ImageFormat,
    pub scale: f32,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            format: ImageFormat::Png,
            scale: EXPORT_SCALE,
        }
    }
}

/// Failure reported by the host, carrying its raw text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct HostError(pub String);

impl HostError {
    /// Creates a new host error.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<&str> for HostError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for HostError {
    fn from(message: String) -> Self {
        Self(message)
    }
}

/// Capabilities of the design tool hosting the plugin.
///
/// Production code binds this to the real host runtime. Tests bind it to
/// [`MemoryHost`].
///
/// [`MemoryHost`]: crate::mock::MemoryHost
#[async_trait]
pub trait CanvasHost: Send + Sync {
    /// Returns the nodes currently selected.
    async fn selection(&self) -> Vec<CanvasNode>;

    /// Rasterizes the target.
    async fn export(&self, target: &ExportTarget, settings: &ExportSettings) -> Result<Bytes, HostError>;

    /// Records a named checkpoint in the host's version history.
    async fn save_checkpoint(&self, label: &str, description: &str) -> Result<(), HostError>;

    /// Shows a transient notification to the user.
    async fn notify(&self, message: &str);

    /// Subscribes to selection changes.
    fn selection_changes(&self) -> broadcast::Receiver<Vec<CanvasNode>>;
}
