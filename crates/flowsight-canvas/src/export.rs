//! Turning a canvas selection into an analyzable image.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::host::{CanvasHost, CanvasNode, ExportSettings, ExportTarget, HostError};

/// Tracing target for export operations.
pub const TRACING_TARGET: &str = "flowsight_canvas::export";

/// Exported image ready to be sent for analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportArtifact {
    /// Base64-encoded PNG.
    pub base64: String,
    /// Number of selected nodes the export was requested for.
    pub node_count: usize,
}

/// Reasons an export produced no artifact.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    #[error("No nodes selected")]
    EmptySelection,
    #[error(transparent)]
    Host(#[from] HostError),
}

/// Exports the current selection through the host.
#[derive(Clone)]
pub struct ExportCoordinator {
    host: Arc<dyn CanvasHost>,
    settings: ExportSettings,
}

impl ExportCoordinator {
    /// Creates a coordinator exporting PNGs at 2x.
    pub fn new(host: Arc<dyn CanvasHost>) -> Self {
        Self {
            host,
            settings: ExportSettings::default(),
        }
    }

    /// Reads the selection and exports it.
    pub async fn export_selection(&self) -> Result<ExportArtifact, ExportError> {
        let selection = self.host.selection().await;
        self.export(&selection).await
    }

    /// Exports the given selection.
    ///
    /// A single node is exported directly. Several nodes fall back to the
    /// whole current page, with `node_count` still reporting the selection
    /// size. An empty selection fails without calling the host.
    pub async fn export(&self, selection: &[CanvasNode]) -> Result<ExportArtifact, ExportError> {
        let target = match selection {
            [] => {
                tracing::debug!(target: TRACING_TARGET, "Export requested with empty selection");
                return Err(ExportError::EmptySelection);
            }
            [node] => ExportTarget::Node(node.id.clone()),
            _ => ExportTarget::CurrentPage,
        };

        tracing::debug!(
            target: TRACING_TARGET,
            node_count = selection.len(),
            export_target = ?target,
            scale = self.settings.scale,
            "Exporting selection"
        );

        let bytes = self.host.export(&target, &self.settings).await.map_err(|error| {
            tracing::warn!(target: TRACING_TARGET, error = %error, "Host export failed");
            ExportError::Host(error)
        })?;

        tracing::info!(
            target: TRACING_TARGET,
            node_count = selection.len(),
            image_size = bytes.len(),
            "Selection exported"
        );

        Ok(ExportArtifact {
            base64: STANDARD.encode(&bytes),
            node_count: selection.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MemoryHost;

    fn nodes(count: usize) -> Vec<CanvasNode> {
        (0..count)
            .map(|i| CanvasNode::new(format!("1:{i}"), format!("Frame {i}"), "FRAME"))
            .collect()
    }

    #[tokio::test]
    async fn empty_selection_never_exports() {
        let host = Arc::new(MemoryHost::default());
        let coordinator = ExportCoordinator::new(host.clone());

        let error = coordinator.export_selection().await.unwrap_err();
        assert_eq!(error, ExportError::EmptySelection);
        assert_eq!(error.to_string(), "No nodes selected");
        assert!(host.export_calls().is_empty());
    }

    #[tokio::test]
    async fn single_node_exports_that_node() {
        let host = Arc::new(MemoryHost::with_image(&b"png"[..]));
        host.set_selection(nodes(1));
        let coordinator = ExportCoordinator::new(host.clone());

        let artifact = coordinator.export_selection().await.unwrap();
        assert_eq!(artifact.node_count, 1);
        assert_eq!(artifact.base64, "cG5n");

        let calls = host.export_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, ExportTarget::Node("1:0".into()));
        assert_eq!(calls[0].1.scale, 2.0);
    }

    #[tokio::test]
    async fn multiple_nodes_export_current_page() {
        let host = Arc::new(MemoryHost::default());
        host.set_selection(nodes(3));
        let coordinator = ExportCoordinator::new(host.clone());

        let artifact = coordinator.export_selection().await.unwrap();
        assert_eq!(artifact.node_count, 3);
        assert_eq!(host.export_calls()[0].0, ExportTarget::CurrentPage);
    }

    #[tokio::test]
    async fn host_failure_is_relayed_verbatim() {
        let host = Arc::new(MemoryHost::default());
        host.set_selection(nodes(1));
        host.fail_exports("Export failed: node is not visible");
        let coordinator = ExportCoordinator::new(host);

        let error = coordinator.export_selection().await.unwrap_err();
        assert_eq!(error.to_string(), "Export failed: node is not visible");
    }
}
