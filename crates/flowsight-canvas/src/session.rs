//! Coordinating message loop between the plugin UI and the canvas host.
//!
//! The loop waits on two sources with `tokio::select!`: inbound UI messages
//! and host selection changes. Each inbound message is handled to
//! completion before the next one is read, so export, version and
//! selection requests never overlap.

use std::ops::ControlFlow;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;

use crate::export::ExportCoordinator;
use crate::host::{CanvasHost, CanvasNode};
use crate::protocol::{InboundMessage, OutboundMessage};
use crate::version::VersionCoordinator;

/// Tracing target for session operations.
pub const TRACING_TARGET: &str = "flowsight_canvas::session";

/// Why [`CanvasSession::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The UI sent `CLOSE`.
    Closed,
    /// The inbound channel was dropped.
    InboundDropped,
    /// The outbound channel was dropped.
    OutboundDropped,
}

/// A plugin session bound to one canvas host.
#[derive(Clone)]
pub struct CanvasSession {
    host: Arc<dyn CanvasHost>,
    exports: ExportCoordinator,
    versions: VersionCoordinator,
}

impl CanvasSession {
    /// Creates a new session.
    pub fn new(host: Arc<dyn CanvasHost>) -> Self {
        Self {
            exports: ExportCoordinator::new(host.clone()),
            versions: VersionCoordinator::new(host.clone()),
            host,
        }
    }

    /// Handles one inbound message.
    ///
    /// `CLOSE` and unrecognized messages produce no response.
    pub async fn handle(&self, message: InboundMessage) -> Option<OutboundMessage> {
        match message {
            InboundMessage::ExportSelection => {
                let response = match self.exports.export_selection().await {
                    Ok(artifact) => OutboundMessage::ExportSuccess {
                        base64: artifact.base64,
                        node_count: artifact.node_count,
                    },
                    Err(error) => OutboundMessage::ExportError {
                        error: error.to_string(),
                    },
                };
                Some(response)
            }
            InboundMessage::SaveVersion { label } => {
                let response = match self.versions.save_checkpoint(label.as_deref()).await {
                    Ok(checkpoint) => OutboundMessage::VersionSaved {
                        label: checkpoint.label,
                    },
                    Err(error) => OutboundMessage::VersionError {
                        error: error.to_string(),
                    },
                };
                Some(response)
            }
            InboundMessage::GetSelectionInfo => Some(OutboundMessage::SelectionInfo {
                nodes: self.host.selection().await,
            }),
            InboundMessage::Close => None,
            InboundMessage::Unrecognized => {
                tracing::warn!(target: TRACING_TARGET, "Ignoring unrecognized message type");
                None
            }
        }
    }

    /// Runs the message loop until `CLOSE` or a channel is dropped.
    ///
    /// Malformed inbound JSON is logged and skipped.
    pub async fn run(
        self,
        mut inbound: mpsc::Receiver<Value>,
        outbound: mpsc::Sender<OutboundMessage>,
    ) -> SessionEnd {
        let mut changes = self.host.selection_changes();
        let mut changes_open = true;

        tracing::debug!(target: TRACING_TARGET, "Canvas session started");

        let end = loop {
            tokio::select! {
                message = inbound.recv() => {
                    let Some(message) = message else {
                        break SessionEnd::InboundDropped;
                    };
                    if let ControlFlow::Break(end) = self.dispatch(message, &outbound).await {
                        break end;
                    }
                }
                change = changes.recv(), if changes_open => match change {
                    Ok(nodes) => {
                        if Self::send(&outbound, Self::selection_changed(&nodes)).await.is_break() {
                            break SessionEnd::OutboundDropped;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(
                            target: TRACING_TARGET,
                            skipped,
                            "Selection change events dropped"
                        );
                    }
                    Err(RecvError::Closed) => {
                        tracing::debug!(target: TRACING_TARGET, "Host stopped publishing selection changes");
                        changes_open = false;
                    }
                },
            }
        };

        tracing::debug!(target: TRACING_TARGET, end = ?end, "Canvas session ended");
        end
    }

    async fn dispatch(
        &self,
        message: Value,
        outbound: &mpsc::Sender<OutboundMessage>,
    ) -> ControlFlow<SessionEnd> {
        let message = match serde_json::from_value::<InboundMessage>(message) {
            Ok(message) => message,
            Err(error) => {
                tracing::warn!(target: TRACING_TARGET, error = %error, "Failed to parse message");
                return ControlFlow::Continue(());
            }
        };

        if message == InboundMessage::Close {
            tracing::info!(target: TRACING_TARGET, "Session closed by UI");
            return ControlFlow::Break(SessionEnd::Closed);
        }

        match self.handle(message).await {
            Some(response) => Self::send(outbound, response).await,
            None => ControlFlow::Continue(()),
        }
    }

    fn selection_changed(nodes: &[CanvasNode]) -> OutboundMessage {
        tracing::trace!(target: TRACING_TARGET, count = nodes.len(), "Selection changed");
        OutboundMessage::selection_changed(nodes)
    }

    async fn send(
        outbound: &mpsc::Sender<OutboundMessage>,
        message: OutboundMessage,
    ) -> ControlFlow<SessionEnd> {
        match outbound.send(message).await {
            Ok(()) => ControlFlow::Continue(()),
            Err(_) => ControlFlow::Break(SessionEnd::OutboundDropped),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::mock::MemoryHost;

    fn session(host: &Arc<MemoryHost>) -> CanvasSession {
        CanvasSession::new(host.clone())
    }

    #[tokio::test]
    async fn export_with_empty_selection_reports_error() {
        let host = Arc::new(MemoryHost::default());
        let response = session(&host).handle(InboundMessage::ExportSelection).await;

        assert_eq!(
            response,
            Some(OutboundMessage::ExportError {
                error: "No nodes selected".into()
            })
        );
        assert!(host.export_calls().is_empty());
    }

    #[tokio::test]
    async fn selection_info_lists_nodes() {
        let host = Arc::new(MemoryHost::default());
        let nodes = vec![CanvasNode::new("1:1", "Login", "FRAME")];
        host.set_selection(nodes.clone());

        let response = session(&host).handle(InboundMessage::GetSelectionInfo).await;
        assert_eq!(response, Some(OutboundMessage::SelectionInfo { nodes }));
    }

    #[tokio::test]
    async fn save_version_keeps_whitespace_label() {
        let host = Arc::new(MemoryHost::default());
        let response = session(&host)
            .handle(InboundMessage::SaveVersion {
                label: Some("  ".into()),
            })
            .await;

        assert_eq!(response, Some(OutboundMessage::VersionSaved { label: "  ".into() }));
    }

    #[tokio::test]
    async fn close_and_unrecognized_are_silent() {
        let host = Arc::new(MemoryHost::default());
        let session = session(&host);

        assert_eq!(session.handle(InboundMessage::Close).await, None);
        assert_eq!(session.handle(InboundMessage::Unrecognized).await, None);
    }

    #[tokio::test]
    async fn run_processes_messages_in_order_until_close() {
        let host = Arc::new(MemoryHost::default());
        host.set_selection(vec![CanvasNode::new("1:1", "Login", "FRAME")]);

        let (in_tx, in_rx) = mpsc::channel(8);
        let (out_tx, mut out_rx) = mpsc::channel(8);
        let task = tokio::spawn(session(&host).run(in_rx, out_tx));

        in_tx.send(json!({ "type": "PING" })).await.unwrap();
        in_tx.send(json!("not an object")).await.unwrap();
        in_tx.send(json!({ "type": "SAVE_VERSION", "label": "v1" })).await.unwrap();
        in_tx.send(json!({ "type": "EXPORT_SELECTION" })).await.unwrap();
        in_tx.send(json!({ "type": "CLOSE" })).await.unwrap();

        assert_eq!(task.await.unwrap(), SessionEnd::Closed);

        assert_eq!(
            out_rx.recv().await,
            Some(OutboundMessage::VersionSaved { label: "v1".into() })
        );
        assert!(matches!(
            out_rx.recv().await,
            Some(OutboundMessage::ExportSuccess { node_count: 1, .. })
        ));
        assert_eq!(out_rx.recv().await, None);
    }

    #[tokio::test]
    async fn run_forwards_selection_changes() {
        let host = Arc::new(MemoryHost::default());
        let (in_tx, in_rx) = mpsc::channel(8);
        let (out_tx, mut out_rx) = mpsc::channel(8);
        let task = tokio::spawn(session(&host).run(in_rx, out_tx));

        // Let the loop subscribe before publishing.
        tokio::time::sleep(Duration::from_millis(50)).await;
        host.set_selection(vec![
            CanvasNode::new("1:1", "Login", "FRAME"),
            CanvasNode::new("1:2", "Signup", "FRAME"),
        ]);

        let message = tokio::time::timeout(Duration::from_secs(1), out_rx.recv())
            .await
            .unwrap();
        assert_eq!(
            message,
            Some(OutboundMessage::SelectionChanged {
                count: 2,
                names: vec!["Login".into(), "Signup".into()]
            })
        );

        drop(in_tx);
        assert_eq!(task.await.unwrap(), SessionEnd::InboundDropped);
    }
}
