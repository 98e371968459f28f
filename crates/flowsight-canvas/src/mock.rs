//! In-memory canvas host for testing.
//!
//! [`MemoryHost`] records every export, checkpoint and notification so tests
//! can assert on what the coordinators asked the host to do, including that
//! nothing was asked at all.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::broadcast;

use crate::host::{CanvasHost, CanvasNode, ExportSettings, ExportTarget, HostError};

/// Capacity of the selection change channel.
const SELECTION_CHANNEL_CAPACITY: usize = 16;

/// Image returned by default: a PNG signature.
const DEFAULT_IMAGE: &[u8] = b"\x89PNG\r\n\x1a\n";

#[derive(Debug, Default)]
struct Recorded {
    selection: Vec<CanvasNode>,
    exports: Vec<(ExportTarget, ExportSettings)>,
    checkpoints: Vec<(String, String)>,
    notifications: Vec<String>,
    export_failure: Option<String>,
    checkpoint_failure: Option<String>,
}

/// Canvas host backed by memory.
#[derive(Debug)]
pub struct MemoryHost {
    image: Bytes,
    state: Mutex<Recorded>,
    changes: broadcast::Sender<Vec<CanvasNode>>,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::with_image(DEFAULT_IMAGE)
    }
}

impl MemoryHost {
    /// Creates a host whose exports return the given image.
    pub fn with_image(image: impl Into<Bytes>) -> Self {
        let (changes, _) = broadcast::channel(SELECTION_CHANNEL_CAPACITY);
        Self {
            image: image.into(),
            state: Mutex::new(Recorded::default()),
            changes,
        }
    }

    fn state(&self) -> MutexGuard<'_, Recorded> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the selection and publishes the change.
    pub fn set_selection(&self, nodes: Vec<CanvasNode>) {
        self.state().selection = nodes.clone();
        // No subscribers is fine.
        let _ = self.changes.send(nodes);
    }

    /// Makes every subsequent export fail with the given text.
    pub fn fail_exports(&self, message: impl Into<String>) {
        self.state().export_failure = Some(message.into());
    }

    /// Makes every subsequent checkpoint fail with the given text.
    pub fn fail_checkpoints(&self, message: impl Into<String>) {
        self.state().checkpoint_failure = Some(message.into());
    }

    /// Export calls received, in order.
    pub fn export_calls(&self) -> Vec<(ExportTarget, ExportSettings)> {
        self.state().exports.clone()
    }

    /// Checkpoints recorded as `(label, description)`.
    pub fn checkpoints(&self) -> Vec<(String, String)> {
        self.state().checkpoints.clone()
    }

    /// Notifications shown to the user.
    pub fn notifications(&self) -> Vec<String> {
        self.state().notifications.clone()
    }
}

#[async_trait]
impl CanvasHost for MemoryHost {
    async fn selection(&self) -> Vec<CanvasNode> {
        self.state().selection.clone()
    }

    async fn export(&self, target: &ExportTarget, settings: &ExportSettings) -> Result<Bytes, HostError> {
        let mut state = self.state();
        state.exports.push((target.clone(), *settings));
        match &state.export_failure {
            Some(message) => Err(HostError::new(message.clone())),
            None => Ok(self.image.clone()),
        }
    }

    async fn save_checkpoint(&self, label: &str, description: &str) -> Result<(), HostError> {
        let mut state = self.state();
        if let Some(message) = &state.checkpoint_failure {
            return Err(HostError::new(message.clone()));
        }
        state.checkpoints.push((label.to_owned(), description.to_owned()));
        Ok(())
    }

    async fn notify(&self, message: &str) {
        self.state().notifications.push(message.to_owned());
    }

    fn selection_changes(&self) -> broadcast::Receiver<Vec<CanvasNode>> {
        self.changes.subscribe()
    }
}
