//! Version history checkpoints.

use std::sync::Arc;

use jiff::Zoned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::host::{CanvasHost, HostError};

/// Tracing target for version operations.
pub const TRACING_TARGET: &str = "flowsight_canvas::version";

/// Prefix of generated checkpoint labels.
pub const DEFAULT_LABEL_PREFIX: &str = "Flowsight checkpoint ";

/// Annotation attached to every checkpoint.
pub const CHECKPOINT_DESCRIPTION: &str = "Saved automatically by Flowsight before flow analysis";

/// Timestamp layout used in generated labels.
const LABEL_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A checkpoint recorded in the host's version history.
///
/// Owned by the host once created: never mutated or deleted here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionCheckpoint {
    pub label: String,
    pub description: String,
}

/// The host refused to record a checkpoint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error(transparent)]
    Host(#[from] HostError),
}

/// Records checkpoints through the host.
#[derive(Clone)]
pub struct VersionCoordinator {
    host: Arc<dyn CanvasHost>,
}

impl VersionCoordinator {
    /// Creates a new coordinator.
    pub fn new(host: Arc<dyn CanvasHost>) -> Self {
        Self { host }
    }

    /// Records one checkpoint.
    ///
    /// A missing or empty label is replaced by [`DEFAULT_LABEL_PREFIX`]
    /// followed by the local time. Any other label is used verbatim. The user is notified on success.
    pub async fn save_checkpoint(
        &self,
        label: Option<&str>,
    ) -> Result<VersionCheckpoint, VersionError> {
        let label = match label {
            Some(label) if !label.is_empty() => label.to_owned(),
            _ => default_label(&Zoned::now()),
        };

        if let Err(error) = self.host.save_checkpoint(&label, CHECKPOINT_DESCRIPTION).await {
            tracing::warn!(
                target: TRACING_TARGET,
                label = %label,
                error = %error,
                "Host rejected checkpoint"
            );
            return Err(VersionError::Host(error));
        }

        tracing::info!(target: TRACING_TARGET, label = %label, "Checkpoint saved");
        self.host.notify(&format!("Version saved: {label}")).await;

        Ok(VersionCheckpoint {
            label,
            description: CHECKPOINT_DESCRIPTION.to_owned(),
        })
    }
}

fn default_label(now: &Zoned) -> String {
    format!("{DEFAULT_LABEL_PREFIX}{}", now.strftime(LABEL_TIMESTAMP_FORMAT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MemoryHost;

    #[tokio::test]
    async fn missing_label_uses_prefix() {
        let host = Arc::new(MemoryHost::default());
        let coordinator = VersionCoordinator::new(host.clone());

        let checkpoint = coordinator.save_checkpoint(None).await.unwrap();
        assert!(checkpoint.label.starts_with(DEFAULT_LABEL_PREFIX));
        assert!(checkpoint.label.len() > DEFAULT_LABEL_PREFIX.len());
        assert_eq!(checkpoint.description, CHECKPOINT_DESCRIPTION);

        let empty = coordinator.save_checkpoint(Some("")).await.unwrap();
        assert!(empty.label.starts_with(DEFAULT_LABEL_PREFIX));
        assert_eq!(host.checkpoints().len(), 2);
    }

    #[tokio::test]
    async fn whitespace_label_is_verbatim() {
        let host = Arc::new(MemoryHost::default());
        let coordinator = VersionCoordinator::new(host.clone());

        let checkpoint = coordinator.save_checkpoint(Some("  ")).await.unwrap();
        assert_eq!(checkpoint.label, "  ");
        assert_eq!(host.checkpoints()[0].0, "  ");
    }

    #[tokio::test]
    async fn explicit_label_is_verbatim() {
        let host = Arc::new(MemoryHost::default());
        let coordinator = VersionCoordinator::new(host.clone());

        let checkpoint = coordinator.save_checkpoint(Some("Before refactor")).await.unwrap();
        assert_eq!(checkpoint.label, "Before refactor");
        assert_eq!(
            host.checkpoints(),
            vec![("Before refactor".to_owned(), CHECKPOINT_DESCRIPTION.to_owned())]
        );
        assert_eq!(host.notifications(), vec!["Version saved: Before refactor".to_owned()]);
    }

    #[tokio::test]
    async fn host_failure_is_relayed_without_notification() {
        let host = Arc::new(MemoryHost::default());
        host.fail_checkpoints("History is read-only");
        let coordinator = VersionCoordinator::new(host.clone());

        let error = coordinator.save_checkpoint(Some("v1")).await.unwrap_err();
        assert_eq!(error.to_string(), "History is read-only");
        assert!(host.notifications().is_empty());
    }

    #[test]
    fn default_label_formats_timestamp() {
        let now: Zoned = "2024-03-09T14:05:07[UTC]".parse().unwrap();
        assert_eq!(default_label(&now), "Flowsight checkpoint 2024-03-09 14:05:07");
    }
}
