#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod export;
pub mod host;
pub mod protocol;
pub mod session;
pub mod version;

#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub mod mock;

pub use crate::export::{ExportArtifact, ExportCoordinator, ExportError};
pub use crate::host::{CanvasHost, CanvasNode, ExportSettings, ExportTarget, HostError, ImageFormat};
pub use crate::protocol::{InboundMessage, OutboundMessage};
pub use crate::session::{CanvasSession, SessionEnd};
pub use crate::version::{VersionCheckpoint, VersionCoordinator, VersionError};
