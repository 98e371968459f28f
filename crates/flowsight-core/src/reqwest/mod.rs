//! Reqwest-based provider for OpenAI-compatible reasoning services.
//!
//! # Example
//!
//! ```rust,ignore
//! use flowsight_core::reqwest::{ReqwestConfig, ReqwestProvider};
//!
//! let provider = ReqwestProvider::new(ReqwestConfig::new(api_key))?;
//! let service = provider.into_service();
//! let outcome = service.analyze(png_bytes, Some("image/png")).await?;
//! ```

mod client;
mod config;
mod error;

pub use client::ReqwestProvider;
pub use config::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS, ReqwestConfig};
pub use error::{Error, Result};

/// Tracing target for reqwest provider operations.
pub const TRACING_TARGET: &str = "flowsight_core::reqwest";
