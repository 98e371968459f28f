//! Middleware for `axum::Router`.
//!
//! - Security: permissive CORS, body size limit
//! - Observability: request ids and tracing spans
//! - Recovery: panics and the optional request timeout
//!
//! ```rust,no_run
//! use axum::Router;
//! use flowsight_server::middleware::{
//!     RouterObservabilityExt, RouterRecoveryExt, RouterSecurityExt,
//! };
//!
//! let app: Router = Router::new()
//!     .with_default_security()
//!     .with_observability()
//!     .with_default_recovery();
//! ```

mod observability;
mod recovery;
mod security;

pub use observability::{REQUEST_ID_HEADER, RouterObservabilityExt};
pub use recovery::{RecoveryConfig, RouterRecoveryExt};
pub use security::{CorsConfig, DEFAULT_MAX_BODY_SIZE, RouterSecurityExt};
