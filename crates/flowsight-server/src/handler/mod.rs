//! Route handlers, their request and response bodies, and HTTP errors.

mod analyze;
mod error;
mod monitors;
pub mod request;
pub mod response;
mod schema;

use axum::Router;

pub use crate::handler::error::{Error, ErrorKind, Result};
use crate::service::ServiceState;

/// Tracing target for unmatched routes.
const TRACING_TARGET: &str = "flowsight_server::handler";

/// Returns a [`Router`] with every API route and a JSON `404` fallback.
///
/// State is not yet applied: call [`Router::with_state`] with a
/// [`ServiceState`].
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .merge(analyze::routes())
        .merge(schema::routes())
        .merge(monitors::routes())
        .fallback(fallback)
}

async fn fallback(uri: axum::http::Uri) -> ErrorKind {
    tracing::debug!(target: TRACING_TARGET, path = %uri.path(), "No route matched");
    ErrorKind::NotFound
}
