#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;

use std::process;

use anyhow::Context;
use axum::Router;
use flowsight_server::handler::routes;
use flowsight_server::middleware::{
    RouterObservabilityExt, RouterRecoveryExt, RouterSecurityExt,
};
use flowsight_server::service::ServiceState;

use crate::config::{Cli, MiddlewareConfig, create_reasoning_service};

// Tracing target constants
pub const TRACING_TARGET_SERVER_STARTUP: &str = "flowsight_cli::server::startup";
pub const TRACING_TARGET_SERVER_SHUTDOWN: &str = "flowsight_cli::server::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "flowsight_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            "Application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = %error,
            "Application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    Cli::init_tracing();
    tracing::info!(
        target: TRACING_TARGET_SERVER_STARTUP,
        version = env!("CARGO_PKG_VERSION"),
        "Starting flowsight server"
    );

    cli.log();
    cli.validate()?;

    let reasoning =
        create_reasoning_service(&cli).context("failed to create reasoning service")?;
    let router = create_router(ServiceState::new(reasoning), &cli.middleware);

    server::serve(router, cli.server).await?;

    Ok(())
}

/// Creates the router with all middleware layers applied.
///
/// Middleware is applied in reverse order (last added = outermost):
/// 1. Recovery (outermost) - catches panics, optional request timeout
/// 2. Observability - request IDs and tracing spans
/// 3. Security - CORS and body limit
/// 4. Routes (innermost) - actual request handlers
fn create_router(state: ServiceState, middleware: &MiddlewareConfig) -> Router {
    routes()
        .with_state(state)
        .with_security(&middleware.cors)
        .with_observability()
        .with_recovery(&middleware.recovery)
}
