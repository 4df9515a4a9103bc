//! HTTP transport for the auth service.
//!
//! Routes requests to an [`auth_service_lib::AuthService`], maps every
//! `AppError` kind to a status code and never serializes password hashes.

pub mod extractors;
pub mod handlers;
pub mod openapi;
pub mod routes;
pub mod state;

use std::any::Any;
use std::net::SocketAddr;

use axum::response::{IntoResponse, Response};
use tower_http::{
    catch_panic::CatchPanicLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use tracing::info;

use common::{AppError, HttpConfig};

use crate::routes::create_router;
use crate::state::AppState;

/// Router with the HTTP layers applied.
pub fn build_app(state: AppState, config: &HttpConfig) -> axum::Router {
    create_router(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TimeoutLayer::new(config.request_timeout()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// A panicking handler answers with the generic internal error.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    AppError::internal(format!("handler panicked: {}", detail)).into_response()
}

/// Run the HTTP server until Ctrl+C / SIGTERM.
pub async fn run_server(
    state: AppState,
    config: &HttpConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_app(state, config);

    let addr: SocketAddr = config.bind_address().parse()?;
    info!("HTTP server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("Failed to listen for SIGTERM: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutting down HTTP server");
}
