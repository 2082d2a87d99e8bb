//! HTTP server setup

use std::future::Future;
use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::app::options::ServerOptions;
use crate::errors::DeviceError;
use crate::server::handlers::{
    create_device_handler, delete_device_handler, devices_by_brand_handler,
    devices_by_state_handler, get_device_handler, health_handler, list_devices_handler,
    patch_device_handler, ping_handler, replace_device_handler, version_handler,
};
use crate::server::state::ServerState;

/// Build the application router
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        // Health and version
        .route("/health", get(health_handler))
        .route("/version", get(version_handler))
        // Devices
        .route("/api/devices/ping", get(ping_handler))
        .route(
            "/api/devices",
            get(list_devices_handler).post(create_device_handler),
        )
        .route(
            "/api/devices/{id}",
            get(get_device_handler)
                .put(replace_device_handler)
                .patch(patch_device_handler)
                .delete(delete_device_handler),
        )
        .route("/api/devices/brand/{brand}", get(devices_by_brand_handler))
        .route("/api/devices/state/{state}", get(devices_by_state_handler))
        // State and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Start the HTTP server
pub async fn serve(
    options: &ServerOptions,
    state: Arc<ServerState>,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<JoinHandle<Result<(), DeviceError>>, DeviceError> {
    let app = router(state);

    let addr = format!("{}:{}", options.host, options.port);
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| DeviceError::ServerError(e.to_string()))?;

    let handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| DeviceError::ServerError(e.to_string()))
    });

    Ok(handle)
}
