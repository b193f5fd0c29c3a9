//! HTTP server hosting the dataset, so `carfetch fetch` has something to hit.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json as AxumJson, Response},
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use carfetch::RESOURCE_PATH;

/// Shared server state passed to all handlers via axum State.
pub struct ServerState {
    pub dataset: String,
}

/// Routes: `GET /mtcars.json` and `GET /health`.
pub fn router(dataset: String) -> Router {
    let state = Arc::new(ServerState { dataset });

    Router::new()
        .route(&format!("/{RESOURCE_PATH}"), get(handle_dataset))
        .route("/health", get(handle_health))
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
        .with_state(state)
}

/// Serve the dataset on `addr` until the process is stopped.
pub async fn run(addr: &str, dataset: String) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Serving /{RESOURCE_PATH} on http://{}", listener.local_addr()?);
    axum::serve(listener, router(dataset)).await?;
    Ok(())
}

async fn handle_dataset(State(state): State<Arc<ServerState>>) -> Response {
    tracing::debug!("GET /{RESOURCE_PATH}");
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        state.dataset.clone(),
    )
        .into_response()
}

async fn handle_health(State(state): State<Arc<ServerState>>) -> AxumJson<serde_json::Value> {
    AxumJson(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "bytes": state.dataset.len(),
    }))
}
