//! Liveness endpoint for hosting platforms

use axum::{routing::get, Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;

/// Fixed payload served on `GET /`
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub service: &'static str,
}

const HEALTHY: HealthStatus = HealthStatus {
    status: "ok",
    service: "linkrelay",
};

async fn health_handler() -> Json<HealthStatus> {
    Json(HEALTHY)
}

/// Router with the single `GET /` route
pub fn create_health_router() -> Router {
    Router::new().route("/", get(health_handler))
}

/// Serve the health router on `listener` until the process exits
pub async fn serve(listener: TcpListener) -> std::io::Result<()> {
    axum::serve(listener, create_health_router()).await
}

/// Bind `0.0.0.0:<port>` and serve
pub async fn start_health_server(port: u16) -> std::io::Result<()> {
    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("Health check server listening on {}", addr);

    serve(listener).await
}
