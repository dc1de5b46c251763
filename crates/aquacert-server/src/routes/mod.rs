//! API routes for the AquaCert server.

pub mod certificates;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::service::CertificateService;

/// Creates the main API router with all routes mounted.
pub fn create_router(service: CertificateService) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api_v1_routes(service))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

/// Permissive CORS for browser clients.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Creates the v1 API routes.
fn api_v1_routes(service: CertificateService) -> Router {
    Router::new().nest("/certificates", certificates::router(service))
}

/// GET /health
async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "aquacert-server",
    }))
}
