//! Health check endpoint.

use actix_web::{HttpResponse, web};
use scribe_shared::HealthResponse;

use crate::state::AppState;

/// Health check endpoint - returns server status.
///
/// GET /health
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        store: Some(state.backend().to_string()),
    };

    HttpResponse::Ok().json(response)
}
