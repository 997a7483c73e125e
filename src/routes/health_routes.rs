use axum::{routing::get, Json, Router};

use crate::dto::vehicle_dto::HealthResponse;
use crate::state::AppState;

pub fn create_health_router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
