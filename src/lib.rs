//! Servicio de subastas de vehículos
//!
//! Cada vehículo se enriquece antes de guardarse: datos de fábrica,
//! inspección (grade) y precio recomendado. Los lotes se enriquecen con un
//! pool acotado de workers y se persisten con una escritura stage-then-merge.

pub mod clients;
pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use axum::Router;
use tower_http::cors::CorsLayer;

use middleware::trace_middleware;
use routes::{health_routes::create_health_router, vehicle_routes::create_vehicle_router};
use state::AppState;

/// Router completo de la API
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .merge(create_health_router())
        .nest("/api/vehicles", create_vehicle_router())
        .layer(trace_middleware())
        .layer(cors)
        .with_state(state)
}
