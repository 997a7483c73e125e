//! DTOs - envoltorios de respuesta de la API

pub mod vehicle_dto;

pub use vehicle_dto::{ApiResponse, HealthResponse};
