//! Sistema de manejo de errores
//!
//! Este módulo define los errores del servicio de vehículos
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errores de los proveedores externos (build data, inspección, pricing)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("{provider}: not found: {message}")]
    NotFound { provider: &'static str, message: String },

    #[error("{provider}: unavailable: {message}")]
    Unavailable { provider: &'static str, message: String },

    #[error("{provider}: timed out after {timeout_ms}ms")]
    Timeout { provider: &'static str, timeout_ms: u128 },

    #[error("{provider}: request rejected: {message}")]
    Rejected { provider: &'static str, message: String },

    #[error("{provider}: invalid response: {message}")]
    InvalidResponse { provider: &'static str, message: String },
}

impl ProviderError {
    /// Nombre del proveedor que falló
    pub fn provider(&self) -> &'static str {
        match self {
            ProviderError::NotFound { provider, .. }
            | ProviderError::Unavailable { provider, .. }
            | ProviderError::Timeout { provider, .. }
            | ProviderError::Rejected { provider, .. }
            | ProviderError::InvalidResponse { provider, .. } => provider,
        }
    }
}

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid batch: {0}")]
    InvalidBatch(String),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::Validation(e) => {
                tracing::warn!("Validation error: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Validation Error".to_string(),
                        message: "The provided data is invalid".to_string(),
                        details: Some(json!(e)),
                        code: Some("VALIDATION_ERROR".to_string()),
                    },
                )
            }

            AppError::InvalidBatch(msg) => {
                tracing::warn!("Invalid batch: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Validation Error".to_string(),
                        message: msg,
                        details: None,
                        code: Some("VALIDATION_ERROR".to_string()),
                    },
                )
            }

            AppError::InvalidBody(msg) => {
                tracing::warn!("Invalid request body: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Validation Error".to_string(),
                        message: msg,
                        details: None,
                        code: Some("VALIDATION_ERROR".to_string()),
                    },
                )
            }

            AppError::NotFound(msg) => {
                tracing::warn!("Resource not found: {}", msg);
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse {
                        error: "Not Found".to_string(),
                        message: msg,
                        details: None,
                        code: Some("NOT_FOUND".to_string()),
                    },
                )
            }

            AppError::Conflict(msg) => {
                tracing::warn!("Conflict: {}", msg);
                (
                    StatusCode::CONFLICT,
                    ErrorResponse {
                        error: "Conflict".to_string(),
                        message: msg,
                        details: None,
                        code: Some("CONFLICT".to_string()),
                    },
                )
            }

            AppError::Provider(e) => {
                tracing::error!("Provider error: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorResponse {
                        error: "Provider Error".to_string(),
                        message: "An error occurred while communicating with an external service".to_string(),
                        details: Some(json!({ "provider": e.provider() })),
                        code: Some("PROVIDER_ERROR".to_string()),
                    },
                )
            }

            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Storage Error".to_string(),
                        message: "An error occurred while accessing the database".to_string(),
                        details: None,
                        code: Some("STORAGE_ERROR".to_string()),
                    },
                )
            }

            AppError::Storage(msg) => {
                tracing::error!("Storage error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Storage Error".to_string(),
                        message: "An error occurred while accessing the database".to_string(),
                        details: None,
                        code: Some("STORAGE_ERROR".to_string()),
                    },
                )
            }

            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Internal Server Error".to_string(),
                        message: "An unexpected error occurred".to_string(),
                        details: None,
                        code: Some("INTERNAL_ERROR".to_string()),
                    },
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Cuerpos JSON que no deserializan responden con el mismo sobre de validación
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidBody(rejection.body_text())
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(vin: &str) -> AppError {
    AppError::NotFound(format!("Vehicle with VIN '{}' not found", vin))
}

/// Función helper para crear errores de conflicto
pub fn conflict_error(vin: &str) -> AppError {
    AppError::Conflict(format!("Vehicle with VIN '{}' already exists", vin))
}

/// Traducir errores de sqlx: violación de clave única → Conflict
pub fn map_write_error(e: sqlx::Error, vin: Option<&str>) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return match vin {
                Some(vin) => conflict_error(vin),
                None => AppError::Conflict("Batch contains a VIN that already exists".to_string()),
            };
        }
    }
    AppError::Database(e)
}
