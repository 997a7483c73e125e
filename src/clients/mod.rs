//! Clients - HTTP Clients for External APIs
//!
//! Clientes JSON sobre HTTP para los servicios de build data, inspección y
//! pricing. Cada cliente tiene su propio timeout; un timeout es un fallo de
//! esa llamada, nunca un error fatal del proceso.

pub mod build_data_client;
pub mod inspection_client;
pub mod pricing_client;

pub use build_data_client::BuildDataClient;
pub use inspection_client::InspectionClient;
pub use pricing_client::PricingClient;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::utils::errors::ProviderError;

/// Construir un cliente HTTP con timeout total por petición
pub(crate) fn http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder().timeout(timeout).build()
}

/// Traducir errores de transporte de reqwest
pub(crate) fn transport_error(provider: &'static str, timeout: Duration, e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout {
            provider,
            timeout_ms: timeout.as_millis(),
        }
    } else {
        ProviderError::Unavailable {
            provider,
            message: e.to_string(),
        }
    }
}

/// Leer el cuerpo JSON de una respuesta 2xx o traducir el status a `ProviderError`
pub(crate) async fn read_json<T: DeserializeOwned>(
    provider: &'static str,
    timeout: Duration,
    response: Response,
) -> Result<T, ProviderError> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = format!("HTTP {}: {}", status, body.trim());
        return Err(match status {
            StatusCode::NOT_FOUND => ProviderError::NotFound { provider, message },
            s if s.is_client_error() => ProviderError::Rejected { provider, message },
            _ => ProviderError::Unavailable { provider, message },
        });
    }

    response.json::<T>().await.map_err(|e| {
        if e.is_timeout() {
            transport_error(provider, timeout, e)
        } else {
            ProviderError::InvalidResponse {
                provider,
                message: e.to_string(),
            }
        }
    })
}

/// Quitar la barra final de una URL base
pub(crate) fn trim_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}
