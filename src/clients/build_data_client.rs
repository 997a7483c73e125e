//! Cliente HTTP del servicio de build data
//!
//! `GET {base}/build-data/{vin}` → `{vin, brand, engine, transmission, msrp}`

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{http_client, read_json, transport_error, trim_base_url};
use crate::models::BuildData;
use crate::services::providers::{BuildDataProvider, BUILD_DATA_PROVIDER};
use crate::utils::errors::ProviderError;

/// Payload de build data compartido con el cliente de inspección
#[derive(Debug, Deserialize)]
pub(crate) struct BuildDataPayload {
    pub vin: Option<String>,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub engine: String,
    #[serde(default)]
    pub transmission: String,
    pub msrp: Decimal,
}

impl BuildDataPayload {
    pub(crate) fn into_build_data(self, requested_vin: &str) -> BuildData {
        BuildData {
            vin: self.vin.unwrap_or_else(|| requested_vin.to_string()),
            brand: self.brand,
            engine: self.engine,
            transmission: self.transmission,
            msrp: self.msrp,
        }
    }
}

pub struct BuildDataClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl BuildDataClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: http_client(timeout)?,
            base_url: trim_base_url(base_url),
            timeout,
        })
    }
}

/// GET de build data, compartido con el cliente de inspección (despliegue colocado)
pub(crate) async fn fetch_build_data(
    client: &Client,
    base_url: &str,
    timeout: Duration,
    vin: &str,
) -> Result<BuildData, ProviderError> {
    let url = format!("{}/build-data/{}", base_url, vin);
    debug!("🌐 GET {}", url);

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| transport_error(BUILD_DATA_PROVIDER, timeout, e))?;

    let payload: BuildDataPayload = read_json(BUILD_DATA_PROVIDER, timeout, response).await?;
    if payload.msrp.is_sign_negative() {
        return Err(ProviderError::InvalidResponse {
            provider: BUILD_DATA_PROVIDER,
            message: format!("negative MSRP {}", payload.msrp),
        });
    }
    Ok(payload.into_build_data(vin))
}

#[async_trait]
impl BuildDataProvider for BuildDataClient {
    async fn fetch(&self, vin: &str) -> Result<BuildData, ProviderError> {
        fetch_build_data(&self.client, &self.base_url, self.timeout, vin).await
    }
}
