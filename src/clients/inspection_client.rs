//! Cliente HTTP del servicio de inspección
//!
//! `POST {base}/inspections` devuelve `{grade}`. El mismo servicio puede servir
//! build data (`GET {base}/build-data/{vin}`) cuando ambos están colocados.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::build_data_client::fetch_build_data;
use super::{http_client, read_json, transport_error, trim_base_url};
use crate::models::scoring::{MAX_GRADE, MIN_GRADE};
use crate::models::{BuildData, Vehicle};
use crate::services::providers::{BuildDataProvider, InspectionProvider, INSPECTION_PROVIDER};
use crate::utils::errors::ProviderError;

#[derive(Debug, Serialize)]
struct InspectVehicleRequest<'a> {
    vin: &'a str,
    year: i32,
    odometer: i32,
    small_scratches: bool,
    strong_scratches: bool,
    electric_fail: bool,
    suspension_fail: bool,
}

impl<'a> From<&'a Vehicle> for InspectVehicleRequest<'a> {
    fn from(v: &'a Vehicle) -> Self {
        Self {
            vin: &v.vin,
            year: v.year,
            odometer: v.odometer,
            small_scratches: v.small_scratches,
            strong_scratches: v.strong_scratches,
            electric_fail: v.electric_fail,
            suspension_fail: v.suspension_fail,
        }
    }
}

#[derive(Debug, Deserialize)]
struct InspectVehicleResponse {
    grade: i32,
}

pub struct InspectionClient {
    client: Client,
    base_url: String,
    timeout: Duration,
    build_data_timeout: Duration,
    build_data_client: Client,
}

impl InspectionClient {
    pub fn new(base_url: &str, timeout: Duration, build_data_timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: http_client(timeout)?,
            base_url: trim_base_url(base_url),
            timeout,
            build_data_timeout,
            build_data_client: http_client(build_data_timeout)?,
        })
    }

    /// Build data servido por el propio servicio de inspección
    pub async fn get_build_data(&self, vin: &str) -> Result<BuildData, ProviderError> {
        fetch_build_data(&self.build_data_client, &self.base_url, self.build_data_timeout, vin).await
    }
}

#[async_trait]
impl InspectionProvider for InspectionClient {
    async fn inspect_vehicle(&self, vehicle: &mut Vehicle) -> Result<(), ProviderError> {
        let url = format!("{}/inspections", self.base_url);
        debug!("🌐 POST {} (VIN {})", url, vehicle.vin);

        let response = self
            .client
            .post(&url)
            .json(&InspectVehicleRequest::from(&*vehicle))
            .send()
            .await
            .map_err(|e| transport_error(INSPECTION_PROVIDER, self.timeout, e))?;

        let body: InspectVehicleResponse = read_json(INSPECTION_PROVIDER, self.timeout, response).await?;
        if !(MIN_GRADE..=MAX_GRADE).contains(&body.grade) {
            return Err(ProviderError::InvalidResponse {
                provider: INSPECTION_PROVIDER,
                message: format!("grade {} outside {}..={}", body.grade, MIN_GRADE, MAX_GRADE),
            });
        }

        vehicle.grade = body.grade;
        Ok(())
    }
}

#[async_trait]
impl BuildDataProvider for InspectionClient {
    async fn fetch(&self, vin: &str) -> Result<BuildData, ProviderError> {
        self.get_build_data(vin).await
    }
}
