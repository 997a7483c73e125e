//! Casos de uso de un vehículo
//!
//! Validar → enriquecer → persistir. La validación siempre va antes de
//! cualquier llamada a un proveedor.

use std::borrow::Cow;
use std::sync::Arc;
use tracing::info;
use validator::{ValidationError, ValidationErrors};

use crate::dto::vehicle_dto::ApiResponse;
use crate::models::Vehicle;
use crate::repositories::VehicleRepository;
use crate::services::enrichment_service::VehicleEnricher;
use crate::utils::errors::{not_found_error, AppResult};

pub struct VehicleController {
    repository: Arc<dyn VehicleRepository>,
    enricher: Arc<VehicleEnricher>,
}

impl VehicleController {
    pub fn new(repository: Arc<dyn VehicleRepository>, enricher: Arc<VehicleEnricher>) -> Self {
        Self { repository, enricher }
    }

    pub async fn create(&self, mut vehicle: Vehicle) -> AppResult<ApiResponse<Vehicle>> {
        vehicle.check()?;

        self.enricher.enrich(&mut vehicle).await?;
        self.repository.save(&vehicle).await?;

        info!("🚗 Vehículo {} creado (grade {}, precio {})", vehicle.vin, vehicle.grade, vehicle.price);
        Ok(ApiResponse::success_with_message(
            vehicle,
            "Vehicle created successfully".to_string(),
        ))
    }

    pub async fn get(&self, vin: &str) -> AppResult<Vehicle> {
        self.repository
            .find_by_vin(vin)
            .await?
            .ok_or_else(|| not_found_error(vin))
    }

    pub async fn list(&self) -> AppResult<Vec<Vehicle>> {
        self.repository.list().await
    }

    /// Re-enriquecimiento completo: año, odómetro o flags pueden haber cambiado
    pub async fn update(&self, vin: &str, mut vehicle: Vehicle) -> AppResult<ApiResponse<Vehicle>> {
        if vehicle.vin.is_empty() {
            vehicle.vin = vin.to_string();
        } else if vehicle.vin != vin {
            return Err(vin_mismatch(vin, &vehicle.vin).into());
        }
        vehicle.check()?;

        if self.repository.find_by_vin(vin).await?.is_none() {
            return Err(not_found_error(vin));
        }

        self.enricher.enrich(&mut vehicle).await?;
        self.repository.update(&vehicle).await?;

        info!("🔄 Vehículo {} actualizado (grade {}, precio {})", vehicle.vin, vehicle.grade, vehicle.price);
        Ok(ApiResponse::success_with_message(
            vehicle,
            "Vehicle updated successfully".to_string(),
        ))
    }

    pub async fn delete(&self, vin: &str) -> AppResult<()> {
        self.repository.delete(vin).await?;
        info!("🗑️ Vehículo {} eliminado", vin);
        Ok(())
    }
}

fn vin_mismatch(path_vin: &str, body_vin: &str) -> ValidationErrors {
    let mut error = ValidationError::new("vin_mismatch");
    error.message = Some(Cow::from(format!(
        "body VIN '{}' does not match path VIN '{}'",
        body_vin, path_vin
    )));

    let mut errors = ValidationErrors::new();
    errors.add("vin", error);
    errors
}
