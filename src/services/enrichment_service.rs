//! Enriquecimiento de un vehículo
//!
//! build data → inspección → pricing, siempre en ese orden porque cada paso
//! usa el resultado del anterior. Cualquier fallo corta la secuencia y se
//! devuelve tal cual; el vehículo puede quedar a medio enriquecer en memoria
//! y el llamador no debe persistirlo.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::models::Vehicle;
use crate::services::providers::{BuildDataProvider, InspectionProvider, PricingProvider};
use crate::utils::errors::ProviderError;

#[derive(Clone)]
pub struct VehicleEnricher {
    build_data: Arc<dyn BuildDataProvider>,
    inspection: Arc<dyn InspectionProvider>,
    pricing: Arc<dyn PricingProvider>,
}

impl VehicleEnricher {
    pub fn new(
        build_data: Arc<dyn BuildDataProvider>,
        inspection: Arc<dyn InspectionProvider>,
        pricing: Arc<dyn PricingProvider>,
    ) -> Self {
        Self {
            build_data,
            inspection,
            pricing,
        }
    }

    /// Enriquecer un vehículo ya validado. Sin reintentos.
    pub async fn enrich(&self, vehicle: &mut Vehicle) -> Result<(), ProviderError> {
        let data = self.build_data.fetch(&vehicle.vin).await.map_err(|e| {
            warn!("⚠️ Build data falló para VIN {}: {}", vehicle.vin, e);
            e
        })?;
        vehicle.merge_build_data(data);

        self.inspection.inspect_vehicle(vehicle).await.map_err(|e| {
            warn!("⚠️ Inspección falló para VIN {}: {}", vehicle.vin, e);
            e
        })?;

        vehicle.price = self.pricing.get_recommended_price(vehicle).await.map_err(|e| {
            warn!("⚠️ Pricing falló para VIN {}: {}", vehicle.vin, e);
            e
        })?;

        debug!(
            vin = %vehicle.vin,
            grade = vehicle.grade,
            msrp = %vehicle.msrp,
            price = %vehicle.price,
            "✅ Vehículo enriquecido"
        );
        Ok(())
    }
}
