//! Casos de uso masivos
//!
//! El lote completo se valida, luego se enriquece con el pool de workers y
//! solo si todo salió bien se persiste en una única transacción.

use std::sync::Arc;
use tracing::info;

use crate::dto::vehicle_dto::ApiResponse;
use crate::models::VehiclesBulk;
use crate::repositories::VehicleRepository;
use crate::services::bulk_enrichment_service::BulkEnricher;
use crate::utils::errors::AppResult;

pub struct VehiclesBulkController {
    repository: Arc<dyn VehicleRepository>,
    bulk: BulkEnricher,
}

impl VehiclesBulkController {
    pub fn new(repository: Arc<dyn VehicleRepository>, bulk: BulkEnricher) -> Self {
        Self { repository, bulk }
    }

    pub async fn create_bulk(&self, batch: VehiclesBulk) -> AppResult<ApiResponse<VehiclesBulk>> {
        batch.check()?;

        let enriched = self.bulk.enrich_batch(batch).await?;
        self.repository.save_bulk(&enriched).await?;

        info!("📦 {} vehículos creados en lote", enriched.len());
        let message = format!("{} vehicles created successfully", enriched.len());
        Ok(ApiResponse::success_with_message(enriched, message))
    }

    pub async fn update_bulk(&self, batch: VehiclesBulk) -> AppResult<ApiResponse<VehiclesBulk>> {
        batch.check()?;

        let enriched = self.bulk.enrich_batch(batch).await?;
        self.repository.update_bulk(&enriched).await?;

        info!("📦 {} vehículos actualizados en lote", enriched.len());
        let message = format!("{} vehicles updated successfully", enriched.len());
        Ok(ApiResponse::success_with_message(enriched, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BuildData, Vehicle};
    use crate::repositories::InMemoryVehicleRepository;
    use crate::services::enrichment_service::VehicleEnricher;
    use crate::services::local_providers::{
        CatalogBuildDataProvider, LocalInspectionProvider, LocalPricingProvider,
    };
    use crate::utils::errors::AppError;
    use rust_decimal::Decimal;

    fn vehicle(i: usize) -> Vehicle {
        Vehicle {
            vin: format!("JH4KA8260MC{:06}", i),
            year: 2019,
            odometer: 60_000,
            ..Default::default()
        }
    }

    fn controller(repo: Arc<InMemoryVehicleRepository>) -> VehiclesBulkController {
        let catalog = CatalogBuildDataProvider::new().with_fallback(BuildData {
            vin: String::new(),
            brand: "Acura".to_string(),
            engine: "3.5L V6".to_string(),
            transmission: "Automatic".to_string(),
            msrp: Decimal::from(45_000),
        });
        let enricher = VehicleEnricher::new(
            Arc::new(catalog),
            Arc::new(LocalInspectionProvider::at_year(2025)),
            Arc::new(LocalPricingProvider),
        );
        VehiclesBulkController::new(repo, BulkEnricher::new(Arc::new(enricher), 5))
    }

    #[tokio::test]
    async fn create_then_update_bulk() {
        let repo = Arc::new(InMemoryVehicleRepository::new());
        let controller = controller(repo.clone());

        let created = controller
            .create_bulk(VehiclesBulk::new((0..12).map(vehicle).collect()))
            .await
            .unwrap()
            .data
            .unwrap();
        assert_eq!(created.len(), 12);
        assert_eq!(repo.len().await, 12);
        assert!(created.vehicles.iter().all(|v| v.grade == 44));

        let mut changed: Vec<Vehicle> = (0..12).map(vehicle).collect();
        changed[3].electric_fail = true;
        controller.update_bulk(VehiclesBulk::new(changed)).await.unwrap();

        let stored = repo.find_by_vin(&vehicle(3).vin).await.unwrap().unwrap();
        assert_eq!(stored.grade, 40);
        assert_eq!(stored.brand.as_deref(), Some("Acura"));
    }

    #[tokio::test]
    async fn one_invalid_member_persists_nothing() {
        let repo = Arc::new(InMemoryVehicleRepository::new());
        let mut vehicles: Vec<Vehicle> = (0..5).map(vehicle).collect();
        vehicles[2].odometer = -1;

        let err = controller(repo.clone())
            .create_bulk(VehiclesBulk::new(vehicles))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidBatch(_)));
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn update_bulk_with_unknown_vin_persists_nothing() {
        let repo = Arc::new(InMemoryVehicleRepository::new());
        let controller = controller(repo.clone());
        controller
            .create_bulk(VehiclesBulk::new(vec![vehicle(0)]))
            .await
            .unwrap();

        let mut changed = vehicle(0);
        changed.odometer = 1;
        let err = controller
            .update_bulk(VehiclesBulk::new(vec![changed, vehicle(1)]))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(repo.find_by_vin(&vehicle(0).vin).await.unwrap().unwrap().odometer, 60_000);
    }
}
