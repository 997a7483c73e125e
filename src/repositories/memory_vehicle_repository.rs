//! Repositorio en memoria
//!
//! Mismo contrato que el de PostgreSQL: los lotes se validan completos antes
//! de tocar el mapa, así que un fallo no deja escrituras parciales.

use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::vehicle_repository::VehicleRepository;
use crate::models::{Vehicle, VehiclesBulk};
use crate::utils::errors::{conflict_error, not_found_error, AppResult};

#[derive(Default)]
pub struct InMemoryVehicleRepository {
    vehicles: RwLock<BTreeMap<String, Vehicle>>,
}

impl InMemoryVehicleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.vehicles.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.vehicles.read().await.is_empty()
    }
}

#[async_trait]
impl VehicleRepository for InMemoryVehicleRepository {
    async fn save(&self, vehicle: &Vehicle) -> AppResult<()> {
        let mut vehicles = self.vehicles.write().await;
        if vehicles.contains_key(&vehicle.vin) {
            return Err(conflict_error(&vehicle.vin));
        }
        vehicles.insert(vehicle.vin.clone(), vehicle.clone());
        Ok(())
    }

    async fn update(&self, vehicle: &Vehicle) -> AppResult<()> {
        let mut vehicles = self.vehicles.write().await;
        match vehicles.get_mut(&vehicle.vin) {
            Some(stored) => {
                *stored = vehicle.clone();
                Ok(())
            }
            None => Err(not_found_error(&vehicle.vin)),
        }
    }

    async fn delete(&self, vin: &str) -> AppResult<()> {
        self.vehicles
            .write()
            .await
            .remove(vin)
            .map(|_| ())
            .ok_or_else(|| not_found_error(vin))
    }

    async fn find_by_vin(&self, vin: &str) -> AppResult<Option<Vehicle>> {
        Ok(self.vehicles.read().await.get(vin).cloned())
    }

    async fn list(&self) -> AppResult<Vec<Vehicle>> {
        Ok(self.vehicles.read().await.values().cloned().collect())
    }

    async fn save_bulk(&self, batch: &VehiclesBulk) -> AppResult<()> {
        let mut vehicles = self.vehicles.write().await;
        if let Some(existing) = batch.vehicles.iter().find(|v| vehicles.contains_key(&v.vin)) {
            return Err(conflict_error(&existing.vin));
        }
        for vehicle in &batch.vehicles {
            vehicles.insert(vehicle.vin.clone(), vehicle.clone());
        }
        Ok(())
    }

    async fn update_bulk(&self, batch: &VehiclesBulk) -> AppResult<()> {
        let mut vehicles = self.vehicles.write().await;
        if let Some(missing) = batch.vehicles.iter().find(|v| !vehicles.contains_key(&v.vin)) {
            return Err(not_found_error(&missing.vin));
        }
        for vehicle in &batch.vehicles {
            vehicles.insert(vehicle.vin.clone(), vehicle.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::errors::AppError;

    fn vehicle(vin: &str, odometer: i32) -> Vehicle {
        Vehicle {
            vin: vin.to_string(),
            year: 2021,
            odometer,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn crud_round_trip() {
        let repo = InMemoryVehicleRepository::new();
        let v = vehicle("1HGCM82633A000001", 100);

        repo.save(&v).await.unwrap();
        assert!(matches!(repo.save(&v).await, Err(AppError::Conflict(_))));
        assert_eq!(repo.find_by_vin(&v.vin).await.unwrap(), Some(v.clone()));

        let changed = vehicle("1HGCM82633A000001", 200);
        repo.update(&changed).await.unwrap();
        assert_eq!(repo.find_by_vin(&v.vin).await.unwrap().unwrap().odometer, 200);

        repo.delete(&v.vin).await.unwrap();
        assert!(matches!(repo.delete(&v.vin).await, Err(AppError::NotFound(_))));
        assert_eq!(repo.find_by_vin(&v.vin).await.unwrap(), None);
    }

    #[tokio::test]
    async fn list_is_ordered_by_vin() {
        let repo = InMemoryVehicleRepository::new();
        for vin in ["1HGCM82633A000003", "1HGCM82633A000001", "1HGCM82633A000002"] {
            repo.save(&vehicle(vin, 0)).await.unwrap();
        }

        let vins: Vec<String> = repo.list().await.unwrap().into_iter().map(|v| v.vin).collect();
        assert_eq!(vins, ["1HGCM82633A000001", "1HGCM82633A000002", "1HGCM82633A000003"]);
    }

    #[tokio::test]
    async fn save_bulk_with_existing_vin_writes_nothing() {
        let repo = InMemoryVehicleRepository::new();
        repo.save(&vehicle("1HGCM82633A000002", 0)).await.unwrap();

        let batch = VehiclesBulk::new(vec![
            vehicle("1HGCM82633A000001", 0),
            vehicle("1HGCM82633A000002", 0),
        ]);
        assert!(matches!(repo.save_bulk(&batch).await, Err(AppError::Conflict(_))));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn update_bulk_with_missing_vin_writes_nothing() {
        let repo = InMemoryVehicleRepository::new();
        repo.save(&vehicle("1HGCM82633A000001", 10)).await.unwrap();

        let batch = VehiclesBulk::new(vec![
            vehicle("1HGCM82633A000001", 99),
            vehicle("1HGCM82633A000009", 99),
        ]);
        assert!(matches!(repo.update_bulk(&batch).await, Err(AppError::NotFound(_))));

        let stored = repo.find_by_vin("1HGCM82633A000001").await.unwrap().unwrap();
        assert_eq!(stored.odometer, 10);
    }
}
