//! Contrato de almacenamiento de vehículos
//!
//! Una fila por VIN. Las operaciones masivas son todo-o-nada: si falla
//! cualquier parte del lote no se persiste ningún vehículo.

use async_trait::async_trait;

use crate::models::{Vehicle, VehiclesBulk};
use crate::utils::errors::AppResult;

#[async_trait]
pub trait VehicleRepository: Send + Sync {
    /// Insertar un vehículo nuevo (VIN duplicado ⇒ Conflict)
    async fn save(&self, vehicle: &Vehicle) -> AppResult<()>;

    /// Reemplazar todos los campos mutables (VIN inexistente ⇒ NotFound)
    async fn update(&self, vehicle: &Vehicle) -> AppResult<()>;

    async fn delete(&self, vin: &str) -> AppResult<()>;

    async fn find_by_vin(&self, vin: &str) -> AppResult<Option<Vehicle>>;

    /// Todos los vehículos ordenados por VIN
    async fn list(&self) -> AppResult<Vec<Vehicle>>;

    /// Insertar un lote ya enriquecido en una sola transacción
    async fn save_bulk(&self, batch: &VehiclesBulk) -> AppResult<()>;

    /// Actualizar un lote ya enriquecido en una sola transacción.
    /// Si algún VIN no existe no se escribe nada.
    async fn update_bulk(&self, batch: &VehiclesBulk) -> AppResult<()>;
}
