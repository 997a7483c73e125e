//! Contratos de los proveedores externos
//!
//! Cada rol (build data, inspección, pricing) es un trait propio con dos
//! variantes: cliente remoto (`crate::clients`) e implementación local
//! (`crate::services::local_providers`).

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::models::{BuildData, Vehicle};
use crate::utils::errors::ProviderError;

pub const BUILD_DATA_PROVIDER: &str = "build-data";
pub const INSPECTION_PROVIDER: &str = "inspection";
pub const PRICING_PROVIDER: &str = "pricing";

/// Datos de fábrica y MSRP por VIN
#[async_trait]
pub trait BuildDataProvider: Send + Sync {
    async fn fetch(&self, vin: &str) -> Result<BuildData, ProviderError>;
}

/// Inspección: calcula el grado y lo escribe en el vehículo
#[async_trait]
pub trait InspectionProvider: Send + Sync {
    async fn inspect_vehicle(&self, vehicle: &mut Vehicle) -> Result<(), ProviderError>;
}

/// Precio recomendado a partir de grado, MSRP y atributos de condición
#[async_trait]
pub trait PricingProvider: Send + Sync {
    async fn get_recommended_price(&self, vehicle: &Vehicle) -> Result<Decimal, ProviderError>;
}
