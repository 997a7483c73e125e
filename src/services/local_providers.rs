//! Proveedores en proceso
//!
//! Ejecutan las mismas fórmulas que los servicios remotos sin salir del
//! proceso. Se usan en tests y con `PROVIDER_MODE=local`.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::debug;

use crate::models::scoring::{compute_grade, compute_price, MAX_GRADE, MIN_GRADE};
use crate::models::{BuildData, Vehicle};
use crate::services::providers::{
    BuildDataProvider, InspectionProvider, PricingProvider, BUILD_DATA_PROVIDER, PRICING_PROVIDER,
};
use crate::utils::errors::ProviderError;
use crate::utils::validation::current_year;

const CATALOG_WILDCARD: &str = "*";

/// Catálogo VIN → datos de fábrica, con una entrada opcional para VINs desconocidos
#[derive(Debug, Clone, Default)]
pub struct CatalogBuildDataProvider {
    entries: HashMap<String, BuildData>,
    fallback: Option<BuildData>,
}

impl CatalogBuildDataProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, data: BuildData) -> Self {
        self.entries.insert(data.vin.clone(), data);
        self
    }

    pub fn with_fallback(mut self, data: BuildData) -> Self {
        self.fallback = Some(data);
        self
    }

    /// Cargar un catálogo JSON: lista de build data; la entrada con VIN `"*"` es el fallback
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let entries: Vec<BuildData> = serde_json::from_str(json)?;
        Ok(entries.into_iter().fold(Self::new(), |catalog, data| {
            if data.vin == CATALOG_WILDCARD {
                catalog.with_fallback(data)
            } else {
                catalog.with_entry(data)
            }
        }))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl BuildDataProvider for CatalogBuildDataProvider {
    async fn fetch(&self, vin: &str) -> Result<BuildData, ProviderError> {
        if let Some(data) = self.entries.get(vin) {
            return Ok(data.clone());
        }

        match &self.fallback {
            Some(fallback) => {
                debug!("📒 VIN {} fuera del catálogo, usando datos por defecto", vin);
                Ok(BuildData {
                    vin: vin.to_string(),
                    ..fallback.clone()
                })
            }
            None => Err(ProviderError::NotFound {
                provider: BUILD_DATA_PROVIDER,
                message: format!("no build data for VIN '{}'", vin),
            }),
        }
    }
}

/// Inspección local con el año actual fijo o tomado del reloj
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalInspectionProvider {
    current_year: Option<i32>,
}

impl LocalInspectionProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fijar el año de referencia (tests deterministas)
    pub fn at_year(current_year: i32) -> Self {
        Self {
            current_year: Some(current_year),
        }
    }
}

#[async_trait]
impl InspectionProvider for LocalInspectionProvider {
    async fn inspect_vehicle(&self, vehicle: &mut Vehicle) -> Result<(), ProviderError> {
        let year = self.current_year.unwrap_or_else(current_year);
        vehicle.grade = compute_grade(vehicle, year);
        debug!("🔎 VIN {} inspeccionado: grado {}", vehicle.vin, vehicle.grade);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalPricingProvider;

#[async_trait]
impl PricingProvider for LocalPricingProvider {
    async fn get_recommended_price(&self, vehicle: &Vehicle) -> Result<Decimal, ProviderError> {
        if !(MIN_GRADE..=MAX_GRADE).contains(&vehicle.grade) {
            return Err(ProviderError::Rejected {
                provider: PRICING_PROVIDER,
                message: format!("grade {} outside {}..={}", vehicle.grade, MIN_GRADE, MAX_GRADE),
            });
        }
        if vehicle.msrp.is_sign_negative() {
            return Err(ProviderError::Rejected {
                provider: PRICING_PROVIDER,
                message: format!("negative MSRP {}", vehicle.msrp),
            });
        }
        compute_price(vehicle).ok_or_else(|| ProviderError::Rejected {
            provider: PRICING_PROVIDER,
            message: format!("MSRP {} out of range", vehicle.msrp),
        })
    }
}

/// Proveedor que siempre falla, para probar la propagación de errores
#[derive(Debug, Clone)]
pub struct FailingProvider {
    pub error: ProviderError,
}

impl FailingProvider {
    pub fn unavailable(provider: &'static str) -> Self {
        Self {
            error: ProviderError::Unavailable {
                provider,
                message: "service down".to_string(),
            },
        }
    }
}

#[async_trait]
impl BuildDataProvider for FailingProvider {
    async fn fetch(&self, _vin: &str) -> Result<BuildData, ProviderError> {
        Err(self.error.clone())
    }
}

#[async_trait]
impl InspectionProvider for FailingProvider {
    async fn inspect_vehicle(&self, _vehicle: &mut Vehicle) -> Result<(), ProviderError> {
        Err(self.error.clone())
    }
}

#[async_trait]
impl PricingProvider for FailingProvider {
    async fn get_recommended_price(&self, _vehicle: &Vehicle) -> Result<Decimal, ProviderError> {
        Err(self.error.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn honda(vin: &str) -> BuildData {
        BuildData {
            vin: vin.to_string(),
            brand: "Honda".to_string(),
            engine: "2.4L I4".to_string(),
            transmission: "Automatic".to_string(),
            msrp: Decimal::from(25_000),
        }
    }

    #[tokio::test]
    async fn catalog_from_json_with_wildcard_fallback() {
        let catalog = CatalogBuildDataProvider::from_json(
            r#"[
                {"vin": "1HGCM82633A123456", "brand": "Honda", "engine": "2.4L I4", "transmission": "Automatic", "msrp": "25000"},
                {"vin": "*", "brand": "Generic", "engine": "unknown", "transmission": "unknown", "msrp": "20000"}
            ]"#,
        )
        .unwrap();

        assert_eq!(catalog.len(), 1);
        let unknown = catalog.fetch("2HGCM82633A654321").await.unwrap();
        assert_eq!(unknown.vin, "2HGCM82633A654321");
        assert_eq!(unknown.brand, "Generic");
        assert!(CatalogBuildDataProvider::from_json("{}").is_err());
    }

    #[tokio::test]
    async fn catalog_returns_entry_or_not_found() {
        let provider = CatalogBuildDataProvider::new().with_entry(honda("1HGCM82633A123456"));

        assert_eq!(provider.fetch("1HGCM82633A123456").await.unwrap().brand, "Honda");
        assert!(matches!(
            provider.fetch("2HGCM82633A654321").await,
            Err(ProviderError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn catalog_fallback_keeps_requested_vin() {
        let provider = CatalogBuildDataProvider::new().with_fallback(honda("00000000000000000"));
        let data = provider.fetch("2HGCM82633A654321").await.unwrap();
        assert_eq!(data.vin, "2HGCM82633A654321");
        assert_eq!(data.msrp, Decimal::from(25_000));
    }

    #[tokio::test]
    async fn local_inspection_sets_grade() {
        let mut v = Vehicle {
            vin: "1HGBH41JXMN109186".to_string(),
            year: 2022,
            odometer: 12_000,
            ..Default::default()
        };
        LocalInspectionProvider::at_year(2022).inspect_vehicle(&mut v).await.unwrap();
        assert_eq!(v.grade, 50);
    }

    #[tokio::test]
    async fn local_pricing_rejects_uninspected_vehicle() {
        let v = Vehicle {
            msrp: Decimal::from(10_000),
            ..Default::default()
        };
        let err = LocalPricingProvider.get_recommended_price(&v).await.unwrap_err();
        assert_eq!(err.provider(), PRICING_PROVIDER);
    }

    #[tokio::test]
    async fn local_pricing_rejects_msrp_that_overflows() {
        let v = Vehicle {
            grade: MAX_GRADE,
            msrp: Decimal::MAX,
            exterior_color: Some("black".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            LocalPricingProvider.get_recommended_price(&v).await,
            Err(ProviderError::Rejected { provider: PRICING_PROVIDER, .. })
        ));
    }
}
