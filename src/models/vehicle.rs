//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle y el lote `VehiclesBulk`.
//! Mapea exactamente a la tabla `vehicles` de PostgreSQL con primary key `vin`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashSet;
use validator::{Validate, ValidationErrors};

use crate::models::build_data::BuildData;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::{current_year, is_blank, merge_field_error, validate_model_year};

/// Vehicle principal - una fila por VIN
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow, Validate)]
pub struct Vehicle {
    #[serde(default)]
    #[validate(length(equal = 17))]
    pub vin: String,

    pub year: i32,

    #[validate(range(min = 0))]
    pub odometer: i32,

    #[serde(default, alias = "exteriorColor")]
    #[validate(length(max = 50))]
    pub exterior_color: Option<String>,

    #[serde(default, alias = "interiorColor")]
    #[validate(length(max = 50))]
    pub interior_color: Option<String>,

    #[serde(default)]
    #[validate(length(max = 50))]
    pub brand: Option<String>,

    #[serde(default)]
    #[validate(length(max = 50))]
    pub engine: Option<String>,

    #[serde(default)]
    #[validate(length(max = 50))]
    pub transmission: Option<String>,

    /// Siempre lo fija el proveedor de build data
    #[serde(default)]
    pub msrp: Decimal,

    /// 1..=50, lo fija la inspección
    #[serde(default)]
    pub grade: i32,

    /// Precio recomendado, lo fija pricing
    #[serde(default)]
    pub price: Decimal,

    #[serde(default)]
    pub small_scratches: bool,

    #[serde(default)]
    pub strong_scratches: bool,

    #[serde(default)]
    pub electric_fail: bool,

    #[serde(default)]
    pub suspension_fail: bool,
}

impl Vehicle {
    /// Validación estructural completa (incluye el año máximo, que depende del reloj)
    pub fn check(&self) -> Result<(), ValidationErrors> {
        self.check_at(current_year())
    }

    /// Igual que `check` pero con el año actual inyectado
    pub fn check_at(&self, current_year: i32) -> Result<(), ValidationErrors> {
        merge_field_error(
            self.validate(),
            "year",
            validate_model_year(self.year, current_year).err(),
        )
    }

    /// Mezclar los datos de fábrica: los valores del usuario ganan, el MSRP siempre se sobreescribe
    pub fn merge_build_data(&mut self, data: BuildData) {
        if is_blank(&self.brand) {
            self.brand = Some(data.brand);
        }
        if is_blank(&self.engine) {
            self.engine = Some(data.engine);
        }
        if is_blank(&self.transmission) {
            self.transmission = Some(data.transmission);
        }
        self.msrp = data.msrp;
    }
}

/// Lote de vehículos para create/update masivo. No tiene identidad propia.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehiclesBulk {
    pub vehicles: Vec<Vehicle>,
}

impl VehiclesBulk {
    pub fn new(vehicles: Vec<Vehicle>) -> Self {
        Self { vehicles }
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    pub fn check(&self) -> AppResult<()> {
        self.check_at(current_year())
    }

    /// El lote es inválido si está vacío, si algún miembro es inválido o si repite un VIN
    pub fn check_at(&self, current_year: i32) -> AppResult<()> {
        if self.vehicles.is_empty() {
            return Err(AppError::InvalidBatch("vehicles must not be empty".to_string()));
        }

        let mut seen = HashSet::with_capacity(self.vehicles.len());
        for (index, vehicle) in self.vehicles.iter().enumerate() {
            if let Err(errors) = vehicle.check_at(current_year) {
                return Err(AppError::InvalidBatch(format!(
                    "vehicles[{}] (VIN '{}'): {}",
                    index, vehicle.vin, errors
                )));
            }
            if !seen.insert(vehicle.vin.as_str()) {
                return Err(AppError::InvalidBatch(format!(
                    "vehicles[{}]: VIN '{}' appears more than once",
                    index, vehicle.vin
                )));
            }
        }

        Ok(())
    }
}
