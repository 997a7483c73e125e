use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Datos de fábrica de un VIN
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildData {
    pub vin: String,
    pub brand: String,
    pub engine: String,
    pub transmission: String,
    pub msrp: Decimal,
}
