//! Modelos de datos
//!
//! Entidades del dominio de subastas: vehículo, lote de vehículos,
//! datos de fábrica y las fórmulas de grado y precio.

pub mod build_data;
pub mod scoring;
pub mod vehicle;

pub use build_data::BuildData;
pub use vehicle::{Vehicle, VehiclesBulk};
