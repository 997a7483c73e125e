//! Services module
//!
//! Lógica de negocio: contratos de los proveedores, sus variantes locales,
//! el enriquecimiento de un vehículo y el enriquecimiento masivo.

pub mod bulk_enrichment_service;
pub mod enrichment_service;
pub mod local_providers;
pub mod providers;

pub use bulk_enrichment_service::BulkEnricher;
pub use enrichment_service::VehicleEnricher;
