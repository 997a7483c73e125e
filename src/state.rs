//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use crate::repositories::VehicleRepository;
use crate::services::bulk_enrichment_service::BulkEnricher;
use crate::services::enrichment_service::VehicleEnricher;

#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn VehicleRepository>,
    pub enricher: Arc<VehicleEnricher>,
    pub bulk: BulkEnricher,
}

impl AppState {
    pub fn new(
        repository: Arc<dyn VehicleRepository>,
        enricher: VehicleEnricher,
        bulk_workers: usize,
    ) -> Self {
        let enricher = Arc::new(enricher);
        Self {
            repository,
            bulk: BulkEnricher::new(enricher.clone(), bulk_workers),
            enricher,
        }
    }
}
