//! Enriquecimiento masivo
//!
//! Un pool fijo de workers (5 por defecto) saca vehículos de una cola
//! compartida y llama a `VehicleEnricher::enrich` con cada uno. El primer
//! error gana: se cancela el token para que ningún worker tome más trabajo,
//! se abortan los workers restantes y el error se devuelve de inmediato.
//! Nada se persiste en esta fase.

use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::models::{Vehicle, VehiclesBulk};
use crate::services::enrichment_service::VehicleEnricher;
use crate::utils::errors::{AppError, AppResult};

pub const DEFAULT_BULK_WORKERS: usize = 5;

type Job = (usize, Vehicle);
type JobQueue = Arc<Mutex<mpsc::Receiver<Job>>>;

#[derive(Clone)]
pub struct BulkEnricher {
    enricher: Arc<VehicleEnricher>,
    workers: usize,
}

impl BulkEnricher {
    pub fn new(enricher: Arc<VehicleEnricher>, workers: usize) -> Self {
        Self {
            enricher,
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Enriquecer todo el lote. En éxito devuelve los vehículos en el orden original.
    pub async fn enrich_batch(&self, batch: VehiclesBulk) -> AppResult<VehiclesBulk> {
        let total = batch.len();
        if total == 0 {
            return Ok(batch);
        }

        info!("🚚 Enriqueciendo lote de {} vehículos con {} workers", total, self.workers);

        // Cola cargada de antemano y cerrada: cada worker termina cuando se vacía
        let (tx, rx) = mpsc::channel::<Job>(total);
        for job in batch.vehicles.into_iter().enumerate() {
            tx.send(job)
                .await
                .map_err(|_| AppError::Internal("bulk job queue closed early".to_string()))?;
        }
        drop(tx);

        let queue: JobQueue = Arc::new(Mutex::new(rx));
        let cancel = CancellationToken::new();
        let mut workers: JoinSet<AppResult<Vec<Job>>> = JoinSet::new();

        for worker_id in 0..self.workers.min(total) {
            workers.spawn(run_worker(
                worker_id,
                self.enricher.clone(),
                queue.clone(),
                cancel.clone(),
            ));
        }

        let mut slots: Vec<Option<Vehicle>> = vec![None; total];
        while let Some(joined) = workers.join_next().await {
            let outcome = joined.map_err(|e| AppError::Internal(format!("bulk worker panicked: {}", e)));

            match outcome.and_then(|result| result) {
                Ok(done) => {
                    for (index, vehicle) in done {
                        slots[index] = Some(vehicle);
                    }
                }
                Err(e) => {
                    error!("❌ Lote abortado: {}", e);
                    cancel.cancel();
                    workers.abort_all();
                    return Err(e);
                }
            }
        }

        let vehicles = slots
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| AppError::Internal("bulk enrichment lost a vehicle".to_string()))?;

        info!("✅ Lote de {} vehículos enriquecido", total);
        Ok(VehiclesBulk::new(vehicles))
    }
}

async fn run_worker(
    worker_id: usize,
    enricher: Arc<VehicleEnricher>,
    queue: JobQueue,
    cancel: CancellationToken,
) -> AppResult<Vec<Job>> {
    let mut done = Vec::new();

    loop {
        let next = tokio::select! {
            _ = cancel.cancelled() => {
                debug!("🛑 Worker {} detenido por cancelación", worker_id);
                break;
            }
            job = async { queue.lock().await.recv().await } => job,
        };

        let Some((index, mut vehicle)) = next else {
            break;
        };

        if let Err(e) = enricher.enrich(&mut vehicle).await {
            warn!("⚠️ Worker {} falló con VIN {}: {}", worker_id, vehicle.vin, e);
            cancel.cancel();
            return Err(e.into());
        }
        done.push((index, vehicle));
    }

    debug!("👷 Worker {} terminó ({} vehículos)", worker_id, done.len());
    Ok(done)
}
