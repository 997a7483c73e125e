//! Repositorio PostgreSQL de vehículos
//!
//! CRUD de una fila con SQLx y el camino masivo stage-then-merge:
//! - create: `COPY ... FROM STDIN` por chunks dentro de una transacción
//! - update: chunks por COPY a una tabla temporal `tmp_vehicles` (ON COMMIT DROP)
//!   y un único `UPDATE ... FROM` contra la tabla permanente
//!
//! Cada escritura masiva está acotada por un timeout; si vence, la transacción
//! se descarta y hace rollback.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use std::collections::HashSet;
use std::fmt::Write as _;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::vehicle_repository::VehicleRepository;
use crate::models::{Vehicle, VehiclesBulk};
use crate::utils::errors::{map_write_error, not_found_error, AppError, AppResult};

pub const DEFAULT_CHUNK_SIZE: usize = 200;
pub const DEFAULT_BULK_WRITE_TIMEOUT: Duration = Duration::from_secs(15);

const VEHICLE_COLUMNS: &str = "vin, year, odometer, brand, engine, transmission, msrp, grade, price, \
     exterior_color, interior_color, small_scratches, strong_scratches, electric_fail, suspension_fail";

const STAGING_TABLE: &str = "tmp_vehicles";

const CREATE_STAGING_TABLE: &str =
    "CREATE TEMP TABLE tmp_vehicles (LIKE vehicles INCLUDING DEFAULTS) ON COMMIT DROP";

const INSERT_VEHICLE: &str = r#"
    INSERT INTO vehicles (vin, year, odometer, brand, engine, transmission, msrp, grade, price,
        exterior_color, interior_color, small_scratches, strong_scratches, electric_fail, suspension_fail)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
"#;

const MERGE_STAGED_VEHICLES: &str = r#"
    UPDATE vehicles v
    SET year = t.year,
        odometer = t.odometer,
        brand = t.brand,
        engine = t.engine,
        transmission = t.transmission,
        msrp = t.msrp,
        grade = t.grade,
        price = t.price,
        exterior_color = t.exterior_color,
        interior_color = t.interior_color,
        small_scratches = t.small_scratches,
        strong_scratches = t.strong_scratches,
        electric_fail = t.electric_fail,
        suspension_fail = t.suspension_fail
    FROM tmp_vehicles t
    WHERE v.vin = t.vin
    RETURNING v.vin
"#;

pub struct PostgresVehicleRepository {
    pool: PgPool,
    chunk_size: usize,
    write_timeout: Duration,
}

impl PostgresVehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self::with_bulk_settings(pool, DEFAULT_CHUNK_SIZE, DEFAULT_BULK_WRITE_TIMEOUT)
    }

    pub fn with_bulk_settings(pool: PgPool, chunk_size: usize, write_timeout: Duration) -> Self {
        Self {
            pool,
            chunk_size: chunk_size.max(1),
            write_timeout,
        }
    }

    async fn save_bulk_tx(&self, batch: &VehiclesBulk) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        for payload in encode_copy_chunks(&batch.vehicles, self.chunk_size) {
            copy_chunk(&mut tx, "vehicles", payload)
                .await
                .map_err(|e| map_write_error(e, None))?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn update_bulk_tx(&self, batch: &VehiclesBulk) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(CREATE_STAGING_TABLE).execute(&mut *tx).await?;

        for payload in encode_copy_chunks(&batch.vehicles, self.chunk_size) {
            copy_chunk(&mut tx, STAGING_TABLE, payload).await?;
        }

        let merged: Vec<String> = sqlx::query_scalar::<_, String>(MERGE_STAGED_VEHICLES)
            .fetch_all(&mut *tx)
            .await?;

        if let Some(missing) = first_unmerged(batch, &merged) {
            // El drop de `tx` hace rollback del merge
            warn!(
                "⚠️ Merge masivo afectó {} de {} filas, rollback",
                merged.len(),
                batch.len()
            );
            return Err(not_found_error(missing));
        }

        tx.commit().await?;
        Ok(())
    }

    async fn with_write_timeout<F>(&self, operation: &str, write: F) -> AppResult<()>
    where
        F: std::future::Future<Output = AppResult<()>>,
    {
        tokio::time::timeout(self.write_timeout, write)
            .await
            .map_err(|_| {
                AppError::Storage(format!(
                    "{} timed out after {}s, transaction rolled back",
                    operation,
                    self.write_timeout.as_secs()
                ))
            })?
    }
}

/// Primer VIN del lote que el merge no tocó
fn first_unmerged<'a>(batch: &'a VehiclesBulk, merged: &[String]) -> Option<&'a str> {
    let merged: HashSet<&str> = merged.iter().map(String::as_str).collect();
    batch
        .vehicles
        .iter()
        .map(|v| v.vin.as_str())
        .find(|vin| !merged.contains(vin))
}

fn copy_statement(table: &str) -> String {
    format!("COPY {} ({}) FROM STDIN WITH (FORMAT csv)", table, VEHICLE_COLUMNS)
}

/// Un payload CSV por chunk, en el orden del lote
fn encode_copy_chunks(vehicles: &[Vehicle], chunk_size: usize) -> Vec<String> {
    vehicles.chunks(chunk_size.max(1)).map(encode_copy_chunk).collect()
}

fn encode_copy_chunk(chunk: &[Vehicle]) -> String {
    let mut out = String::new();
    for v in chunk {
        // Escribir en un String no falla
        let _ = writeln!(
            out,
            "{},{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
            csv_text(&v.vin),
            v.year,
            v.odometer,
            csv_optional(v.brand.as_deref()),
            csv_optional(v.engine.as_deref()),
            csv_optional(v.transmission.as_deref()),
            csv_decimal(v.msrp),
            v.grade,
            csv_decimal(v.price),
            csv_optional(v.exterior_color.as_deref()),
            csv_optional(v.interior_color.as_deref()),
            csv_bool(v.small_scratches),
            csv_bool(v.strong_scratches),
            csv_bool(v.electric_fail),
            csv_bool(v.suspension_fail),
        );
    }
    out
}

// En CSV de COPY un campo vacío sin comillas es NULL y "" es la cadena vacía
fn csv_text(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn csv_optional(value: Option<&str>) -> String {
    value.map(csv_text).unwrap_or_default()
}

fn csv_decimal(value: Decimal) -> String {
    value.normalize().to_string()
}

fn csv_bool(value: bool) -> &'static str {
    if value {
        "t"
    } else {
        "f"
    }
}

async fn copy_chunk(
    tx: &mut Transaction<'_, Postgres>,
    table: &str,
    payload: String,
) -> Result<(), sqlx::Error> {
    let mut copy = tx.copy_in_raw(&copy_statement(table)).await?;
    copy.send(payload.into_bytes()).await?;
    let rows = copy.finish().await?;
    debug!("📦 {} filas copiadas a {}", rows, table);
    Ok(())
}

#[async_trait]
impl VehicleRepository for PostgresVehicleRepository {
    async fn save(&self, vehicle: &Vehicle) -> AppResult<()> {
        sqlx::query(INSERT_VEHICLE)
            .bind(&vehicle.vin)
            .bind(vehicle.year)
            .bind(vehicle.odometer)
            .bind(&vehicle.brand)
            .bind(&vehicle.engine)
            .bind(&vehicle.transmission)
            .bind(vehicle.msrp)
            .bind(vehicle.grade)
            .bind(vehicle.price)
            .bind(&vehicle.exterior_color)
            .bind(&vehicle.interior_color)
            .bind(vehicle.small_scratches)
            .bind(vehicle.strong_scratches)
            .bind(vehicle.electric_fail)
            .bind(vehicle.suspension_fail)
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_error(e, Some(&vehicle.vin)))?;
        Ok(())
    }

    async fn update(&self, vehicle: &Vehicle) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE vehicles
            SET year = $1, odometer = $2, brand = $3, engine = $4, transmission = $5,
                msrp = $6, grade = $7, price = $8, exterior_color = $9, interior_color = $10,
                small_scratches = $11, strong_scratches = $12, electric_fail = $13, suspension_fail = $14
            WHERE vin = $15
            "#,
        )
        .bind(vehicle.year)
        .bind(vehicle.odometer)
        .bind(&vehicle.brand)
        .bind(&vehicle.engine)
        .bind(&vehicle.transmission)
        .bind(vehicle.msrp)
        .bind(vehicle.grade)
        .bind(vehicle.price)
        .bind(&vehicle.exterior_color)
        .bind(&vehicle.interior_color)
        .bind(vehicle.small_scratches)
        .bind(vehicle.strong_scratches)
        .bind(vehicle.electric_fail)
        .bind(vehicle.suspension_fail)
        .bind(&vehicle.vin)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(not_found_error(&vehicle.vin));
        }
        Ok(())
    }

    async fn delete(&self, vin: &str) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM vehicles WHERE vin = $1")
            .bind(vin)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found_error(vin));
        }
        Ok(())
    }

    async fn find_by_vin(&self, vin: &str) -> AppResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>(&format!(
            "SELECT {} FROM vehicles WHERE vin = $1",
            VEHICLE_COLUMNS
        ))
        .bind(vin)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }

    async fn list(&self) -> AppResult<Vec<Vehicle>> {
        let vehicles = sqlx::query_as::<_, Vehicle>(&format!(
            "SELECT {} FROM vehicles ORDER BY vin",
            VEHICLE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    async fn save_bulk(&self, batch: &VehiclesBulk) -> AppResult<()> {
        if batch.is_empty() {
            return Ok(());
        }
        self.with_write_timeout("bulk insert", self.save_bulk_tx(batch)).await?;
        info!("💾 Lote de {} vehículos insertado", batch.len());
        Ok(())
    }

    async fn update_bulk(&self, batch: &VehiclesBulk) -> AppResult<()> {
        if batch.is_empty() {
            return Ok(());
        }
        self.with_write_timeout("bulk update", self.update_bulk_tx(batch)).await?;
        info!("💾 Lote de {} vehículos actualizado", batch.len());
        Ok(())
    }
}
