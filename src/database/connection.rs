//! Configuración de conexión a PostgreSQL
//!
//! Este módulo abre el pool y asegura el esquema de la tabla `vehicles`.

use sqlx::PgPool;
use tracing::info;

use crate::config::DatabaseConfig;

const CREATE_VEHICLES_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS vehicles (
        vin VARCHAR(17) PRIMARY KEY,
        year INT NOT NULL,
        odometer INT NOT NULL,
        brand VARCHAR(50),
        engine VARCHAR(50),
        transmission VARCHAR(50),
        msrp NUMERIC NOT NULL DEFAULT 0,
        grade INT NOT NULL DEFAULT 0,
        price NUMERIC NOT NULL DEFAULT 0,
        exterior_color VARCHAR(50),
        interior_color VARCHAR(50),
        small_scratches BOOLEAN NOT NULL DEFAULT FALSE,
        strong_scratches BOOLEAN NOT NULL DEFAULT FALSE,
        electric_fail BOOLEAN NOT NULL DEFAULT FALSE,
        suspension_fail BOOLEAN NOT NULL DEFAULT FALSE
    )
"#;

/// Crear un pool de conexiones a la base de datos
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    info!("🗄️ Conectando a {}", mask_database_url(&config.url));
    let pool = config.create_pool().await?;
    info!("✅ Pool de PostgreSQL listo");
    Ok(pool)
}

/// Crear la tabla `vehicles` si no existe
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(CREATE_VEHICLES_TABLE).execute(pool).await?;
    info!("✅ Esquema de vehicles verificado");
    Ok(())
}

/// Función helper para enmascarar la URL de la base de datos en logs
fn mask_database_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at_pos)) if at_pos > scheme_end => {
            format!("{}***:***@{}", &url[..scheme_end + 3], &url[at_pos + 1..])
        }
        _ => url.to_string(),
    }
}
