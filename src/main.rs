use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use vehicle_auction::build_router;
use vehicle_auction::clients::{BuildDataClient, InspectionClient, PricingClient};
use vehicle_auction::config::{required, DatabaseConfig, EnvironmentConfig, ProviderMode};
use vehicle_auction::database::{create_pool, ensure_schema};
use vehicle_auction::middleware::cors_layer;
use vehicle_auction::repositories::PostgresVehicleRepository;
use vehicle_auction::services::local_providers::{
    CatalogBuildDataProvider, LocalInspectionProvider, LocalPricingProvider,
};
use vehicle_auction::services::providers::BuildDataProvider;
use vehicle_auction::services::VehicleEnricher;
use vehicle_auction::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,vehicle_auction=debug,tower_http=info")),
        )
        .init();

    info!("🚗 Vehicle Auction - API de vehículos");
    info!("================================================");

    let config = EnvironmentConfig::from_env().context("invalid configuration")?;
    let db_config = DatabaseConfig::from_env().context("invalid database configuration")?;

    // Inicializar base de datos
    let pool = match create_pool(&db_config).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };
    ensure_schema(&pool).await.context("failed to ensure vehicles schema")?;

    let repository = Arc::new(PostgresVehicleRepository::with_bulk_settings(
        pool,
        config.bulk_chunk_size,
        config.bulk_write_timeout,
    ));
    let enricher = build_enricher(&config)?;

    let app_state = AppState::new(repository, enricher, config.bulk_workers);
    let app = build_router(app_state, cors_layer(&config.cors_origins));

    let addr: SocketAddr = config
        .server_url()
        .parse()
        .with_context(|| format!("invalid listen address {}", config.server_url()))?;

    info!("🌐 Servidor iniciando en http://{} ({})", addr, config.environment);
    info!("🔍 Endpoints disponibles:");
    info!("   GET    /health - Health check");
    info!("   POST   /api/vehicles - Crear vehículo");
    info!("   GET    /api/vehicles - Listar vehículos");
    info!("   GET    /api/vehicles/:vin - Obtener vehículo");
    info!("   PUT    /api/vehicles/:vin - Actualizar vehículo");
    info!("   DELETE /api/vehicles/:vin - Eliminar vehículo");
    info!("   POST   /api/vehicles/bulk - Crear lote");
    info!("   PUT    /api/vehicles/bulk - Actualizar lote");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            e
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Proveedores remotos (HTTP) o locales según `PROVIDER_MODE`
fn build_enricher(config: &EnvironmentConfig) -> Result<VehicleEnricher> {
    match config.provider_mode {
        ProviderMode::Local => {
            let catalog = match &config.build_data_catalog {
                Some(path) => {
                    let json = std::fs::read_to_string(path)
                        .with_context(|| format!("cannot read build data catalog {}", path))?;
                    CatalogBuildDataProvider::from_json(&json)
                        .with_context(|| format!("invalid build data catalog {}", path))?
                }
                None => {
                    warn!("⚠️ Modo local sin BUILD_DATA_CATALOG: todo VIN será NotFound");
                    CatalogBuildDataProvider::new()
                }
            };
            info!("🧮 Proveedores locales ({} VINs en catálogo)", catalog.len());

            Ok(VehicleEnricher::new(
                Arc::new(catalog),
                Arc::new(LocalInspectionProvider::new()),
                Arc::new(LocalPricingProvider),
            ))
        }
        ProviderMode::Remote => {
            let inspection_url = required("INSPECTION_URL", config.inspection_url.as_deref())?;
            let build_data_url = required("BUILD_DATA_URL", config.build_data_url.as_deref())?;
            let pricing_url = required("PRICING_URL", config.pricing_url.as_deref())?;

            let inspection = Arc::new(InspectionClient::new(
                inspection_url,
                config.inspection_timeout,
                config.build_data_timeout,
            )?);
            let build_data: Arc<dyn BuildDataProvider> = if build_data_url == inspection_url {
                inspection.clone() as Arc<dyn BuildDataProvider>
            } else {
                Arc::new(BuildDataClient::new(build_data_url, config.build_data_timeout)?)
            };
            let pricing = Arc::new(PricingClient::new(pricing_url, config.pricing_timeout)?);

            info!("🌐 Proveedores remotos: build data {}, inspección {}, pricing {}", build_data_url, inspection_url, pricing_url);
            Ok(VehicleEnricher::new(build_data, inspection, pricing))
        }
    }
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
