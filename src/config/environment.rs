//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno: servidor, modo de
//! proveedores, URLs y timeouts de cada servicio y ajustes del camino masivo.

use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be set")]
    Missing { name: &'static str },

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Dónde viven los proveedores de enriquecimiento
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderMode {
    /// Servicios HTTP externos
    Remote,
    /// Fórmulas en proceso
    Local,
}

impl FromStr for ProviderMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "remote" => Ok(ProviderMode::Remote),
            "local" => Ok(ProviderMode::Local),
            _ => Err(()),
        }
    }
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
    pub provider_mode: ProviderMode,
    pub build_data_url: Option<String>,
    pub inspection_url: Option<String>,
    pub pricing_url: Option<String>,
    /// Ruta del catálogo JSON de build data (modo local)
    pub build_data_catalog: Option<String>,
    pub build_data_timeout: Duration,
    pub inspection_timeout: Duration,
    pub pricing_timeout: Duration,
    pub bulk_workers: usize,
    pub bulk_chunk_size: usize,
    pub bulk_write_timeout: Duration,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 8080,
            host: "0.0.0.0".to_string(),
            cors_origins: Vec::new(),
            provider_mode: ProviderMode::Remote,
            build_data_url: None,
            inspection_url: None,
            pricing_url: None,
            build_data_catalog: None,
            build_data_timeout: Duration::from_secs(10),
            inspection_timeout: Duration::from_secs(5),
            pricing_timeout: Duration::from_secs(15),
            bulk_workers: 5,
            bulk_chunk_size: 200,
            bulk_write_timeout: Duration::from_secs(15),
        }
    }
}

impl EnvironmentConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Construir la configuración desde cualquier fuente clave → valor
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let inspection_url = get("INSPECTION_URL");
        let config = Self {
            environment: get("ENVIRONMENT").unwrap_or(defaults.environment),
            port: parse_or("PORT", get("PORT"), defaults.port)?,
            host: get("HOST").unwrap_or(defaults.host),
            cors_origins: get("CORS_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            provider_mode: parse_or("PROVIDER_MODE", get("PROVIDER_MODE"), defaults.provider_mode)?,
            // Despliegue colocado: build data lo sirve el servicio de inspección
            build_data_url: get("BUILD_DATA_URL").or_else(|| inspection_url.clone()),
            inspection_url,
            pricing_url: get("PRICING_URL"),
            build_data_catalog: get("BUILD_DATA_CATALOG"),
            build_data_timeout: secs_or("BUILD_DATA_TIMEOUT_SECS", get("BUILD_DATA_TIMEOUT_SECS"), defaults.build_data_timeout)?,
            inspection_timeout: secs_or("INSPECTION_TIMEOUT_SECS", get("INSPECTION_TIMEOUT_SECS"), defaults.inspection_timeout)?,
            pricing_timeout: secs_or("PRICING_TIMEOUT_SECS", get("PRICING_TIMEOUT_SECS"), defaults.pricing_timeout)?,
            bulk_workers: parse_or("BULK_WORKERS", get("BULK_WORKERS"), defaults.bulk_workers)?,
            bulk_chunk_size: parse_or("BULK_CHUNK_SIZE", get("BULK_CHUNK_SIZE"), defaults.bulk_chunk_size)?,
            bulk_write_timeout: secs_or("BULK_WRITE_TIMEOUT_SECS", get("BULK_WRITE_TIMEOUT_SECS"), defaults.bulk_write_timeout)?,
        };

        if config.bulk_workers == 0 {
            return Err(ConfigError::Invalid {
                name: "BULK_WORKERS",
                value: "0".to_string(),
            });
        }
        if config.bulk_chunk_size == 0 {
            return Err(ConfigError::Invalid {
                name: "BULK_CHUNK_SIZE",
                value: "0".to_string(),
            });
        }

        Ok(config)
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Valor obligatorio (p. ej. la URL de un proveedor en modo remoto)
pub fn required<'a>(name: &'static str, value: Option<&'a str>) -> Result<&'a str, ConfigError> {
    value.ok_or(ConfigError::Missing { name })
}

fn parse_or<T: FromStr>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => match value.trim().parse() {
            Ok(parsed) => Ok(parsed),
            Err(_) => Err(ConfigError::Invalid { name, value }),
        },
    }
}

fn secs_or(name: &'static str, raw: Option<String>, default: Duration) -> Result<Duration, ConfigError> {
    parse_or(name, raw, default.as_secs()).map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<EnvironmentConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EnvironmentConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let c = config(&[]).unwrap();
        assert_eq!(c.port, 8080);
        assert_eq!(c.provider_mode, ProviderMode::Remote);
        assert_eq!(c.inspection_timeout, Duration::from_secs(5));
        assert_eq!(c.build_data_timeout, Duration::from_secs(10));
        assert_eq!(c.pricing_timeout, Duration::from_secs(15));
        assert_eq!(c.bulk_workers, 5);
        assert_eq!(c.bulk_chunk_size, 200);
        assert!(c.cors_origins.is_empty());
    }

    #[test]
    fn build_data_defaults_to_inspection_service() {
        let c = config(&[("INSPECTION_URL", "http://inspection:8081")]).unwrap();
        assert_eq!(c.build_data_url.as_deref(), Some("http://inspection:8081"));

        let c = config(&[
            ("INSPECTION_URL", "http://inspection:8081"),
            ("BUILD_DATA_URL", "http://vin-decoder:9000"),
        ])
        .unwrap();
        assert_eq!(c.build_data_url.as_deref(), Some("http://vin-decoder:9000"));
    }

    #[test]
    fn invalid_numbers_are_reported() {
        assert_eq!(
            config(&[("PORT", "eighty")]).unwrap_err(),
            ConfigError::Invalid { name: "PORT", value: "eighty".to_string() }
        );
        assert!(config(&[("BULK_WORKERS", "0")]).is_err());
        assert!(config(&[("PROVIDER_MODE", "grpc")]).is_err());
    }

    #[test]
    fn cors_origins_are_split_and_trimmed() {
        let c = config(&[("CORS_ORIGINS", "http://a.test, http://b.test,")]).unwrap();
        assert_eq!(c.cors_origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn remote_mode_requires_urls() {
        let c = config(&[("PROVIDER_MODE", "local")]).unwrap();
        assert_eq!(c.provider_mode, ProviderMode::Local);
        assert_eq!(
            required("PRICING_URL", c.pricing_url.as_deref()).unwrap_err(),
            ConfigError::Missing { name: "PRICING_URL" }
        );
    }
}
