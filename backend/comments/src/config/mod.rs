use std::path::PathBuf;

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    #[serde(default = "default_storage_backend")]
    pub storage_backend: StorageBackend,
    #[serde(default = "default_web_port")]
    pub web_port: u16,
    /// Origin allowed by CORS. No CORS layer is installed when unset.
    #[serde(default)]
    pub web_ip: Option<String>,
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
    #[serde(default = "default_import_file")]
    pub import_file: PathBuf,
    #[serde(default)]
    pub telemetry_enabled: bool,
    #[serde(default = "default_telemetry_service_name")]
    pub telemetry_service_name: String,
    #[serde(default = "default_telemetry_service_version")]
    pub telemetry_service_version: String,
    #[serde(default = "default_telemetry_environment")]
    pub telemetry_environment: String,
    #[serde(default = "default_telemetry_otlp_endpoint")]
    pub telemetry_otlp_endpoint: String,
}

fn default_storage_backend() -> StorageBackend {
    StorageBackend::Postgres
}

fn default_web_port() -> u16 {
    8080
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("web/dist")
}

fn default_import_file() -> PathBuf {
    PathBuf::from("comments.json")
}

fn default_telemetry_service_name() -> String {
    "nested-comments".to_string()
}

fn default_telemetry_service_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_telemetry_environment() -> String {
    "production".to_string()
}

fn default_telemetry_otlp_endpoint() -> String {
    "http://localhost:4317".to_string()
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(Environment::default())
    }

    fn from_source(source: Environment) -> Result<Self, ConfigError> {
        let config: AppConfig = Config::builder()
            .set_default("database_max_connections", 5)?
            .add_source(source)
            .build()?
            .try_deserialize()?;

        if config.storage_backend == StorageBackend::Postgres && config.database_url.is_none() {
            return Err(ConfigError::Message(
                "DATABASE_URL must be set when STORAGE_BACKEND is postgres".to_string(),
            ));
        }

        Ok(config)
    }

    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.web_port)
    }
}
