use config::{Config, ConfigError, Environment};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

fn default_api_url() -> String {
    "http://localhost:8080/api".to_string()
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(Environment::default())
    }

    fn from_source(source: Environment) -> Result<Self, ConfigError> {
        Config::builder().add_source(source).build()?.try_deserialize()
    }
}
