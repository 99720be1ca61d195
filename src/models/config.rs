//! Configuration model loaded from external sources.

use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    pub templates_dir: String,
    /// Shared with the auth service; signs sessions and verifies identity tokens.
    pub secret: String,
    pub auth_service_url: String,
    /// JSON fixture loaded into the in-memory repository.
    pub seed_path: String,
}

impl ServerConfig {
    /// Layers `<dir>/default`, the optional `<dir>/<app_env>` profile and
    /// `APP_*` environment variables.
    pub fn load(config_dir: impl AsRef<Path>, app_env: &str) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        Config::builder()
            .add_source(File::from(config_dir.join("default")))
            .add_source(File::from(config_dir.join(app_env)).required(false))
            .add_source(Environment::with_prefix("APP"))
            .build()?
            .try_deserialize()
    }
}
