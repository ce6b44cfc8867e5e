//! Configuration for Catalog API

use core_config::{app_info, env_or_default, server::ServerConfig, AppInfo, ConfigError, FromEnv};
use database::mongodb::MongoConfig;

pub use core_config::Environment;

/// Where products are kept, selected by `PRODUCTS_STORAGE`
#[derive(Clone, Debug)]
pub enum StorageBackend {
    /// `mongodb` (default); requires the `MONGODB_*` variables
    Mongo(MongoConfig),
    /// `memory`; data lives only as long as the process
    Memory,
}

impl FromEnv for StorageBackend {
    fn from_env() -> Result<Self, ConfigError> {
        match env_or_default("PRODUCTS_STORAGE", "mongodb")
            .trim()
            .to_ascii_lowercase()
            .as_str()
        {
            "mongodb" | "mongo" => Ok(Self::Mongo(MongoConfig::from_env()?)),
            "memory" => Ok(Self::Memory),
            other => Err(ConfigError::ParseError {
                key: "PRODUCTS_STORAGE".to_string(),
                details: format!("expected `mongodb` or `memory`, got `{other}`"),
            }),
        }
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub environment: Environment,
    pub storage: StorageBackend,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        Ok(Self {
            app: app_info!(),
            server: ServerConfig::from_env()?,
            environment: Environment::from_env(),
            storage: StorageBackend::from_env()?,
        })
    }
}
