//! Application state management

use domain_products::InMemoryProductRepository;
use mongodb::{Client, Database};
use tracing::info;

use crate::config::{Config, StorageBackend};

/// Storage opened at startup
#[derive(Clone)]
pub enum Storage {
    Mongo { client: Client, db: Database },
    Memory(InMemoryProductRepository),
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub storage: Storage,
}

impl AppState {
    /// Open the configured storage; MongoDB connections are retried with backoff
    pub async fn init(config: Config) -> eyre::Result<Self> {
        let storage = match &config.storage {
            StorageBackend::Mongo(mongo) => {
                info!("Connecting to MongoDB at {}", mongo.url());

                let client =
                    database::mongodb::connect_from_config_with_retry(mongo, None).await?;
                let db = client.database(mongo.database());

                info!(
                    "Successfully connected to MongoDB database: {}",
                    mongo.database()
                );
                Storage::Mongo { client, db }
            }
            StorageBackend::Memory => {
                info!("Using in-memory product storage");
                Storage::Memory(InMemoryProductRepository::new())
            }
        };

        Ok(Self { config, storage })
    }

    /// Release storage connections
    pub async fn close(self) {
        if let Storage::Mongo { client, .. } = self.storage {
            info!("Shutting down: closing MongoDB connections");
            client.shutdown().await;
            info!("MongoDB connection closed");
        }
    }
}
