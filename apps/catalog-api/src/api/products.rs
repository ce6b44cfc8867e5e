//! Products API routes

use axum::Router;
use domain_products::{handlers, MongoProductRepository, ProductRepository, ProductService};
use std::sync::Arc;

use crate::state::{AppState, Storage};

/// Create products router over the configured storage
pub fn router(state: &AppState) -> Router {
    match &state.storage {
        Storage::Mongo { db, .. } => {
            handlers::router(ProductService::new(MongoProductRepository::new(db)))
        }
        Storage::Memory(repository) => handlers::router(ProductService::new(repository.clone())),
    }
}

/// Repository handle used by the readiness probe
pub fn repository(state: &AppState) -> Arc<dyn ProductRepository> {
    match &state.storage {
        Storage::Mongo { db, .. } => Arc::new(MongoProductRepository::new(db)),
        Storage::Memory(repository) => Arc::new(repository.clone()),
    }
}

/// Initialize products indexes; a no-op for in-memory storage
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    if let Storage::Mongo { db, .. } = &state.storage {
        MongoProductRepository::new(db).init_indexes().await?;
    }
    Ok(())
}
