//! Catalog API - product catalog REST server

use axum::Router;
use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

/// Full application router: documented API under `/api`, plus `/health` and `/ready`
async fn build_app(state: &AppState) -> eyre::Result<Router> {
    let api_routes = api::routes(state);
    let router =
        axum_helpers::create_router::<openapi::ApiDoc>(api_routes, &state.config.server).await?;

    Ok(router
        .merge(health_router(state.config.app))
        .merge(api::health::router(state)))
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let state = AppState::init(config).await?;

    api::init_indexes(&state).await?;

    let app = build_app(&state).await?;

    info!(
        "Starting Catalog API on {}",
        state.config.server.address()
    );

    let server = state.config.server.clone();
    create_production_app(app, &server, state.close())
        .await
        .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Catalog API shutdown complete");
    Ok(())
}
