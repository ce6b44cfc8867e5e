//! Readiness endpoint

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use axum_helpers::{run_health_checks, HealthCheckFuture};
use domain_products::ProductRepository;
use std::sync::Arc;

use crate::state::AppState;

async fn ready(State(repository): State<Arc<dyn ProductRepository>>) -> impl IntoResponse {
    let storage: HealthCheckFuture =
        Box::pin(async move { repository.ping().await.map_err(|e| e.to_string()) });

    run_health_checks(vec![("storage", storage)]).await
}

/// `GET /ready`: 200 while storage answers a ping, 503 otherwise
pub fn router(state: &AppState) -> Router {
    Router::new()
        .route("/ready", get(ready))
        .with_state(super::products::repository(state))
}
