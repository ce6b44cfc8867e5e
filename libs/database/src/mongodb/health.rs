use mongodb::{Database, bson::doc};
use std::time::Instant;

/// Outcome of a readiness probe
#[derive(Debug, Clone)]
pub struct HealthStatus {
    pub healthy: bool,
    /// Driver error when unhealthy
    pub message: Option<String>,
    pub response_time_ms: u64,
}

/// `true` when the server answers a `ping`
pub async fn check_health(database: &Database) -> bool {
    check_health_detailed(database).await.healthy
}

pub async fn check_health_detailed(database: &Database) -> HealthStatus {
    let start = Instant::now();
    let outcome = database.run_command(doc! { "ping": 1 }).await;
    let response_time_ms = start.elapsed().as_millis() as u64;

    match outcome {
        Ok(_) => HealthStatus {
            healthy: true,
            message: None,
            response_time_ms,
        },
        Err(e) => HealthStatus {
            healthy: false,
            message: Some(e.to_string()),
            response_time_ms,
        },
    }
}
