//! # Axum Helpers
//!
//! Shared HTTP plumbing for the catalog service.
//!
//! ## Modules
//!
//! - **[`envelope`]**: the `{ success, data, error, ... }` response envelope
//! - **[`errors`]**: [`AppError`] rendered as failure envelopes, log error codes
//! - **[`extractors`]**: [`ValidatedJson`]
//! - **[`http`]**: CORS and security headers
//! - **[`server`]**: router assembly, health checks, graceful shutdown

pub mod envelope;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use envelope::{Envelope, PageInfo};
pub use errors::{AppError, ErrorCode};
pub use extractors::ValidatedJson;
pub use http::{create_cors_layer, security_headers};
pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    health_router, run_health_checks, shutdown_signal,
};
