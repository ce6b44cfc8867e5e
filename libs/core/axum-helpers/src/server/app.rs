use super::shutdown::ShutdownCoordinator;
use crate::errors::handlers::not_found;
use crate::http::{create_cors_layer, security_headers};
use axum::{Router, middleware};
use core_config::server::ServerConfig;
use std::future::Future;
use std::io;
use tower_http::compression::CompressionLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info, warn};
use utoipa::OpenApi;

/// Wraps the API routes with documentation UIs and cross-cutting layers.
///
/// - `apis` is nested under `/api` (state must already be applied)
/// - OpenAPI JSON at `/api-docs/openapi.json`, plus Swagger UI, ReDoc, RapiDoc and Scalar
/// - unknown paths fall back to a 404 failure envelope
/// - layers: HTTP tracing, security headers, CORS (only when `server.cors_allowed_origins`
///   is non-empty) and response compression
///
/// # Errors
/// Fails when a configured CORS origin is not a valid header value.
pub async fn create_router<T>(apis: Router, server: &ServerConfig) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    use utoipa_rapidoc::RapiDoc;
    use utoipa_redoc::{Redoc, Servable as RedocServable};
    use utoipa_scalar::{Scalar, Servable as ScalarServable};
    use utoipa_swagger_ui::SwaggerUi;

    let cors = create_cors_layer(&server.cors_allowed_origins).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Invalid CORS_ALLOWED_ORIGIN value: {e}"),
        )
    })?;

    let router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", T::openapi()))
        .merge(Redoc::with_url("/redoc", T::openapi()))
        .merge(RapiDoc::new("/api-docs/openapi.json").path("/rapidoc"))
        .merge(Scalar::with_url("/scalar", T::openapi()))
        .nest("/api", apis)
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers));

    let router = match cors {
        Some(layer) => {
            info!(origins = ?server.cors_allowed_origins, "CORS enabled");
            router.layer(layer)
        }
        None => router,
    };

    Ok(router.layer(CompressionLayer::new()))
}

/// Serve `router` until SIGINT/SIGTERM, then drain connections and run `cleanup`.
///
/// `cleanup` starts as soon as the signal arrives and is abandoned once
/// `server.shutdown_timeout` elapses.
///
/// ```ignore
/// let cleanup = async move { drop(mongo_client) };
/// create_production_app(router, &config.server, cleanup).await?;
/// ```
pub async fn create_production_app<F>(
    router: Router,
    server: &ServerConfig,
    cleanup: F,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let coordinator = ShutdownCoordinator::new();
    let shutdown_timeout = server.shutdown_timeout;

    let listener = tokio::net::TcpListener::bind(server.address()).await?;
    info!("Server starting on {}", listener.local_addr()?);

    tokio::spawn(coordinator.clone().listen_for_signals());

    let cleanup_coordinator = coordinator.clone();
    let cleanup_handle = tokio::spawn(async move {
        cleanup_coordinator.wait().await;
        info!(timeout = ?shutdown_timeout, "running cleanup");
        match tokio::time::timeout(shutdown_timeout, cleanup).await {
            Ok(()) => info!("cleanup completed"),
            Err(_) => warn!("cleanup exceeded {:?}, forcing shutdown", shutdown_timeout),
        }
    });

    let server_coordinator = coordinator.clone();
    let serve_result = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move { server_coordinator.wait().await })
        .await
        .inspect_err(|e| tracing::error!("Server encountered an error: {:?}", e));

    // The server may also stop on its own error; release the cleanup task either way.
    coordinator.shutdown();
    cleanup_handle.await.ok();

    serve_result
}
