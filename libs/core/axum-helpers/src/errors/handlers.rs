use axum::{
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};

use crate::envelope::Envelope;

/// Router fallback for unknown paths
pub async fn not_found(uri: Uri) -> Response {
    tracing::debug!(%uri, "no route matched");
    (
        StatusCode::NOT_FOUND,
        Envelope::failure(format!("Route {} not found", uri.path()), None),
    )
        .into_response()
}
