//! JSON extractor with automatic validation using the validator crate.

use crate::errors::AppError;
use axum::extract::{FromRequest, Json, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON extractor with automatic validation.
///
/// Both malformed bodies and failed `Validate` checks are rejected with a 400
/// failure envelope whose `details` list the problems.
///
/// # Example
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct StockReduction {
///     #[validate(range(min = 1, message = "Amount must be at least 1"))]
///     amount: i64,
/// }
///
/// async fn reduce(ValidatedJson(body): ValidatedJson<StockReduction>) -> String {
///     format!("reducing by {}", body.amount)
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state).await?;
        data.validate()?;
        Ok(ValidatedJson(data))
    }
}
