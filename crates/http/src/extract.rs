//! Request extractors that report failures in the standard error format.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        FromRequest, FromRequestParts, Path, Request,
    },
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::error::AppError;

/// Field-level validation run after a body deserializes.
pub trait Validate {
    /// Return one `{field, error}` detail per violated rule.
    fn validate(&self) -> Result<(), Vec<serde_json::Value>>;
}

/// Build a single validation detail entry.
pub fn field_error(field: &str, error: impl Into<String>) -> serde_json::Value {
    json!({ "field": field, "error": error.into() })
}

/// JSON body extractor that deserializes, then validates, the payload.
///
/// Both deserialization failures and [`Validate`] failures become
/// [`AppError::Validation`] (422).
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_to_error)?;

        value
            .validate()
            .map_err(|details| AppError::validation(details, "request body failed validation"))?;

        Ok(Self(value))
    }
}

/// Path parameter extractor whose failures use the standard error envelope.
///
/// A segment that does not parse as `T` (such as `/borrows/abc` for an
/// integer id) becomes [`AppError::Validation`] (422).
#[derive(Debug, Clone)]
pub struct ValidPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(path_rejection_to_error)?;
        Ok(Self(value))
    }
}

fn path_rejection_to_error(rejection: PathRejection) -> AppError {
    tracing::debug!(status = %rejection.status(), "rejected path parameters");
    AppError::validation(
        vec![json!({ "field": "path", "error": rejection.body_text() })],
        "path parameters are not valid for this endpoint",
    )
}

fn rejection_to_error(rejection: JsonRejection) -> AppError {
    tracing::debug!(status = %rejection.status(), "rejected request body");
    AppError::validation(
        vec![json!({ "field": "body", "error": rejection.body_text() })],
        "request body is not valid JSON for this endpoint",
    )
}
