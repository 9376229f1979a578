use crate::shared::error::{AppError, FieldErrors};
use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError};

use crate::domain::password::password_within_bounds;

/// JSON body that has passed its `validator` rules.
///
/// Undecodable bodies are a 400; rule failures are a 422 listing every field.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(bad_body)?;

        value
            .validate()
            .map_err(|e| AppError::ValidationError(FieldErrors::from(e)))?;

        Ok(ValidatedJson(value))
    }
}

/// JSON body without declarative rules, for requests whose validation needs
/// runtime context and happens in the use case.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(bad_body)?;
        Ok(JsonBody(value))
    }
}

fn bad_body(rejection: JsonRejection) -> AppError {
    tracing::debug!("Rejected request body: {}", rejection);
    AppError::BadRequest(rejection.body_text())
}

/// `validator` hook for the byte-length password rule.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password_within_bounds(password) {
        Ok(())
    } else {
        let mut err = ValidationError::new("password_length");
        err.message = Some("must be between 8 and 72 bytes long".into());
        Err(err)
    }
}
