use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// A single failing request field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Every failing field of a request, collected rather than fail-fast.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Record `message` against `field` when `ok` is false.
    pub fn check(&mut self, ok: bool, field: impl Into<String>, message: impl Into<String>) {
        if !ok {
            self.add(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn merge(&mut self, other: FieldErrors) {
        self.0.extend(other.0);
    }

    /// `Ok(())` when nothing was recorded, otherwise a validation error.
    pub fn into_result(self) -> Result<(), AppError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::ValidationError(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = FieldErrors::new();
        for (field, errs) in errors.field_errors() {
            for err in errs.iter() {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                fields.add(field.to_string(), message);
            }
        }
        fields.0.sort_by(|a, b| a.field.cmp(&b.field));
        fields
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    ValidationError(FieldErrors),
    #[error("Duplicate email")]
    DuplicateEmail,
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Token expired or invalid")]
    TokenExpiredOrInvalid,
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Edit conflict")]
    EditConflict,
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
    #[error("Internal server error: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

/// JSON:API error document
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub errors: Vec<JsonApiError>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct JsonApiError {
    pub status: String,
    pub title: String,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<JsonApiErrorSource>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct JsonApiErrorSource {
    pub pointer: String,
}

impl JsonApiError {
    fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status: status.as_u16().to_string(),
            title: status
                .canonical_reason()
                .unwrap_or("Error")
                .to_string(),
            detail: detail.into(),
            source: None,
        }
    }

    fn with_pointer(mut self, field: &str) -> Self {
        self.source = Some(JsonApiErrorSource {
            pointer: json_pointer(field),
        });
        self
    }
}

/// `products[1].price` becomes `/products/1/price`.
fn json_pointer(field: &str) -> String {
    let segments: Vec<&str> = field
        .split(['.', '[', ']'])
        .filter(|s| !s.is_empty())
        .collect();
    format!("/{}", segments.join("/"))
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::DuplicateEmail => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials
            | AppError::Unauthorized(_)
            | AppError::TokenExpiredOrInvalid => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::EditConflict => StatusCode::CONFLICT,
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let errors = match self {
            AppError::ValidationError(fields) => fields
                .iter()
                .map(|e| JsonApiError::new(status, e.message.clone()).with_pointer(&e.field))
                .collect(),
            AppError::DuplicateEmail => vec![
                JsonApiError::new(status, "a user with this email address already exists")
                    .with_pointer("email"),
            ],
            AppError::BadRequest(msg) => vec![JsonApiError::new(status, msg)],
            AppError::InvalidCredentials => vec![JsonApiError::new(
                status,
                "invalid authentication credentials",
            )],
            AppError::Unauthorized(msg) => {
                tracing::debug!("Unauthorized: {}", msg);
                vec![JsonApiError::new(
                    status,
                    "invalid or missing authentication token",
                )]
            }
            AppError::TokenExpiredOrInvalid => {
                vec![JsonApiError::new(status, "token expired or invalid")]
            }
            AppError::Forbidden(msg) => vec![JsonApiError::new(status, msg)],
            AppError::NotFound(msg) => vec![JsonApiError::new(status, msg)],
            AppError::EditConflict => vec![JsonApiError::new(
                status,
                "unable to update the record due to an edit conflict, please try again",
            )],
            AppError::DatabaseError(e) => {
                tracing::error!("Database error: {:?}", e);
                vec![JsonApiError::new(status, "Database error")]
            }
            AppError::InternalServerError(e) => {
                tracing::error!("Internal server error: {:?}", e);
                vec![JsonApiError::new(status, "Internal server error")]
            }
        };

        (status, Json(ErrorResponse { errors })).into_response()
    }
}
