use crate::application::auth::activate::ActivateUserUseCase;
use crate::application::auth::login::{LoginRequest, LoginUseCase};
use crate::application::auth::logout::LogoutUseCase;
use crate::application::auth::password_reset::{
    RequestPasswordResetRequest, RequestPasswordResetUseCase, ResetPasswordRequest,
    ResetPasswordUseCase, VerifyResetCodeRequest, VerifyResetCodeUseCase,
};
use crate::application::auth::refresh::RefreshTokenUseCase;
use crate::application::auth::register::{RegisterRequest, RegisterUseCase};
use crate::infrastructure::state::AppState;
use crate::presentation::cookies::{
    REFRESH_COOKIE, clear_refresh_cookie, parse_cookie, presented_refresh_token, refresh_cookie,
};
use crate::presentation::dtos::{AuthTokenResource, UserResource};
use crate::presentation::extractors::{AuthUser, bearer_token};
use crate::shared::error::{AppError, ErrorResponse};
use crate::shared::response::{JsonApiMeta, JsonApiResource, JsonApiResponse};
use crate::shared::validation::{JsonBody, ValidatedJson};
use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use uuid::Uuid;

fn message(text: &str) -> Json<JsonApiResponse<Value>> {
    Json(
        JsonApiResponse::new(Value::Null)
            .with_meta(JsonApiMeta::new().with_extra(json!({ "message": text }))),
    )
}

/// Register a customer account
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 202, description = "Account created, welcome email queued", body = JsonApiResponse<JsonApiResource<UserResource>>),
        (status = 422, description = "Validation error or duplicate email", body = ErrorResponse)
    ),
    tag = "Client / Auth"
)]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let use_case = RegisterUseCase::new(
        state.users,
        state.password_service,
        state.mailer,
        state.config.admin_role_id,
        state.config.public_base_url.clone(),
    );

    let user = use_case.execute(req).await?;
    let resource = JsonApiResource::new("users", user.id, UserResource::from(user));

    Ok((StatusCode::ACCEPTED, Json(JsonApiResponse::new(resource))))
}

/// Exchange credentials for an access/refresh token pair
#[utoipa::path(
    post,
    path = "/api/v1/auth/authenticate",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful; refresh token also set as the refreshToken cookie", body = JsonApiResponse<JsonApiResource<AuthTokenResource>>),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 403, description = "Account not activated", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Client / Auth"
)]
pub async fn authenticate(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Response, AppError> {
    let use_case = LoginUseCase::new(
        state.users,
        state.sessions,
        state.auth_service.clone(),
        state.password_service,
        state.config.require_activation,
    );

    let tokens = use_case.execute(req).await?;
    token_response(tokens.into(), state.auth_service.refresh_token_expiry())
}

/// Mint a new access token from the current refresh token
///
/// The refresh token is read from the bearer header, falling back to the
/// `refreshToken` cookie.
#[utoipa::path(
    get,
    path = "/api/v1/auth/refresh",
    responses(
        (status = 200, description = "Token refreshed successfully", body = JsonApiResponse<JsonApiResource<AuthTokenResource>>),
        (status = 401, description = "Invalid, expired or superseded refresh token", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Client / Auth"
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let presented = match bearer_token(&headers) {
        Ok(token) => token.to_string(),
        Err(err) => parse_cookie(&headers, REFRESH_COOKIE).ok_or(err)?,
    };

    let use_case = RefreshTokenUseCase::new(
        state.sessions,
        state.auth_service.clone(),
        state.config.rotate_refresh_tokens,
    );

    let tokens = use_case.execute(&presented).await?;
    token_response(tokens.into(), state.auth_service.refresh_token_expiry())
}

fn token_response(tokens: AuthTokenResource, cookie_max_age: i64) -> Result<Response, AppError> {
    let cookie = tokens
        .refresh_token
        .as_deref()
        .map(|token| refresh_cookie(token, cookie_max_age))
        .transpose()?;

    let resource = JsonApiResource::new("auth-tokens", "session", tokens);
    let mut response = (StatusCode::OK, Json(JsonApiResponse::new(resource))).into_response();
    if let Some(cookie) = cookie {
        response.headers_mut().insert(SET_COOKIE, cookie);
    }
    Ok(response)
}

/// End the current session
#[utoipa::path(
    get,
    path = "/api/v1/auth/logout",
    params(
        ("X-Refresh-Token" = Option<String>, Header, description = "Refresh token, when not sent as the refreshToken cookie")
    ),
    responses(
        (status = 200, description = "Logged out; refresh cookie cleared", body = JsonApiResponse<serde_json::Value>),
        (status = 401, description = "No matching session", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Client / Auth"
)]
pub async fn logout(
    State(state): State<AppState>,
    auth_user: AuthUser,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let presented = presented_refresh_token(&headers);

    LogoutUseCase::new(state.sessions)
        .execute(auth_user.user.id, presented.as_deref())
        .await?;

    Ok((
        StatusCode::OK,
        [(SET_COOKIE, clear_refresh_cookie())],
        message("logged out"),
    ))
}

/// Activate an account from the emailed link
#[utoipa::path(
    get,
    path = "/api/v1/auth/activate/{token}",
    params(
        ("token" = Uuid, Path, description = "Activation token")
    ),
    responses(
        (status = 200, description = "Account activated", body = JsonApiResponse<JsonApiResource<UserResource>>),
        (status = 404, description = "Unknown or already used token", body = ErrorResponse)
    ),
    tag = "Client / Auth"
)]
pub async fn activate(
    State(state): State<AppState>,
    Path(token): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let user = ActivateUserUseCase::new(state.users).execute(token).await?;
    let resource = JsonApiResource::new("users", user.id, UserResource::from(user));

    Ok((StatusCode::OK, Json(JsonApiResponse::new(resource))))
}

/// Email a password reset code
#[utoipa::path(
    post,
    path = "/api/v1/auth/request-password-reset",
    request_body = RequestPasswordResetRequest,
    responses(
        (status = 202, description = "Reset code sent if the address has an account", body = JsonApiResponse<serde_json::Value>),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Client / Auth"
)]
pub async fn request_password_reset(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RequestPasswordResetRequest>,
) -> Result<impl IntoResponse, AppError> {
    RequestPasswordResetUseCase::new(state.users, state.mailer)
        .execute(req)
        .await?;

    Ok((
        StatusCode::ACCEPTED,
        message("if the address belongs to an account, a reset code has been sent"),
    ))
}

/// Check a reset code before asking for the new password
#[utoipa::path(
    post,
    path = "/api/v1/auth/verify-reset-code",
    request_body = VerifyResetCodeRequest,
    responses(
        (status = 200, description = "Code is valid and unexpired", body = JsonApiResponse<serde_json::Value>),
        (status = 401, description = "Unknown or expired code", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Client / Auth"
)]
pub async fn verify_reset_code(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<VerifyResetCodeRequest>,
) -> Result<impl IntoResponse, AppError> {
    VerifyResetCodeUseCase::new(state.users).execute(req).await?;

    Ok((StatusCode::OK, message("reset code is valid")))
}

/// Set a new password using a reset code
#[utoipa::path(
    post,
    path = "/api/v1/auth/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password changed; existing session revoked", body = JsonApiResponse<serde_json::Value>),
        (status = 401, description = "Unknown or expired code", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Client / Auth"
)]
pub async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ResetPasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    ResetPasswordUseCase::new(state.users, state.sessions, state.password_service)
        .execute(req)
        .await?;

    Ok((StatusCode::OK, message("password has been reset")))
}
