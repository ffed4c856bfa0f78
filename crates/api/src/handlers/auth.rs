//! Handlers for the `/auth` resource (register, login).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use feedback_core::error::CoreError;
use feedback_core::roles::Role;
use feedback_core::types::DbId;
use feedback_core::users::{validate_email, validate_full_name, validate_registration_role};
use feedback_db::models::user::{CreateUser, UserResponse};
use feedback_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::error::{is_unique_violation, AppError, AppResult};
use crate::handlers::check_manager_assignment;
use crate::response::AppJson;
use crate::state::AppState;

/// Unique constraint on `users.email`.
pub(crate) const EMAIL_CONSTRAINT: &str = "uq_users_email";

pub(crate) const EMAIL_TAKEN_MESSAGE: &str = "Email already registered";

const INVALID_CREDENTIALS_MESSAGE: &str = "Incorrect email or password";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub full_name: String,
    pub password: String,
    pub role: Role,
    pub manager_id: Option<DbId>,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    /// Always `"bearer"`.
    pub token_type: &'static str,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create a manager or employee account. Returns 201 with the new user.
pub async fn register(
    State(state): State<AppState>,
    AppJson(input): AppJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    validate_email(&input.email)?;
    validate_full_name(&input.full_name)?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    validate_registration_role(input.role)?;

    if UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::BadRequest(EMAIL_TAKEN_MESSAGE.into())));
    }

    if let Some(manager_id) = input.manager_id {
        check_manager_assignment(&state.pool, None, manager_id).await?;
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let create = CreateUser {
        email: input.email,
        full_name: input.full_name.trim().to_string(),
        password_hash,
        role: input.role,
        manager_id: input.manager_id,
    };

    let user = UserRepo::create(&state.pool, &create)
        .await
        .map_err(|e| {
            if is_unique_violation(&e, EMAIL_CONSTRAINT) {
                AppError::Core(CoreError::BadRequest(EMAIL_TAKEN_MESSAGE.into()))
            } else {
                AppError::Database(e)
            }
        })?;

    tracing::info!(user_id = user.id, role = %user.role, "User registered");

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password and return a bearer access token.
pub async fn login(
    State(state): State<AppState>,
    AppJson(input): AppJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized(INVALID_CREDENTIALS_MESSAGE.into())))?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            INVALID_CREDENTIALS_MESSAGE.into(),
        )));
    }

    let principal = user.principal()?;
    principal.ensure_active()?;

    let access_token = generate_access_token(user.id, principal.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(LoginResponse {
        access_token,
        token_type: "bearer",
        expires_in: state.config.jwt.expires_in_secs(),
        user: UserResponse::from(&user),
    }))
}
