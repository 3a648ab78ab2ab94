//! Handlers for the `/auth` resource (register, login, verify).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use thrush_core::error::CoreError;
use thrush_db::models::user::{CreateUser, UserResponse};
use thrush_db::repositories::UserRepo;
use validator::Validate;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 4, max = 20))]
    pub mobile: Option<String>,
    #[validate(length(min = 8, message = "Password must be at least 8 characters long"))]
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request body for `POST /auth/verify`.
#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    /// The encrypted key delivered alongside the code.
    pub key: String,
    pub code: u64,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
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
/// Creates an inactive account. The on-create hooks grant its object
/// permissions, put it in the default group and send a verification code.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    input.validate()?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let create = CreateUser {
        username: input.username,
        email: input.email,
        mobile: input.mobile,
        password_hash,
        first_name: input.first_name,
        last_name: input.last_name,
        image: None,
        is_active: false,
        is_superuser: false,
    };

    let mut tx = state.pool.begin().await?;
    let user = UserRepo::create(&mut *tx, &create).await?;
    state
        .lifecycle
        .commit_created(&state.pool, tx, &user)
        .await?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UserResponse::from(&user),
        }),
    ))
}

/// POST /api/v1/auth/login
///
/// Exchange username and password for an access token. Unverified accounts
/// are refused with 403.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<DataResponse<LoginResponse>>> {
    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid username or password".into()));

    let user = UserRepo::find_by_username(&state.pool, &input.username)
        .await?
        .ok_or_else(invalid)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(invalid());
    }

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is not verified".into(),
        )));
    }

    let jwt = &state.config.jwt;
    let access_token = generate_access_token(user.id, user.is_superuser, jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(Json(DataResponse {
        data: LoginResponse {
            access_token,
            token_type: "Bearer",
            expires_in: jwt.access_token_expiry_mins * 60,
            user: UserResponse::from(&user),
        },
    }))
}

/// POST /api/v1/auth/verify
///
/// Redeem a verification code and activate the account.
pub async fn verify(
    State(state): State<AppState>,
    Json(input): Json<VerifyRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user_id = state.verification.consume(&input.key, input.code)?;

    let user = UserRepo::mark_verified(&state.pool, user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "user",
            id: user_id,
        })?;

    tracing::info!(user_id = user.id, "User verified");

    Ok(Json(DataResponse {
        data: UserResponse::from(&user),
    }))
}
