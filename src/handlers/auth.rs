// src/handlers/auth.rs

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use sqlx::SqlitePool;

use crate::{
    config::Config,
    error::AppError,
    models::{
        response::ApiResponse,
        user::{LoginRequest, RegisterRequest},
    },
    services::auth,
    utils::{extract::ValidatedJson, jwt::Claims},
};

/// Registers a new user.
///
/// Returns 201 Created with a token and the user object (excluding password).
pub async fn register(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let auth = auth::register(&pool, &config, payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(auth, "User registered successfully")),
    ))
}

/// Authenticates a user and returns a JWT token.
pub async fn login(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let auth = auth::login(&pool, &config, payload).await?;

    Ok(Json(ApiResponse::with_message(auth, "Login successful")))
}

/// Tokens are stateless; the client discards its copy.
pub async fn logout() -> impl IntoResponse {
    Json(ApiResponse::with_message((), "Logged out successfully"))
}

/// Returns the account behind the bearer token.
pub async fn me(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user = auth::current_user(&pool, claims.id).await?;

    Ok(Json(ApiResponse::ok(user)))
}
