// src/handlers/attempt.rs

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::{attempt::SubmitAttemptRequest, response::ApiResponse},
    services::attempt,
    utils::{
        extract::{ApiPath, ValidatedJson},
        jwt::Claims,
    },
};

/// Scores a submission and stores it.
/// Student only.
pub async fn submit_attempt(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    ValidatedJson(payload): ValidatedJson<SubmitAttemptRequest>,
) -> Result<impl IntoResponse, AppError> {
    let attempt = attempt::submit(&pool, claims.id, payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(attempt, "Quiz submitted successfully")),
    ))
}

/// The caller's own attempt history.
pub async fn my_attempts(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let attempts = attempt::get_by_user_id(&pool, claims.id).await?;

    Ok(Json(ApiResponse::ok(attempts)))
}

pub async fn get_attempt(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    let attempt = attempt::get_by_id(&pool, id, &claims).await?;

    Ok(Json(ApiResponse::ok(attempt)))
}

/// Admin only.
pub async fn list_attempts(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let attempts = attempt::get_all(&pool).await?;

    Ok(Json(ApiResponse::ok(attempts)))
}

/// Admin only.
pub async fn attempts_by_quiz(
    State(pool): State<SqlitePool>,
    ApiPath(quiz_id): ApiPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    let attempts = attempt::get_by_quiz_id(&pool, quiz_id).await?;

    Ok(Json(ApiResponse::ok(attempts)))
}

/// Admin only.
pub async fn attempts_by_user(
    State(pool): State<SqlitePool>,
    ApiPath(user_id): ApiPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    let attempts = attempt::get_by_user_id(&pool, user_id).await?;

    Ok(Json(ApiResponse::ok(attempts)))
}
