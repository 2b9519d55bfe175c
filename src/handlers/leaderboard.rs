// src/handlers/leaderboard.rs

use axum::{Json, extract::State, response::IntoResponse};
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::{leaderboard::LeaderboardParams, response::ApiResponse},
    services::leaderboard,
    utils::extract::ApiQuery,
};

/// Retrieves the global leaderboard, `?limit=N` entries (default 10).
pub async fn get_leaderboard(
    State(pool): State<SqlitePool>,
    ApiQuery(params): ApiQuery<LeaderboardParams>,
) -> Result<impl IntoResponse, AppError> {
    let entries = leaderboard::global_leaderboard(&pool, params.limit).await?;

    Ok(Json(ApiResponse::ok(entries)))
}
