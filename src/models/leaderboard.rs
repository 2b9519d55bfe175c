// src/models/leaderboard.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One attempt reduced to what the leaderboard needs.
#[derive(Debug, Clone, FromRow)]
pub struct AttemptScore {
    pub user_id: i64,
    pub username: String,
    pub score: i64,
    pub total_questions: i64,
}

/// Aggregated standing of one user across all their attempts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub user_id: i64,
    pub username: String,
    pub total_score: i64,
    pub quizzes_attempted: i64,
    pub average_percentage: f64,
}

/// Query parameters for the leaderboard.
#[derive(Debug, Deserialize)]
pub struct LeaderboardParams {
    /// Number of entries to return (default: 10, max: 100).
    pub limit: Option<i64>,
}
