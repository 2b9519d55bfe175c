// src/services/leaderboard.rs

use std::collections::HashMap;

use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::leaderboard::{AttemptScore, LeaderboardEntry},
    repositories::attempts,
};

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

#[derive(Default)]
struct Tally {
    username: String,
    total_score: i64,
    count: i64,
    total_percentage: f64,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Groups attempts by user and ranks them.
///
/// Ranking is by total score descending, then username ascending, then
/// user id, so equal totals always come out in the same order.
pub fn aggregate(scores: &[AttemptScore], limit: usize) -> Vec<LeaderboardEntry> {
    let mut tallies: HashMap<i64, Tally> = HashMap::new();

    for attempt in scores {
        let tally = tallies.entry(attempt.user_id).or_insert_with(|| Tally {
            username: attempt.username.clone(),
            ..Tally::default()
        });
        tally.total_score += attempt.score;
        tally.count += 1;
        if attempt.total_questions > 0 {
            tally.total_percentage +=
                attempt.score as f64 / attempt.total_questions as f64 * 100.0;
        }
    }

    let mut entries: Vec<LeaderboardEntry> = tallies
        .into_iter()
        .map(|(user_id, tally)| LeaderboardEntry {
            user_id,
            username: tally.username,
            total_score: tally.total_score,
            quizzes_attempted: tally.count,
            average_percentage: round2(tally.total_percentage / tally.count as f64),
        })
        .collect();

    entries.sort_by(|a, b| {
        b.total_score
            .cmp(&a.total_score)
            .then_with(|| a.username.cmp(&b.username))
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
    entries.truncate(limit);
    entries
}

/// Requested entry count: 10 when absent, otherwise clamped to 0..=100.
pub fn effective_limit(limit: Option<i64>) -> usize {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(0, MAX_LIMIT) as usize
}

/// Top `limit` users across all attempts.
pub async fn global_leaderboard(
    pool: &SqlitePool,
    limit: Option<i64>,
) -> Result<Vec<LeaderboardEntry>, AppError> {
    let limit = effective_limit(limit);

    let scores = attempts::all_scores(pool).await.map_err(|e| {
        tracing::error!("Failed to fetch leaderboard: {:?}", e);
        AppError::from(e)
    })?;

    Ok(aggregate(&scores, limit))
}
