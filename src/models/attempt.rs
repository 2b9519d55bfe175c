// src/models/attempt.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::user::UserSummary;

/// Row joined from `quiz_attempts`, `users` and `quizzes`.
#[derive(Debug, Clone, FromRow)]
pub struct AttemptRow {
    pub id: i64,
    pub user_id: i64,
    pub quiz_id: i64,
    pub score: i64,
    pub total_questions: i64,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    pub username: String,
    pub email: String,
    pub quiz_title: String,
    pub quiz_description: Option<String>,
}

/// Represents the 'answers' table in the database.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub id: i64,
    pub attempt_id: i64,
    pub question_id: i64,
    pub option_id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizSummary {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
}

/// An attempt with its answers and the user/quiz it belongs to.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    pub id: i64,
    pub user_id: i64,
    pub quiz_id: i64,
    pub score: i64,
    pub total_questions: i64,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    pub answers: Vec<AnswerRecord>,
    pub user: UserSummary,
    pub quiz: QuizSummary,
}

impl Attempt {
    pub fn assemble(row: AttemptRow, answers: Vec<AnswerRecord>) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            quiz_id: row.quiz_id,
            score: row.score,
            total_questions: row.total_questions,
            submitted_at: row.submitted_at,
            answers,
            user: UserSummary {
                id: row.user_id,
                username: row.username,
                email: row.email,
            },
            quiz: QuizSummary {
                id: row.quiz_id,
                title: row.quiz_title,
                description: row.quiz_description,
            },
        }
    }
}

/// One selected option for one question.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerInput {
    pub question_id: i64,
    pub option_id: i64,
}

/// DTO for submitting a quiz attempt.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAttemptRequest {
    pub quiz_id: i64,
    #[validate(length(min = 1, message = "At least one answer is required"))]
    pub answers: Vec<AnswerInput>,
}
