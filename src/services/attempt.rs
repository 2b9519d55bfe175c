// src/services/attempt.rs

use std::collections::{HashMap, HashSet};

use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        attempt::{AnswerInput, Attempt, SubmitAttemptRequest},
        quiz::Quiz,
        user::Role,
    },
    repositories::{
        attempts::{self, AttemptFilter},
        quizzes,
    },
    utils::jwt::Claims,
};

/// Checks that `answers` covers every question of `quiz` exactly once and
/// returns the number of correct answers.
///
/// An option id that does not belong to the answered question is not an
/// error; it just doesn't score.
pub fn score_answers(quiz: &Quiz, answers: &[AnswerInput]) -> Result<i64, AppError> {
    let mut answered = HashSet::with_capacity(answers.len());
    if !answers.iter().all(|a| answered.insert(a.question_id)) {
        return Err(AppError::BadRequest(
            "Each question can only be answered once".to_string(),
        ));
    }

    if answers.len() != quiz.questions.len() {
        return Err(AppError::BadRequest(
            "All questions must be answered".to_string(),
        ));
    }

    // question id -> ids of its correct options
    let key: HashMap<i64, HashSet<i64>> = quiz
        .questions
        .iter()
        .map(|q| {
            let correct = q
                .options
                .iter()
                .filter(|o| o.is_correct)
                .map(|o| o.id)
                .collect();
            (q.id, correct)
        })
        .collect();

    if answers.iter().any(|a| !key.contains_key(&a.question_id)) {
        return Err(AppError::BadRequest("Invalid question IDs".to_string()));
    }

    let score = answers
        .iter()
        .filter(|a| key[&a.question_id].contains(&a.option_id))
        .count();

    Ok(score as i64)
}

/// Scores and stores a student's submission.
pub async fn submit(
    pool: &SqlitePool,
    student_id: i64,
    payload: SubmitAttemptRequest,
) -> Result<Attempt, AppError> {
    payload.validate()?;

    let quiz = quizzes::find_by_id(pool, payload.quiz_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))?;

    let score = score_answers(&quiz, &payload.answers)?;
    let total_questions = quiz.questions.len() as i64;

    let attempt_id = attempts::create(
        pool,
        student_id,
        quiz.id,
        score,
        total_questions,
        &payload.answers,
    )
    .await
    .map_err(|e| {
        tracing::error!("Failed to store attempt: {:?}", e);
        AppError::from(e)
    })?;

    tracing::info!(
        attempt_id,
        quiz_id = quiz.id,
        student_id,
        score,
        total_questions,
        "attempt submitted"
    );

    attempts::find_by_id(pool, attempt_id)
        .await?
        .ok_or_else(|| AppError::InternalServerError("Stored attempt vanished".to_string()))
}

/// Fetches one attempt. Students may only see their own.
pub async fn get_by_id(pool: &SqlitePool, id: i64, viewer: &Claims) -> Result<Attempt, AppError> {
    let attempt = attempts::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Attempt not found".to_string()))?;

    if viewer.role != Role::Admin && attempt.user_id != viewer.id {
        return Err(AppError::Forbidden(
            "You can only view your own attempts".to_string(),
        ));
    }

    Ok(attempt)
}

pub async fn get_by_quiz_id(pool: &SqlitePool, quiz_id: i64) -> Result<Vec<Attempt>, AppError> {
    Ok(attempts::find(pool, AttemptFilter::Quiz(quiz_id)).await?)
}

pub async fn get_by_user_id(pool: &SqlitePool, user_id: i64) -> Result<Vec<Attempt>, AppError> {
    Ok(attempts::find(pool, AttemptFilter::User(user_id)).await?)
}

pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Attempt>, AppError> {
    Ok(attempts::find(pool, AttemptFilter::All).await?)
}
