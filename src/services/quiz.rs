// src/services/quiz.rs

use std::collections::HashSet;

use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    models::quiz::{CreateQuizRequest, QuestionInput, Quiz, QuizRow, UpdateQuizRequest},
    repositories::quizzes,
    utils::html::clean_html,
};

/// Structural rules a question set must satisfy before it is stored:
/// non-blank texts, at least two options, exactly one correct option,
/// and no repeated `order` among questions or among a question's options.
pub fn validate_questions(questions: &[QuestionInput]) -> Result<(), AppError> {
    if questions.is_empty() {
        return Err(AppError::BadRequest(
            "At least 1 question is required".to_string(),
        ));
    }

    let mut question_orders = HashSet::new();
    for (idx, question) in questions.iter().enumerate() {
        let n = idx + 1;

        if question.text.trim().is_empty() {
            return Err(AppError::BadRequest(format!(
                "Question {n}: question text is required"
            )));
        }

        if !question_orders.insert(question.order) {
            return Err(AppError::BadRequest(format!(
                "Question {n}: order {} is used more than once",
                question.order
            )));
        }

        if question.options.len() < 2 {
            return Err(AppError::BadRequest(format!(
                "Question {n}: at least 2 options are required"
            )));
        }

        let mut option_orders = HashSet::new();
        for option in &question.options {
            if option.text.trim().is_empty() {
                return Err(AppError::BadRequest(format!(
                    "Question {n}: option text is required"
                )));
            }
            if !option_orders.insert(option.order) {
                return Err(AppError::BadRequest(format!(
                    "Question {n}: option order {} is used more than once",
                    option.order
                )));
            }
        }

        let correct = question.options.iter().filter(|o| o.is_correct).count();
        if correct != 1 {
            return Err(AppError::BadRequest(format!(
                "Question {n}: each question must have exactly one correct answer"
            )));
        }
    }

    Ok(())
}

fn validate_title(title: &str) -> Result<(), AppError> {
    if title.trim().is_empty() {
        return Err(AppError::BadRequest("Title is required".to_string()));
    }
    Ok(())
}

/// Loads the quiz row and checks that `owner_id` created it.
async fn owned_quiz(
    pool: &SqlitePool,
    id: i64,
    owner_id: i64,
    action: &str,
) -> Result<QuizRow, AppError> {
    let quiz = quizzes::find_row(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))?;

    if quiz.created_by != owner_id {
        return Err(AppError::Forbidden(format!(
            "You can only {action} your own quizzes"
        )));
    }

    Ok(quiz)
}

pub async fn create_quiz(
    pool: &SqlitePool,
    owner_id: i64,
    payload: CreateQuizRequest,
) -> Result<Quiz, AppError> {
    payload.validate()?;
    validate_title(&payload.title)?;
    validate_questions(&payload.questions)?;

    let description = payload.description.as_deref().map(clean_html);

    let id = quizzes::create(
        pool,
        owner_id,
        payload.title.trim(),
        description.as_deref(),
        &payload.questions,
    )
    .await
    .map_err(|e| {
        tracing::error!("Failed to create quiz: {:?}", e);
        AppError::from(e)
    })?;

    tracing::info!(quiz_id = id, owner_id, "quiz created");
    get_quiz(pool, id).await
}

pub async fn get_quiz(pool: &SqlitePool, id: i64) -> Result<Quiz, AppError> {
    quizzes::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))
}

pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Quiz>, AppError> {
    Ok(quizzes::find_all(pool).await?)
}

pub async fn list_by_creator(pool: &SqlitePool, owner_id: i64) -> Result<Vec<Quiz>, AppError> {
    Ok(quizzes::find_by_creator(pool, owner_id).await?)
}

/// Partial update. A supplied `questions` list replaces every existing
/// question and option; their previous ids are discarded.
pub async fn update_quiz(
    pool: &SqlitePool,
    id: i64,
    owner_id: i64,
    payload: UpdateQuizRequest,
) -> Result<Quiz, AppError> {
    owned_quiz(pool, id, owner_id, "update").await?;

    payload.validate()?;
    if let Some(title) = &payload.title {
        validate_title(title)?;
    }
    if let Some(questions) = &payload.questions {
        validate_questions(questions)?;
    }

    let description = payload.description.as_deref().map(clean_html);

    quizzes::update(
        pool,
        id,
        payload.title.as_deref().map(str::trim),
        description.as_deref(),
        payload.questions.as_deref(),
    )
    .await
    .map_err(|e| {
        tracing::error!("Failed to update quiz {}: {:?}", id, e);
        AppError::from(e)
    })?;

    tracing::info!(
        quiz_id = id,
        replaced_questions = payload.questions.is_some(),
        "quiz updated"
    );
    get_quiz(pool, id).await
}

pub async fn delete_quiz(pool: &SqlitePool, id: i64, owner_id: i64) -> Result<(), AppError> {
    owned_quiz(pool, id, owner_id, "delete").await?;

    if quizzes::delete(pool, id).await? == 0 {
        return Err(AppError::NotFound("Quiz not found".to_string()));
    }

    tracing::info!(quiz_id = id, "quiz deleted");
    Ok(())
}
