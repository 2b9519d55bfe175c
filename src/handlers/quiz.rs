// src/handlers/quiz.rs

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::{
        quiz::{CreateQuizRequest, PublicQuiz, Quiz, QuizView, UpdateQuizRequest},
        response::ApiResponse,
        user::Role,
    },
    services::quiz,
    utils::{
        extract::{ApiPath, ValidatedJson},
        jwt::Claims,
    },
};

/// Students never receive the answer key.
fn view_for(claims: &Claims, quiz: Quiz) -> QuizView {
    match claims.role {
        Role::Admin => QuizView::Full(quiz),
        Role::Student => QuizView::Public(PublicQuiz::from(quiz)),
    }
}

/// Lists every quiz, newest first.
pub async fn list_quizzes(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let quizzes: Vec<QuizView> = quiz::list_all(&pool)
        .await?
        .into_iter()
        .map(|q| view_for(&claims, q))
        .collect();

    Ok(Json(ApiResponse::ok(quizzes)))
}

/// Lists quizzes authored by the calling admin.
pub async fn list_my_quizzes(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let quizzes = quiz::list_by_creator(&pool, claims.id).await?;

    Ok(Json(ApiResponse::ok(quizzes)))
}

pub async fn get_quiz(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = quiz::get_quiz(&pool, id).await?;

    Ok(Json(ApiResponse::ok(view_for(&claims, quiz))))
}

/// Creates a quiz with its questions and options.
/// Admin only.
pub async fn create_quiz(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    ValidatedJson(payload): ValidatedJson<CreateQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = quiz::create_quiz(&pool, claims.id, payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(quiz, "Quiz created successfully")),
    ))
}

/// Admin only, and only the quiz's creator.
pub async fn update_quiz(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(payload): ValidatedJson<UpdateQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = quiz::update_quiz(&pool, id, claims.id, payload).await?;

    Ok(Json(ApiResponse::with_message(quiz, "Quiz updated successfully")))
}

/// Admin only, and only the quiz's creator. Attempts on the quiz are removed too.
pub async fn delete_quiz(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    quiz::delete_quiz(&pool, id, claims.id).await?;

    Ok(Json(ApiResponse::with_message(
        Option::<()>::None,
        "Quiz deleted successfully",
    )))
}
