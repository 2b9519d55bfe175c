// src/models/quiz.rs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'quizzes' table in the database.
#[derive(Debug, Clone, FromRow)]
pub struct QuizRow {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub created_by: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Represents the 'questions' table in the database.
/// `sort_order` is the zero-based position declared by the author.
#[derive(Debug, Clone, FromRow)]
pub struct QuestionRow {
    pub id: i64,
    pub quiz_id: i64,
    pub text: String,
    pub sort_order: i32,
}

/// Represents the 'options' table in the database.
#[derive(Debug, Clone, FromRow)]
pub struct OptionRow {
    pub id: i64,
    pub question_id: i64,
    pub text: String,
    pub is_correct: bool,
    pub sort_order: i32,
}

/// A quiz with its questions and options, both in declared order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub created_by: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: i64,
    pub quiz_id: i64,
    pub text: String,
    pub order: i32,
    pub options: Vec<QuizOption>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizOption {
    pub id: i64,
    pub question_id: i64,
    pub text: String,
    pub is_correct: bool,
    pub order: i32,
}

impl Quiz {
    /// Assembles a quiz from its rows. `questions` must belong to this quiz
    /// and, like each options list, be sorted by `sort_order`.
    pub fn assemble(
        row: QuizRow,
        questions: Vec<QuestionRow>,
        options_by_question: &HashMap<i64, Vec<OptionRow>>,
    ) -> Self {
        let questions = questions
            .into_iter()
            .map(|q| Question {
                options: options_by_question
                    .get(&q.id)
                    .map(|opts| {
                        opts.iter()
                            .map(|o| QuizOption {
                                id: o.id,
                                question_id: o.question_id,
                                text: o.text.clone(),
                                is_correct: o.is_correct,
                                order: o.sort_order,
                            })
                            .collect()
                    })
                    .unwrap_or_default(),
                id: q.id,
                quiz_id: q.quiz_id,
                text: q.text,
                order: q.sort_order,
            })
            .collect();

        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
            questions,
        }
    }
}

/// Quiz as shown to students: identical shape without the answer key.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicQuiz {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub created_by: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub questions: Vec<PublicQuestion>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicQuestion {
    pub id: i64,
    pub quiz_id: i64,
    pub text: String,
    pub order: i32,
    pub options: Vec<PublicOption>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicOption {
    pub id: i64,
    pub question_id: i64,
    pub text: String,
    pub order: i32,
}

impl From<Quiz> for PublicQuiz {
    fn from(quiz: Quiz) -> Self {
        Self {
            id: quiz.id,
            title: quiz.title,
            description: quiz.description,
            created_by: quiz.created_by,
            created_at: quiz.created_at,
            updated_at: quiz.updated_at,
            questions: quiz
                .questions
                .into_iter()
                .map(|q| PublicQuestion {
                    id: q.id,
                    quiz_id: q.quiz_id,
                    text: q.text,
                    order: q.order,
                    options: q
                        .options
                        .into_iter()
                        .map(|o| PublicOption {
                            id: o.id,
                            question_id: o.question_id,
                            text: o.text,
                            order: o.order,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

/// What a handler sends back for a quiz read, depending on the caller's role.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum QuizView {
    Full(Quiz),
    Public(PublicQuiz),
}

/// DTO for one option inside a question.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OptionInput {
    #[validate(length(min = 1, max = 500, message = "Option text is required"))]
    pub text: String,
    pub is_correct: bool,
    #[validate(range(min = 0, message = "Order must be zero or greater"))]
    pub order: i32,
}

/// DTO for one question inside a quiz.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuestionInput {
    #[validate(length(min = 1, max = 1000, message = "Question text is required"))]
    pub text: String,
    #[validate(range(min = 0, message = "Order must be zero or greater"))]
    pub order: i32,
    #[validate(length(min = 2, message = "At least 2 options are required"), nested)]
    pub options: Vec<OptionInput>,
}

/// DTO for creating a new quiz.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuizRequest {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(length(min = 1, message = "At least 1 question is required"), nested)]
    pub questions: Vec<QuestionInput>,
}

/// DTO for updating a quiz. Fields are optional; `questions` replaces the
/// whole question set when present.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuizRequest {
    #[validate(length(min = 1, max = 200, message = "Title cannot be empty"))]
    pub title: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(length(min = 1, message = "At least 1 question is required"), nested)]
    pub questions: Option<Vec<QuestionInput>>,
}
