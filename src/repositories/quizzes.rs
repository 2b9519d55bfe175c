// src/repositories/quizzes.rs

use std::collections::HashMap;

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use crate::models::quiz::{OptionRow, QuestionInput, QuestionRow, Quiz, QuizRow};

const QUIZ_COLUMNS: &str = "id, title, description, created_by, created_at, updated_at";

/// Inserts questions and their options for `quiz_id`, keeping declared order.
async fn insert_questions(
    conn: &mut SqliteConnection,
    quiz_id: i64,
    questions: &[QuestionInput],
) -> sqlx::Result<()> {
    for question in questions {
        let question_id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO questions (quiz_id, text, sort_order) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(quiz_id)
        .bind(&question.text)
        .bind(question.order)
        .fetch_one(&mut *conn)
        .await?;

        for option in &question.options {
            sqlx::query(
                "INSERT INTO options (question_id, text, is_correct, sort_order) VALUES (?, ?, ?, ?)",
            )
            .bind(question_id)
            .bind(&option.text)
            .bind(option.is_correct)
            .bind(option.order)
            .execute(&mut *conn)
            .await?;
        }
    }
    Ok(())
}

/// Creates a quiz with its nested questions and options in one transaction.
/// Returns the new quiz id.
pub async fn create(
    pool: &SqlitePool,
    owner_id: i64,
    title: &str,
    description: Option<&str>,
    questions: &[QuestionInput],
) -> sqlx::Result<i64> {
    let now = Utc::now();
    let mut tx = pool.begin().await?;

    let quiz_id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO quizzes (title, description, created_by, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(title)
    .bind(description)
    .bind(owner_id)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    insert_questions(&mut *tx, quiz_id, questions).await?;

    tx.commit().await?;
    Ok(quiz_id)
}

/// Which quizzes a read returns.
#[derive(Debug, Clone, Copy)]
enum QuizScope {
    All,
    Id(i64),
    Creator(i64),
}

impl QuizScope {
    /// Appends the matching `WHERE` clause, if any, for `quizzes`.
    fn push_where(self, builder: &mut QueryBuilder<'_, Sqlite>) {
        match self {
            QuizScope::All => {}
            QuizScope::Id(id) => {
                builder.push(" WHERE id = ").push_bind(id);
            }
            QuizScope::Creator(owner_id) => {
                builder.push(" WHERE created_by = ").push_bind(owner_id);
            }
        }
    }
}

/// Fetches the quiz row alone (no questions). Used for ownership checks.
pub async fn find_row(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<QuizRow>> {
    sqlx::query_as::<_, QuizRow>(&format!("SELECT {QUIZ_COLUMNS} FROM quizzes WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Quizzes in `scope`, newest first, with questions and options.
async fn find(pool: &SqlitePool, scope: QuizScope) -> sqlx::Result<Vec<Quiz>> {
    let mut builder: QueryBuilder<Sqlite> =
        QueryBuilder::new(format!("SELECT {QUIZ_COLUMNS} FROM quizzes"));
    scope.push_where(&mut builder);
    builder.push(" ORDER BY created_at DESC, id DESC");

    let rows: Vec<QuizRow> = builder.build_query_as().fetch_all(pool).await?;
    load_relations(pool, scope, rows).await
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<Quiz>> {
    Ok(find(pool, QuizScope::Id(id)).await?.pop())
}

pub async fn find_all(pool: &SqlitePool) -> sqlx::Result<Vec<Quiz>> {
    find(pool, QuizScope::All).await
}

/// Quizzes authored by `owner_id`, newest first.
pub async fn find_by_creator(pool: &SqlitePool, owner_id: i64) -> sqlx::Result<Vec<Quiz>> {
    find(pool, QuizScope::Creator(owner_id)).await
}

/// Applies a partial update. When `questions` is given, every existing
/// question (and by cascade every option) is deleted and the new set is
/// inserted, all inside one transaction.
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    title: Option<&str>,
    description: Option<&str>,
    questions: Option<&[QuestionInput]>,
) -> sqlx::Result<()> {
    let mut tx = pool.begin().await?;

    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE quizzes SET ");
    let mut separated = builder.separated(", ");

    separated.push("updated_at = ");
    separated.push_bind_unseparated(Utc::now());

    if let Some(title) = title {
        separated.push("title = ");
        separated.push_bind_unseparated(title);
    }

    if let Some(description) = description {
        separated.push("description = ");
        separated.push_bind_unseparated(description);
    }

    builder.push(" WHERE id = ");
    builder.push_bind(id);
    builder.build().execute(&mut *tx).await?;

    if let Some(questions) = questions {
        sqlx::query("DELETE FROM questions WHERE quiz_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        insert_questions(&mut *tx, id, questions).await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Deletes a quiz. Questions, options, attempts and answers go with it via
/// `ON DELETE CASCADE`. Returns the number of quizzes removed.
pub async fn delete(pool: &SqlitePool, id: i64) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM quizzes WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Loads questions and options for the quizzes in `scope` with two queries
/// and stitches them together, preserving the order of `rows`. The scope is
/// repeated as a subquery so the bind count stays constant.
async fn load_relations(
    pool: &SqlitePool,
    scope: QuizScope,
    rows: Vec<QuizRow>,
) -> sqlx::Result<Vec<Quiz>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
        r#"
        SELECT id, quiz_id, text, sort_order
        FROM questions
        WHERE quiz_id IN (SELECT id FROM quizzes"#,
    );
    scope.push_where(&mut builder);
    builder.push(") ORDER BY quiz_id, sort_order");
    let questions: Vec<QuestionRow> = builder.build_query_as().fetch_all(pool).await?;

    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
        r#"
        SELECT o.id, o.question_id, o.text, o.is_correct, o.sort_order
        FROM options o
        JOIN questions q ON q.id = o.question_id
        WHERE q.quiz_id IN (SELECT id FROM quizzes"#,
    );
    scope.push_where(&mut builder);
    builder.push(") ORDER BY o.question_id, o.sort_order");
    let options: Vec<OptionRow> = builder.build_query_as().fetch_all(pool).await?;

    let mut questions_by_quiz: HashMap<i64, Vec<QuestionRow>> = HashMap::new();
    for question in questions {
        questions_by_quiz
            .entry(question.quiz_id)
            .or_default()
            .push(question);
    }

    let mut options_by_question: HashMap<i64, Vec<OptionRow>> = HashMap::new();
    for option in options {
        options_by_question
            .entry(option.question_id)
            .or_default()
            .push(option);
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let questions = questions_by_quiz.remove(&row.id).unwrap_or_default();
            Quiz::assemble(row, questions, &options_by_question)
        })
        .collect())
}
