// src/repositories/attempts.rs

use std::collections::HashMap;

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::models::{
    attempt::{AnswerInput, AnswerRecord, Attempt, AttemptRow},
    leaderboard::AttemptScore,
};

const ATTEMPT_SELECT: &str = r#"
    SELECT
        a.id, a.user_id, a.quiz_id, a.score, a.total_questions, a.submitted_at,
        u.username, u.email,
        q.title AS quiz_title, q.description AS quiz_description
    FROM quiz_attempts a
    JOIN users u ON u.id = a.user_id
    JOIN quizzes q ON q.id = a.quiz_id
"#;

/// Which attempts a listing query returns.
#[derive(Debug, Clone, Copy)]
pub enum AttemptFilter {
    All,
    Id(i64),
    Quiz(i64),
    User(i64),
}

/// Persists an attempt and one answer row per submitted pair in one
/// transaction. Returns the new attempt id.
pub async fn create(
    pool: &SqlitePool,
    user_id: i64,
    quiz_id: i64,
    score: i64,
    total_questions: i64,
    answers: &[AnswerInput],
) -> sqlx::Result<i64> {
    let mut tx = pool.begin().await?;

    let attempt_id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO quiz_attempts (user_id, quiz_id, score, total_questions, submitted_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(quiz_id)
    .bind(score)
    .bind(total_questions)
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await?;

    for answer in answers {
        sqlx::query("INSERT INTO answers (attempt_id, question_id, option_id) VALUES (?, ?, ?)")
            .bind(attempt_id)
            .bind(answer.question_id)
            .bind(answer.option_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(attempt_id)
}

impl AttemptFilter {
    /// Appends the matching `WHERE` clause, if any, for `quiz_attempts a`.
    fn push_where(self, builder: &mut QueryBuilder<'_, Sqlite>) {
        match self {
            AttemptFilter::All => {}
            AttemptFilter::Id(id) => {
                builder.push(" WHERE a.id = ").push_bind(id);
            }
            AttemptFilter::Quiz(quiz_id) => {
                builder.push(" WHERE a.quiz_id = ").push_bind(quiz_id);
            }
            AttemptFilter::User(user_id) => {
                builder.push(" WHERE a.user_id = ").push_bind(user_id);
            }
        }
    }
}

/// Attempts matching `filter`, newest first, with answers attached.
pub async fn find(pool: &SqlitePool, filter: AttemptFilter) -> sqlx::Result<Vec<Attempt>> {
    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(ATTEMPT_SELECT);
    filter.push_where(&mut builder);
    builder.push(" ORDER BY a.submitted_at DESC, a.id DESC");

    let rows: Vec<AttemptRow> = builder.build_query_as().fetch_all(pool).await?;
    attach_answers(pool, filter, rows).await
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<Attempt>> {
    Ok(find(pool, AttemptFilter::Id(id)).await?.pop())
}

/// Every attempt reduced to (user, score, total), oldest first.
pub async fn all_scores(pool: &SqlitePool) -> sqlx::Result<Vec<AttemptScore>> {
    sqlx::query_as::<_, AttemptScore>(
        r#"
        SELECT a.user_id, u.username, a.score, a.total_questions
        FROM quiz_attempts a
        JOIN users u ON u.id = a.user_id
        ORDER BY a.id
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Loads the answers of every attempt selected by `filter` in one query.
/// The filter is repeated as a subquery so the bind count stays constant.
async fn attach_answers(
    pool: &SqlitePool,
    filter: AttemptFilter,
    rows: Vec<AttemptRow>,
) -> sqlx::Result<Vec<Attempt>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
        r#"
        SELECT id, attempt_id, question_id, option_id
        FROM answers
        WHERE attempt_id IN (SELECT a.id FROM quiz_attempts a"#,
    );
    filter.push_where(&mut builder);
    builder.push(") ORDER BY id");

    let answers: Vec<AnswerRecord> = builder.build_query_as().fetch_all(pool).await?;

    let mut by_attempt: HashMap<i64, Vec<AnswerRecord>> = HashMap::new();
    for answer in answers {
        by_attempt.entry(answer.attempt_id).or_default().push(answer);
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let answers = by_attempt.remove(&row.id).unwrap_or_default();
            Attempt::assemble(row, answers)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db,
        models::{
            quiz::{OptionInput, QuestionInput},
            user::Role,
        },
        repositories::{quizzes, users},
    };

    /// More attempts than SQLite allows bound variables in one statement.
    const MANY: i64 = 40_000;

    async fn seeded_pool() -> (SqlitePool, i64, i64) {
        let pool = db::connect_in_memory().await.unwrap();
        db::migrate(&pool).await.unwrap();

        let user = users::create(&pool, "learner", "learner@x.com", "hash", Role::Student)
            .await
            .unwrap();
        let question = QuestionInput {
            text: "2 + 2?".to_string(),
            order: 0,
            options: vec![
                OptionInput {
                    text: "4".to_string(),
                    is_correct: true,
                    order: 0,
                },
                OptionInput {
                    text: "5".to_string(),
                    is_correct: false,
                    order: 1,
                },
            ],
        };
        let quiz_id = quizzes::create(&pool, user.id, "Bulk", None, &[question])
            .await
            .unwrap();

        (pool, user.id, quiz_id)
    }

    #[tokio::test]
    async fn listing_handles_more_attempts_than_bind_limit() {
        let (pool, user_id, quiz_id) = seeded_pool().await;

        sqlx::query(
            r#"
            WITH RECURSIVE seq(n) AS (SELECT 1 UNION ALL SELECT n + 1 FROM seq WHERE n < ?)
            INSERT INTO quiz_attempts (user_id, quiz_id, score, total_questions, submitted_at)
            SELECT ?, ?, 1, 1, ? FROM seq
            "#,
        )
        .bind(MANY)
        .bind(user_id)
        .bind(quiz_id)
        .bind(Utc::now())
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO answers (attempt_id, question_id, option_id) SELECT id, 1, 2 FROM quiz_attempts",
        )
        .execute(&pool)
        .await
        .unwrap();

        let all = find(&pool, AttemptFilter::All).await.unwrap();
        assert_eq!(all.len() as i64, MANY);
        assert!(all.iter().all(|a| a.answers.len() == 1));

        let by_user = find(&pool, AttemptFilter::User(user_id)).await.unwrap();
        assert_eq!(by_user.len() as i64, MANY);
    }

    #[tokio::test]
    async fn filtered_listing_only_attaches_matching_answers() {
        let (pool, user_id, quiz_id) = seeded_pool().await;
        let answers = [AnswerInput {
            question_id: 1,
            option_id: 1,
        }];

        let first = create(&pool, user_id, quiz_id, 1, 1, &answers).await.unwrap();
        let second = create(&pool, user_id, quiz_id, 0, 1, &answers).await.unwrap();

        let one = find_by_id(&pool, first).await.unwrap().unwrap();
        assert_eq!(one.answers.len(), 1);
        assert_eq!(one.answers[0].attempt_id, first);

        let listed = find(&pool, AttemptFilter::Quiz(quiz_id)).await.unwrap();
        let ids: Vec<i64> = listed.iter().map(|a| a.id).collect();
        assert_eq!(ids, [second, first]);
    }
}
