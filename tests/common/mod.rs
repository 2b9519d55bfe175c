// tests/common/mod.rs

#![allow(dead_code)]

use quiz_backend::{config::Config, db, routes, state::AppState};
use serde_json::{Value, json};

pub const PASSWORD: &str = "password123";

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

/// Spawns the app on a random port backed by a fresh in-memory database.
pub async fn spawn_app() -> TestApp {
    // 1. Create a pool and run migrations
    let pool = db::connect_in_memory()
        .await
        .expect("Failed to open in-memory SQLite");
    db::migrate(&pool).await.expect("Failed to migrate database");

    // 2. Create test configuration and state
    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600, // 10 minutes for tests
        port: 0,
        rust_log: "error".to_string(),
        cors_origins: vec!["http://localhost:3000".to_string()],
        admin_username: None,
        admin_password: None,
        admin_email: None,
    };

    let state = AppState { pool, config };
    let app = routes::create_router(state);

    // 3. Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    // 4. Spawn the server in the background
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        client: reqwest::Client::new(),
    }
}

pub fn unique_name(prefix: &str) -> String {
    format!("{}_{}", prefix, &uuid::Uuid::new_v4().to_string()[..8])
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.address, path)
    }

    /// Registers a user and returns `(token, user_id)`.
    pub async fn register(&self, username: &str, role: &str) -> (String, i64) {
        let resp = self
            .client
            .post(self.url("/auth/register"))
            .json(&json!({
                "username": username,
                "email": format!("{}@x.com", username),
                "password": PASSWORD,
                "role": role,
            }))
            .send()
            .await
            .expect("Register failed");
        assert_eq!(resp.status().as_u16(), 201, "register {username}");

        let body: Value = resp.json().await.unwrap();
        let token = body["data"]["token"].as_str().unwrap().to_string();
        let id = body["data"]["user"]["id"].as_i64().unwrap();
        (token, id)
    }

    pub async fn get(&self, path: &str, token: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("GET failed")
    }

    pub async fn post(&self, path: &str, token: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("POST failed")
    }

    pub async fn put(&self, path: &str, token: &str, body: &Value) -> reqwest::Response {
        self.client
            .put(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("PUT failed")
    }

    pub async fn delete(&self, path: &str, token: &str) -> reqwest::Response {
        self.client
            .delete(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("DELETE failed")
    }

    /// Creates a quiz as `admin_token` and returns the full quiz JSON.
    pub async fn create_quiz(&self, admin_token: &str, title: &str, questions: usize) -> Value {
        let resp = self
            .post("/quizzes", admin_token, &quiz_body(title, questions))
            .await;
        assert_eq!(resp.status().as_u16(), 201, "create quiz {title}");
        let body: Value = resp.json().await.unwrap();
        body["data"].clone()
    }

    /// Submits answers for `quiz`, getting the first `correct` questions right.
    pub async fn submit(&self, student_token: &str, quiz: &Value, correct: usize) -> reqwest::Response {
        let body = json!({
            "quizId": quiz["id"],
            "answers": answers_for(quiz, correct),
        });
        self.post("/attempts", student_token, &body).await
    }
}

/// A quiz with `questions` questions, each with a correct option first and a
/// wrong option second.
pub fn quiz_body(title: &str, questions: usize) -> Value {
    let questions: Vec<Value> = (0..questions)
        .map(|i| {
            json!({
                "text": format!("Question {}", i + 1),
                "order": i,
                "options": [
                    { "text": "right", "isCorrect": true, "order": 0 },
                    { "text": "wrong", "isCorrect": false, "order": 1 },
                ],
            })
        })
        .collect();

    json!({
        "title": title,
        "description": "Generated for tests",
        "questions": questions,
    })
}

/// One answer per question: the correct option for the first `correct`
/// questions, a wrong option for the rest.
pub fn answers_for(quiz: &Value, correct: usize) -> Vec<Value> {
    quiz["questions"]
        .as_array()
        .unwrap()
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let want_correct = i < correct;
            let option = q["options"]
                .as_array()
                .unwrap()
                .iter()
                .find(|o| o["isCorrect"].as_bool() == Some(want_correct))
                .unwrap();
            json!({ "questionId": q["id"], "optionId": option["id"] })
        })
        .collect()
}
