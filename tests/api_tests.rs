// tests/api_tests.rs

mod common;

use common::{PASSWORD, spawn_app, unique_name};
use serde_json::{Value, json};

#[tokio::test]
async fn health_check_404() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let response = app
        .client
        .get(format!("{}/random_path_that_does_not_exist", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn health_endpoint_answers() {
    let app = spawn_app().await;

    let response = app.client.get(app.url("/health")).send().await.unwrap();

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn register_works() {
    // Arrange
    let app = spawn_app().await;
    let username = unique_name("u");

    // Act
    let response = app
        .client
        .post(app.url("/auth/register"))
        .json(&json!({
            "username": username,
            "email": format!("{}@x.com", username),
            "password": PASSWORD
        }))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 201);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert!(body["data"]["token"].as_str().is_some());
    assert_eq!(body["data"]["user"]["username"], username.as_str());
    assert_eq!(body["data"]["user"]["role"], "STUDENT");
    assert!(
        body["data"]["user"].get("password").is_none(),
        "password hash must never be serialized"
    );
}

#[tokio::test]
async fn register_then_login_yields_same_identity() {
    let app = spawn_app().await;
    let username = unique_name("admin");
    let (_, user_id) = app.register(&username, "ADMIN").await;

    let login: Value = app
        .client
        .post(app.url("/auth/login"))
        .json(&json!({ "username": username, "password": PASSWORD }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(login["success"], true);
    assert_eq!(login["data"]["user"]["id"].as_i64(), Some(user_id));
    let token = login["data"]["token"].as_str().expect("Token not found");

    let me: Value = app.get("/auth/me", token).await.json().await.unwrap();
    assert_eq!(me["data"]["id"].as_i64(), Some(user_id));
    assert_eq!(me["data"]["role"], "ADMIN");
    assert_eq!(me["data"]["email"], format!("{}@x.com", username));
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let app = spawn_app().await;
    app.register("alice", "STUDENT").await;

    let response = app
        .client
        .post(app.url("/auth/register"))
        .json(&json!({
            "username": "alice2",
            "email": "alice@x.com",
            "password": PASSWORD
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 409);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Email already registered");
}

#[tokio::test]
async fn duplicate_username_is_a_conflict() {
    let app = spawn_app().await;
    app.register("bob", "STUDENT").await;

    let response = app
        .client
        .post(app.url("/auth/register"))
        .json(&json!({
            "username": "bob",
            "email": "other@x.com",
            "password": PASSWORD
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 409);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Username already taken");
}

#[tokio::test]
async fn register_fails_validation() {
    // Arrange
    let app = spawn_app().await;

    for payload in [
        // username too short
        json!({ "username": "yo", "email": "yo@x.com", "password": PASSWORD }),
        // not an email
        json!({ "username": "carol", "email": "carol", "password": PASSWORD }),
        // password too short
        json!({ "username": "carol", "email": "carol@x.com", "password": "123" }),
    ] {
        // Act
        let response = app
            .client
            .post(app.url("/auth/register"))
            .json(&payload)
            .send()
            .await
            .unwrap();

        // Assert
        assert_eq!(response.status().as_u16(), 400, "payload: {payload}");
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["success"], false);
    }
}

#[tokio::test]
async fn malformed_json_uses_error_envelope() {
    let app = spawn_app().await;

    let response = app
        .client
        .post(app.url("/auth/login"))
        .header("Content-Type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let app = spawn_app().await;
    app.register("dave", "STUDENT").await;

    for (username, password) in [("dave", "wrong-password"), ("nobody", PASSWORD)] {
        let response = app
            .client
            .post(app.url("/auth/login"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status().as_u16(), 401);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["message"], "Invalid credentials");
    }
}

#[tokio::test]
async fn me_requires_a_valid_token() {
    let app = spawn_app().await;

    let missing = app.client.get(app.url("/auth/me")).send().await.unwrap();
    assert_eq!(missing.status().as_u16(), 401);
    let body: Value = missing.json().await.unwrap();
    assert_eq!(body["success"], false);

    let garbage = app.get("/auth/me", "not-a-token").await;
    assert_eq!(garbage.status().as_u16(), 401);

    let wrong_scheme = app
        .client
        .get(app.url("/auth/me"))
        .header("Authorization", "Basic Zm9vOmJhcg==")
        .send()
        .await
        .unwrap();
    assert_eq!(wrong_scheme.status().as_u16(), 401);
}

#[tokio::test]
async fn logout_acknowledges() {
    let app = spawn_app().await;

    let response = app.client.post(app.url("/auth/logout")).send().await.unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Logged out successfully");
}

#[tokio::test]
async fn leaderboard_aggregates_attempts_per_user() {
    let app = spawn_app().await;
    let (admin, _) = app.register("author", "ADMIN").await;
    let (student, student_id) = app.register("student", "STUDENT").await;
    let (other, _) = app.register("other", "STUDENT").await;

    let five = app.create_quiz(&admin, "Five", 5).await;
    let four = app.create_quiz(&admin, "Four", 4).await;

    // 3/5 = 60% and 4/4 = 100%
    assert_eq!(app.submit(&student, &five, 3).await.status().as_u16(), 201);
    assert_eq!(app.submit(&student, &four, 4).await.status().as_u16(), 201);
    // 1/4 = 25%
    assert_eq!(app.submit(&other, &four, 1).await.status().as_u16(), 201);

    let response = app
        .client
        .get(app.url("/leaderboard?limit=5"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    let entries = body["data"].as_array().unwrap();
    assert_eq!(entries.len(), 2);

    let top = &entries[0];
    assert_eq!(top["userId"].as_i64(), Some(student_id));
    assert_eq!(top["username"], "student");
    assert_eq!(top["totalScore"], 7);
    assert_eq!(top["quizzesAttempted"], 2);
    assert_eq!(top["averagePercentage"].as_f64(), Some(80.0));

    assert_eq!(entries[1]["username"], "other");
    assert_eq!(entries[1]["averagePercentage"].as_f64(), Some(25.0));
}

#[tokio::test]
async fn leaderboard_respects_limit() {
    let app = spawn_app().await;
    let (admin, _) = app.register("author", "ADMIN").await;
    let quiz = app.create_quiz(&admin, "One", 1).await;

    for name in ["stu1", "stu2", "stu3"] {
        let (token, _) = app.register(name, "STUDENT").await;
        app.submit(&token, &quiz, 1).await;
    }

    let body: Value = app
        .client
        .get(app.url("/leaderboard?limit=2"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["username"].as_str().unwrap())
        .collect();
    // Equal totals fall back to username order.
    assert_eq!(names, ["stu1", "stu2"]);
}

#[tokio::test]
async fn leaderboard_rejects_malformed_limit_with_envelope() {
    let app = spawn_app().await;

    let response = app
        .client
        .get(app.url("/leaderboard?limit=abc"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.expect("error body must be JSON");
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().is_some());
}

#[tokio::test]
async fn leaderboard_limit_zero_is_empty() {
    let app = spawn_app().await;
    let (admin, _) = app.register("author", "ADMIN").await;
    let (student, _) = app.register("student", "STUDENT").await;
    let quiz = app.create_quiz(&admin, "One", 1).await;
    app.submit(&student, &quiz, 1).await;

    let body: Value = app
        .client
        .get(app.url("/leaderboard?limit=0"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["success"], true);
    assert!(body["data"].as_array().unwrap().is_empty());
}
