// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post, put},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{attempt, auth, leaderboard, quiz},
    state::AppState,
    utils::jwt::{admin_middleware, auth_middleware, student_middleware},
};

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

/// Assembles the main application router.
///
/// * Auth routes are public except `/me`.
/// * Every quiz and attempt route needs a valid bearer token; writes and
///   cross-user reads are further gated by role.
/// * The leaderboard is public.
pub fn create_router(state: AppState) -> Router {
    let require_auth = middleware::from_fn_with_state(state.clone(), auth_middleware);
    let admin_only = || middleware::from_fn(admin_middleware);
    let student_only = || middleware::from_fn(student_middleware);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .merge(
            Router::new()
                .route("/me", get(auth::me))
                .route_layer(require_auth.clone()),
        );

    // Auth runs first (outer route_layer), then the per-method role gate.
    let quiz_routes = Router::new()
        .route(
            "/",
            get(quiz::list_quizzes).merge(post(quiz::create_quiz).route_layer(admin_only())),
        )
        .route(
            "/mine",
            get(quiz::list_my_quizzes).route_layer(admin_only()),
        )
        .route(
            "/{id}",
            get(quiz::get_quiz).merge(
                put(quiz::update_quiz)
                    .delete(quiz::delete_quiz)
                    .route_layer(admin_only()),
            ),
        )
        .route_layer(require_auth.clone());

    let attempt_routes = Router::new()
        .route(
            "/",
            post(attempt::submit_attempt)
                .route_layer(student_only())
                .merge(get(attempt::list_attempts).route_layer(admin_only())),
        )
        .route("/me", get(attempt::my_attempts))
        .route(
            "/quiz/{quiz_id}",
            get(attempt::attempts_by_quiz).route_layer(admin_only()),
        )
        .route(
            "/user/{user_id}",
            get(attempt::attempts_by_user).route_layer(admin_only()),
        )
        .route("/{id}", get(attempt::get_attempt))
        .route_layer(require_auth);

    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/quizzes", quiz_routes)
        .nest("/api/attempts", attempt_routes)
        .route("/api/leaderboard", get(leaderboard::get_leaderboard))
        .route("/api/health", get(|| async { "ok" }))
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
