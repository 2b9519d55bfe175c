// src/repositories/mod.rs
//
// Persistence layer. Every function takes the pool explicitly and returns
// `sqlx::Result`; mapping to `AppError` happens in the services.

pub mod attempts;
pub mod quizzes;
pub mod users;
