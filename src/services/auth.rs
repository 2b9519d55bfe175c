// src/services/auth.rs

use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::user::{AuthResponse, LoginRequest, RegisterRequest, Role, User},
    repositories::users,
    utils::{
        hash::{hash_password, verify_password},
        jwt::sign_jwt,
    },
};

/// Registers a new account and signs a token for it.
///
/// Email is checked before username so the caller learns about the address
/// first. A race between the checks and the insert still ends in `Conflict`
/// through the unique constraints.
pub async fn register(
    pool: &SqlitePool,
    config: &Config,
    payload: RegisterRequest,
) -> Result<AuthResponse, AppError> {
    payload.validate()?;

    if users::find_by_email(pool, &payload.email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    if users::find_by_username(pool, &payload.username)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Username already taken".to_string()));
    }

    let hashed_password = hash_password(&payload.password)?;
    let role = payload.role.unwrap_or_default();

    let user = users::create(
        pool,
        &payload.username,
        &payload.email,
        &hashed_password,
        role,
    )
    .await
    .map_err(|e| {
        let unique_violation = e
            .as_database_error()
            .is_some_and(|db| db.is_unique_violation());
        if unique_violation {
            AppError::Conflict("Username or email already registered".to_string())
        } else {
            tracing::error!("Failed to register user: {:?}", e);
            AppError::from(e)
        }
    })?;

    tracing::info!(user_id = user.id, role = user.role.as_str(), "user registered");

    let token = sign_jwt(&user, &config.jwt_secret, config.jwt_expiration)?;
    Ok(AuthResponse { token, user })
}

/// Authenticates by username and password.
/// Unknown usernames and wrong passwords produce the same error.
pub async fn login(
    pool: &SqlitePool,
    config: &Config,
    payload: LoginRequest,
) -> Result<AuthResponse, AppError> {
    payload.validate()?;

    let invalid = || AppError::AuthError("Invalid credentials".to_string());

    let user = users::find_by_username(pool, &payload.username)
        .await
        .map_err(|e| {
            tracing::error!("Login DB error: {:?}", e);
            AppError::from(e)
        })?
        .ok_or_else(invalid)?;

    if !verify_password(&payload.password, &user.password)? {
        return Err(invalid());
    }

    let token = sign_jwt(&user, &config.jwt_secret, config.jwt_expiration)?;
    Ok(AuthResponse { token, user })
}

/// Loads the account behind a verified token.
pub async fn current_user(pool: &SqlitePool, user_id: i64) -> Result<User, AppError> {
    users::find_by_id(pool, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

/// Creates the bootstrap ADMIN account from configuration if it is missing.
pub async fn seed_admin(pool: &SqlitePool, config: &Config) -> Result<(), AppError> {
    let (Some(username), Some(password)) = (&config.admin_username, &config.admin_password) else {
        return Ok(());
    };

    if users::find_by_username(pool, username).await?.is_some() {
        return Ok(());
    }

    tracing::info!("Seeding admin user: {}", username);
    let email = config
        .admin_email
        .clone()
        .unwrap_or_else(|| format!("{username}@localhost"));
    let hashed_password = hash_password(password)?;

    users::create(pool, username, &email, &hashed_password, Role::Admin).await?;
    tracing::info!("Admin user created successfully.");
    Ok(())
}
