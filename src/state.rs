use crate::config::Config;
use axum::extract::FromRef;
use sqlx::SqlitePool;

/// Everything a request handler may depend on. Built once in `main` (or by
/// a test) and cloned into each request.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
