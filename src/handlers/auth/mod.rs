pub mod login;
pub mod register;

use std::sync::Arc;

use axum::Router;

use crate::{config::AppConfig, db::DbPool};

pub fn auth_router(pool: DbPool, config: Arc<AppConfig>) -> Router {
    Router::new()
        .merge(login::auth_router(pool.clone(), config.clone()))
        .merge(register::auth_router(pool, config))
}
