use std::sync::Arc;

use axum::{
    extract::{Form, State},
    routing::{get, post},
    Json, Router,
};
use tower_sessions::Session;

use crate::{
    config::AppConfig,
    data::models::{ApiResponse, AppError, LoginError, LoginForm, UserInfo},
    data::repositories::UserRepository,
    db::DbPool,
    utils::{clear_session, require_user_id, set_user_session},
};

#[axum::debug_handler]
pub async fn handle_login(
    State((pool, _config)): State<(DbPool, Arc<AppConfig>)>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Json<UserInfo>, LoginError> {
    let user = {
        let mut conn = pool.get()?;
        UserRepository::find_by_email(&mut conn, form.email.trim())?
    };

    match user {
        Some(user) => {
            if UserRepository::verify_password(&user.password, &form.password)? {
                set_user_session(&session, user.user_id, &user.email).await?;
                log::info!("User {} logged in", user.user_id);
                Ok(Json(UserInfo::from(user)))
            } else {
                log::warn!("Invalid password for user: {}", form.email);
                Err(LoginError::InvalidCredentials)
            }
        }
        None => {
            log::warn!("User not found: {}", form.email);
            Err(LoginError::InvalidCredentials)
        }
    }
}

pub async fn handle_logout(session: Session) -> Result<Json<ApiResponse>, AppError> {
    clear_session(&session).await?;
    Ok(Json(ApiResponse::ok("Logged out")))
}

/// The account behind the current session.
pub async fn current_user(
    State((pool, _config)): State<(DbPool, Arc<AppConfig>)>,
    session: Session,
) -> Result<Json<UserInfo>, AppError> {
    let user_id = require_user_id(&session).await?;
    let mut conn = pool.get()?;

    // A session can outlive its account
    UserRepository::find_by_id(&mut conn, user_id)?
        .map(|user| Json(UserInfo::from(user)))
        .ok_or(AppError::Unauthenticated)
}

pub fn auth_router(pool: DbPool, config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/login", post(handle_login))
        .route("/logout", post(handle_logout))
        .route("/me", get(current_user))
        .with_state((pool, config))
}
