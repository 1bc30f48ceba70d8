use std::sync::Arc;

use axum::{
    extract::{Form, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tower_sessions::Session;
use validator::Validate;

use crate::{
    config::AppConfig,
    data::models::{RegisterError, RegisterForm, UserInfo},
    data::repositories::UserRepository,
    db::DbPool,
    utils::set_user_session,
};

#[axum::debug_handler]
pub async fn handle_register(
    State((pool, config)): State<(DbPool, Arc<AppConfig>)>,
    session: Session,
    Form(mut form): Form<RegisterForm>,
) -> Result<(StatusCode, Json<UserInfo>), RegisterError> {
    form.email = form.email.trim().to_string();
    form.validate()?;

    let user = {
        let mut conn = pool.get()?;

        if UserRepository::email_exists(&mut conn, &form.email)? {
            log::warn!("Registration attempt with existing email: {}", form.email);
            return Err(RegisterError::EmailTaken);
        }

        UserRepository::create_user(&mut conn, &form.email, &form.password, config.bcrypt_cost)?
    };

    set_user_session(&session, user.user_id, &user.email).await?;

    log::info!("New user registered: {}", user.email);
    Ok((StatusCode::CREATED, Json(UserInfo::from(user))))
}

pub fn auth_router(pool: DbPool, config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/register", post(handle_register))
        .with_state((pool, config))
}
