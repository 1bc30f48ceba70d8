use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tower_sessions::Session;

use crate::data::models::{AppError, LoginError};

const USER_ID_KEY: &str = "user_id";
const USER_EMAIL_KEY: &str = "user_email";

pub async fn set_user_session(
    session: &Session,
    user_id: i32,
    email: &str,
) -> Result<(), LoginError> {
    // New identity, new session id
    session.cycle_id().await?;
    session.insert(USER_ID_KEY, user_id).await?;
    session.insert(USER_EMAIL_KEY, email).await?;
    Ok(())
}

pub async fn get_current_user_id(session: &Session) -> Option<i32> {
    match session.get::<i32>(USER_ID_KEY).await {
        Ok(user_id) => user_id,
        Err(e) => {
            log::error!("Failed to get user_id from session: {}", e);
            None
        }
    }
}

/// The authenticated user id, or `Unauthenticated`.
pub async fn require_user_id(session: &Session) -> Result<i32, AppError> {
    get_current_user_id(session)
        .await
        .ok_or(AppError::Unauthenticated)
}

pub async fn clear_session(session: &Session) -> Result<(), AppError> {
    session.flush().await.map_err(|e| {
        log::error!("Failed to delete session: {}", e);
        AppError::SessionError("Failed to logout".into())
    })
}

/// Extracts the authenticated user's id. Runs before any body extractor, so
/// a missing identity wins over a malformed payload.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub i32);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, message)| AppError::SessionError(message.to_string()))?;

        require_user_id(&session).await.map(CurrentUser)
    }
}
