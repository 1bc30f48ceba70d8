use axum::extract::rejection::JsonRejection;
use tower_sessions::session::Error as SessionError;

use crate::data::models::AppError;
use crate::features::srs::ScheduleError;

// Wrong types, missing fields or an unreadable body
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(format!("Invalid payload: {}", rejection.body_text()))
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        AppError::SessionError(err.to_string())
    }
}

impl From<ScheduleError> for AppError {
    fn from(err: ScheduleError) -> Self {
        match err {
            ScheduleError::InvalidGrade(e) => AppError::InvalidGrade(e),
            ScheduleError::OutOfRange => AppError::InvalidInput(err.to_string()),
        }
    }
}
