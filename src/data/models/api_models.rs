use diesel::result::Error as DieselError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::features::srs::InvalidGrade;

/// Errors surfaced by the deck, card and review API.
///
/// The first four are caller mistakes and are reported verbatim. The rest
/// are internal failures; their details only go to the log.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    InvalidInput(String),
    #[error(transparent)]
    InvalidGrade(#[from] InvalidGrade),
    /// Also used for resources owned by someone else.
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Unauthorized")]
    Unauthenticated,
    #[error("Database error")]
    DatabaseError(#[from] DieselError),
    #[error("Database pool error")]
    PoolError(#[from] r2d2::Error),
    #[error("Session error: {0}")]
    SessionError(String),
}

/// Standard API response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
}

impl ApiResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
