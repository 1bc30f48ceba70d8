use bcrypt::BcryptError;
use diesel::result::Error as DieselError;
use tower_sessions::session::Error as SessionError;
use validator::ValidationErrors;

use crate::data::models::{LoginError, RegisterError};

impl From<DieselError> for LoginError {
    fn from(err: DieselError) -> Self {
        LoginError::DatabaseError(err)
    }
}

impl From<BcryptError> for LoginError {
    fn from(err: BcryptError) -> Self {
        LoginError::HashingError(err)
    }
}

impl From<SessionError> for LoginError {
    fn from(err: SessionError) -> Self {
        LoginError::SessionError(err.to_string())
    }
}

impl From<r2d2::Error> for LoginError {
    fn from(err: r2d2::Error) -> Self {
        LoginError::SessionError(format!("Failed to get DB connection: {}", err))
    }
}

impl From<BcryptError> for RegisterError {
    fn from(err: BcryptError) -> Self {
        RegisterError::HashingError(err)
    }
}

impl From<SessionError> for RegisterError {
    fn from(err: SessionError) -> Self {
        RegisterError::SessionError(err.to_string())
    }
}

impl From<LoginError> for RegisterError {
    fn from(err: LoginError) -> Self {
        RegisterError::SessionError(err.to_string())
    }
}

impl From<r2d2::Error> for RegisterError {
    fn from(err: r2d2::Error) -> Self {
        RegisterError::SessionError(format!("Failed to get DB connection: {}", err))
    }
}

// Reports a single message, the first one found.
impl From<ValidationErrors> for RegisterError {
    fn from(err: ValidationErrors) -> Self {
        let message = err
            .field_errors()
            .values()
            .flat_map(|errors| errors.iter())
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| err.to_string());
        RegisterError::ValidationError(message)
    }
}
