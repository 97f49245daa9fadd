use axum::http::StatusCode;
use thiserror::Error;

/// Rejected input. Nothing is written when one of these is returned.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill in all fields.")]
    MissingFields,
    #[error("The password does not meet the minimum requirements.")]
    WeakPassword,
    #[error("The email address is not valid.")]
    InvalidEmail,
    #[error("A user with this email is already registered.")]
    DuplicateEmail,
}

#[derive(Debug, Error)]
pub enum AccountError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Same message for unknown email and wrong password.
    #[error("Invalid email or password. If you are not registered, create an account.")]
    InvalidCredentials,

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AccountError {
    pub fn status(&self) -> StatusCode {
        match self {
            AccountError::Validation(ValidationError::DuplicateEmail) => StatusCode::CONFLICT,
            AccountError::Validation(_) => StatusCode::BAD_REQUEST,
            AccountError::InvalidCredentials | AccountError::NotAuthenticated => {
                StatusCode::UNAUTHORIZED
            }
            AccountError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AccountError> for (StatusCode, String) {
    fn from(e: AccountError) -> Self {
        (e.status(), e.to_string())
    }
}
