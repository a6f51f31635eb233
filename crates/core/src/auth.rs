use thiserror::Error;

use crate::AppError;

/// Message returned for every authentication failure.
pub const AUTHENTICATION_FAILED_MESSAGE: &str = "authentication required";

/// Reasons a caller could not be authenticated.
///
/// The concrete variant is meant for logs only. Converting into [`AppError`]
/// erases it so callers cannot tell a bad token from an unknown or disabled
/// account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthFailure {
    /// Token is malformed, expired, or carries an invalid signature.
    #[error("invalid credential")]
    InvalidCredential,

    /// Token subject does not resolve to a stored user.
    #[error("user not found")]
    UserNotFound,

    /// User exists but its status is not active.
    #[error("user inactive")]
    UserInactive,
}

impl AuthFailure {
    /// Returns a stable label for structured logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidCredential => "invalid_credential",
            Self::UserNotFound => "user_not_found",
            Self::UserInactive => "user_inactive",
        }
    }
}

impl From<AuthFailure> for AppError {
    fn from(_value: AuthFailure) -> Self {
        AppError::Unauthorized(AUTHENTICATION_FAILED_MESSAGE.to_owned())
    }
}

/// Failure of the authenticate-then-authorize pipeline.
///
/// Keeps authentication failures apart from store and policy errors until
/// the request boundary, where both collapse into [`AppError`].
#[derive(Debug, Error)]
pub enum AccessError {
    /// Caller could not be authenticated.
    #[error(transparent)]
    Authentication(#[from] AuthFailure),

    /// Store, policy, or validation error.
    #[error(transparent)]
    App(#[from] AppError),
}

impl From<AccessError> for AppError {
    fn from(value: AccessError) -> Self {
        match value {
            AccessError::Authentication(failure) => failure.into(),
            AccessError::App(error) => error,
        }
    }
}
