//! Auth service errors.

use thiserror::Error;

use crate::{
    auth::{IdentityTokenError, MIN_PASSWORD_LENGTH},
    domain::users::UsersServiceError,
};

#[derive(Debug, Error)]
pub enum AuthServiceError {
    /// Unknown email and wrong password are deliberately indistinguishable.
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("email address is invalid")]
    InvalidEmail,

    #[error("name must not be empty")]
    InvalidName,

    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    WeakPassword,

    #[error("email address is already registered")]
    EmailTaken,

    #[error("identity token rejected")]
    Token(#[source] IdentityTokenError),

    #[error("password hashing failed")]
    PasswordHash,

    #[error("user storage error")]
    Users(#[source] UsersServiceError),
}

impl From<IdentityTokenError> for AuthServiceError {
    fn from(error: IdentityTokenError) -> Self {
        Self::Token(error)
    }
}

impl From<UsersServiceError> for AuthServiceError {
    fn from(error: UsersServiceError) -> Self {
        match error {
            UsersServiceError::AlreadyExists => Self::EmailTaken,
            other => Self::Users(other),
        }
    }
}
