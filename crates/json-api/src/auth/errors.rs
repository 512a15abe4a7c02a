//! Auth Errors

use salvo::http::StatusError;
use tracing::error;

use versatil_app::auth::{AuthServiceError, IdentityTokenError};

pub(crate) fn into_status_error(error: AuthServiceError) -> StatusError {
    match error {
        AuthServiceError::InvalidCredentials => {
            StatusError::unauthorized().brief("Invalid email or password")
        }
        AuthServiceError::InvalidEmail
        | AuthServiceError::InvalidName
        | AuthServiceError::WeakPassword => StatusError::bad_request().brief(error.to_string()),
        AuthServiceError::EmailTaken => {
            StatusError::conflict().brief("Email address is already registered")
        }
        AuthServiceError::Token(
            IdentityTokenError::InvalidFormat
            | IdentityTokenError::UnsupportedVersion
            | IdentityTokenError::InvalidSignature
            | IdentityTokenError::Expired,
        ) => StatusError::unauthorized().brief("Invalid identity token"),
        AuthServiceError::Token(source) => {
            error!("failed to sign identity token: {source}");

            StatusError::internal_server_error()
        }
        AuthServiceError::PasswordHash => {
            error!("password hashing failed");

            StatusError::internal_server_error()
        }
        AuthServiceError::Users(source) => {
            error!("user storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
