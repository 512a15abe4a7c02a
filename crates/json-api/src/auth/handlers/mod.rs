//! Auth Handlers

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use versatil_app::auth::AuthSession;

pub(crate) mod login;
pub(crate) mod register;

/// Session Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SessionResponse {
    /// The unique identifier of the signed-in user
    pub user_uuid: Uuid,

    /// Normalised email address
    pub email: String,

    /// Display name
    pub name: String,

    /// Either `customer` or `admin`
    pub role: String,

    /// Bearer token for the `Authorization` header
    pub token: String,

    /// The date and time the token stops being accepted
    pub expires_at: String,
}

impl From<AuthSession> for SessionResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            user_uuid: session.user_uuid.into_uuid(),
            email: session.email,
            name: session.name,
            role: session.role.to_string(),
            token: session.token.token,
            expires_at: session.token.expires_at.to_string(),
        }
    }
}
