//! Auth data models.

use std::fmt;

use jiff::Timestamp;

use crate::domain::users::models::{Role, User, UserUuid};

/// A verified caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_uuid: UserUuid,
    pub role: Role,
}

impl Identity {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// A signed identity token and the moment it stops being accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: Timestamp,
}

/// Customer self-registration payload.
#[derive(Clone)]
pub struct Registration {
    pub email: String,
    pub name: String,
    pub password: String,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("email", &self.email)
            .field("name", &self.name)
            .field("password", &"**redacted**")
            .finish()
    }
}

#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"**redacted**")
            .finish()
    }
}

/// Result of a successful register, login or token issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub user_uuid: UserUuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub token: IssuedToken,
}

impl AuthSession {
    pub(crate) fn new(user: User, token: IssuedToken) -> Self {
        Self {
            user_uuid: user.uuid,
            email: user.email,
            name: user.name,
            role: user.role,
            token,
        }
    }

    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity {
            user_uuid: self.user_uuid,
            role: self.role,
        }
    }
}
