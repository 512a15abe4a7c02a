//! Idempotent admin account provisioning.

use std::fmt;

use tracing::{info, warn};

use crate::{
    auth::{
        AuthServiceError,
        password::{hash_password, validate_password},
        service::validate_email,
    },
    domain::users::{
        UsersService, UsersServiceError,
        models::{NewUser, Role, UserUuid},
    },
};

#[derive(Clone)]
pub struct AdminSeed {
    pub email: String,
    pub name: String,
    pub password: String,
}

impl fmt::Debug for AdminSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminSeed")
            .field("email", &self.email)
            .field("name", &self.name)
            .field("password", &"**redacted**")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    Created(UserUuid),

    /// An account with the seed email already exists. It is never modified.
    AlreadyPresent,
}

/// Make sure an admin account with the seed's email exists.
///
/// Safe to run from several processes at once: losing the insert race to a
/// concurrent creator counts as [`BootstrapOutcome::AlreadyPresent`].
///
/// # Errors
///
/// Returns an error for an invalid seed or a storage failure.
pub async fn ensure_admin(
    users: &dyn UsersService,
    seed: &AdminSeed,
) -> Result<BootstrapOutcome, AuthServiceError> {
    let email = validate_email(&seed.email)?;

    if let Some(existing) = users.find_user_by_email(&email).await? {
        if existing.role == Role::Admin {
            info!(user_uuid = %existing.uuid, "admin account already present");
        } else {
            warn!(
                user_uuid = %existing.uuid,
                role = %existing.role,
                "admin email belongs to a non-admin account; leaving it unchanged"
            );
        }

        return Ok(BootstrapOutcome::AlreadyPresent);
    }

    let name = match seed.name.trim() {
        "" => "Administrator".to_string(),
        name => name.to_string(),
    };

    validate_password(&seed.password)?;

    let created = users
        .create_user(NewUser {
            uuid: UserUuid::new(),
            email,
            name,
            password_hash: hash_password(&seed.password)?,
            role: Role::Admin,
        })
        .await;

    match created {
        Ok(user) => {
            info!(user_uuid = %user.uuid, "created admin account");

            Ok(BootstrapOutcome::Created(user.uuid))
        }
        Err(UsersServiceError::AlreadyExists) => {
            info!("admin account created concurrently");

            Ok(BootstrapOutcome::AlreadyPresent)
        }
        Err(error) => Err(error.into()),
    }
}
