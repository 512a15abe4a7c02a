//! Auth service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::{debug, info};

use crate::{
    auth::{
        AuthServiceError, AuthSession, Credentials, Identity, Registration, TokenSigner,
        password::{hash_password, validate_password, verify_password},
    },
    domain::users::{
        UsersService,
        models::{NewUser, Role, User, UserUuid, normalise_email},
    },
};

#[derive(Clone)]
pub struct TokenAuthService {
    users: Arc<dyn UsersService>,
    signer: TokenSigner,
}

impl std::fmt::Debug for TokenAuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenAuthService")
            .field("signer", &self.signer)
            .finish_non_exhaustive()
    }
}

impl TokenAuthService {
    #[must_use]
    pub fn new(users: Arc<dyn UsersService>, signer: TokenSigner) -> Self {
        Self { users, signer }
    }

    fn session(&self, user: User) -> Result<AuthSession, AuthServiceError> {
        let token = self.signer.issue(
            Identity {
                user_uuid: user.uuid,
                role: user.role,
            },
            Timestamp::now(),
        )?;

        Ok(AuthSession::new(user, token))
    }
}

#[async_trait]
impl AuthService for TokenAuthService {
    #[tracing::instrument(name = "auth.register", skip_all, err)]
    async fn register(&self, registration: Registration) -> Result<AuthSession, AuthServiceError> {
        let email = validate_email(&registration.email)?;
        let name = registration.name.trim().to_string();

        if name.is_empty() {
            return Err(AuthServiceError::InvalidName);
        }

        validate_password(&registration.password)?;

        let user = self
            .users
            .create_user(NewUser {
                uuid: UserUuid::new(),
                email,
                name,
                password_hash: hash_password(&registration.password)?,
                role: Role::Customer,
            })
            .await?;

        info!(user_uuid = %user.uuid, "registered customer");

        self.session(user)
    }

    #[tracing::instrument(name = "auth.login", skip_all, err)]
    async fn login(&self, credentials: Credentials) -> Result<AuthSession, AuthServiceError> {
        let email = normalise_email(&credentials.email);

        let Some(user) = self.users.find_user_by_email(&email).await? else {
            // Spend the same hashing effort as a real check.
            let _ = hash_password(&credentials.password);

            return Err(AuthServiceError::InvalidCredentials);
        };

        verify_password(&credentials.password, &user.password_hash)?;

        debug!(user_uuid = %user.uuid, "login succeeded");

        self.session(user)
    }

    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Identity, AuthServiceError> {
        Ok(self.signer.verify(bearer_token, Timestamp::now())?)
    }

    #[tracing::instrument(name = "auth.issue_token", skip(self), err)]
    async fn issue_token(&self, user: UserUuid) -> Result<AuthSession, AuthServiceError> {
        let user = self.users.get_user(user).await?;

        self.session(user)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create a customer account and sign it in.
    async fn register(&self, registration: Registration) -> Result<AuthSession, AuthServiceError>;

    /// Check an email and password pair and issue a token.
    async fn login(&self, credentials: Credentials) -> Result<AuthSession, AuthServiceError>;

    /// Verify a bearer token and return the identity it carries.
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Identity, AuthServiceError>;

    /// Issue a fresh token for an existing user.
    async fn issue_token(&self, user: UserUuid) -> Result<AuthSession, AuthServiceError>;
}

/// Normalise an email and check it has a local part and a domain.
pub(crate) fn validate_email(email: &str) -> Result<String, AuthServiceError> {
    let email = normalise_email(email);

    match email.split_once('@') {
        Some((local, domain))
            if !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace) =>
        {
            Ok(email)
        }
        _ => Err(AuthServiceError::InvalidEmail),
    }
}
