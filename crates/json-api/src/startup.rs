//! Application assembly from server configuration.

use std::time::Duration;

use jiff::SignedDuration;
use thiserror::Error;
use tracing::{info, warn};

use versatil_app::{
    auth::{
        AdminSeed, AuthServiceError, BootstrapOutcome, IdentityTokenError, TokenSecret,
        TokenSigner, ensure_admin,
    },
    context::{AppContext, AppInitError},
    database::PoolSettings,
};

use crate::config::{ServerConfig, auth::AuthConfig, db::StorageBackend};

#[derive(Debug, Error)]
pub(crate) enum StartupError {
    #[error("invalid token configuration: {0}")]
    Token(#[from] IdentityTokenError),

    #[error("DATABASE_URL is required when STORAGE_BACKEND is postgres")]
    MissingDatabaseUrl,

    #[error("failed to initialize app context: {0}")]
    Init(#[from] AppInitError),

    #[error("failed to bootstrap admin account: {0}")]
    Admin(#[source] AuthServiceError),
}

pub(crate) fn token_signer(config: &AuthConfig) -> Result<TokenSigner, StartupError> {
    let ttl = i64::try_from(config.token_ttl_seconds)
        .map(SignedDuration::from_secs)
        .map_err(|_overflow| IdentityTokenError::InvalidLifetime)?;

    let secret = TokenSecret::new(config.token_secret.as_bytes().to_vec())?;

    Ok(TokenSigner::new(secret, ttl)?)
}

/// Build services for the configured backend and make sure the admin exists.
pub(crate) async fn build_app(config: &ServerConfig) -> Result<AppContext, StartupError> {
    let signer = token_signer(&config.auth)?;

    let app = match config.storage.backend {
        StorageBackend::Postgres => {
            let url = config
                .storage
                .database_url
                .as_deref()
                .ok_or(StartupError::MissingDatabaseUrl)?;

            let settings = PoolSettings {
                max_connections: config.storage.database_max_connections,
                acquire_timeout: Duration::from_secs(config.storage.database_acquire_timeout_seconds),
            };

            AppContext::from_database_url(
                url,
                &settings,
                signer,
                config.storage.database_run_migrations,
            )
            .await?
        }
        StorageBackend::Memory => {
            warn!("using in-memory storage; carts, products and users are lost on restart");

            AppContext::in_memory(signer)
        }
    };

    bootstrap_admin(&app, &config.auth).await?;

    Ok(app)
}

async fn bootstrap_admin(app: &AppContext, config: &AuthConfig) -> Result<(), StartupError> {
    let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) else {
        if config.admin_email.is_some() {
            warn!("ADMIN_EMAIL is set without ADMIN_PASSWORD; skipping admin bootstrap");
        }

        return Ok(());
    };

    let seed = AdminSeed {
        email: email.clone(),
        name: config.admin_name.clone(),
        password: password.clone(),
    };

    match ensure_admin(app.users.as_ref(), &seed)
        .await
        .map_err(StartupError::Admin)?
    {
        BootstrapOutcome::Created(user_uuid) => info!(%user_uuid, "created admin account"),
        BootstrapOutcome::AlreadyPresent => info!("admin account already present"),
    }

    Ok(())
}
