//! App Context

use std::sync::Arc;

use sqlx::migrate::MigrateError;
use thiserror::Error;
use tracing::info;

use crate::{
    auth::{AuthService, TokenAuthService, TokenSigner},
    database::{self, Db, PoolSettings},
    domain::{
        carts::{
            CartsService, StoreCartsService,
            store::{CartStore, MemoryCartStore, PgCartStore},
        },
        products::{MemoryProductsService, PgProductsService, ProductsService},
        users::{MemoryUsersService, PgUsersService, UsersService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to apply database migrations")]
    Migrations(#[source] MigrateError),
}

/// Services shared by every request.
#[derive(Clone)]
pub struct AppContext {
    pub carts: Arc<dyn CartsService>,
    pub products: Arc<dyn ProductsService>,
    pub users: Arc<dyn UsersService>,
    pub auth: Arc<dyn AuthService>,
}

impl AppContext {
    /// Build application context backed by `PostgreSQL`.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection or applying
    /// migrations fails.
    pub async fn from_database_url(
        url: &str,
        settings: &PoolSettings,
        signer: TokenSigner,
        run_migrations: bool,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url, settings)
            .await
            .map_err(AppInitError::Database)?;

        if run_migrations {
            database::migrate(&pool)
                .await
                .map_err(AppInitError::Migrations)?;

            info!("database migrations applied");
        }

        let db = Db::new(pool);

        Ok(Self::assemble(
            Arc::new(PgCartStore::new(db.clone())),
            Arc::new(PgProductsService::new(db.clone())),
            Arc::new(PgUsersService::new(db)),
            signer,
        ))
    }

    /// Build application context that keeps all state in process memory.
    #[must_use]
    pub fn in_memory(signer: TokenSigner) -> Self {
        Self::assemble(
            Arc::new(MemoryCartStore::new()),
            Arc::new(MemoryProductsService::new()),
            Arc::new(MemoryUsersService::new()),
            signer,
        )
    }

    fn assemble(
        cart_store: Arc<dyn CartStore>,
        products: Arc<dyn ProductsService>,
        users: Arc<dyn UsersService>,
        signer: TokenSigner,
    ) -> Self {
        Self {
            carts: Arc::new(StoreCartsService::new(cart_store, products.clone())),
            auth: Arc::new(TokenAuthService::new(users.clone(), signer)),
            products,
            users,
        }
    }
}
