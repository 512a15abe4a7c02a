//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};

use versatil_app::auth::Identity;

const IDENTITY_DEPOT_KEY: &str = "identity";

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    fn insert_identity(&mut self, identity: Identity);

    /// The verified caller, or 401 when the auth hoop did not run.
    fn identity_or_401(&self) -> Result<Identity, StatusError>;

    /// The verified caller when they hold the admin role, else 403.
    fn admin_or_403(&self) -> Result<Identity, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_identity(&mut self, identity: Identity) {
        self.insert(IDENTITY_DEPOT_KEY, identity);
    }

    fn identity_or_401(&self) -> Result<Identity, StatusError> {
        self.get::<Identity>(IDENTITY_DEPOT_KEY)
            .copied()
            .map_err(|_ignored| StatusError::unauthorized())
    }

    fn admin_or_403(&self) -> Result<Identity, StatusError> {
        let identity = self.identity_or_401()?;

        if !identity.is_admin() {
            return Err(StatusError::forbidden().brief("Admin role required"));
        }

        Ok(identity)
    }
}
