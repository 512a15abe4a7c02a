//! Cart errors

use thiserror::Error;

use crate::domain::{
    carts::models::{CartMutationError, InvalidQuantity},
    products::errors::ProductsServiceError,
};

#[derive(Debug, Error)]
pub enum CartStoreError {
    #[error(transparent)]
    Mutation(#[from] CartMutationError),

    #[error("cart storage error")]
    Sql(#[source] sqlx::Error),
}

impl From<sqlx::Error> for CartStoreError {
    fn from(error: sqlx::Error) -> Self {
        Self::Sql(error)
    }
}

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("quantity must be a positive integer")]
    InvalidQuantity,

    #[error("product not found")]
    ProductNotFound,

    #[error("cart item not found")]
    ItemNotFound,

    #[error("cart storage error")]
    Storage(#[source] sqlx::Error),

    #[error("catalog lookup failed")]
    Catalog(#[source] ProductsServiceError),
}

impl From<InvalidQuantity> for CartsServiceError {
    fn from(_: InvalidQuantity) -> Self {
        Self::InvalidQuantity
    }
}

impl From<CartMutationError> for CartsServiceError {
    fn from(error: CartMutationError) -> Self {
        match error {
            CartMutationError::ItemNotFound => Self::ItemNotFound,
            CartMutationError::InvalidQuantity(_) => Self::InvalidQuantity,
        }
    }
}

impl From<CartStoreError> for CartsServiceError {
    fn from(error: CartStoreError) -> Self {
        match error {
            CartStoreError::Mutation(mutation) => mutation.into(),
            CartStoreError::Sql(source) => Self::Storage(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutation_errors_map_to_service_errors() {
        assert!(matches!(
            CartsServiceError::from(CartStoreError::Mutation(CartMutationError::ItemNotFound)),
            CartsServiceError::ItemNotFound
        ));
        assert!(matches!(
            CartsServiceError::from(CartStoreError::Mutation(
                CartMutationError::InvalidQuantity(InvalidQuantity)
            )),
            CartsServiceError::InvalidQuantity
        ));
    }

    #[test]
    fn sql_errors_become_storage_errors() {
        let error = CartsServiceError::from(CartStoreError::from(sqlx::Error::PoolTimedOut));

        assert!(matches!(
            error,
            CartsServiceError::Storage(sqlx::Error::PoolTimedOut)
        ));
    }
}
