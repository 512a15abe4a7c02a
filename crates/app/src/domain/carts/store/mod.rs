//! Cart storage.
//!
//! Every operation against a single owner's cart is serialized by the store:
//! the read-modify-write inside [`CartStore::apply`] and [`CartStore::clear`]
//! never interleaves with another write to the same cart, and a concurrent
//! read observes either the state before or after a write, never a mixture.
//! Different owners never contend.

use async_trait::async_trait;

use crate::domain::{
    carts::{
        errors::CartStoreError,
        models::{Cart, CartMutation},
    },
    users::models::UserUuid,
};

mod memory;
mod postgres;

pub use memory::MemoryCartStore;
pub use postgres::PgCartStore;

#[async_trait]
pub trait CartStore: Send + Sync {
    /// Fetch the owner's cart, creating an empty one on first access.
    async fn get_or_create(&self, owner: UserUuid) -> Result<Cart, CartStoreError>;

    /// Apply a mutation atomically and return the resulting cart.
    ///
    /// When the mutation fails the stored cart is unchanged.
    async fn apply(&self, owner: UserUuid, mutation: CartMutation) -> Result<Cart, CartStoreError>;

    /// Remove every item in one step, returning the number removed.
    async fn clear(&self, owner: UserUuid) -> Result<usize, CartStoreError>;
}
