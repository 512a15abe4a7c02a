//! In-memory cart store.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use jiff::Timestamp;
use tokio::sync::Mutex;

use crate::domain::{
    carts::{
        errors::CartStoreError,
        models::{Cart, CartMutation},
        store::CartStore,
    },
    users::models::UserUuid,
};

/// One mutex per owner. The map itself is only touched to find or insert a
/// slot, so no shard lock is held across an await.
#[derive(Debug, Default)]
pub struct MemoryCartStore {
    carts: DashMap<UserUuid, Arc<Mutex<Cart>>>,
}

impl MemoryCartStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, owner: UserUuid) -> Arc<Mutex<Cart>> {
        self.carts
            .entry(owner)
            .or_insert_with(|| Arc::new(Mutex::new(Cart::new(owner, Timestamp::now()))))
            .value()
            .clone()
    }
}

#[async_trait]
impl CartStore for MemoryCartStore {
    async fn get_or_create(&self, owner: UserUuid) -> Result<Cart, CartStoreError> {
        let slot = self.slot(owner);
        let cart = slot.lock().await;

        Ok(cart.clone())
    }

    async fn apply(&self, owner: UserUuid, mutation: CartMutation) -> Result<Cart, CartStoreError> {
        let slot = self.slot(owner);
        let mut cart = slot.lock().await;

        let mut next = cart.clone();

        next.apply(mutation, Timestamp::now())?;

        *cart = next;

        Ok(cart.clone())
    }

    async fn clear(&self, owner: UserUuid) -> Result<usize, CartStoreError> {
        let slot = self.slot(owner);
        let mut cart = slot.lock().await;

        Ok(cart.clear(Timestamp::now()))
    }
}
