//! Cart Models
//!
//! A [`Cart`] is the stored shape: opaque product references plus quantities.
//! [`ResolvedCart`] is computed on every read by joining the stored items with
//! live catalog data; it is never persisted.

use std::num::NonZeroU32;

use jiff::Timestamp;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::{
    domain::{
        products::models::{Product, ProductUuid},
        users::models::UserUuid,
    },
    uuids::TypedUuid,
};

/// Cart Item UUID
pub type CartItemUuid = TypedUuid<CartItem>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("quantity must be a positive integer no greater than {}", u32::MAX)]
pub struct InvalidQuantity;

/// Line item quantity. Always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantity(NonZeroU32);

impl Quantity {
    pub const ONE: Self = Self(NonZeroU32::MIN);

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// Sum of two quantities, or `None` if it would not fit.
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.get()).map(Self)
    }
}

impl TryFrom<i64> for Quantity {
    type Error = InvalidQuantity;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u32::try_from(value)
            .ok()
            .and_then(NonZeroU32::new)
            .map(Self)
            .ok_or(InvalidQuantity)
    }
}

impl From<Quantity> for i64 {
    fn from(value: Quantity) -> Self {
        i64::from(value.get())
    }
}

/// CartItem Model
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    pub uuid: CartItemUuid,
    pub product_uuid: ProductUuid,
    pub quantity: Quantity,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Cart Model
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    pub owner: UserUuid,

    /// Insertion ordered. At most one item per product.
    pub items: Vec<CartItem>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A single read-modify-write step against one cart.
#[derive(Debug, Clone, PartialEq)]
pub enum CartMutation {
    /// Merge `quantity` into the item for `product`, or append a new item
    /// identified by `item` when the cart has none.
    AddItem {
        item: CartItemUuid,
        product: ProductUuid,
        quantity: Quantity,
    },

    /// Set an item's quantity. Zero or less removes the item.
    SetQuantity { item: CartItemUuid, quantity: i64 },

    /// Remove an item if present.
    RemoveItem { item: CartItemUuid },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CartMutationError {
    #[error("cart item not found")]
    ItemNotFound,

    #[error(transparent)]
    InvalidQuantity(#[from] InvalidQuantity),
}

impl Cart {
    #[must_use]
    pub fn new(owner: UserUuid, now: Timestamp) -> Self {
        Self {
            owner,
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn item(&self, item: CartItemUuid) -> Option<&CartItem> {
        self.items.iter().find(|candidate| candidate.uuid == item)
    }

    #[must_use]
    pub fn item_for_product(&self, product: ProductUuid) -> Option<&CartItem> {
        self.items
            .iter()
            .find(|candidate| candidate.product_uuid == product)
    }

    /// Apply a mutation in place.
    ///
    /// Validation happens before anything is written, so on error the cart is
    /// left exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns [`CartMutationError::ItemNotFound`] when setting the quantity of
    /// an unknown item, and [`CartMutationError::InvalidQuantity`] when a
    /// quantity would exceed the supported range.
    pub fn apply(&mut self, mutation: CartMutation, now: Timestamp) -> Result<(), CartMutationError> {
        match mutation {
            CartMutation::AddItem {
                item,
                product,
                quantity,
            } => self.add_item(item, product, quantity, now),
            CartMutation::SetQuantity { item, quantity } => self.set_quantity(item, quantity, now),
            CartMutation::RemoveItem { item } => {
                self.remove_item(item, now);

                Ok(())
            }
        }
    }

    /// Empty the cart, returning how many items were removed.
    pub fn clear(&mut self, now: Timestamp) -> usize {
        let removed = self.items.len();

        if removed > 0 {
            self.items.clear();
            self.updated_at = now;
        }

        removed
    }

    fn add_item(
        &mut self,
        item: CartItemUuid,
        product: ProductUuid,
        quantity: Quantity,
        now: Timestamp,
    ) -> Result<(), CartMutationError> {
        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|candidate| candidate.product_uuid == product)
        {
            existing.quantity = existing
                .quantity
                .checked_add(quantity)
                .ok_or(InvalidQuantity)?;
            existing.updated_at = now;
        } else {
            self.items.push(CartItem {
                uuid: item,
                product_uuid: product,
                quantity,
                created_at: now,
                updated_at: now,
            });
        }

        self.updated_at = now;

        Ok(())
    }

    fn set_quantity(
        &mut self,
        item: CartItemUuid,
        quantity: i64,
        now: Timestamp,
    ) -> Result<(), CartMutationError> {
        let position = self
            .items
            .iter()
            .position(|candidate| candidate.uuid == item)
            .ok_or(CartMutationError::ItemNotFound)?;

        if quantity <= 0 {
            self.items.remove(position);
        } else {
            let quantity = Quantity::try_from(quantity)?;

            if let Some(existing) = self.items.get_mut(position) {
                existing.quantity = quantity;
                existing.updated_at = now;
            }
        }

        self.updated_at = now;

        Ok(())
    }

    fn remove_item(&mut self, item: CartItemUuid, now: Timestamp) {
        let before = self.items.len();

        self.items.retain(|candidate| candidate.uuid != item);

        if self.items.len() != before {
            self.updated_at = now;
        }
    }
}

/// A cart line joined with its catalog product.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCartItem {
    pub uuid: CartItemUuid,
    pub product_uuid: ProductUuid,
    pub quantity: u32,

    /// `None` when the product is no longer in the catalog.
    pub product: Option<Product>,

    /// `price * quantity`, or `None` when the product is unavailable.
    pub line_total: Option<u64>,
}

impl ResolvedCartItem {
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.product.is_some()
    }
}

/// Cart with live catalog data and a freshly computed total.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCart {
    pub owner: UserUuid,
    pub items: Vec<ResolvedCartItem>,

    /// Sum of available line totals, in minor currency units.
    pub total: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ResolvedCart {
    /// Join a stored cart with the products found for it.
    #[must_use]
    pub fn resolve(cart: Cart, products: Vec<Product>) -> Self {
        let mut catalog: FxHashMap<ProductUuid, Product> = products
            .into_iter()
            .map(|product| (product.uuid, product))
            .collect();

        let items: Vec<ResolvedCartItem> = cart
            .items
            .into_iter()
            .map(|item| {
                let product = catalog.remove(&item.product_uuid);
                let line_total = product
                    .as_ref()
                    .map(|product| product.price.saturating_mul(u64::from(item.quantity.get())));

                ResolvedCartItem {
                    uuid: item.uuid,
                    product_uuid: item.product_uuid,
                    quantity: item.quantity.get(),
                    product,
                    line_total,
                }
            })
            .collect();

        let total = items
            .iter()
            .filter_map(|item| item.line_total)
            .fold(0_u64, u64::saturating_add);

        Self {
            owner: cart.owner,
            items,
            total,
            created_at: cart.created_at,
            updated_at: cart.updated_at,
        }
    }
}

/// Acknowledgment returned by checkout. Carries no cart contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutConfirmation {
    pub owner: UserUuid,
    pub items_cleared: usize,
    pub completed_at: Timestamp,
}
