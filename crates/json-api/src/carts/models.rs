//! Cart response models.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use versatil_app::domain::carts::models::{CheckoutConfirmation, ResolvedCart, ResolvedCartItem};

use crate::products::ProductResponse;

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    /// The user the cart belongs to
    pub owner_uuid: Uuid,

    /// Line items in the order they were first added
    pub items: Vec<CartItemResponse>,

    /// Sum of every available line total, in minor currency units
    pub total: u64,

    /// The date and time the cart was created
    pub created_at: String,

    /// The date and time the cart was last updated
    pub updated_at: String,
}

impl From<ResolvedCart> for CartResponse {
    fn from(cart: ResolvedCart) -> Self {
        Self {
            owner_uuid: cart.owner.into_uuid(),
            items: cart.items.into_iter().map(CartItemResponse::from).collect(),
            total: cart.total,
            created_at: cart.created_at.to_string(),
            updated_at: cart.updated_at.to_string(),
        }
    }
}

/// Cart Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemResponse {
    /// The unique identifier of the cart item
    pub uuid: Uuid,

    /// The product this line refers to
    pub product_uuid: Uuid,

    /// Number of units
    pub quantity: u32,

    /// Live catalog data, or `null` when the product is no longer available
    pub product: Option<ProductResponse>,

    /// Unit price times quantity, or `null` when the product is unavailable
    pub line_total: Option<u64>,
}

impl From<ResolvedCartItem> for CartItemResponse {
    fn from(item: ResolvedCartItem) -> Self {
        Self {
            uuid: item.uuid.into_uuid(),
            product_uuid: item.product_uuid.into_uuid(),
            quantity: item.quantity,
            product: item.product.map(ProductResponse::from),
            line_total: item.line_total,
        }
    }
}

/// Checkout Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CheckoutResponse {
    /// Always `completed`
    pub status: String,

    /// Number of line items removed from the cart
    pub items_cleared: usize,

    /// The date and time the cart was cleared
    pub completed_at: String,
}

impl From<CheckoutConfirmation> for CheckoutResponse {
    fn from(confirmation: CheckoutConfirmation) -> Self {
        Self {
            status: "completed".to_string(),
            items_cleared: confirmation.items_cleared,
            completed_at: confirmation.completed_at.to_string(),
        }
    }
}
