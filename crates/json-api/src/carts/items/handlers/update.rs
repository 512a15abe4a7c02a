//! Update Cart Item Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    carts::{
        CartResponse,
        errors::{observed, rejected},
        items::parse_quantity,
    },
    extensions::*,
    state::State,
};

/// Update Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateCartItemRequest {
    /// New absolute quantity; zero or less removes the item
    #[serde(default)]
    #[salvo(schema(value_type = i64))]
    pub quantity: Option<Value>,
}

/// Update Cart Item Handler
///
/// Sets a line item's quantity. A quantity of zero or less removes the line.
#[endpoint(
    tags("carts"),
    summary = "Update Cart Item",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Updated cart"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid quantity"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart item not found"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    item: PathParam<Uuid>,
    json: JsonBody<UpdateCartItemRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let identity = depot.identity_or_401()?;

    let quantity = parse_quantity(json.into_inner().quantity.as_ref(), None)
        .or_400("Quantity must be an integer")
        .map_err(|status| rejected("update_item", status))?;

    let cart = observed(
        "update_item",
        state
            .app
            .carts
            .update_item_quantity(identity.user_uuid, item.into_inner().into(), quantity)
            .await,
    )?;

    Ok(Json(cart.into()))
}
