//! Checkout Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    carts::{CheckoutResponse, errors::observed},
    extensions::*,
    state::State,
};

/// Checkout Handler
///
/// Empties the caller's cart. The response acknowledges the checkout and
/// does not include the cart.
#[endpoint(
    tags("carts"),
    summary = "Checkout",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Cart cleared"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CheckoutResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let identity = depot.identity_or_401()?;

    let confirmation = observed(
        "checkout",
        state.app.carts.checkout(identity.user_uuid).await,
    )?;

    Ok(Json(confirmation.into()))
}
