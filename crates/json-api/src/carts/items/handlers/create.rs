//! Add Cart Item Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
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

/// Add Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddCartItemRequest {
    pub product_uuid: Uuid,

    /// Positive integer, defaults to 1
    #[serde(default)]
    #[salvo(schema(value_type = Option<i64>))]
    pub quantity: Option<Value>,
}

/// Add Cart Item Handler
///
/// Adds a product to the caller's cart. Adding a product that is already in
/// the cart increases that line's quantity.
#[endpoint(
    tags("carts"),
    summary = "Add Item to Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Updated cart"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid quantity"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<AddCartItemRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let identity = depot.identity_or_401()?;
    let request = json.into_inner();

    let quantity = parse_quantity(request.quantity.as_ref(), Some(1))
        .or_400("Quantity must be a positive integer")
        .map_err(|status| rejected("add_item", status))?;

    let cart = observed(
        "add_item",
        state
            .app
            .carts
            .add_item(identity.user_uuid, request.product_uuid.into(), quantity)
            .await,
    )?;

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use serde_json::json;
    use testresult::TestResult;

    use versatil_app::domain::carts::{CartsServiceError, MockCartsService};

    use crate::test_helpers::{TEST_OWNER_UUID, carts_service, empty_cart};

    use super::*;

    fn make_service(repo: MockCartsService) -> Service {
        carts_service(repo, Router::with_path("cart/items").post(handler))
    }

    #[tokio::test]
    async fn test_add_item_forwards_quantity() -> TestResult {
        let product = Uuid::now_v7();

        let mut repo = MockCartsService::new();

        repo.expect_add_item()
            .once()
            .withf(move |owner, p, quantity| {
                *owner == TEST_OWNER_UUID && p.into_uuid() == product && *quantity == 3
            })
            .return_once(|_, _, _| Ok(empty_cart()));

        repo.expect_get_cart().never();

        let res = TestClient::post("http://example.com/cart/items")
            .json(&json!({ "product_uuid": product, "quantity": 3 }))
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_add_item_defaults_quantity_to_one() -> TestResult {
        let product = Uuid::now_v7();

        let mut repo = MockCartsService::new();

        repo.expect_add_item()
            .once()
            .withf(|_, _, quantity| *quantity == 1)
            .return_once(|_, _, _| Ok(empty_cart()));

        let res = TestClient::post("http://example.com/cart/items")
            .json(&json!({ "product_uuid": product }))
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_add_item_string_quantity_returns_400_without_calling_the_service() -> TestResult
    {
        let mut repo = MockCartsService::new();

        repo.expect_add_item().never();

        let res = TestClient::post("http://example.com/cart/items")
            .json(&json!({ "product_uuid": Uuid::now_v7(), "quantity": "2" }))
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_add_item_float_quantity_returns_400() -> TestResult {
        let mut repo = MockCartsService::new();

        repo.expect_add_item().never();

        let res = TestClient::post("http://example.com/cart/items")
            .json(&json!({ "product_uuid": Uuid::now_v7(), "quantity": 1.5 }))
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_add_item_zero_quantity_is_rejected_by_the_service() -> TestResult {
        let mut repo = MockCartsService::new();

        repo.expect_add_item()
            .once()
            .withf(|_, _, quantity| *quantity == 0)
            .return_once(|_, _, _| Err(CartsServiceError::InvalidQuantity));

        let res = TestClient::post("http://example.com/cart/items")
            .json(&json!({ "product_uuid": Uuid::now_v7(), "quantity": 0 }))
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_add_unknown_product_returns_404() -> TestResult {
        let mut repo = MockCartsService::new();

        repo.expect_add_item()
            .once()
            .return_once(|_, _, _| Err(CartsServiceError::ProductNotFound));

        let res = TestClient::post("http://example.com/cart/items")
            .json(&json!({ "product_uuid": Uuid::now_v7() }))
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_add_item_invalid_product_uuid_returns_400() -> TestResult {
        let mut repo = MockCartsService::new();

        repo.expect_add_item().never();

        let res = TestClient::post("http://example.com/cart/items")
            .json(&json!({ "product_uuid": "not-a-uuid" }))
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
