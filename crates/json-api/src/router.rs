//! App Router

use salvo::Router;

use crate::{auth, carts, products};

/// Routes mounted under `/api`.
pub(crate) fn app_router() -> Router {
    Router::new()
        .push(
            Router::with_path("auth")
                .push(Router::with_path("register").post(auth::register::handler))
                .push(Router::with_path("login").post(auth::login::handler)),
        )
        .push(
            Router::with_path("products")
                .get(products::index::handler)
                .push(Router::with_path("{product}").get(products::get::handler)),
        )
        .push(
            Router::with_path("products")
                .hoop(auth::middleware::handler)
                .hoop(auth::middleware::require_admin)
                .post(products::create::handler)
                .push(
                    Router::with_path("{product}")
                        .put(products::update::handler)
                        .delete(products::delete::handler),
                ),
        )
        .push(
            Router::with_path("cart")
                .hoop(auth::middleware::handler)
                .get(carts::get::handler)
                .push(Router::with_path("checkout").post(carts::checkout::handler))
                .push(
                    Router::with_path("items")
                        .post(carts::items::create::handler)
                        .push(
                            Router::with_path("{item}")
                                .put(carts::items::update::handler)
                                .delete(carts::items::delete::handler),
                        ),
                ),
        )
}

#[cfg(test)]
mod tests {
    use salvo::{
        affix_state::inject,
        http::header::AUTHORIZATION,
        prelude::*,
        test::{ResponseExt, TestClient},
    };
    use serde_json::json;
    use testresult::TestResult;

    use versatil_app::{
        auth::{DEFAULT_TOKEN_TTL, Registration, TokenSecret, TokenSigner},
        context::AppContext,
        domain::products::models::{NewProduct, ProductUuid},
    };

    use crate::{carts::CartResponse, state::State};

    use super::*;

    struct Harness {
        app: AppContext,
        service: Service,
    }

    fn harness() -> TestResult<Harness> {
        let signer = TokenSigner::new(
            TokenSecret::new(b"router-test-secret-0123456789abcdef".to_vec())?,
            DEFAULT_TOKEN_TTL,
        )?;

        let app = AppContext::in_memory(signer);

        let service = Service::new(
            Router::new()
                .hoop(inject(State::from_app_context(app.clone())))
                .push(Router::with_path("api").push(app_router())),
        );

        Ok(Harness { app, service })
    }

    async fn customer_token(app: &AppContext, email: &str) -> TestResult<String> {
        let session = app
            .auth
            .register(Registration {
                email: email.to_string(),
                name: "Camille".to_string(),
                password: "s3cret-passw0rd".to_string(),
            })
            .await?;

        Ok(format!("Bearer {}", session.token.token))
    }

    #[tokio::test]
    async fn cart_routes_require_a_token() -> TestResult {
        let harness = harness()?;

        let res = TestClient::get("http://example.com/api/cart")
            .send(&harness.service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn catalog_is_public_but_mutations_need_admin() -> TestResult {
        let harness = harness()?;
        let token = customer_token(&harness.app, "camille@example.com").await?;

        let listed = TestClient::get("http://example.com/api/products")
            .send(&harness.service)
            .await;

        assert_eq!(listed.status_code, Some(StatusCode::OK));

        let anonymous = TestClient::post("http://example.com/api/products")
            .json(&json!({ "name": "Mug", "price": 900 }))
            .send(&harness.service)
            .await;

        assert_eq!(anonymous.status_code, Some(StatusCode::UNAUTHORIZED));

        let customer = TestClient::post("http://example.com/api/products")
            .add_header(AUTHORIZATION, token, true)
            .json(&json!({ "name": "Mug", "price": 900 }))
            .send(&harness.service)
            .await;

        assert_eq!(customer.status_code, Some(StatusCode::FORBIDDEN));
        assert!(harness.app.products.list_products().await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn full_cart_flow_merges_prices_and_checks_out() -> TestResult {
        let harness = harness()?;
        let token = customer_token(&harness.app, "camille@example.com").await?;

        let product = harness
            .app
            .products
            .create_product(NewProduct {
                uuid: ProductUuid::new(),
                name: "Espresso cup".to_string(),
                description: String::new(),
                price: 450,
            })
            .await?;

        for quantity in [2, 3] {
            let res = TestClient::post("http://example.com/api/cart/items")
                .add_header(AUTHORIZATION, token.clone(), true)
                .json(&json!({ "product_uuid": product.uuid, "quantity": quantity }))
                .send(&harness.service)
                .await;

            assert_eq!(res.status_code, Some(StatusCode::OK));
        }

        let cart: CartResponse = TestClient::get("http://example.com/api/cart")
            .add_header(AUTHORIZATION, token.clone(), true)
            .send(&harness.service)
            .await
            .take_json()
            .await?;

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 5);
        assert_eq!(cart.total, 2_250);

        let item = cart.items[0].uuid;

        let removed: CartResponse =
            TestClient::put(format!("http://example.com/api/cart/items/{item}"))
                .add_header(AUTHORIZATION, token.clone(), true)
                .json(&json!({ "quantity": 0 }))
                .send(&harness.service)
                .await
                .take_json()
                .await?;

        assert!(removed.items.is_empty());

        TestClient::post("http://example.com/api/cart/items")
            .add_header(AUTHORIZATION, token.clone(), true)
            .json(&json!({ "product_uuid": product.uuid }))
            .send(&harness.service)
            .await;

        let checkout = TestClient::post("http://example.com/api/cart/checkout")
            .add_header(AUTHORIZATION, token.clone(), true)
            .send(&harness.service)
            .await;

        assert_eq!(checkout.status_code, Some(StatusCode::OK));

        let after: CartResponse = TestClient::get("http://example.com/api/cart")
            .add_header(AUTHORIZATION, token, true)
            .send(&harness.service)
            .await
            .take_json()
            .await?;

        assert!(after.items.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn carts_are_private_to_their_owner() -> TestResult {
        let harness = harness()?;
        let alice = customer_token(&harness.app, "alice@example.com").await?;
        let bob = customer_token(&harness.app, "bob@example.com").await?;

        let product = harness
            .app
            .products
            .create_product(NewProduct {
                uuid: ProductUuid::new(),
                name: "Mug".to_string(),
                description: String::new(),
                price: 900,
            })
            .await?;

        TestClient::post("http://example.com/api/cart/items")
            .add_header(AUTHORIZATION, alice, true)
            .json(&json!({ "product_uuid": product.uuid }))
            .send(&harness.service)
            .await;

        let bobs: CartResponse = TestClient::get("http://example.com/api/cart")
            .add_header(AUTHORIZATION, bob, true)
            .send(&harness.service)
            .await
            .take_json()
            .await?;

        assert!(bobs.items.is_empty());

        Ok(())
    }
}
