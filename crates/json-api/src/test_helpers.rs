//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use versatil_app::{
    auth::{Identity, MockAuthService},
    context::AppContext,
    domain::{
        carts::{
            MockCartsService,
            models::{CheckoutConfirmation, ResolvedCart},
        },
        products::{MockProductsService, models::Product},
        users::{
            MockUsersService,
            models::{Role, UserUuid},
        },
    },
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_OWNER_UUID: UserUuid = UserUuid::from_uuid(Uuid::nil());

pub(crate) const TEST_CUSTOMER: Identity = Identity {
    user_uuid: TEST_OWNER_UUID,
    role: Role::Customer,
};

pub(crate) const TEST_ADMIN: Identity = Identity {
    user_uuid: TEST_OWNER_UUID,
    role: Role::Admin,
};

#[salvo::handler]
pub(crate) async fn inject_customer(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_identity(TEST_CUSTOMER);
    ctrl.call_next(req, depot, res).await;
}

#[salvo::handler]
pub(crate) async fn inject_admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_identity(TEST_ADMIN);
    ctrl.call_next(req, depot, res).await;
}

fn strict_auth_mock() -> MockAuthService {
    let mut auth = MockAuthService::new();

    auth.expect_register().never();
    auth.expect_login().never();
    auth.expect_authenticate_bearer().never();
    auth.expect_issue_token().never();

    auth
}

fn strict_carts_mock() -> MockCartsService {
    let mut carts = MockCartsService::new();

    carts.expect_get_cart().never();
    carts.expect_add_item().never();
    carts.expect_update_item_quantity().never();
    carts.expect_remove_item().never();
    carts.expect_checkout().never();

    carts
}

fn strict_products_mock() -> MockProductsService {
    let mut products = MockProductsService::new();

    products.expect_list_products().never();
    products.expect_get_product().never();
    products.expect_find_products().never();
    products.expect_create_product().never();
    products.expect_update_product().never();
    products.expect_delete_product().never();

    products
}

fn strict_users_mock() -> MockUsersService {
    let mut users = MockUsersService::new();

    users.expect_create_user().never();
    users.expect_find_user_by_email().never();
    users.expect_get_user().never();

    users
}

fn state(carts: MockCartsService, products: MockProductsService, auth: MockAuthService) -> Arc<State> {
    State::from_app_context(AppContext {
        carts: Arc::new(carts),
        products: Arc::new(products),
        users: Arc::new(strict_users_mock()),
        auth: Arc::new(auth),
    })
}

pub(crate) fn state_with_auth(auth: MockAuthService) -> Arc<State> {
    state(strict_carts_mock(), strict_products_mock(), auth)
}

pub(crate) fn auth_service(auth: MockAuthService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_auth(auth)))
            .push(route),
    )
}

pub(crate) fn carts_service(carts: MockCartsService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state(carts, strict_products_mock(), strict_auth_mock())))
            .hoop(inject_customer)
            .push(route),
    )
}

pub(crate) fn products_service(products: MockProductsService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state(strict_carts_mock(), products, strict_auth_mock())))
            .hoop(inject_admin)
            .push(route),
    )
}

pub(crate) fn make_product(uuid: Uuid, price: u64) -> Product {
    Product {
        uuid: uuid.into(),
        name: "Espresso cup".to_string(),
        description: "Porcelain, 90ml".to_string(),
        price,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
        deleted_at: None,
    }
}

pub(crate) fn empty_cart() -> ResolvedCart {
    ResolvedCart {
        owner: TEST_OWNER_UUID,
        items: Vec::new(),
        total: 0,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn checkout_confirmation(items_cleared: usize) -> CheckoutConfirmation {
    CheckoutConfirmation {
        owner: TEST_OWNER_UUID,
        items_cleared,
        completed_at: Timestamp::UNIX_EPOCH,
    }
}
