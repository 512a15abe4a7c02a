//! Carts service.
//!
//! Every read and every successful mutation returns the cart resolved against
//! the live catalog, so prices and availability are never stale.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::{debug, info};

use crate::domain::{
    carts::{
        errors::CartsServiceError,
        models::{Cart, CartItemUuid, CartMutation, CheckoutConfirmation, Quantity, ResolvedCart},
        store::CartStore,
    },
    products::{
        ProductsService,
        errors::ProductsServiceError,
        models::ProductUuid,
    },
    users::models::UserUuid,
};

#[derive(Clone)]
pub struct StoreCartsService {
    store: Arc<dyn CartStore>,
    catalog: Arc<dyn ProductsService>,
}

impl std::fmt::Debug for StoreCartsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreCartsService").finish_non_exhaustive()
    }
}

impl StoreCartsService {
    #[must_use]
    pub fn new(store: Arc<dyn CartStore>, catalog: Arc<dyn ProductsService>) -> Self {
        Self { store, catalog }
    }

    async fn resolve(&self, cart: Cart) -> Result<ResolvedCart, CartsServiceError> {
        let products: Vec<ProductUuid> = cart.items.iter().map(|item| item.product_uuid).collect();

        let found = self
            .catalog
            .find_products(&products)
            .await
            .map_err(CartsServiceError::Catalog)?;

        Ok(ResolvedCart::resolve(cart, found))
    }
}

#[async_trait]
impl CartsService for StoreCartsService {
    #[tracing::instrument(name = "carts.get_cart", skip_all, fields(owner = %owner), err)]
    async fn get_cart(&self, owner: UserUuid) -> Result<ResolvedCart, CartsServiceError> {
        let cart = self.store.get_or_create(owner).await?;

        self.resolve(cart).await
    }

    #[tracing::instrument(
        name = "carts.add_item",
        skip_all,
        fields(owner = %owner, product = %product, quantity = quantity),
        err
    )]
    async fn add_item(
        &self,
        owner: UserUuid,
        product: ProductUuid,
        quantity: i64,
    ) -> Result<ResolvedCart, CartsServiceError> {
        let quantity = Quantity::try_from(quantity)?;

        self.catalog
            .get_product(product)
            .await
            .map_err(|error| match error {
                ProductsServiceError::NotFound => CartsServiceError::ProductNotFound,
                other => CartsServiceError::Catalog(other),
            })?;

        let cart = self
            .store
            .apply(
                owner,
                CartMutation::AddItem {
                    item: CartItemUuid::new(),
                    product,
                    quantity,
                },
            )
            .await?;

        debug!(items = cart.items.len(), "added item to cart");

        self.resolve(cart).await
    }

    #[tracing::instrument(
        name = "carts.update_item_quantity",
        skip_all,
        fields(owner = %owner, item = %item, quantity = quantity),
        err
    )]
    async fn update_item_quantity(
        &self,
        owner: UserUuid,
        item: CartItemUuid,
        quantity: i64,
    ) -> Result<ResolvedCart, CartsServiceError> {
        let cart = self
            .store
            .apply(owner, CartMutation::SetQuantity { item, quantity })
            .await?;

        debug!(items = cart.items.len(), "updated cart item quantity");

        self.resolve(cart).await
    }

    #[tracing::instrument(
        name = "carts.remove_item",
        skip_all,
        fields(owner = %owner, item = %item),
        err
    )]
    async fn remove_item(
        &self,
        owner: UserUuid,
        item: CartItemUuid,
    ) -> Result<ResolvedCart, CartsServiceError> {
        let cart = self
            .store
            .apply(owner, CartMutation::RemoveItem { item })
            .await?;

        debug!(items = cart.items.len(), "removed cart item");

        self.resolve(cart).await
    }

    #[tracing::instrument(name = "carts.checkout", skip_all, fields(owner = %owner), err)]
    async fn checkout(&self, owner: UserUuid) -> Result<CheckoutConfirmation, CartsServiceError> {
        let items_cleared = self.store.clear(owner).await?;

        info!(owner = %owner, items_cleared, "checked out cart");

        Ok(CheckoutConfirmation {
            owner,
            items_cleared,
            completed_at: Timestamp::now(),
        })
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Fetch the owner's cart, creating an empty one on first access.
    async fn get_cart(&self, owner: UserUuid) -> Result<ResolvedCart, CartsServiceError>;

    /// Add a product, merging with an existing line for the same product.
    async fn add_item(
        &self,
        owner: UserUuid,
        product: ProductUuid,
        quantity: i64,
    ) -> Result<ResolvedCart, CartsServiceError>;

    /// Set an item's quantity. Zero or less removes the item.
    async fn update_item_quantity(
        &self,
        owner: UserUuid,
        item: CartItemUuid,
        quantity: i64,
    ) -> Result<ResolvedCart, CartsServiceError>;

    /// Remove an item. Removing an unknown item is not an error.
    async fn remove_item(
        &self,
        owner: UserUuid,
        item: CartItemUuid,
    ) -> Result<ResolvedCart, CartsServiceError>;

    /// Empty the cart in one step.
    async fn checkout(&self, owner: UserUuid) -> Result<CheckoutConfirmation, CartsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::domain::{
        carts::store::MemoryCartStore,
        products::{
            MemoryProductsService, MockProductsService,
            models::{NewProduct, Product, ProductUpdate},
        },
    };

    use super::*;

    struct Fixture {
        carts: Arc<StoreCartsService>,
        catalog: Arc<MemoryProductsService>,
    }

    impl Fixture {
        fn new() -> Self {
            let catalog = Arc::new(MemoryProductsService::new());

            Self {
                carts: Arc::new(StoreCartsService::new(
                    Arc::new(MemoryCartStore::new()),
                    catalog.clone(),
                )),
                catalog,
            }
        }

        async fn product(&self, name: &str, price: u64) -> Product {
            self.catalog
                .create_product(NewProduct {
                    uuid: ProductUuid::new(),
                    name: name.to_string(),
                    description: String::new(),
                    price,
                })
                .await
                .expect("product should be created")
        }
    }

    fn line(cart: &ResolvedCart, product: ProductUuid) -> Option<(CartItemUuid, u32)> {
        cart.items
            .iter()
            .find(|item| item.product_uuid == product)
            .map(|item| (item.uuid, item.quantity))
    }

    #[tokio::test]
    async fn new_owner_gets_an_empty_cart() -> TestResult {
        let fx = Fixture::new();

        let cart = fx.carts.get_cart(UserUuid::new()).await?;

        assert!(cart.items.is_empty());
        assert_eq!(cart.total, 0);

        Ok(())
    }

    #[tokio::test]
    async fn adding_twice_merges_into_one_line() -> TestResult {
        let fx = Fixture::new();
        let owner = UserUuid::new();
        let product = fx.product("Site vitrine", 120_000).await;

        fx.carts.add_item(owner, product.uuid, 2).await?;
        let cart = fx.carts.add_item(owner, product.uuid, 3).await?;

        assert_eq!(cart.items.len(), 1);
        assert_eq!(line(&cart, product.uuid).map(|(_, q)| q), Some(5));
        assert_eq!(cart.total, 600_000);

        Ok(())
    }

    #[tokio::test]
    async fn add_rejects_non_positive_quantities_without_changes() -> TestResult {
        let fx = Fixture::new();
        let owner = UserUuid::new();
        let product = fx.product("Logo", 5_000).await;

        for quantity in [0, -1] {
            let result = fx.carts.add_item(owner, product.uuid, quantity).await;

            assert!(
                matches!(result, Err(CartsServiceError::InvalidQuantity)),
                "expected InvalidQuantity for {quantity}, got {result:?}"
            );
        }

        assert!(fx.carts.get_cart(owner).await?.items.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn add_unknown_product_is_not_found() -> TestResult {
        let fx = Fixture::new();
        let owner = UserUuid::new();

        let result = fx.carts.add_item(owner, ProductUuid::new(), 1).await;

        assert!(matches!(result, Err(CartsServiceError::ProductNotFound)));
        assert!(fx.carts.get_cart(owner).await?.items.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn update_sets_absolute_quantity_and_zero_removes() -> TestResult {
        let fx = Fixture::new();
        let owner = UserUuid::new();
        let product = fx.product("Maintenance", 10_000).await;

        let cart = fx.carts.add_item(owner, product.uuid, 4).await?;
        let (item, _) = line(&cart, product.uuid).ok_or("missing line")?;

        let cart = fx.carts.update_item_quantity(owner, item, 2).await?;
        assert_eq!(line(&cart, product.uuid).map(|(_, q)| q), Some(2));

        let cart = fx.carts.update_item_quantity(owner, item, 0).await?;
        assert!(cart.items.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn negative_update_removes_the_item() -> TestResult {
        let fx = Fixture::new();
        let owner = UserUuid::new();
        let product = fx.product("Hébergement", 2_000).await;

        let cart = fx.carts.add_item(owner, product.uuid, 1).await?;
        let (item, _) = line(&cart, product.uuid).ok_or("missing line")?;

        let cart = fx.carts.update_item_quantity(owner, item, -1).await?;

        assert!(cart.items.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn update_unknown_item_is_not_found() -> TestResult {
        let fx = Fixture::new();

        let result = fx
            .carts
            .update_item_quantity(UserUuid::new(), CartItemUuid::new(), 3)
            .await;

        assert!(matches!(result, Err(CartsServiceError::ItemNotFound)));

        Ok(())
    }

    #[tokio::test]
    async fn remove_is_idempotent() -> TestResult {
        let fx = Fixture::new();
        let owner = UserUuid::new();
        let product = fx.product("Logo", 5_000).await;

        let cart = fx.carts.add_item(owner, product.uuid, 1).await?;
        let (item, _) = line(&cart, product.uuid).ok_or("missing line")?;

        let once = fx.carts.remove_item(owner, item).await?;
        let twice = fx.carts.remove_item(owner, item).await?;

        assert!(once.items.is_empty());
        assert_eq!(once, twice);

        Ok(())
    }

    #[tokio::test]
    async fn items_are_private_to_their_owner() -> TestResult {
        let fx = Fixture::new();
        let alice = UserUuid::new();
        let bob = UserUuid::new();
        let product = fx.product("Logo", 5_000).await;

        let cart = fx.carts.add_item(alice, product.uuid, 1).await?;
        let (item, _) = line(&cart, product.uuid).ok_or("missing line")?;

        let result = fx.carts.update_item_quantity(bob, item, 7).await;
        assert!(matches!(result, Err(CartsServiceError::ItemNotFound)));

        fx.carts.remove_item(bob, item).await?;

        assert_eq!(
            line(&fx.carts.get_cart(alice).await?, product.uuid).map(|(_, q)| q),
            Some(1)
        );

        Ok(())
    }

    #[tokio::test]
    async fn total_follows_catalog_price_changes() -> TestResult {
        let fx = Fixture::new();
        let owner = UserUuid::new();
        let product = fx.product("Site vitrine", 1_000).await;

        fx.carts.add_item(owner, product.uuid, 3).await?;

        fx.catalog
            .update_product(
                product.uuid,
                ProductUpdate {
                    name: product.name.clone(),
                    description: product.description.clone(),
                    price: 1_500,
                },
            )
            .await?;

        let cart = fx.carts.get_cart(owner).await?;

        assert_eq!(cart.total, 4_500);

        Ok(())
    }

    #[tokio::test]
    async fn deleted_product_stays_in_cart_as_unavailable() -> TestResult {
        let fx = Fixture::new();
        let owner = UserUuid::new();
        let kept = fx.product("Logo", 5_000).await;
        let gone = fx.product("Retired", 9_999).await;

        fx.carts.add_item(owner, kept.uuid, 1).await?;
        fx.carts.add_item(owner, gone.uuid, 2).await?;

        fx.catalog.delete_product(gone.uuid).await?;

        let cart = fx.carts.get_cart(owner).await?;

        let unavailable = cart
            .items
            .iter()
            .find(|item| item.product_uuid == gone.uuid)
            .ok_or("deleted product should still be listed")?;

        assert!(unavailable.product.is_none());
        assert_eq!(unavailable.line_total, None);
        assert_eq!(cart.total, 5_000);

        Ok(())
    }

    #[tokio::test]
    async fn checkout_empties_the_cart_and_it_can_be_reused() -> TestResult {
        let fx = Fixture::new();
        let owner = UserUuid::new();
        let first = fx.product("Logo", 5_000).await;
        let second = fx.product("Maintenance", 10_000).await;

        fx.carts.add_item(owner, first.uuid, 1).await?;
        fx.carts.add_item(owner, second.uuid, 2).await?;

        let confirmation = fx.carts.checkout(owner).await?;

        assert_eq!(confirmation.owner, owner);
        assert_eq!(confirmation.items_cleared, 2);
        assert!(fx.carts.get_cart(owner).await?.items.is_empty());

        let cart = fx.carts.add_item(owner, first.uuid, 1).await?;

        assert_eq!(cart.items.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn checkout_of_an_empty_cart_succeeds() -> TestResult {
        let fx = Fixture::new();

        let confirmation = fx.carts.checkout(UserUuid::new()).await?;

        assert_eq!(confirmation.items_cleared, 0);

        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_adds_are_all_counted() -> TestResult {
        let fx = Fixture::new();
        let owner = UserUuid::new();
        let product = fx.product("Logo", 100).await;

        let tasks: Vec<_> = (0..64)
            .map(|_| {
                let carts = Arc::clone(&fx.carts);
                let product = product.uuid;

                tokio::spawn(async move { carts.add_item(owner, product, 1).await })
            })
            .collect();

        for task in tasks {
            task.await??;
        }

        let cart = fx.carts.get_cart(owner).await?;

        assert_eq!(line(&cart, product.uuid).map(|(_, q)| q), Some(64));
        assert_eq!(cart.total, 6_400);

        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn reads_during_checkout_see_all_or_nothing() -> TestResult {
        let fx = Fixture::new();
        let owner = UserUuid::new();

        for index in 0..8 {
            let product = fx.product(&format!("Product {index}"), 100).await;

            fx.carts.add_item(owner, product.uuid, 1).await?;
        }

        let readers: Vec<_> = (0..32)
            .map(|_| {
                let carts = Arc::clone(&fx.carts);

                tokio::spawn(async move { carts.get_cart(owner).await })
            })
            .collect();

        let checkout = {
            let carts = Arc::clone(&fx.carts);

            tokio::spawn(async move { carts.checkout(owner).await })
        };

        for reader in readers {
            let seen = reader.await??.items.len();

            assert!(seen == 8 || seen == 0, "observed partial cart with {seen} items");
        }

        assert_eq!(checkout.await??.items_cleared, 8);

        Ok(())
    }

    #[tokio::test]
    async fn catalog_failure_during_add_never_touches_the_cart() -> TestResult {
        let mut catalog = MockProductsService::new();

        catalog
            .expect_get_product()
            .once()
            .return_once(|_| Err(ProductsServiceError::Sql(sqlx::Error::PoolTimedOut)));

        catalog.expect_find_products().never();

        let store = Arc::new(MemoryCartStore::new());
        let carts = StoreCartsService::new(store.clone(), Arc::new(catalog));
        let owner = UserUuid::new();

        let result = carts.add_item(owner, ProductUuid::new(), 1).await;

        assert!(matches!(result, Err(CartsServiceError::Catalog(_))));
        assert!(store.get_or_create(owner).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn get_cart_resolves_products_in_one_batch() -> TestResult {
        let owner = UserUuid::new();
        let store = Arc::new(MemoryCartStore::new());
        let p1 = ProductUuid::new();
        let p2 = ProductUuid::new();

        for product in [p1, p2] {
            store
                .apply(
                    owner,
                    CartMutation::AddItem {
                        item: CartItemUuid::new(),
                        product,
                        quantity: Quantity::ONE,
                    },
                )
                .await?;
        }

        let mut catalog = MockProductsService::new();

        catalog
            .expect_find_products()
            .once()
            .withf(move |uuids| uuids.to_vec() == vec![p1, p2])
            .return_once(|_| Ok(Vec::new()));

        catalog.expect_get_product().never();

        let carts = StoreCartsService::new(store, Arc::new(catalog));

        let cart = carts.get_cart(owner).await?;

        assert_eq!(cart.items.len(), 2);
        assert!(cart.items.iter().all(|item| !item.is_available()));
        assert_eq!(cart.total, 0);

        Ok(())
    }
    #[tokio::test]
    #[ignore = "requires a Docker daemon for the PostgreSQL container"]
    async fn postgres_backed_cart_resolves_against_the_catalog() -> TestResult {
        let ctx = crate::test::TestContext::new().await;
        let owner = UserUuid::new();

        let kept = ctx
            .products
            .create_product(NewProduct {
                uuid: ProductUuid::new(),
                name: "Site vitrine".to_string(),
                description: String::new(),
                price: 1_000,
            })
            .await?;

        let gone = ctx
            .products
            .create_product(NewProduct {
                uuid: ProductUuid::new(),
                name: "Retired".to_string(),
                description: String::new(),
                price: 500,
            })
            .await?;

        ctx.carts.add_item(owner, kept.uuid, 2).await?;
        ctx.carts.add_item(owner, gone.uuid, 1).await?;
        ctx.carts.add_item(owner, kept.uuid, 1).await?;

        ctx.products.delete_product(gone.uuid).await?;

        let cart = ctx.carts.get_cart(owner).await?;

        assert_eq!(line(&cart, kept.uuid).map(|(_, q)| q), Some(3));
        assert_eq!(cart.total, 3_000);
        assert!(cart.items.iter().any(|item| item.product_uuid == gone.uuid && !item.is_available()));

        let confirmation = ctx.carts.checkout(owner).await?;

        assert_eq!(confirmation.items_cleared, 2);
        assert!(ctx.carts.get_cart(owner).await?.items.is_empty());

        Ok(())
    }
}
