//! PostgreSQL cart store.
//!
//! Each operation runs in its own transaction. Writers take a row lock on the
//! `carts` row before reading items, which serializes writes per owner while
//! leaving other owners and plain readers unblocked.

use async_trait::async_trait;
use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::{
    database::Db,
    domain::{
        carts::{
            errors::CartStoreError,
            models::{Cart, CartItem, CartItemUuid, CartMutation, Quantity},
            store::CartStore,
        },
        products::models::ProductUuid,
        users::models::UserUuid,
    },
};

const ENSURE_CART_SQL: &str = include_str!("sql/ensure_cart.sql");
const GET_CART_SQL: &str = include_str!("sql/get_cart.sql");
const LOCK_CART_SQL: &str = include_str!("sql/lock_cart.sql");
const LIST_CART_ITEMS_SQL: &str = include_str!("sql/list_cart_items.sql");
const DELETE_CART_ITEMS_SQL: &str = include_str!("sql/delete_cart_items.sql");
const INSERT_CART_ITEM_SQL: &str = include_str!("sql/insert_cart_item.sql");
const TOUCH_CART_SQL: &str = include_str!("sql/touch_cart.sql");

#[derive(Debug, Clone)]
pub struct PgCartStore {
    db: Db,
}

impl PgCartStore {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    async fn load(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: UserUuid,
        lock: bool,
    ) -> Result<Cart, sqlx::Error> {
        query(ENSURE_CART_SQL)
            .bind(owner.into_uuid())
            .execute(&mut **tx)
            .await?;

        let row = query_as::<Postgres, CartRow>(if lock { LOCK_CART_SQL } else { GET_CART_SQL })
            .bind(owner.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        let items = query_as::<Postgres, CartItem>(LIST_CART_ITEMS_SQL)
            .bind(owner.into_uuid())
            .fetch_all(&mut **tx)
            .await?;

        Ok(Cart {
            owner,
            items,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    async fn save(&self, tx: &mut Transaction<'_, Postgres>, cart: &Cart) -> Result<(), sqlx::Error> {
        query(DELETE_CART_ITEMS_SQL)
            .bind(cart.owner.into_uuid())
            .execute(&mut **tx)
            .await?;

        for (position, item) in cart.items.iter().enumerate() {
            let position = i32::try_from(position).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

            query(INSERT_CART_ITEM_SQL)
                .bind(item.uuid.into_uuid())
                .bind(cart.owner.into_uuid())
                .bind(item.product_uuid.into_uuid())
                .bind(i64::from(item.quantity))
                .bind(position)
                .bind(SqlxTimestamp::from(item.created_at))
                .bind(SqlxTimestamp::from(item.updated_at))
                .execute(&mut **tx)
                .await?;
        }

        query(TOUCH_CART_SQL)
            .bind(cart.owner.into_uuid())
            .bind(SqlxTimestamp::from(cart.updated_at))
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl CartStore for PgCartStore {
    async fn get_or_create(&self, owner: UserUuid) -> Result<Cart, CartStoreError> {
        let mut tx = self.db.begin().await?;

        let cart = self.load(&mut tx, owner, false).await?;

        tx.commit().await?;

        Ok(cart)
    }

    async fn apply(&self, owner: UserUuid, mutation: CartMutation) -> Result<Cart, CartStoreError> {
        let mut tx = self.db.begin().await?;

        let current = self.load(&mut tx, owner, true).await?;

        let mut next = current.clone();

        next.apply(mutation, Timestamp::now())?;

        if next != current {
            self.save(&mut tx, &next).await?;
        }

        tx.commit().await?;

        Ok(next)
    }

    async fn clear(&self, owner: UserUuid) -> Result<usize, CartStoreError> {
        let mut tx = self.db.begin().await?;

        let mut cart = self.load(&mut tx, owner, true).await?;

        let removed = cart.clear(Timestamp::now());

        if removed > 0 {
            self.save(&mut tx, &cart).await?;
        }

        tx.commit().await?;

        Ok(removed)
    }
}

struct CartRow {
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl<'r> FromRow<'r, PgRow> for CartRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for CartItem {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let quantity: i64 = row.try_get("quantity")?;

        let quantity = Quantity::try_from(quantity).map_err(|e| sqlx::Error::ColumnDecode {
            index: "quantity".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            uuid: CartItemUuid::from_uuid(row.try_get("uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            quantity,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
