//! In-memory catalog.

use async_trait::async_trait;
use dashmap::{DashMap, mapref::entry::Entry};
use jiff::Timestamp;

use crate::domain::products::{
    ProductsService,
    errors::ProductsServiceError,
    models::{NewProduct, Product, ProductUpdate, ProductUuid, validate_name},
};

#[derive(Debug, Default)]
pub struct MemoryProductsService {
    products: DashMap<ProductUuid, Product>,
}

impl MemoryProductsService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn live(&self, product: ProductUuid) -> Option<Product> {
        self.products
            .get(&product)
            .filter(|entry| entry.deleted_at.is_none())
            .map(|entry| entry.value().clone())
    }
}

#[async_trait]
impl ProductsService for MemoryProductsService {
    async fn list_products(&self) -> Result<Vec<Product>, ProductsServiceError> {
        let mut products: Vec<Product> = self
            .products
            .iter()
            .filter(|entry| entry.deleted_at.is_none())
            .map(|entry| entry.value().clone())
            .collect();

        products.sort_by(|a, b| (a.created_at, a.uuid).cmp(&(b.created_at, b.uuid)));

        Ok(products)
    }

    async fn get_product(&self, product: ProductUuid) -> Result<Product, ProductsServiceError> {
        self.live(product).ok_or(ProductsServiceError::NotFound)
    }

    async fn find_products(
        &self,
        products: &[ProductUuid],
    ) -> Result<Vec<Product>, ProductsServiceError> {
        Ok(products
            .iter()
            .filter_map(|product| self.live(*product))
            .collect())
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, ProductsServiceError> {
        validate_name(&product.name)?;
        i64::try_from(product.price)?;

        match self.products.entry(product.uuid) {
            Entry::Occupied(_) => Err(ProductsServiceError::AlreadyExists),
            Entry::Vacant(entry) => {
                let now = Timestamp::now();

                let created = Product {
                    uuid: product.uuid,
                    name: product.name,
                    description: product.description,
                    price: product.price,
                    created_at: now,
                    updated_at: now,
                    deleted_at: None,
                };

                entry.insert(created.clone());

                Ok(created)
            }
        }
    }

    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<Product, ProductsServiceError> {
        validate_name(&update.name)?;
        i64::try_from(update.price)?;

        let mut entry = self
            .products
            .get_mut(&product)
            .filter(|entry| entry.deleted_at.is_none())
            .ok_or(ProductsServiceError::NotFound)?;

        entry.name = update.name;
        entry.description = update.description;
        entry.price = update.price;
        entry.updated_at = Timestamp::now();

        Ok(entry.value().clone())
    }

    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError> {
        let mut entry = self
            .products
            .get_mut(&product)
            .filter(|entry| entry.deleted_at.is_none())
            .ok_or(ProductsServiceError::NotFound)?;

        entry.deleted_at = Some(Timestamp::now());

        Ok(())
    }
}
