use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::filter::{sort_newest_first, Pagination, ProductFilter};
use crate::models::{NewProduct, Product, ProductChanges};

/// Repository trait for Product persistence
///
/// Listings are ordered newest first. Every write keeps `in_stock` equal to
/// `quantity > 0` and refreshes `updated_at`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Store a new product with a fresh id and timestamps
    async fn create(&self, input: NewProduct) -> ProductResult<Product>;

    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>>;

    /// Products matching `filter`; `None` pagination returns every match
    async fn list(
        &self,
        filter: ProductFilter,
        pagination: Option<Pagination>,
    ) -> ProductResult<Vec<Product>>;

    /// Number of products matching `filter`, ignoring pagination
    async fn count(&self, filter: ProductFilter) -> ProductResult<u64>;

    /// Apply a partial update, failing with `NotFound` if the id is unknown
    async fn update(&self, id: Uuid, changes: ProductChanges) -> ProductResult<Product>;

    /// Returns `false` when nothing was deleted
    async fn delete(&self, id: Uuid) -> ProductResult<bool>;

    /// Atomically take `amount` units out of stock.
    ///
    /// Two concurrent reductions can never both succeed past the available
    /// quantity.
    async fn reduce_stock(&self, id: Uuid, amount: i64) -> ProductResult<Product>;

    /// Storage liveness
    async fn ping(&self) -> ProductResult<()>;
}

/// Process-local repository, used by tests and `PRODUCTS_STORAGE=memory`
#[derive(Clone, Default)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<HashMap<Uuid, Product>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, input: NewProduct) -> ProductResult<Product> {
        let product = Product::new(input);
        self.products
            .write()
            .await
            .insert(product.id, product.clone());

        tracing::info!(product_id = %product.id, "Created product");
        Ok(product)
    }

    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.get(&id).cloned())
    }

    async fn list(
        &self,
        filter: ProductFilter,
        pagination: Option<Pagination>,
    ) -> ProductResult<Vec<Product>> {
        let mut result: Vec<Product> = {
            let products = self.products.read().await;
            products
                .values()
                .filter(|p| filter.matches(p))
                .cloned()
                .collect()
        };

        sort_newest_first(&mut result);

        Ok(match pagination {
            Some(page) => page.apply(result),
            None => result,
        })
    }

    async fn count(&self, filter: ProductFilter) -> ProductResult<u64> {
        let products = self.products.read().await;
        Ok(products.values().filter(|p| filter.matches(p)).count() as u64)
    }

    async fn update(&self, id: Uuid, changes: ProductChanges) -> ProductResult<Product> {
        let mut products = self.products.write().await;
        let product = products.get_mut(&id).ok_or(ProductError::NotFound(id))?;

        product.apply_changes(changes);

        tracing::info!(product_id = %id, "Updated product");
        Ok(product.clone())
    }

    async fn delete(&self, id: Uuid) -> ProductResult<bool> {
        let removed = self.products.write().await.remove(&id).is_some();
        if removed {
            tracing::info!(product_id = %id, "Deleted product");
        }
        Ok(removed)
    }

    async fn reduce_stock(&self, id: Uuid, amount: i64) -> ProductResult<Product> {
        let mut products = self.products.write().await;
        let product = products.get_mut(&id).ok_or(ProductError::NotFound(id))?;

        product.reduce_stock(amount)?;

        tracing::info!(product_id = %id, amount, remaining = product.quantity, "Reduced stock");
        Ok(product.clone())
    }

    async fn ping(&self) -> ProductResult<()> {
        Ok(())
    }
}
