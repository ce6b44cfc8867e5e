//! Product Service - Business logic layer

use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::filter::{Pagination, ProductFilter, ProductQuery};
use crate::models::{Product, ProductInput};
use crate::repository::ProductRepository;
use crate::validation;

/// One page of a filtered listing
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPage {
    pub items: Vec<Product>,
    /// Matches across all pages
    pub total: u64,
    pub pagination: Pagination,
}

/// Product service providing business logic operations
///
/// Validates payloads, resolves listing criteria, and turns missing products
/// into `NotFound`.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self, input))]
    pub async fn create_product(&self, input: ProductInput) -> ProductResult<Product> {
        let product = validation::validate_new(&input).map_err(ProductError::Validation)?;
        self.repository.create(product).await
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: Uuid) -> ProductResult<Product> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    /// Filtered, paginated listing with the total match count
    #[instrument(skip(self))]
    pub async fn find_products(&self, query: &ProductQuery) -> ProductResult<ProductPage> {
        let filter = ProductFilter::from_query(query);
        let pagination = Pagination::from_query(query);

        let (items, total) = tokio::try_join!(
            self.repository.list(filter.clone(), Some(pagination)),
            self.repository.count(filter),
        )?;

        Ok(ProductPage {
            items,
            total,
            pagination,
        })
    }

    /// Partial update; only the fields present in `input` change
    #[instrument(skip(self, input))]
    pub async fn update_product(&self, id: Uuid, input: ProductInput) -> ProductResult<Product> {
        let changes = validation::validate_changes(&input).map_err(ProductError::Validation)?;
        self.repository.update(id, changes).await
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: Uuid) -> ProductResult<()> {
        if !self.repository.delete(id).await? {
            return Err(ProductError::NotFound(id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn reduce_stock(&self, id: Uuid, amount: i64) -> ProductResult<Product> {
        crate::stock::check_amount(amount)?;
        self.repository.reduce_stock(id, amount).await
    }

    /// Every product with `0 < quantity <= 10`, newest first
    #[instrument(skip(self))]
    pub async fn low_stock_products(&self) -> ProductResult<Vec<Product>> {
        self.repository.list(ProductFilter::low_stock(), None).await
    }

    /// Every in-stock product of `category`, newest first
    #[instrument(skip(self))]
    pub async fn products_by_category(&self, category: &str) -> ProductResult<Vec<Product>> {
        self.repository
            .list(ProductFilter::by_category_in_stock(category), None)
            .await
    }

    pub async fn ping(&self) -> ProductResult<()> {
        self.repository.ping().await
    }
}
