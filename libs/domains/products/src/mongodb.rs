//! MongoDB implementation of ProductRepository

use async_trait::async_trait;
use chrono::Utc;
use database::mongodb::check_health_detailed;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, DateTime as BsonDateTime, Document},
    options::{IndexOptions, ReturnDocument},
    Collection, Database, IndexModel,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::filter::{Pagination, ProductFilter};
use crate::models::{NewProduct, Product, ProductCategory, ProductChanges};
use crate::repository::ProductRepository;
use crate::stock;

pub const COLLECTION_NAME: &str = "products";

/// Stored shape: string `_id`, BSON dates, camelCase keys
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDocument {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    description: String,
    price: i64,
    quantity: i64,
    category: ProductCategory,
    in_stock: bool,
    created_at: BsonDateTime,
    updated_at: BsonDateTime,
}

impl From<&Product> for ProductDocument {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            quantity: product.quantity,
            category: product.category,
            in_stock: product.in_stock,
            created_at: BsonDateTime::from_millis(product.created_at.timestamp_millis()),
            updated_at: BsonDateTime::from_millis(product.updated_at.timestamp_millis()),
        }
    }
}

impl TryFrom<ProductDocument> for Product {
    type Error = ProductError;

    fn try_from(doc: ProductDocument) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&doc.id)
            .map_err(|e| ProductError::Internal(format!("stored id {}: {e}", doc.id)))?;
        let timestamp = |value: BsonDateTime| {
            chrono::DateTime::from_timestamp_millis(value.timestamp_millis()).ok_or_else(|| {
                ProductError::Internal(format!("stored timestamp out of range for {id}"))
            })
        };

        Ok(Product {
            id,
            name: doc.name,
            description: doc.description,
            price: doc.price,
            quantity: doc.quantity,
            category: doc.category,
            in_stock: doc.in_stock,
            created_at: timestamp(doc.created_at)?,
            updated_at: timestamp(doc.updated_at)?,
        })
    }
}

/// MongoDB implementation of the ProductRepository
pub struct MongoProductRepository {
    database: Database,
    collection: Collection<ProductDocument>,
}

impl MongoProductRepository {
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, COLLECTION_NAME)
    }

    /// Use a custom collection name, mostly for test isolation
    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        Self {
            database: db.clone(),
            collection: db.collection::<ProductDocument>(collection_name),
        }
    }

    /// Create the indexes backing the listing filters and sort order
    pub async fn init_indexes(&self) -> ProductResult<()> {
        let index = |keys: Document, name: &str| {
            IndexModel::builder()
                .keys(keys)
                .options(IndexOptions::builder().name(name.to_string()).build())
                .build()
        };

        let indexes = vec![
            index(doc! { "name": 1 }, "idx_name"),
            index(doc! { "category": 1 }, "idx_category"),
            index(doc! { "price": 1 }, "idx_price"),
            index(doc! { "quantity": 1 }, "idx_quantity"),
            index(doc! { "createdAt": -1, "_id": -1 }, "idx_created_at"),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Product indexes created successfully");
        Ok(())
    }

    fn build_filter(filter: &ProductFilter) -> Document {
        let mut doc = doc! {};

        if let Some(ref category) = filter.category {
            doc.insert("category", category.as_str());
        }

        if filter.min_price.is_some() || filter.max_price.is_some() {
            let mut price = doc! {};
            if let Some(min) = filter.min_price {
                price.insert("$gte", min);
            }
            if let Some(max) = filter.max_price {
                price.insert("$lte", max);
            }
            doc.insert("price", price);
        }

        if let Some(in_stock) = filter.in_stock {
            doc.insert("inStock", in_stock);
        }

        if filter.quantity_above.is_some() || filter.quantity_at_most.is_some() {
            let mut quantity = doc! {};
            if let Some(above) = filter.quantity_above {
                quantity.insert("$gt", above);
            }
            if let Some(at_most) = filter.quantity_at_most {
                quantity.insert("$lte", at_most);
            }
            doc.insert("quantity", quantity);
        }

        doc
    }

    /// Pipeline `$set` for a partial update. Values go through `$literal` so
    /// strings such as `"$price"` are stored as text, not read as field paths.
    fn build_update(changes: &ProductChanges) -> Vec<Document> {
        let mut set = doc! {};

        if let Some(ref name) = changes.name {
            set.insert("name", doc! { "$literal": name.as_str() });
        }
        if let Some(ref description) = changes.description {
            set.insert("description", doc! { "$literal": description.as_str() });
        }
        if let Some(price) = changes.price {
            set.insert("price", doc! { "$literal": price });
        }
        if let Some(quantity) = changes.quantity {
            set.insert("quantity", doc! { "$literal": quantity });
        }
        if let Some(category) = changes.category {
            set.insert("category", doc! { "$literal": category.as_ref() });
        }
        set.insert("updatedAt", BsonDateTime::from_millis(Utc::now().timestamp_millis()));

        vec![doc! { "$set": set }, Self::derive_in_stock()]
    }

    fn derive_in_stock() -> Document {
        doc! { "$set": { "inStock": { "$gt": ["$quantity", 0] } } }
    }

    fn id_filter(id: Uuid) -> Document {
        doc! { "_id": id.to_string() }
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self, input), fields(product_name = %input.name))]
    async fn create(&self, input: NewProduct) -> ProductResult<Product> {
        let document = ProductDocument::from(&Product::new(input));

        self.collection.insert_one(&document).await?;

        let product = Product::try_from(document)?;
        tracing::info!(product_id = %product.id, "Product created successfully");
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        self.collection
            .find_one(Self::id_filter(id))
            .await?
            .map(Product::try_from)
            .transpose()
    }

    #[instrument(skip(self))]
    async fn list(
        &self,
        filter: ProductFilter,
        pagination: Option<Pagination>,
    ) -> ProductResult<Vec<Product>> {
        let mut find = self
            .collection
            .find(Self::build_filter(&filter))
            .sort(doc! { "createdAt": -1, "_id": -1 });
        if let Some(page) = pagination {
            find = find
                .skip(page.skip)
                .limit(i64::try_from(page.limit).unwrap_or(i64::MAX));
        }

        let cursor = find.await?;
        let documents: Vec<ProductDocument> = cursor.try_collect().await?;

        documents.into_iter().map(Product::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn count(&self, filter: ProductFilter) -> ProductResult<u64> {
        let count = self
            .collection
            .count_documents(Self::build_filter(&filter))
            .await?;
        Ok(count)
    }

    #[instrument(skip(self, changes))]
    async fn update(&self, id: Uuid, changes: ProductChanges) -> ProductResult<Product> {
        let updated = self
            .collection
            .find_one_and_update(Self::id_filter(id), Self::build_update(&changes))
            .return_document(ReturnDocument::After)
            .await?
            .ok_or(ProductError::NotFound(id))?;

        tracing::info!(product_id = %id, "Product updated successfully");
        Product::try_from(updated)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> ProductResult<bool> {
        let result = self.collection.delete_one(Self::id_filter(id)).await?;

        if result.deleted_count > 0 {
            tracing::info!(product_id = %id, "Product deleted successfully");
        }
        Ok(result.deleted_count > 0)
    }

    #[instrument(skip(self))]
    async fn reduce_stock(&self, id: Uuid, amount: i64) -> ProductResult<Product> {
        stock::check_amount(amount)?;

        let guard = doc! { "_id": id.to_string(), "quantity": { "$gte": amount } };
        let update = vec![
            doc! {
                "$set": {
                    "quantity": { "$subtract": ["$quantity", amount] },
                    "updatedAt": BsonDateTime::from_millis(Utc::now().timestamp_millis()),
                }
            },
            Self::derive_in_stock(),
        ];

        let reduced = self
            .collection
            .find_one_and_update(guard, update)
            .return_document(ReturnDocument::After)
            .await?;

        match reduced {
            Some(document) => {
                let product = Product::try_from(document)?;
                tracing::info!(product_id = %id, amount, remaining = product.quantity, "Stock reduced");
                Ok(product)
            }
            None => match self.get_by_id(id).await? {
                Some(current) => Err(stock::insufficient(current.quantity, amount)),
                None => Err(ProductError::NotFound(id)),
            },
        }
    }

    async fn ping(&self) -> ProductResult<()> {
        let status = check_health_detailed(&self.database).await;
        if status.healthy {
            Ok(())
        } else {
            Err(ProductError::Database(
                status.message.unwrap_or_else(|| "ping failed".to_string()),
            ))
        }
    }
}
