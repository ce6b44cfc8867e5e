use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::stock;

/// Product category
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProductCategory {
    Electronics,
    Clothing,
    Books,
    Home,
    Sports,
    Other,
}

impl ProductCategory {
    /// `"electronics, clothing, books, home, sports, other"`
    pub fn allowed_values() -> String {
        Self::iter()
            .map(|c| c.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Product entity.
///
/// `in_stock` always equals `quantity > 0`: it is set by [`Product::new`] and
/// recomputed by every mutation below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Whole currency units
    pub price: i64,
    pub quantity: i64,
    pub category: ProductCategory,
    pub in_stock: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(input: NewProduct) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            description: input.description,
            price: input.price,
            quantity: input.quantity,
            category: input.category,
            in_stock: stock::derive_stock(input.quantity),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_changes(&mut self, changes: ProductChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(price) = changes.price {
            self.price = price;
        }
        if let Some(quantity) = changes.quantity {
            self.quantity = quantity;
        }
        if let Some(category) = changes.category {
            self.category = category;
        }
        self.in_stock = stock::derive_stock(self.quantity);
        self.updated_at = Utc::now();
    }

    /// Take `amount` units out of stock, all or nothing
    pub fn reduce_stock(&mut self, amount: i64) -> ProductResult<()> {
        self.quantity = stock::check_reduction(self.quantity, amount)?;
        self.in_stock = stock::derive_stock(self.quantity);
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn is_low_stock(&self) -> bool {
        stock::is_low_stock(self.quantity)
    }
}

/// Request body for create and update.
///
/// Fields stay untyped so that wrong types become validation messages rather
/// than deserialization failures. A JSON `null` counts as absent. Keys not
/// listed here, `inStock` included, are ignored.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "Pen")]
    pub name: Option<Value>,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "A blue ink pen")]
    pub description: Option<Value>,
    #[serde(default)]
    #[schema(value_type = Option<i64>, example = 2)]
    pub price: Option<Value>,
    #[serde(default)]
    #[schema(value_type = Option<i64>, example = 0)]
    pub quantity: Option<Value>,
    #[serde(default)]
    #[schema(value_type = Option<ProductCategory>)]
    pub category: Option<Value>,
}

/// A fully validated create payload
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: i64,
    pub quantity: i64,
    pub category: ProductCategory,
}

/// A validated partial update; `None` leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub quantity: Option<i64>,
    pub category: Option<ProductCategory>,
}

/// Product as returned by the API, with the read-time `isLowStock` flag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub quantity: i64,
    pub category: ProductCategory,
    pub in_stock: bool,
    /// `0 < quantity < 10`
    pub is_low_stock: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        let is_low_stock = product.is_low_stock();
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            quantity: product.quantity,
            category: product.category,
            in_stock: product.in_stock,
            is_low_stock,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

/// Body of `POST /{id}/reduce-stock`
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct StockReduction {
    #[validate(range(min = 1, message = "Amount must be at least 1"))]
    #[schema(minimum = 1, example = 3)]
    pub amount: i64,
}

/// Parse a path segment into a product id
pub fn parse_product_id(raw: &str) -> ProductResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ProductError::MalformedId(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn new_product(quantity: i64) -> NewProduct {
        NewProduct {
            name: "Pen".to_string(),
            description: "A blue ink pen".to_string(),
            price: 2,
            quantity,
            category: ProductCategory::Other,
        }
    }

    #[test]
    fn test_category_round_trips_lowercase() {
        assert_eq!(ProductCategory::from_str("books").unwrap(), ProductCategory::Books);
        assert_eq!(ProductCategory::Home.to_string(), "home");
        assert!(ProductCategory::from_str("Books").is_err());
        assert!(ProductCategory::from_str("toys").is_err());
        assert_eq!(
            serde_json::to_value(ProductCategory::Electronics).unwrap(),
            "electronics"
        );
    }

    #[test]
    fn test_allowed_values_lists_every_category() {
        assert_eq!(
            ProductCategory::allowed_values(),
            "electronics, clothing, books, home, sports, other"
        );
    }

    #[test]
    fn test_new_derives_in_stock() {
        assert!(!Product::new(new_product(0)).in_stock);
        assert!(Product::new(new_product(3)).in_stock);
    }

    #[test]
    fn test_new_assigns_distinct_ids() {
        let a = Product::new(new_product(1));
        let b = Product::new(new_product(1));
        assert_ne!(a.id, b.id);
        assert_eq!(a.created_at, a.updated_at);
    }

    #[test]
    fn test_apply_changes_recomputes_in_stock() {
        let mut product = Product::new(new_product(5));
        let created = product.created_at;

        product.apply_changes(ProductChanges {
            quantity: Some(0),
            ..Default::default()
        });
        assert_eq!(product.quantity, 0);
        assert!(!product.in_stock);
        assert_eq!(product.created_at, created);

        product.apply_changes(ProductChanges {
            name: Some("Marker".to_string()),
            quantity: Some(12),
            ..Default::default()
        });
        assert_eq!(product.name, "Marker");
        assert!(product.in_stock);
        assert_eq!(product.price, 2);
    }

    #[test]
    fn test_reduce_stock_to_zero_clears_in_stock() {
        let mut product = Product::new(new_product(4));
        product.reduce_stock(4).unwrap();
        assert_eq!(product.quantity, 0);
        assert!(!product.in_stock);
    }

    #[test]
    fn test_reduce_stock_insufficient_leaves_product_untouched() {
        let mut product = Product::new(new_product(2));
        let before = product.clone();

        let err = product.reduce_stock(3).unwrap_err();
        assert!(matches!(
            err,
            ProductError::InsufficientStock {
                available: 2,
                requested: 3
            }
        ));
        assert_eq!(product, before);
    }

    #[test]
    fn test_view_computes_low_stock() {
        let view = ProductView::from(Product::new(new_product(5)));
        assert!(view.in_stock);
        assert!(view.is_low_stock);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["isLowStock"], true);
        assert_eq!(json["inStock"], true);
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_input_ignores_in_stock_and_treats_null_as_absent() {
        let input: ProductInput = serde_json::from_value(serde_json::json!({
            "name": "Pen",
            "quantity": null,
            "inStock": true,
            "id": "whatever"
        }))
        .unwrap();

        assert_eq!(input.name, Some(Value::from("Pen")));
        assert!(input.quantity.is_none());
        assert!(input.price.is_none());
    }

    #[test]
    fn test_stock_reduction_rejects_zero() {
        assert!(StockReduction { amount: 0 }.validate().is_err());
        assert!(StockReduction { amount: 1 }.validate().is_ok());
    }

    #[test]
    fn test_parse_product_id() {
        let id = Uuid::now_v7();
        assert_eq!(parse_product_id(&id.to_string()).unwrap(), id);
        assert!(matches!(
            parse_product_id("not-an-id"),
            Err(ProductError::MalformedId(raw)) if raw == "not-an-id"
        ));
    }
}
