//! Query criteria for product listings.
//!
//! [`ProductQuery`] is the raw query string; [`ProductFilter::from_query`] and
//! [`Pagination::from_query`] hold all coercion policy. Anything that does not
//! parse is treated as if it had not been sent, and a repeated key keeps its
//! first value.

use axum_helpers::PageInfo;
use utoipa::IntoParams;

use crate::models::Product;
use crate::stock::LOW_STOCK_QUERY_THRESHOLD;

pub const DEFAULT_LIMIT: u64 = 10;

/// Raw listing parameters, all optional strings
#[derive(Debug, Clone, Default, PartialEq, IntoParams)]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct ProductQuery {
    /// Exact category match; unknown categories match nothing
    pub category: Option<String>,
    /// Inclusive lower price bound
    pub min_price: Option<String>,
    /// Inclusive upper price bound
    pub max_price: Option<String>,
    /// `true` or `false`; other values are ignored
    pub in_stock: Option<String>,
    /// Page size, default 10
    pub limit: Option<String>,
    /// Items to skip, default 0
    pub skip: Option<String>,
}

impl ProductQuery {
    /// Build from decoded `key=value` pairs; unknown keys are dropped
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "category" => &mut query.category,
                "minPrice" => &mut query.min_price,
                "maxPrice" => &mut query.max_price,
                "inStock" => &mut query.in_stock,
                "limit" => &mut query.limit,
                "skip" => &mut query.skip,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        query
    }
}

/// Storage-independent predicate over products; `None` fields impose no constraint
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub in_stock: Option<bool>,
    /// Exclusive lower quantity bound
    pub quantity_above: Option<i64>,
    /// Inclusive upper quantity bound
    pub quantity_at_most: Option<i64>,
}

impl ProductFilter {
    pub fn from_query(query: &ProductQuery) -> Self {
        Self {
            category: query.category.clone().filter(|c| !c.is_empty()),
            min_price: query.min_price.as_deref().and_then(parse_number),
            max_price: query.max_price.as_deref().and_then(parse_number),
            in_stock: query.in_stock.as_deref().and_then(parse_flag),
            ..Self::default()
        }
    }

    /// In-stock products of one category
    pub fn by_category_in_stock(category: &str) -> Self {
        Self {
            category: Some(category.to_string()),
            in_stock: Some(true),
            ..Self::default()
        }
    }

    /// `0 < quantity <= 10`
    pub fn low_stock() -> Self {
        Self {
            quantity_above: Some(0),
            quantity_at_most: Some(LOW_STOCK_QUERY_THRESHOLD),
            ..Self::default()
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        let price = product.price as f64;

        self.category
            .as_deref()
            .is_none_or(|c| product.category.as_ref() == c)
            && self.min_price.is_none_or(|min| price >= min)
            && self.max_price.is_none_or(|max| price <= max)
            && self.in_stock.is_none_or(|flag| product.in_stock == flag)
            && self.quantity_above.is_none_or(|q| product.quantity > q)
            && self.quantity_at_most.is_none_or(|q| product.quantity <= q)
    }
}

/// Offset pagination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: u64,
    pub skip: u64,
}

impl Pagination {
    /// `limit` must be a positive integer and `skip` a non-negative one, else the defaults apply
    pub fn from_query(query: &ProductQuery) -> Self {
        Self {
            limit: query
                .limit
                .as_deref()
                .and_then(|raw| raw.trim().parse::<u64>().ok())
                .filter(|limit| *limit > 0)
                .unwrap_or(DEFAULT_LIMIT),
            skip: query
                .skip
                .as_deref()
                .and_then(|raw| raw.trim().parse::<u64>().ok())
                .unwrap_or(0),
        }
    }

    pub fn apply<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        items
            .into_iter()
            .skip(usize::try_from(self.skip).unwrap_or(usize::MAX))
            .take(usize::try_from(self.limit).unwrap_or(usize::MAX))
            .collect()
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            skip: 0,
        }
    }
}

impl From<Pagination> for PageInfo {
    fn from(p: Pagination) -> Self {
        PageInfo {
            limit: p.limit,
            skip: p.skip,
        }
    }
}

/// Newest first; ties broken by descending id
pub fn sort_newest_first(products: &mut [Product]) {
    products.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}
