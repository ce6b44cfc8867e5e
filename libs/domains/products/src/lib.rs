//! Products Domain
//!
//! Catalog entries with a stock count. `inStock` is always derived from
//! `quantity`, never accepted from callers.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, response envelopes
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Validation, listing criteria, NotFound
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Trait + in-memory and MongoDB implementations
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, payloads, stock rules
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_products::{handlers, InMemoryProductRepository, ProductService};
//!
//! let service = ProductService::new(InMemoryProductRepository::new());
//! let router: axum::Router = handlers::router(service);
//! ```

pub mod error;
pub mod filter;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;
pub mod stock;
pub mod validation;

pub use error::{ProductError, ProductResult};
pub use filter::{Pagination, ProductFilter, ProductQuery};
pub use handlers::ApiDoc;
pub use models::{
    NewProduct, Product, ProductCategory, ProductChanges, ProductInput, ProductView,
    StockReduction,
};
pub use mongodb::MongoProductRepository;
pub use repository::{InMemoryProductRepository, ProductRepository};
pub use service::{ProductPage, ProductService};
