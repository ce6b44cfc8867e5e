//! Integration tests for the MongoDB product repository
//!
//! These tests run against a real MongoDB via testcontainers and check:
//! - Documents round-trip through the stored shape
//! - Filters, sort order and pagination are applied server-side
//! - Pipeline updates keep `inStock` derived from `quantity`
//! - Guarded stock reductions never oversell
//!
//! Run with `cargo test -p domain_products -- --ignored` (requires Docker).

use domain_products::*;
use std::sync::Arc;
use test_utils::{assertions::*, TestDataBuilder, TestMongo};
use uuid::Uuid;

async fn repository(mongo: &TestMongo, builder: &TestDataBuilder) -> MongoProductRepository {
    let repo = MongoProductRepository::new(&mongo.database(&builder.database_name()));
    repo.init_indexes().await.unwrap();
    repo
}

fn new_product(name: String, category: ProductCategory, price: i64, quantity: i64) -> NewProduct {
    NewProduct {
        name,
        description: "Stored by the integration suite".to_string(),
        price,
        quantity,
        category,
    }
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_create_and_get_product() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("mongo_create_and_get");
    let repo = repository(&mongo, &builder).await;

    let created = repo
        .create(new_product(builder.name("product", "main"), ProductCategory::Books, 12, 0))
        .await
        .unwrap();
    assert!(!created.in_stock);

    let retrieved = assert_some(repo.get_by_id(created.id).await.unwrap(), "product should exist");
    assert_uuid_eq(retrieved.id, created.id, "retrieved product id");
    assert_eq!(retrieved, created);

    assert!(repo.get_by_id(Uuid::now_v7()).await.unwrap().is_none());
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_list_filters_sorts_and_counts() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("mongo_list");
    let repo = repository(&mongo, &builder).await;

    repo.create(new_product("Cheap book".into(), ProductCategory::Books, 9, 1))
        .await
        .unwrap();
    let dear = repo
        .create(new_product("Dear book".into(), ProductCategory::Books, 15, 1))
        .await
        .unwrap();
    repo.create(new_product("Lamp".into(), ProductCategory::Home, 15, 0))
        .await
        .unwrap();

    let filter = ProductFilter {
        category: Some("books".to_string()),
        min_price: Some(10.0),
        ..Default::default()
    };
    let page = repo.list(filter.clone(), Some(Pagination::default())).await.unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id, dear.id);
    assert_eq!(repo.count(filter).await.unwrap(), 1);

    let in_stock = ProductFilter {
        in_stock: Some(true),
        ..Default::default()
    };
    assert_eq!(repo.count(in_stock).await.unwrap(), 2);

    let newest = repo
        .list(ProductFilter::default(), Some(Pagination { limit: 1, skip: 0 }))
        .await
        .unwrap();
    assert_eq!(newest[0].name, "Lamp");
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_low_stock_query_is_inclusive_of_ten() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("mongo_low_stock");
    let repo = repository(&mongo, &builder).await;

    for quantity in [0, 5, 10, 11] {
        repo.create(new_product(
            builder.name("product", &quantity.to_string()),
            ProductCategory::Electronics,
            50,
            quantity,
        ))
        .await
        .unwrap();
    }

    let low = repo.list(ProductFilter::low_stock(), None).await.unwrap();
    let mut quantities: Vec<i64> = low.iter().map(|p| p.quantity).collect();
    quantities.sort();
    assert_eq!(quantities, vec![5, 10]);
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_update_derives_in_stock_and_stores_literals() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("mongo_update");
    let repo = repository(&mongo, &builder).await;

    let created = repo
        .create(new_product("Desk".into(), ProductCategory::Home, 120, 0))
        .await
        .unwrap();

    let updated = repo
        .update(
            created.id,
            ProductChanges {
                name: Some("$price".to_string()),
                quantity: Some(4),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "$price");
    assert_eq!(updated.quantity, 4);
    assert!(updated.in_stock);
    assert_eq!(updated.price, 120);
    assert_eq!(updated.created_at, created.created_at);

    let missing = repo.update(Uuid::now_v7(), ProductChanges::default()).await;
    assert!(matches!(missing, Err(ProductError::NotFound(_))));
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_delete_product() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("mongo_delete");
    let repo = repository(&mongo, &builder).await;

    let created = repo
        .create(new_product("Chair".into(), ProductCategory::Home, 40, 2))
        .await
        .unwrap();

    assert!(repo.delete(created.id).await.unwrap());
    assert!(!repo.delete(created.id).await.unwrap());
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_reduce_stock_outcomes() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("mongo_reduce");
    let repo = repository(&mongo, &builder).await;

    let created = repo
        .create(new_product("Mug".into(), ProductCategory::Home, 8, 2))
        .await
        .unwrap();

    let refused = repo.reduce_stock(created.id, 3).await.unwrap_err();
    assert!(matches!(
        refused,
        ProductError::InsufficientStock {
            available: 2,
            requested: 3
        }
    ));

    let reduced = repo.reduce_stock(created.id, 2).await.unwrap();
    assert_eq!(reduced.quantity, 0);
    assert!(!reduced.in_stock);

    let missing = repo.reduce_stock(Uuid::now_v7(), 1).await;
    assert!(matches!(missing, Err(ProductError::NotFound(_))));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore] // Requires Docker
async fn test_concurrent_reductions_never_oversell() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("mongo_concurrent_reduce");
    let repo = Arc::new(repository(&mongo, &builder).await);

    let created = repo
        .create(new_product("Limited print".into(), ProductCategory::Books, 60, 5))
        .await
        .unwrap();

    let handles: Vec<_> = (0..5)
        .map(|_| {
            let repo = Arc::clone(&repo);
            tokio::spawn(async move { repo.reduce_stock(created.id, 2).await })
        })
        .collect();

    let mut succeeded = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            succeeded += 1;
        }
    }

    assert_eq!(succeeded, 2);
    let remaining = repo.get_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(remaining.quantity, 1);
    assert!(remaining.in_stock);
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_ping() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("mongo_ping");
    let repo = repository(&mongo, &builder).await;

    assert!(repo.ping().await.is_ok());
}
