//! HTTP handlers for Products API

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestIdResponse, BadRequestValidationResponse, ErrorEnvelope,
        InternalServerErrorResponse, NotFoundResponse,
    },
    AppError, Envelope, PageInfo, ValidatedJson,
};
use std::sync::Arc;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::error::ProductError;
use crate::filter::ProductQuery;
use crate::models::{
    parse_product_id, Product, ProductCategory, ProductInput, ProductView, StockReduction,
};
use crate::repository::ProductRepository;
use crate::service::ProductService;

pub const PRODUCT_CREATED: &str = "Product created successfully";
pub const PRODUCT_UPDATED: &str = "Product updated successfully";
pub const PRODUCT_DELETED: &str = "Product deleted successfully";
pub const STOCK_REDUCED: &str = "Stock reduced successfully";

/// OpenAPI documentation for Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        get_product,
        update_product,
        delete_product,
        get_low_stock,
        get_by_category,
        reduce_stock,
    ),
    components(
        schemas(
            ProductView, ProductInput, ProductCategory, StockReduction,
            PageInfo, ErrorEnvelope
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Products", description = "Product catalog and stock endpoints")
    )
)]
pub struct ApiDoc;

/// Create the products router with all HTTP endpoints
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/low-stock", get(get_low_stock))
        .route("/category/{category}", get(get_by_category))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/{id}/reduce-stock", post(reduce_stock))
        .with_state(shared_service)
}

fn product_id(raw: &str) -> Result<Uuid, AppError> {
    parse_product_id(raw).map_err(AppError::from)
}

fn views(products: Vec<Product>) -> Vec<ProductView> {
    products.into_iter().map(ProductView::from).collect()
}

/// List products with optional filters
///
/// Unparsable filter values are ignored rather than rejected.
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    params(ProductQuery),
    responses(
        (status = 200, description = "One page of matching products", body = Envelope<Vec<ProductView>>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(pairs) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let query = ProductQuery::from_pairs(pairs);

    let page = service
        .find_products(&query)
        .await
        .map_err(|e| e.into_app_error("Failed to fetch products"))?;

    Ok(Envelope::page(
        views(page.items),
        page.total,
        page.pagination.into(),
    ))
}

/// Create a new product
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body = ProductInput,
    responses(
        (status = 201, description = "Product created successfully", body = Envelope<ProductView>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(input) = payload?;

    let product = service
        .create_product(input)
        .await
        .map_err(|e| e.into_app_error("Failed to create product"))?;

    Ok((
        StatusCode::CREATED,
        Envelope::ok(ProductView::from(product)).with_message(PRODUCT_CREATED),
    ))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = Envelope<ProductView>),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = product_id(&id)?;

    let product = service
        .get_product(id)
        .await
        .map_err(|e| e.into_app_error("Failed to fetch product"))?;

    Ok(Envelope::ok(ProductView::from(product)))
}

/// Update a product
///
/// Only the fields present in the body change; `inStock` is always derived
/// from the resulting quantity.
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = ProductInput,
    responses(
        (status = 200, description = "Product updated successfully", body = Envelope<ProductView>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(id): Path<String>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = product_id(&id)?;
    let Json(input) = payload?;

    let product = service
        .update_product(id, input)
        .await
        .map_err(|e| e.into_app_error("Failed to update product"))?;

    Ok(Envelope::ok(ProductView::from(product)).with_message(PRODUCT_UPDATED))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product deleted successfully"),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = product_id(&id)?;

    service
        .delete_product(id)
        .await
        .map_err(|e| e.into_app_error("Failed to delete product"))?;

    Ok(Envelope::acknowledged(PRODUCT_DELETED))
}

/// Products running low (`0 < quantity <= 10`)
#[utoipa::path(
    get,
    path = "/low-stock",
    tag = "Products",
    responses(
        (status = 200, description = "Low stock products, newest first", body = Envelope<Vec<ProductView>>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_low_stock<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
) -> Result<impl IntoResponse, AppError> {
    let products = service
        .low_stock_products()
        .await
        .map_err(|e| e.into_app_error("Failed to fetch low stock products"))?;

    Ok(Envelope::collection(views(products)))
}

/// In-stock products of a category
#[utoipa::path(
    get,
    path = "/category/{category}",
    tag = "Products",
    params(
        ("category" = String, Path, description = "Category, matched exactly")
    ),
    responses(
        (status = 200, description = "In-stock products of the category", body = Envelope<Vec<ProductView>>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_by_category<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(category): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let products = service
        .products_by_category(&category)
        .await
        .map_err(|e| e.into_app_error("Failed to fetch products by category"))?;

    Ok(Envelope::collection(views(products)))
}

/// Take units out of stock
#[utoipa::path(
    post,
    path = "/{id}/reduce-stock",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = StockReduction,
    responses(
        (status = 200, description = "Stock reduced", body = Envelope<ProductView>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn reduce_stock<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<StockReduction>,
) -> Result<impl IntoResponse, AppError> {
    let id = product_id(&id)?;

    let product = service
        .reduce_stock(id, body.amount)
        .await
        .map_err(|e| {
            if let ProductError::InsufficientStock {
                available,
                requested,
            } = &e
            {
                tracing::warn!(product_id = %id, available, requested, "Stock reduction refused");
            }
            e.into_app_error("Failed to reduce stock")
        })?;

    Ok(Envelope::ok(ProductView::from(product)).with_message(STOCK_REDUCED))
}
