//! Product route handlers.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, patch},
};
use rust_decimal::Decimal;
use serde::Deserialize;

use cartwheel_core::ProductId;

use crate::error::Result;
use crate::extract::{ApiJson, ApiPath};
use crate::models::Product;
use crate::services::{NewProduct, ProductService};
use crate::state::AppState;

/// Build the product router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(list).post(create))
        .route("/products/{id}", get(show))
        .route("/products/{id}/stock", patch(restock))
}

/// Body for creating a product. `price` accepts a JSON number or a decimal string.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub stock_quantity: i32,
}

#[derive(Debug, Deserialize)]
pub struct RestockRequest {
    pub stock_quantity: i32,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    Ok(Json(ProductService::new(state.pool()).list().await?))
}

/// Add a product to the catalog.
pub async fn create(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>)> {
    let product = NewProduct::parse(&body.name, body.price, body.stock_quantity)?;
    let product = ProductService::new(state.pool()).create(product).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ProductId>,
) -> Result<Json<Product>> {
    Ok(Json(ProductService::new(state.pool()).get(id).await?))
}

/// Set a product's stock level.
pub async fn restock(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ProductId>,
    ApiJson(body): ApiJson<RestockRequest>,
) -> Result<Json<Product>> {
    Ok(Json(
        ProductService::new(state.pool())
            .restock(id, body.stock_quantity)
            .await?,
    ))
}
