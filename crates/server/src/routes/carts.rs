//! Cart and cart item route handlers.
//!
//! Item operations take their IDs in the JSON body. `cart`, `product` and
//! `cart_item` are accepted as aliases for the `*_id` fields.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;

use cartwheel_core::{CartId, CartItemId, ProductId};

use crate::error::Result;
use crate::extract::{ApiJson, ApiPath};
use crate::models::{Cart, CartDetails, CartItem, CheckoutSummary};
use crate::services::CartService;
use crate::state::AppState;

/// Build the cart router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/carts", get(list))
        .route("/carts/{id}", get(show))
        .route("/carts/details", post(details))
        .route("/carts/add-item", post(add_item))
        .route("/carts/remove-item", post(remove_item))
        .route("/carts/update-item-quantity", post(update_item_quantity))
        .route("/carts/checkout", post(checkout))
}

#[derive(Debug, Deserialize)]
pub struct CartRequest {
    #[serde(alias = "cart")]
    pub cart_id: CartId,
}

/// A missing `quantity` is treated as 0 and rejected by validation.
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    #[serde(alias = "cart")]
    pub cart_id: CartId,
    #[serde(alias = "product")]
    pub product_id: ProductId,
    #[serde(default)]
    pub quantity: i32,
}

#[derive(Debug, Deserialize)]
pub struct RemoveItemRequest {
    #[serde(alias = "cart_item")]
    pub cart_item_id: CartItemId,
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    #[serde(alias = "cart_item")]
    pub cart_item_id: CartItemId,
    #[serde(default)]
    pub quantity: i32,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Cart>>> {
    Ok(Json(CartService::new(state.pool()).list().await?))
}

/// Cart details by path ID.
pub async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<CartId>,
) -> Result<Json<CartDetails>> {
    Ok(Json(CartService::new(state.pool()).details(id).await?))
}

/// Cart details by body ID.
pub async fn details(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CartRequest>,
) -> Result<Json<CartDetails>> {
    Ok(Json(
        CartService::new(state.pool()).details(body.cart_id).await?,
    ))
}

/// Add a product to a cart.
///
/// Responds 201 when a new line was created and 200 when an existing
/// line (including a removed one) was reused.
pub async fn add_item(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<AddItemRequest>,
) -> Result<(StatusCode, Json<CartItem>)> {
    let outcome = CartService::new(state.pool())
        .add(body.cart_id, body.product_id, body.quantity)
        .await?;

    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(outcome.item)))
}

pub async fn remove_item(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RemoveItemRequest>,
) -> Result<Json<CartItem>> {
    Ok(Json(
        CartService::new(state.pool())
            .remove(body.cart_item_id)
            .await?,
    ))
}

pub async fn update_item_quantity(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<UpdateQuantityRequest>,
) -> Result<Json<CartItem>> {
    Ok(Json(
        CartService::new(state.pool())
            .update_quantity(body.cart_item_id, body.quantity)
            .await?,
    ))
}

/// Check out every added item in a cart.
pub async fn checkout(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CartRequest>,
) -> Result<Json<CheckoutSummary>> {
    let summary = CartService::new(state.pool()).checkout(body.cart_id).await?;
    Ok(Json(summary))
}
