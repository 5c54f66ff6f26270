//! Customer route handlers.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde::Deserialize;

use cartwheel_core::CustomerId;

use crate::error::Result;
use crate::extract::{ApiJson, ApiPath};
use crate::models::CustomerWithCart;
use crate::services::CustomerService;
use crate::state::AppState;

/// Build the customer router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/customers", get(list).post(create))
        .route("/customers/{id}", get(show).patch(rename).delete(remove))
}

/// Body for creating or renaming a customer.
#[derive(Debug, Deserialize)]
pub struct CustomerRequest {
    pub name: String,
}

/// List all customers with their cart IDs.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<CustomerWithCart>>> {
    Ok(Json(CustomerService::new(state.pool()).list().await?))
}

/// Create a customer; their cart is created with them.
pub async fn create(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CustomerRequest>,
) -> Result<(StatusCode, Json<CustomerWithCart>)> {
    let customer = CustomerService::new(state.pool())
        .create(&body.name)
        .await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

pub async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<CustomerId>,
) -> Result<Json<CustomerWithCart>> {
    Ok(Json(CustomerService::new(state.pool()).get(id).await?))
}

pub async fn rename(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<CustomerId>,
    ApiJson(body): ApiJson<CustomerRequest>,
) -> Result<Json<CustomerWithCart>> {
    Ok(Json(
        CustomerService::new(state.pool())
            .rename(id, &body.name)
            .await?,
    ))
}

/// Delete a customer along with their cart.
pub async fn remove(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<CustomerId>,
) -> Result<StatusCode> {
    CustomerService::new(state.pool()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
