//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                       - Liveness
//! GET    /health/ready                 - Readiness (checks the database)
//!
//! # Customers
//! GET    /customers                    - List customers
//! POST   /customers                    - Create customer (and cart)
//! GET    /customers/{id}               - Customer with cart ID
//! PATCH  /customers/{id}               - Rename customer
//! DELETE /customers/{id}               - Delete customer
//!
//! # Products
//! GET    /products                     - List products
//! POST   /products                     - Create product
//! GET    /products/{id}                - Product detail
//! PATCH  /products/{id}/stock          - Set stock level
//!
//! # Carts
//! GET    /carts                        - List carts
//! GET    /carts/{id}                   - Cart details
//! POST   /carts/details                - Cart details
//! POST   /carts/add-item               - Add product to cart
//! POST   /carts/remove-item            - Remove cart item
//! POST   /carts/update-item-quantity   - Change cart item quantity
//! POST   /carts/checkout               - Check out cart
//! ```
//!
//! Unknown paths answer 404 and known paths with the wrong method answer
//! 405, both with the usual `{"error": ...}` body.

pub mod carts;
pub mod customers;
pub mod products;

use std::time::Duration;

use axum::{Router, extract::State, http::StatusCode, routing::get};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::error::AppError;
use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Build every API route.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(customers::router())
        .merge(products::router())
        .merge(carts::router())
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
}

/// Build the full application: routes, request tracing and Sentry.
pub fn app(state: AppState) -> Router {
    routes()
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

async fn not_found() -> AppError {
    AppError::NotFound("Not found.".to_string())
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// Liveness health check. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check.
///
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
