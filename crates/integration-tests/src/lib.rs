//! Integration tests for Cartwheel.
//!
//! # Running Tests
//!
//! Every test here is `#[ignore]`d because it needs external services.
//!
//! ```bash
//! # Service-level tests against a scratch database (migrations are applied)
//! CARTWHEEL_TEST_DATABASE_URL=postgres://localhost/cartwheel_test \
//!     cargo test -p cartwheel-integration-tests --test cart_lifecycle -- --ignored
//!
//! # HTTP tests against a running server
//! CARTWHEEL_BASE_URL=http://localhost:3000 \
//!     cargo test -p cartwheel-integration-tests --test http_api -- --ignored
//! ```

use rust_decimal::Decimal;
use secrecy::SecretString;
use sqlx::PgPool;
use uuid::Uuid;

use cartwheel_server::db::{self, MIGRATOR};
use cartwheel_server::error::AppError;
use cartwheel_server::models::{CustomerWithCart, Product};
use cartwheel_server::services::{CustomerService, NewProduct, ProductService};

/// Connect to the test database and apply migrations.
///
/// # Errors
///
/// Returns an error if `CARTWHEEL_TEST_DATABASE_URL` is unset, the database
/// is unreachable or a migration fails.
pub async fn test_pool() -> Result<PgPool, Box<dyn std::error::Error>> {
    let url = std::env::var("CARTWHEEL_TEST_DATABASE_URL")
        .map_err(|_| "CARTWHEEL_TEST_DATABASE_URL not set")?;

    let pool = db::create_pool(&SecretString::from(url), 5).await?;
    MIGRATOR.run(&pool).await?;
    Ok(pool)
}

/// Base URL of a running server.
#[must_use]
pub fn base_url() -> String {
    std::env::var("CARTWHEEL_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// A name that will not collide with other test runs.
#[must_use]
pub fn unique_name(prefix: &str) -> String {
    format!("{prefix} {}", Uuid::new_v4().simple())
}

/// Create a customer (and cart) with a unique name.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub async fn create_customer(pool: &PgPool) -> Result<CustomerWithCart, AppError> {
    CustomerService::new(pool)
        .create(&unique_name("Customer"))
        .await
}

/// Create a product with a unique name, the given price in cents and stock.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub async fn create_product(pool: &PgPool, cents: i64, stock: i32) -> Result<Product, AppError> {
    let product = NewProduct::parse(&unique_name("Product"), Decimal::new(cents, 2), stock)?;
    ProductService::new(pool).create(product).await
}
