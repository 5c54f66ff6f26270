//! Product repository.
//!
//! `stock_quantity` is only written by [`ProductRepository::set_stock`]
//! (explicit restock) and [`decrement_stock`] (checkout).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use tracing::instrument;

use cartwheel_core::{Price, ProductId};

use super::{RepositoryError, map_constraint_error};
use crate::models::Product;

/// Internal row type for product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    price: Decimal,
    stock_quantity: i32,
    created_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let price = Price::new(row.price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid price for product {}: {e}", row.id))
        })?;

        Ok(Self {
            id: ProductId::new(row.id),
            name: row.name,
            price,
            stock_quantity: row.stock_quantity,
            created_at: row.created_at,
        })
    }
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a column constraint is violated.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip(self))]
    pub async fn create(
        &self,
        name: &str,
        price: Price,
        stock_quantity: i32,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            INSERT INTO product (name, price, stock_quantity)
            VALUES ($1, $2, $3)
            RETURNING id, name, price, stock_quantity, created_at
            ",
        )
        .bind(name)
        .bind(price)
        .bind(stock_quantity)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_constraint_error(e, "invalid product"))?;

        row.try_into()
    }

    /// List all products, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored price is invalid.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, price, stock_quantity, created_at
            FROM product
            ORDER BY id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, price, stock_quantity, created_at
            FROM product
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Set a product's stock to an absolute value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    /// Returns `RepositoryError::Conflict` if the stock is negative.
    #[instrument(skip(self))]
    pub async fn set_stock(
        &self,
        id: ProductId,
        stock_quantity: i32,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            UPDATE product SET stock_quantity = $2
            WHERE id = $1
            RETURNING id, name, price, stock_quantity, created_at
            ",
        )
        .bind(id)
        .bind(stock_quantity)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| map_constraint_error(e, "stock quantity must not be negative"))?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }
}

/// Read a product inside a transaction.
pub(crate) async fn find_in_tx(
    conn: &mut PgConnection,
    id: ProductId,
) -> Result<Option<Product>, RepositoryError> {
    let row = sqlx::query_as::<_, ProductRow>(
        "SELECT id, name, price, stock_quantity, created_at FROM product WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;

    row.map(TryInto::try_into).transpose()
}

/// Subtract `quantity` from a product's stock.
///
/// Returns the new stock, or `None` if the product is missing or the stock
/// would go negative (nothing is written in that case).
pub(crate) async fn decrement_stock(
    conn: &mut PgConnection,
    id: ProductId,
    quantity: i32,
) -> Result<Option<i32>, RepositoryError> {
    let stock = sqlx::query_scalar::<_, i32>(
        r"
        UPDATE product SET stock_quantity = stock_quantity - $2
        WHERE id = $1 AND stock_quantity >= $2
        RETURNING stock_quantity
        ",
    )
    .bind(id)
    .bind(quantity)
    .fetch_optional(conn)
    .await?;

    Ok(stock)
}
