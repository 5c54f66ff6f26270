//! Cart repository.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use cartwheel_core::{CartId, CartItemId, CartItemStatus, CustomerId, Price, ProductId, Quantity};

use super::RepositoryError;
use crate::models::{Cart, CartItemWithProduct, Product};

/// Internal row type for cart queries.
#[derive(Debug, sqlx::FromRow)]
struct CartRow {
    id: i32,
    customer_id: i32,
    created_at: DateTime<Utc>,
}

impl From<CartRow> for Cart {
    fn from(row: CartRow) -> Self {
        Self {
            id: CartId::new(row.id),
            customer_id: CustomerId::new(row.customer_id),
            created_at: row.created_at,
        }
    }
}

/// Internal row type for a cart line joined with its product.
#[derive(Debug, sqlx::FromRow)]
struct CartLineRow {
    id: i32,
    cart_id: i32,
    quantity: i32,
    status: CartItemStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    product_id: i32,
    product_name: String,
    product_price: Decimal,
    product_stock_quantity: i32,
    product_created_at: DateTime<Utc>,
}

impl TryFrom<CartLineRow> for CartItemWithProduct {
    type Error = RepositoryError;

    fn try_from(row: CartLineRow) -> Result<Self, Self::Error> {
        let quantity = Quantity::new(row.quantity).map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "cart item {} has non-positive quantity {}",
                row.id, row.quantity
            ))
        })?;
        let price = Price::new(row.product_price).map_err(|e| {
            RepositoryError::DataCorruption(format!(
                "invalid price for product {}: {e}",
                row.product_id
            ))
        })?;

        Ok(Self {
            id: CartItemId::new(row.id),
            cart_id: CartId::new(row.cart_id),
            product: Product {
                id: ProductId::new(row.product_id),
                name: row.product_name,
                price,
                stock_quantity: row.product_stock_quantity,
                created_at: row.product_created_at,
            },
            quantity,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for cart database operations.
///
/// Carts are created with their customer (see `CustomerRepository::create`),
/// never on their own.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all carts.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Cart>, RepositoryError> {
        let rows = sqlx::query_as::<_, CartRow>(
            "SELECT id, customer_id, created_at FROM cart ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a cart by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: CartId) -> Result<Option<Cart>, RepositoryError> {
        let row = sqlx::query_as::<_, CartRow>(
            "SELECT id, customer_id, created_at FROM cart WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Lines of a cart in the given status, with their products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a row is invalid.
    pub async fn items_with_products(
        &self,
        cart_id: CartId,
        status: CartItemStatus,
    ) -> Result<Vec<CartItemWithProduct>, RepositoryError> {
        let rows = sqlx::query_as::<_, CartLineRow>(
            r"
            SELECT ci.id, ci.cart_id, ci.quantity, ci.status,
                   ci.created_at, ci.updated_at,
                   p.id AS product_id,
                   p.name AS product_name,
                   p.price AS product_price,
                   p.stock_quantity AS product_stock_quantity,
                   p.created_at AS product_created_at
            FROM cart_item ci
            JOIN product p ON p.id = ci.product_id
            WHERE ci.cart_id = $1 AND ci.status = $2
            ORDER BY ci.id
            ",
        )
        .bind(cart_id)
        .bind(status)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}

/// Read a cart inside a transaction.
pub(crate) async fn find_in_tx(
    conn: &mut PgConnection,
    id: CartId,
) -> Result<Option<Cart>, RepositoryError> {
    let row =
        sqlx::query_as::<_, CartRow>("SELECT id, customer_id, created_at FROM cart WHERE id = $1")
            .bind(id)
            .fetch_optional(conn)
            .await?;

    Ok(row.map(Into::into))
}
