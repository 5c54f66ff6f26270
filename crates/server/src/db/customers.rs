//! Customer repository.
//!
//! A customer and its cart are always created together, in one transaction,
//! so every customer row has exactly one cart row.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use cartwheel_core::{CartId, CustomerId};

use super::{RepositoryError, map_constraint_error};
use crate::models::{Customer, CustomerWithCart};

/// Internal row type for customer queries (joined with the cart).
#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: i32,
    name: String,
    created_at: DateTime<Utc>,
    cart_id: i32,
}

impl From<CustomerRow> for CustomerWithCart {
    fn from(row: CustomerRow) -> Self {
        Self {
            customer: Customer {
                id: CustomerId::new(row.id),
                name: row.name,
                created_at: row.created_at,
            },
            cart_id: CartId::new(row.cart_id),
        }
    }
}

/// Repository for customer database operations.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a customer and its cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name violates a constraint.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip(self))]
    pub async fn create(&self, name: &str) -> Result<CustomerWithCart, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let (id, name, created_at) = sqlx::query_as::<_, (i32, String, DateTime<Utc>)>(
            r"
            INSERT INTO customer (name)
            VALUES ($1)
            RETURNING id, name, created_at
            ",
        )
        .bind(name)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_constraint_error(e, "invalid customer name"))?;

        let cart_id = sqlx::query_scalar::<_, i32>(
            r"
            INSERT INTO cart (customer_id)
            VALUES ($1)
            RETURNING id
            ",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(CustomerRow {
            id,
            name,
            created_at,
            cart_id,
        }
        .into())
    }

    /// List all customers, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<CustomerWithCart>, RepositoryError> {
        let rows = sqlx::query_as::<_, CustomerRow>(
            r"
            SELECT cu.id, cu.name, cu.created_at, ca.id AS cart_id
            FROM customer cu
            JOIN cart ca ON ca.customer_id = cu.id
            ORDER BY cu.id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a customer by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: CustomerId) -> Result<Option<CustomerWithCart>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r"
            SELECT cu.id, cu.name, cu.created_at, ca.id AS cart_id
            FROM customer cu
            JOIN cart ca ON ca.customer_id = cu.id
            WHERE cu.id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Change a customer's name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the customer does not exist.
    /// Returns `RepositoryError::Conflict` if the name violates a constraint.
    #[instrument(skip(self))]
    pub async fn rename(
        &self,
        id: CustomerId,
        name: &str,
    ) -> Result<CustomerWithCart, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r"
            WITH updated AS (
                UPDATE customer SET name = $2
                WHERE id = $1
                RETURNING id, name, created_at
            )
            SELECT u.id, u.name, u.created_at, ca.id AS cart_id
            FROM updated u
            JOIN cart ca ON ca.customer_id = u.id
            ",
        )
        .bind(id)
        .bind(name)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| map_constraint_error(e, "invalid customer name"))?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    /// Delete a customer. Their cart and cart items go with them.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the customer does not exist.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: CustomerId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM customer WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
