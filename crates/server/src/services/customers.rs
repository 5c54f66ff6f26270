//! Customer management.
//!
//! Creating a customer also provisions their cart; see
//! [`CustomerRepository::create`].

use sqlx::PgPool;
use tracing::{info, instrument};

use cartwheel_core::CustomerId;

use crate::db::{CustomerRepository, RepositoryError};
use crate::error::AppError;
use crate::models::CustomerWithCart;
use crate::models::customer::MAX_CUSTOMER_NAME_LEN;

const CUSTOMER_NOT_FOUND: &str = "Customer not found.";

/// Trim a customer name and check it is non-empty and short enough.
///
/// # Errors
///
/// Returns `AppError::Validation` describing the problem.
pub fn validate_name(name: &str) -> Result<&str, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Name must not be empty.".to_string()));
    }
    if name.chars().count() > MAX_CUSTOMER_NAME_LEN {
        return Err(AppError::Validation(format!(
            "Name must be at most {MAX_CUSTOMER_NAME_LEN} characters."
        )));
    }
    Ok(name)
}

/// Customer service.
pub struct CustomerService<'a> {
    repo: CustomerRepository<'a>,
}

impl<'a> CustomerService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            repo: CustomerRepository::new(pool),
        }
    }

    /// Create a customer and their cart.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for a bad name, or a database error.
    #[instrument(skip(self))]
    pub async fn create(&self, name: &str) -> Result<CustomerWithCart, AppError> {
        let name = validate_name(name)?;
        let customer = self.repo.create(name).await?;

        info!(
            customer_id = %customer.customer.id,
            cart_id = %customer.cart_id,
            "Customer created"
        );
        Ok(customer)
    }

    /// List all customers.
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails.
    pub async fn list(&self) -> Result<Vec<CustomerWithCart>, AppError> {
        Ok(self.repo.list().await?)
    }

    /// Get one customer.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the customer does not exist.
    pub async fn get(&self, id: CustomerId) -> Result<CustomerWithCart, AppError> {
        self.repo
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(CUSTOMER_NOT_FOUND.to_string()))
    }

    /// Change a customer's name.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for a bad name or `AppError::NotFound`
    /// if the customer does not exist.
    #[instrument(skip(self))]
    pub async fn rename(&self, id: CustomerId, name: &str) -> Result<CustomerWithCart, AppError> {
        let name = validate_name(name)?;
        let customer = self.repo.rename(id, name).await.map_err(not_found)?;

        info!(customer_id = %id, "Customer renamed");
        Ok(customer)
    }

    /// Delete a customer with their cart and cart items.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the customer does not exist.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: CustomerId) -> Result<(), AppError> {
        self.repo.delete(id).await.map_err(not_found)?;

        info!(customer_id = %id, "Customer deleted");
        Ok(())
    }
}

fn not_found(err: RepositoryError) -> AppError {
    match err {
        RepositoryError::NotFound => AppError::NotFound(CUSTOMER_NOT_FOUND.to_string()),
        other => other.into(),
    }
}
