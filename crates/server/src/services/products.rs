//! Product catalog and stock.

use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{info, instrument};

use cartwheel_core::{Price, ProductId};

use crate::db::{ProductRepository, RepositoryError};
use crate::error::AppError;
use crate::models::Product;
use crate::models::product::MAX_PRODUCT_NAME_LEN;

const PRODUCT_NOT_FOUND: &str = "Product not found.";

/// A validated product ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub price: Price,
    pub stock_quantity: i32,
}

impl NewProduct {
    /// Validate raw product fields.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if the name is blank or too long, the
    /// price is negative or too large, or the stock is negative.
    pub fn parse(name: &str, price: Decimal, stock_quantity: i32) -> Result<Self, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Name must not be empty.".to_string()));
        }
        if name.chars().count() > MAX_PRODUCT_NAME_LEN {
            return Err(AppError::Validation(format!(
                "Name must be at most {MAX_PRODUCT_NAME_LEN} characters."
            )));
        }
        let price = Price::new(price).map_err(|e| AppError::Validation(e.to_string()))?;
        let stock_quantity = validate_stock(stock_quantity)?;

        Ok(Self {
            name: name.to_string(),
            price,
            stock_quantity,
        })
    }
}

/// Check a stock level is not negative.
///
/// # Errors
///
/// Returns `AppError::Validation` for negative values.
pub fn validate_stock(stock_quantity: i32) -> Result<i32, AppError> {
    if stock_quantity < 0 {
        return Err(AppError::Validation(
            "Stock quantity must not be negative.".to_string(),
        ));
    }
    Ok(stock_quantity)
}

/// Product service.
pub struct ProductService<'a> {
    repo: ProductRepository<'a>,
}

impl<'a> ProductService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            repo: ProductRepository::new(pool),
        }
    }

    /// Add a product to the catalog.
    ///
    /// # Errors
    ///
    /// Returns a database error if the insert fails.
    #[instrument(skip(self), fields(name = %product.name))]
    pub async fn create(&self, product: NewProduct) -> Result<Product, AppError> {
        let product = self
            .repo
            .create(&product.name, product.price, product.stock_quantity)
            .await?;

        info!(
            product_id = %product.id,
            price = %product.price,
            stock_quantity = product.stock_quantity,
            "Product created"
        );
        Ok(product)
    }

    /// List all products.
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails.
    pub async fn list(&self) -> Result<Vec<Product>, AppError> {
        Ok(self.repo.list().await?)
    }

    /// Get one product.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the product does not exist.
    pub async fn get(&self, id: ProductId) -> Result<Product, AppError> {
        self.repo
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(PRODUCT_NOT_FOUND.to_string()))
    }

    /// Set a product's stock to an absolute value.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for negative stock or
    /// `AppError::NotFound` if the product does not exist.
    #[instrument(skip(self))]
    pub async fn restock(&self, id: ProductId, stock_quantity: i32) -> Result<Product, AppError> {
        let stock_quantity = validate_stock(stock_quantity)?;
        let product = self
            .repo
            .set_stock(id, stock_quantity)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AppError::NotFound(PRODUCT_NOT_FOUND.to_string()),
                other => other.into(),
            })?;

        info!(product_id = %id, stock_quantity, "Product restocked");
        Ok(product)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_product() {
        let product = NewProduct::parse(" Espresso beans ", Decimal::new(1250, 2), 15).unwrap();
        assert_eq!(product.name, "Espresso beans");
        assert_eq!(product.price.to_string(), "12.50");
        assert_eq!(product.stock_quantity, 15);
    }

    #[test]
    fn test_parse_allows_free_and_out_of_stock() {
        let product = NewProduct::parse("Sticker", Decimal::ZERO, 0).unwrap();
        assert_eq!(product.price, Price::ZERO);
        assert_eq!(product.stock_quantity, 0);
    }

    #[test]
    fn test_parse_rejects_bad_fields() {
        assert!(matches!(
            NewProduct::parse("", Decimal::ONE, 1),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            NewProduct::parse(&"x".repeat(MAX_PRODUCT_NAME_LEN + 1), Decimal::ONE, 1),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            NewProduct::parse("Mug", Decimal::NEGATIVE_ONE, 1),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            NewProduct::parse("Mug", Decimal::ONE, -1),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_stock() {
        assert_eq!(validate_stock(0).unwrap(), 0);
        assert_eq!(
            validate_stock(-5).unwrap_err().to_string(),
            "Stock quantity must not be negative."
        );
    }
}
