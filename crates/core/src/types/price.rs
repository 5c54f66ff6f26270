//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are stored as `NUMERIC(10, 2)` and always carry two decimal places.
//! Serialization goes through `rust_decimal`'s string form (`"19.99"`), so no
//! precision is lost on the wire.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest price accepted by the `NUMERIC(10, 2)` column.
fn max_price() -> Decimal {
    Decimal::new(9_999_999_999, 2)
}

/// Errors produced when validating a price.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    #[error("Price must not be negative.")]
    Negative,
    #[error("Price must be less than 100000000.")]
    TooLarge,
}

/// A non-negative unit price with two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(transparent))]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero price, also the total of an empty cart.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Validate and round a price to two decimal places.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` for amounts below zero and
    /// `PriceError::TooLarge` for amounts that do not fit the column.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        let rounded = amount.round_dp(2);
        if rounded > max_price() {
            return Err(PriceError::TooLarge);
        }
        Ok(Self(rounded))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units.
    #[must_use]
    pub fn times(&self, quantity: i32) -> Decimal {
        self.0 * Decimal::from(quantity)
    }
}

impl Default for Price {
    fn default() -> Self {
        Self::ZERO
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
