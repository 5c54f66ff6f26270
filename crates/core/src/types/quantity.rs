//! Positive line-item quantities.

use serde::{Deserialize, Serialize};

use crate::lifecycle::LifecycleError;

/// Number of units on a cart line. Always greater than zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Quantity(i32);

impl Quantity {
    /// Validate a requested quantity.
    ///
    /// # Errors
    ///
    /// Returns `LifecycleError::InvalidQuantity` when `value <= 0`.
    pub const fn new(value: i32) -> Result<Self, LifecycleError> {
        if value <= 0 {
            return Err(LifecycleError::InvalidQuantity(value));
        }
        Ok(Self(value))
    }

    /// Get the underlying i32 value.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for Quantity {
    type Error = LifecycleError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for i32 {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
