//! Cart item status and its allowed transitions.
//!
//! ```text
//!            remove
//!   ADDED ───────────▶ REMOVED
//!     │   ◀───────────
//!     │     re-add
//!     │ checkout
//!     ▼
//!  CHECKOUT (terminal)
//! ```
//!
//! `REMOVED` is terminal for remove, quantity updates and checkout. The only
//! way out of it is adding the same product to the same cart again, which
//! reuses the row.

use serde::{Deserialize, Serialize};

use crate::lifecycle::LifecycleError;

/// Lifecycle status of a cart item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "cart_item_status", rename_all = "snake_case")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CartItemStatus {
    /// In the cart, waiting for checkout.
    #[default]
    Added,
    /// Taken out of the cart by the customer.
    Removed,
    /// Committed by a checkout.
    Checkout,
}

impl CartItemStatus {
    /// Status after removing the item from its cart.
    ///
    /// # Errors
    ///
    /// Fails if the item is already removed or checked out.
    pub const fn remove(self) -> Result<Self, LifecycleError> {
        match self {
            Self::Added => Ok(Self::Removed),
            Self::Removed => Err(LifecycleError::AlreadyRemoved),
            Self::Checkout => Err(LifecycleError::AlreadyCheckedOut),
        }
    }

    /// Status after a successful checkout.
    ///
    /// # Errors
    ///
    /// Only `ADDED` items can be checked out.
    pub const fn checkout(self) -> Result<Self, LifecycleError> {
        match self {
            Self::Added => Ok(Self::Checkout),
            Self::Removed => Err(LifecycleError::AlreadyRemoved),
            Self::Checkout => Err(LifecycleError::AlreadyCheckedOut),
        }
    }

    /// Check that the item's quantity may still be changed.
    ///
    /// # Errors
    ///
    /// Fails for removed and checked-out items.
    pub const fn ensure_mutable(self) -> Result<(), LifecycleError> {
        match self {
            Self::Added => Ok(()),
            Self::Removed => Err(LifecycleError::AlreadyRemoved),
            Self::Checkout => Err(LifecycleError::AlreadyCheckedOut),
        }
    }
}

impl std::fmt::Display for CartItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Added => write!(f, "ADDED"),
            Self::Removed => write!(f, "REMOVED"),
            Self::Checkout => write!(f, "CHECKOUT"),
        }
    }
}

impl std::str::FromStr for CartItemStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ADDED" => Ok(Self::Added),
            "REMOVED" => Ok(Self::Removed),
            "CHECKOUT" => Ok(Self::Checkout),
            _ => Err(format!("invalid cart item status: {s}")),
        }
    }
}
