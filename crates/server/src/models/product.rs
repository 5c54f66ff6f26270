//! Product domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use cartwheel_core::{Price, ProductId};

/// Longest product name accepted.
pub const MAX_PRODUCT_NAME_LEN: usize = 255;

/// A product that can be put in carts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Unit price.
    pub price: Price,
    /// Units available. Reduced by checkouts only.
    pub stock_quantity: i32,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
}
