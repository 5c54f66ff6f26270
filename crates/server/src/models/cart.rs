//! Cart and cart item domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use cartwheel_core::{CartId, CartItemId, CartItemStatus, CustomerId, ProductId, Quantity};

use super::Product;

/// A customer's cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cart {
    /// Unique cart ID.
    pub id: CartId,
    /// Owner of the cart (one cart per customer).
    pub customer_id: CustomerId,
    /// When the cart was created.
    pub created_at: DateTime<Utc>,
}

/// One line in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartItem {
    /// Unique cart item ID.
    pub id: CartItemId,
    /// Cart this line belongs to.
    pub cart_id: CartId,
    /// Product on this line.
    pub product_id: ProductId,
    /// Number of units.
    pub quantity: Quantity,
    /// Lifecycle status.
    pub status: CartItemStatus,
    /// When the line was created.
    pub created_at: DateTime<Utc>,
    /// When the line was last changed.
    pub updated_at: DateTime<Utc>,
}

/// A cart line with its product embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartItemWithProduct {
    pub id: CartItemId,
    pub cart_id: CartId,
    pub product: Product,
    pub quantity: Quantity,
    pub status: CartItemStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CartItemWithProduct {
    /// Price of this line (unit price × quantity).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price.times(self.quantity.get())
    }
}

/// Contents of a cart: the lines still waiting for checkout and their totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartDetails {
    pub cart_id: CartId,
    pub customer_id: CustomerId,
    pub cart_items: Vec<CartItemWithProduct>,
    /// Sum of quantities over `cart_items`.
    pub count: i64,
    /// Sum of line totals over `cart_items`.
    pub total_price: Decimal,
}

impl CartDetails {
    /// Build details for a cart from its `ADDED` lines.
    #[must_use]
    pub fn new(cart: &Cart, cart_items: Vec<CartItemWithProduct>) -> Self {
        let count = cart_items
            .iter()
            .map(|item| i64::from(item.quantity.get()))
            .sum();
        let total_price = cart_items
            .iter()
            .map(CartItemWithProduct::line_total)
            .sum::<Decimal>()
            .round_dp(2);

        Self {
            cart_id: cart.id,
            customer_id: cart.customer_id,
            cart_items,
            count,
            total_price,
        }
    }
}

/// Outcome of a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutSummary {
    pub cart_id: CartId,
    /// Items that moved to `CHECKOUT`.
    pub cart_items: Vec<CartItem>,
    /// Total number of units checked out.
    pub count: i64,
    /// Amount charged, at the prices read during checkout.
    pub total_price: Decimal,
}
