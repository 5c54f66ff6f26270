//! Cart item lifecycle rules and stock reconciliation.
//!
//! Stock is reconciled once, at checkout. Adding an item or changing its
//! quantity only checks that the product currently has enough stock; removing
//! an item leaves stock untouched. Checkout re-validates every line against
//! the stock read inside the checkout transaction and returns the exact
//! decrements to apply.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::{CartItemId, CartItemStatus, Price, ProductId, Quantity};

/// Business-rule violations for cart operations.
///
/// Every variant is a client error; the `Display` text is safe to return to
/// the caller as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("Quantity must be more than zero.")]
    InvalidQuantity(i32),

    #[error("Insufficient stock quantity.")]
    InsufficientStock {
        product_id: ProductId,
        requested: i64,
        available: i32,
    },

    #[error("Cart item already removed.")]
    AlreadyRemoved,

    #[error("Cart item already checked out.")]
    AlreadyCheckedOut,

    #[error("Cart is empty.")]
    CartEmpty,
}

/// Check that a product can cover `quantity` units.
///
/// # Errors
///
/// Returns `LifecycleError::InsufficientStock` when `stock < quantity`.
pub fn ensure_in_stock(
    product_id: ProductId,
    stock_quantity: i32,
    quantity: Quantity,
) -> Result<(), LifecycleError> {
    if stock_quantity < quantity.get() {
        return Err(LifecycleError::InsufficientStock {
            product_id,
            requested: i64::from(quantity.get()),
            available: stock_quantity,
        });
    }
    Ok(())
}

/// A cart line as seen by checkout, joined with its product's current stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutLine {
    pub item_id: CartItemId,
    pub product_id: ProductId,
    pub quantity: Quantity,
    pub status: CartItemStatus,
    pub unit_price: Price,
    pub stock_quantity: i32,
}

/// Amount to subtract from one product's stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockDecrement {
    pub product_id: ProductId,
    pub quantity: i32,
}

/// Result of a successful checkout validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutPlan {
    /// Items to move to `CHECKOUT`, in input order.
    pub items: Vec<CartItemId>,
    /// One decrement per product, ordered by product ID.
    pub decrements: Vec<StockDecrement>,
    /// Units over all checked-out lines.
    pub count: i64,
    /// Sum of unit price × quantity over all checked-out lines.
    pub total_price: Decimal,
}

/// Validate a checkout and compute the stock decrements.
///
/// Only `ADDED` lines take part. Lines for the same product are summed before
/// comparing against that product's stock, so two lines of 6 cannot slip
/// past a stock of 10.
///
/// # Errors
///
/// - `LifecycleError::CartEmpty` if there are no `ADDED` lines.
/// - `LifecycleError::InsufficientStock` for the first product (by ID) whose
///   stock cannot cover its lines.
pub fn plan_checkout(lines: &[CheckoutLine]) -> Result<CheckoutPlan, LifecycleError> {
    let mut items = Vec::new();
    let mut per_product: BTreeMap<ProductId, (i64, i32)> = BTreeMap::new();
    let mut count = 0_i64;
    let mut total_price = Decimal::ZERO;

    for line in lines {
        if line.status.checkout().is_err() {
            continue;
        }
        items.push(line.item_id);
        count += i64::from(line.quantity.get());
        total_price += line.unit_price.times(line.quantity.get());
        let entry = per_product
            .entry(line.product_id)
            .or_insert((0, line.stock_quantity));
        entry.0 += i64::from(line.quantity.get());
    }

    if items.is_empty() {
        return Err(LifecycleError::CartEmpty);
    }

    let mut decrements = Vec::with_capacity(per_product.len());
    for (product_id, (requested, available)) in per_product {
        let quantity = i32::try_from(requested)
            .ok()
            .filter(|&q| q <= available)
            .ok_or(LifecycleError::InsufficientStock {
                product_id,
                requested,
                available,
            })?;
        decrements.push(StockDecrement {
            product_id,
            quantity,
        });
    }

    Ok(CheckoutPlan {
        items,
        decrements,
        count,
        total_price,
    })
}
