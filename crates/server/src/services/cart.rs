//! Cart item lifecycle service.
//!
//! Applies add / update / remove / checkout to cart items. Each operation
//! runs in a single database transaction: rows that will be written are
//! locked first, the rules from `cartwheel_core::lifecycle` decide whether the
//! change is allowed, and only then is anything written. Any error drops the
//! transaction, which rolls it back.
//!
//! Stock is reconciled at checkout only. Adding an item or changing its
//! quantity checks the product's current stock but does not reserve it.

use sqlx::PgPool;
use tracing::{info, instrument, warn};

use cartwheel_core::{
    CartId, CartItemId, CartItemStatus, ProductId, Quantity, ensure_in_stock, plan_checkout,
};

use crate::db::{CartRepository, RepositoryError, cart_items, carts, products};
use crate::error::AppError;
use crate::models::{Cart, CartDetails, CartItem, CheckoutSummary};

const INVALID_CART_OR_PRODUCT: &str = "Invalid cart or product.";
const INVALID_CART_ITEM: &str = "Invalid cart item.";
const INVALID_CART: &str = "Invalid cart id.";

/// Result of adding a product to a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddOutcome {
    /// The cart line after the add.
    pub item: CartItem,
    /// `true` if a new line was inserted, `false` if an existing one was overwritten.
    pub created: bool,
}

/// Cart lifecycle service.
pub struct CartService<'a> {
    pool: &'a PgPool,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Put `quantity` units of a product in a cart.
    ///
    /// If the cart already has an open line for the product (`ADDED` or
    /// `REMOVED`), its quantity is overwritten and it becomes `ADDED` again.
    /// Otherwise a new `ADDED` line is inserted.
    ///
    /// # Errors
    ///
    /// - `LifecycleError::InvalidQuantity` if `quantity <= 0` (checked before any query)
    /// - `AppError::NotFound` if the cart or product does not exist
    /// - `LifecycleError::InsufficientStock` if the product has fewer than `quantity` units
    #[instrument(skip(self))]
    pub async fn add(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<AddOutcome, AppError> {
        let quantity = Quantity::new(quantity)?;

        let mut tx = self.pool.begin().await?;

        let cart = carts::find_in_tx(&mut tx, cart_id).await?;
        let product = products::find_in_tx(&mut tx, product_id).await?;
        let (Some(_), Some(product)) = (cart, product) else {
            return Err(AppError::NotFound(INVALID_CART_OR_PRODUCT.to_string()));
        };

        ensure_in_stock(product.id, product.stock_quantity, quantity)?;

        let (item, created) =
            cart_items::upsert_added(&mut tx, cart_id, product_id, quantity).await?;
        let outcome = AddOutcome { item, created };

        tx.commit().await?;

        info!(
            cart_item_id = %outcome.item.id,
            quantity = %quantity,
            created = outcome.created,
            "Cart item added"
        );
        Ok(outcome)
    }

    /// Take an item out of its cart.
    ///
    /// # Errors
    ///
    /// - `AppError::NotFound` if the item does not exist
    /// - `LifecycleError::AlreadyRemoved` / `AlreadyCheckedOut` for terminal items
    #[instrument(skip(self))]
    pub async fn remove(&self, cart_item_id: CartItemId) -> Result<CartItem, AppError> {
        let mut tx = self.pool.begin().await?;

        let item = cart_items::find_for_update(&mut tx, cart_item_id)
            .await?
            .ok_or_else(|| AppError::NotFound(INVALID_CART_ITEM.to_string()))?;

        let status = item.status.remove()?;
        let item = cart_items::update(&mut tx, item.id, item.quantity, status).await?;

        tx.commit().await?;

        info!(cart_item_id = %item.id, "Cart item removed");
        Ok(item)
    }

    /// Change the quantity of an `ADDED` item.
    ///
    /// # Errors
    ///
    /// - `LifecycleError::InvalidQuantity` if `quantity <= 0` (checked before any query)
    /// - `AppError::NotFound` if the item does not exist
    /// - `LifecycleError::AlreadyRemoved` / `AlreadyCheckedOut` for terminal items
    /// - `LifecycleError::InsufficientStock` if the product has fewer than `quantity` units
    #[instrument(skip(self))]
    pub async fn update_quantity(
        &self,
        cart_item_id: CartItemId,
        quantity: i32,
    ) -> Result<CartItem, AppError> {
        let quantity = Quantity::new(quantity)?;

        let mut tx = self.pool.begin().await?;

        let item = cart_items::find_for_update(&mut tx, cart_item_id)
            .await?
            .ok_or_else(|| AppError::NotFound(INVALID_CART_ITEM.to_string()))?;

        item.status.ensure_mutable()?;

        let product = products::find_in_tx(&mut tx, item.product_id)
            .await?
            .ok_or_else(|| {
                RepositoryError::DataCorruption(format!(
                    "cart item {} references missing product {}",
                    item.id, item.product_id
                ))
            })?;

        ensure_in_stock(product.id, product.stock_quantity, quantity)?;

        let previous = item.quantity;
        let item = cart_items::update(&mut tx, item.id, quantity, item.status).await?;

        tx.commit().await?;

        info!(
            cart_item_id = %item.id,
            from = %previous,
            to = %quantity,
            "Cart item quantity updated"
        );
        Ok(item)
    }

    /// Check out every `ADDED` item in a cart.
    ///
    /// All items move to `CHECKOUT` and each product's stock drops by the
    /// quantities checked out, or nothing changes at all.
    ///
    /// # Errors
    ///
    /// - `AppError::NotFound` if the cart does not exist
    /// - `LifecycleError::CartEmpty` if the cart has no `ADDED` items
    /// - `LifecycleError::InsufficientStock` if stock fell below a line's quantity since it was added
    #[instrument(skip(self))]
    pub async fn checkout(&self, cart_id: CartId) -> Result<CheckoutSummary, AppError> {
        let mut tx = self.pool.begin().await?;

        carts::find_in_tx(&mut tx, cart_id)
            .await?
            .ok_or_else(|| AppError::NotFound(INVALID_CART.to_string()))?;

        let lines = cart_items::checkout_lines(&mut tx, cart_id).await?;
        let plan = plan_checkout(&lines)?;

        for decrement in &plan.decrements {
            let remaining =
                products::decrement_stock(&mut tx, decrement.product_id, decrement.quantity)
                    .await?
                    .ok_or_else(|| {
                        warn!(product_id = %decrement.product_id, "Stock changed during checkout");
                        RepositoryError::Conflict("stock changed during checkout".to_string())
                    })?;
            info!(
                product_id = %decrement.product_id,
                decrement = decrement.quantity,
                remaining,
                "Stock decremented"
            );
        }

        let items = cart_items::mark_checked_out(&mut tx, &plan.items).await?;
        if items.len() != plan.items.len() {
            let err = RepositoryError::Conflict("cart changed during checkout".to_string());
            return Err(err.into());
        }

        tx.commit().await?;

        info!(
            items = items.len(),
            count = plan.count,
            total_price = %plan.total_price,
            "Cart checked out"
        );
        Ok(CheckoutSummary {
            cart_id,
            cart_items: items,
            count: plan.count,
            total_price: plan.total_price.round_dp(2),
        })
    }

    /// The `ADDED` items of a cart with their products, item count and total price.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the cart does not exist.
    #[instrument(skip(self))]
    pub async fn details(&self, cart_id: CartId) -> Result<CartDetails, AppError> {
        let repo = CartRepository::new(self.pool);

        let cart = repo
            .get(cart_id)
            .await?
            .ok_or_else(|| AppError::NotFound(INVALID_CART.to_string()))?;
        let items = repo
            .items_with_products(cart_id, CartItemStatus::Added)
            .await?;

        Ok(CartDetails::new(&cart, items))
    }

    /// List all carts.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Cart>, AppError> {
        Ok(CartRepository::new(self.pool).list().await?)
    }
}
