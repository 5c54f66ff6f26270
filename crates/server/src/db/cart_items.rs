//! Cart item queries.
//!
//! Every function here runs on a caller-provided connection so the cart
//! service can group reads, locks and writes into one transaction. Rows read
//! for a later write are taken `FOR UPDATE`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgConnection;

use cartwheel_core::{
    CartId, CartItemId, CartItemStatus, CheckoutLine, Price, ProductId, Quantity,
};

use super::RepositoryError;
use crate::models::CartItem;

const CART_ITEM_COLUMNS: &str = "id, cart_id, product_id, quantity, status, created_at, updated_at";

/// Internal row type for cart item queries.
#[derive(Debug, sqlx::FromRow)]
struct CartItemRow {
    id: i32,
    cart_id: i32,
    product_id: i32,
    quantity: i32,
    status: CartItemStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CartItemRow> for CartItem {
    type Error = RepositoryError;

    fn try_from(row: CartItemRow) -> Result<Self, Self::Error> {
        let quantity = Quantity::new(row.quantity).map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "cart item {} has non-positive quantity {}",
                row.id, row.quantity
            ))
        })?;

        Ok(Self {
            id: CartItemId::new(row.id),
            cart_id: CartId::new(row.cart_id),
            product_id: ProductId::new(row.product_id),
            quantity,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Internal row type for checkout lines.
#[derive(Debug, sqlx::FromRow)]
struct CheckoutLineRow {
    id: i32,
    product_id: i32,
    quantity: i32,
    status: CartItemStatus,
    price: Decimal,
    stock_quantity: i32,
}

impl TryFrom<CheckoutLineRow> for CheckoutLine {
    type Error = RepositoryError;

    fn try_from(row: CheckoutLineRow) -> Result<Self, Self::Error> {
        let quantity = Quantity::new(row.quantity).map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "cart item {} has non-positive quantity {}",
                row.id, row.quantity
            ))
        })?;
        let unit_price = Price::new(row.price).map_err(|e| {
            RepositoryError::DataCorruption(format!(
                "invalid price for product {}: {e}",
                row.product_id
            ))
        })?;

        Ok(Self {
            item_id: CartItemId::new(row.id),
            product_id: ProductId::new(row.product_id),
            quantity,
            status: row.status,
            unit_price,
            stock_quantity: row.stock_quantity,
        })
    }
}

/// Lock a cart item by ID.
pub(crate) async fn find_for_update(
    conn: &mut PgConnection,
    id: CartItemId,
) -> Result<Option<CartItem>, RepositoryError> {
    let row = sqlx::query_as::<_, CartItemRow>(&format!(
        "SELECT {CART_ITEM_COLUMNS} FROM cart_item WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(conn)
    .await?;

    row.map(TryInto::try_into).transpose()
}

/// Row returned by [`upsert_added`].
#[derive(Debug, sqlx::FromRow)]
struct UpsertRow {
    #[sqlx(flatten)]
    item: CartItemRow,
    created: bool,
}

/// Put a product in a cart as an `ADDED` line with the given quantity.
///
/// An open (`ADDED` or `REMOVED`) line for the same product is overwritten
/// in place; otherwise a new line is inserted. Returns the line and whether
/// it was inserted. Concurrent calls for the same pair serialize on
/// `cart_item_open_line_idx`, so both succeed against a single row.
pub(crate) async fn upsert_added(
    conn: &mut PgConnection,
    cart_id: CartId,
    product_id: ProductId,
    quantity: Quantity,
) -> Result<(CartItem, bool), RepositoryError> {
    let row = sqlx::query_as::<_, UpsertRow>(&format!(
        r"
        INSERT INTO cart_item (cart_id, product_id, quantity, status)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (cart_id, product_id) WHERE status <> 'checkout'
        DO UPDATE SET quantity = EXCLUDED.quantity,
                      status = EXCLUDED.status,
                      updated_at = now()
        RETURNING {CART_ITEM_COLUMNS}, (xmax = 0) AS created
        "
    ))
    .bind(cart_id)
    .bind(product_id)
    .bind(quantity.get())
    .bind(CartItemStatus::Added)
    .fetch_one(conn)
    .await?;

    Ok((row.item.try_into()?, row.created))
}

/// Overwrite a line's quantity and status.
pub(crate) async fn update(
    conn: &mut PgConnection,
    id: CartItemId,
    quantity: Quantity,
    status: CartItemStatus,
) -> Result<CartItem, RepositoryError> {
    let row = sqlx::query_as::<_, CartItemRow>(&format!(
        r"
        UPDATE cart_item
        SET quantity = $2, status = $3, updated_at = now()
        WHERE id = $1
        RETURNING {CART_ITEM_COLUMNS}
        "
    ))
    .bind(id)
    .bind(quantity.get())
    .bind(status)
    .fetch_optional(conn)
    .await?;

    row.ok_or(RepositoryError::NotFound)?.try_into()
}

/// Lock a cart's `ADDED` lines together with their products' stock.
pub(crate) async fn checkout_lines(
    conn: &mut PgConnection,
    cart_id: CartId,
) -> Result<Vec<CheckoutLine>, RepositoryError> {
    let rows = sqlx::query_as::<_, CheckoutLineRow>(
        r"
        SELECT ci.id, ci.product_id, ci.quantity, ci.status, p.price, p.stock_quantity
        FROM cart_item ci
        JOIN product p ON p.id = ci.product_id
        WHERE ci.cart_id = $1 AND ci.status = 'added'
        ORDER BY ci.id
        FOR UPDATE
        ",
    )
    .bind(cart_id)
    .fetch_all(conn)
    .await?;

    rows.into_iter().map(TryInto::try_into).collect()
}

/// Move `ADDED` lines to `CHECKOUT`. Lines in any other status are skipped.
pub(crate) async fn mark_checked_out(
    conn: &mut PgConnection,
    ids: &[CartItemId],
) -> Result<Vec<CartItem>, RepositoryError> {
    let ids: Vec<i32> = ids.iter().map(CartItemId::as_i32).collect();

    let rows = sqlx::query_as::<_, CartItemRow>(&format!(
        r"
        UPDATE cart_item
        SET status = $2, updated_at = now()
        WHERE id = ANY($1) AND status = 'added'
        RETURNING {CART_ITEM_COLUMNS}
        "
    ))
    .bind(ids)
    .bind(CartItemStatus::Checkout)
    .fetch_all(conn)
    .await?;

    let mut items = rows
        .into_iter()
        .map(TryInto::try_into)
        .collect::<Result<Vec<CartItem>, _>>()?;
    items.sort_by_key(|item| item.id);
    Ok(items)
}
