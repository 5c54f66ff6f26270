//! Seed the database with demo data.
//!
//! Inserts a small product catalog and one customer (which also creates
//! their cart). Running it twice inserts a second copy.

use rust_decimal::Decimal;
use tracing::info;

use cartwheel_server::services::{CustomerService, NewProduct, ProductService};

use super::{CommandError, connect};

/// Demo catalog: name, price in cents, stock.
const DEMO_PRODUCTS: &[(&str, i64, i32)] = &[
    ("Pour-over kettle", 4_500, 12),
    ("Ceramic dripper", 2_250, 30),
    ("Paper filters (100)", 699, 200),
    ("Espresso beans 1kg", 3_199, 15),
    ("Milk frothing pitcher", 1_499, 0),
];

fn demo_products() -> Result<Vec<NewProduct>, CommandError> {
    DEMO_PRODUCTS
        .iter()
        .map(|&(name, cents, stock)| {
            NewProduct::parse(name, Decimal::new(cents, 2), stock).map_err(CommandError::from)
        })
        .collect()
}

/// Insert demo products and a customer.
///
/// # Errors
///
/// Returns an error if the database is unreachable or an insert fails.
pub async fn run(customer_name: &str) -> Result<(), CommandError> {
    let products = demo_products()?;

    let pool = connect().await?;
    let product_service = ProductService::new(&pool);

    for product in products {
        let product = product_service.create(product).await?;
        info!(product_id = %product.id, name = %product.name, "Seeded product");
    }

    let customer = CustomerService::new(&pool).create(customer_name).await?;
    info!(
        customer_id = %customer.customer.id,
        cart_id = %customer.cart_id,
        "Seeded customer"
    );

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_products_are_valid() {
        let products = demo_products().unwrap();
        assert_eq!(products.len(), DEMO_PRODUCTS.len());
        assert!(products.iter().any(|p| p.stock_quantity == 0));
    }
}
