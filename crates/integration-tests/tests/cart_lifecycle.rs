//! Cart item lifecycle against a real database.
//!
//! These tests require a scratch `PostgreSQL` database in
//! `CARTWHEEL_TEST_DATABASE_URL`. Every test creates its own customers and
//! products, so they can run in parallel and repeatedly.

use rust_decimal::Decimal;

use cartwheel_core::{
    CartId, CartItemId, CartItemStatus, CustomerId, LifecycleError, ProductId, Quantity,
};
use cartwheel_integration_tests::{create_customer, create_product, test_pool, unique_name};
use cartwheel_server::error::AppError;
use cartwheel_server::services::{CartService, CustomerService, ProductService};

const NEEDS_DB: &str = "Requires CARTWHEEL_TEST_DATABASE_URL";

fn quantity(n: i32) -> Quantity {
    Quantity::new(n).expect("positive quantity")
}

fn lifecycle_error(err: AppError) -> LifecycleError {
    match err {
        AppError::Lifecycle(err) => err,
        other => panic!("expected a lifecycle error, got {other:?}"),
    }
}

// =============================================================================
// Customers and carts
// =============================================================================

#[tokio::test]
#[ignore = "Requires CARTWHEEL_TEST_DATABASE_URL"]
async fn test_customer_gets_exactly_one_cart() {
    let pool = test_pool().await.expect(NEEDS_DB);
    let customer = create_customer(&pool).await.expect("customer");
    let service = CartService::new(&pool);

    let carts = service.list().await.expect("list carts");
    let owned: Vec<_> = carts
        .iter()
        .filter(|c| c.customer_id == customer.customer.id)
        .collect();
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].id, customer.cart_id);

    let details = service.details(customer.cart_id).await.expect("details");
    assert!(details.cart_items.is_empty());
    assert_eq!(details.count, 0);
    assert_eq!(details.total_price, Decimal::ZERO);
}

#[tokio::test]
#[ignore = "Requires CARTWHEEL_TEST_DATABASE_URL"]
async fn test_rename_customer() {
    let pool = test_pool().await.expect(NEEDS_DB);
    let customer = create_customer(&pool).await.expect("customer");
    let customers = CustomerService::new(&pool);
    let id = customer.customer.id;

    let name = unique_name("Renamed");
    let padded = format!("  {name} ");
    let renamed = customers.rename(id, &padded).await.expect("rename");
    assert_eq!(renamed.customer.id, id);
    assert_eq!(renamed.customer.name, name);
    assert_eq!(renamed.cart_id, customer.cart_id);

    let fetched = customers.get(id).await.expect("get");
    assert_eq!(fetched.customer.name, name);
    assert_eq!(fetched.cart_id, customer.cart_id);

    let err = customers.rename(id, "   ").await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    let unchanged = customers.get(id).await.expect("get");
    assert_eq!(unchanged.customer.name, name);
}

#[tokio::test]
#[ignore = "Requires CARTWHEEL_TEST_DATABASE_URL"]
async fn test_rename_unknown_customer() {
    let pool = test_pool().await.expect(NEEDS_DB);
    let customers = CustomerService::new(&pool);

    let unknown = CustomerId::new(i32::MAX);
    let err = customers.rename(unknown, "Nobody").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(ref m) if m == "Customer not found."));
}

#[tokio::test]
#[ignore = "Requires CARTWHEEL_TEST_DATABASE_URL"]
async fn test_deleting_customer_removes_cart() {
    let pool = test_pool().await.expect(NEEDS_DB);
    let customer = create_customer(&pool).await.expect("customer");
    let product = create_product(&pool, 1_000, 5).await.expect("product");
    let cart = customer.cart_id;
    let service = CartService::new(&pool);

    service.add(cart, product.id, 1).await.expect("add");

    CustomerService::new(&pool)
        .delete(customer.customer.id)
        .await
        .expect("delete");

    let err = service.details(cart).await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid cart id.");
}

// =============================================================================
// Add / remove / update
// =============================================================================

#[tokio::test]
#[ignore = "Requires CARTWHEEL_TEST_DATABASE_URL"]
async fn test_add_then_checkout_decrements_stock() {
    let pool = test_pool().await.expect(NEEDS_DB);
    let customer = create_customer(&pool).await.expect("customer");
    let product = create_product(&pool, 1_250, 15).await.expect("product");
    let cart = customer.cart_id;
    let service = CartService::new(&pool);
    let products = ProductService::new(&pool);

    let added = service.add(cart, product.id, 5).await.expect("add");
    assert!(added.created);
    assert_eq!(added.item.quantity, quantity(5));
    assert_eq!(added.item.status, CartItemStatus::Added);

    // Adding does not touch stock
    let unchanged = products.get(product.id).await.expect("get");
    assert_eq!(unchanged.stock_quantity, 15);

    let summary = service.checkout(cart).await.expect("checkout");
    assert_eq!(summary.cart_items.len(), 1);
    assert_eq!(summary.cart_items[0].id, added.item.id);
    assert_eq!(summary.cart_items[0].status, CartItemStatus::Checkout);
    assert_eq!(summary.count, 5);
    assert_eq!(summary.total_price, Decimal::new(6_250, 2));

    let product = products.get(product.id).await.expect("get");
    assert_eq!(product.stock_quantity, 10);

    // The checked-out line no longer shows in the cart
    let details = service.details(cart).await.expect("details");
    assert!(details.cart_items.is_empty());
}

#[tokio::test]
#[ignore = "Requires CARTWHEEL_TEST_DATABASE_URL"]
async fn test_add_same_product_overwrites_quantity() {
    let pool = test_pool().await.expect(NEEDS_DB);
    let customer = create_customer(&pool).await.expect("customer");
    let product = create_product(&pool, 500, 10).await.expect("product");
    let cart = customer.cart_id;
    let service = CartService::new(&pool);

    let first = service.add(cart, product.id, 2).await.expect("add");
    let second = service.add(cart, product.id, 7).await.expect("re-add");

    assert!(first.created);
    assert!(!second.created);
    assert_eq!(second.item.id, first.item.id);
    assert_eq!(second.item.quantity, quantity(7));

    let details = service.details(cart).await.expect("details");
    assert_eq!(details.cart_items.len(), 1);
    assert_eq!(details.count, 7);
    assert_eq!(details.total_price, Decimal::new(3_500, 2));
}

#[tokio::test]
#[ignore = "Requires CARTWHEEL_TEST_DATABASE_URL"]
async fn test_concurrent_adds_share_one_line() {
    let pool = test_pool().await.expect(NEEDS_DB);
    let customer = create_customer(&pool).await.expect("customer");
    let product = create_product(&pool, 100, 50).await.expect("product");
    let cart = customer.cart_id;
    let product_id = product.id;

    let handles: Vec<_> = (1..=8)
        .map(|n| {
            let pool = pool.clone();
            tokio::spawn(async move { CartService::new(&pool).add(cart, product_id, n).await })
        })
        .collect();

    let mut created = 0;
    let mut item_ids = Vec::new();
    for handle in handles {
        let outcome = handle.await.expect("join").expect("add");
        if outcome.created {
            created += 1;
        }
        item_ids.push(outcome.item.id);
    }

    assert_eq!(created, 1);
    item_ids.dedup();
    assert_eq!(item_ids.len(), 1);

    let service = CartService::new(&pool);
    let details = service.details(cart).await.expect("details");
    assert_eq!(details.cart_items.len(), 1);
    assert_eq!(details.cart_items[0].id, item_ids[0]);
}

#[tokio::test]
#[ignore = "Requires CARTWHEEL_TEST_DATABASE_URL"]
async fn test_add_rejects_unknown_ids_and_low_stock() {
    let pool = test_pool().await.expect(NEEDS_DB);
    let customer = create_customer(&pool).await.expect("customer");
    let product = create_product(&pool, 500, 3).await.expect("product");
    let cart = customer.cart_id;
    let service = CartService::new(&pool);

    let unknown_cart = CartId::new(i32::MAX);
    let err = service.add(unknown_cart, product.id, 1).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(ref m) if m == "Invalid cart or product."));

    let unknown_product = ProductId::new(i32::MAX);
    let err = service.add(cart, unknown_product, 1).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(ref m) if m == "Invalid cart or product."));

    let err = service.add(cart, product.id, 4).await.unwrap_err();
    let expected = LifecycleError::InsufficientStock {
        product_id: product.id,
        requested: 4,
        available: 3,
    };
    assert_eq!(lifecycle_error(err), expected);
}

#[tokio::test]
#[ignore = "Requires CARTWHEEL_TEST_DATABASE_URL"]
async fn test_remove_twice_and_readd() {
    let pool = test_pool().await.expect(NEEDS_DB);
    let customer = create_customer(&pool).await.expect("customer");
    let product = create_product(&pool, 999, 8).await.expect("product");
    let cart = customer.cart_id;
    let service = CartService::new(&pool);

    let added = service.add(cart, product.id, 3).await.expect("add");
    let item_id = added.item.id;

    let removed = service.remove(item_id).await.expect("remove");
    assert_eq!(removed.status, CartItemStatus::Removed);

    let err = service.remove(item_id).await.unwrap_err();
    assert_eq!(lifecycle_error(err), LifecycleError::AlreadyRemoved);

    let err = service.update_quantity(item_id, 2).await.unwrap_err();
    assert_eq!(lifecycle_error(err), LifecycleError::AlreadyRemoved);

    // Removed lines are invisible to details and checkout
    let details = service.details(cart).await.expect("details");
    assert!(details.cart_items.is_empty());
    let err = service.checkout(cart).await.unwrap_err();
    assert_eq!(lifecycle_error(err), LifecycleError::CartEmpty);

    let readded = service.add(cart, product.id, 4).await.expect("re-add");
    assert!(!readded.created);
    assert_eq!(readded.item.id, item_id);
    assert_eq!(readded.item.status, CartItemStatus::Added);
    assert_eq!(readded.item.quantity, quantity(4));
}

#[tokio::test]
#[ignore = "Requires CARTWHEEL_TEST_DATABASE_URL"]
async fn test_update_quantity() {
    let pool = test_pool().await.expect(NEEDS_DB);
    let customer = create_customer(&pool).await.expect("customer");
    let product = create_product(&pool, 100, 6).await.expect("product");
    let cart = customer.cart_id;
    let service = CartService::new(&pool);

    let added = service.add(cart, product.id, 1).await.expect("add");
    let item_id = added.item.id;

    let updated = service.update_quantity(item_id, 6).await.expect("update");
    assert_eq!(updated.quantity, quantity(6));
    assert_eq!(updated.status, CartItemStatus::Added);

    let err = service.update_quantity(item_id, 7).await.unwrap_err();
    let expected = LifecycleError::InsufficientStock {
        product_id: product.id,
        requested: 7,
        available: 6,
    };
    assert_eq!(lifecycle_error(err), expected);

    let unknown = CartItemId::new(i32::MAX);
    let err = service.update_quantity(unknown, 1).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(ref m) if m == "Invalid cart item."));
}

// =============================================================================
// Checkout
// =============================================================================

#[tokio::test]
#[ignore = "Requires CARTWHEEL_TEST_DATABASE_URL"]
async fn test_checkout_several_products() {
    let pool = test_pool().await.expect(NEEDS_DB);
    let customer = create_customer(&pool).await.expect("customer");
    let beans = create_product(&pool, 1_000, 15).await.expect("product");
    let filters = create_product(&pool, 1_500, 20).await.expect("product");
    let cart = customer.cart_id;
    let service = CartService::new(&pool);
    let products = ProductService::new(&pool);

    let first = service.add(cart, beans.id, 5).await.expect("add");
    let second = service.add(cart, filters.id, 7).await.expect("add");

    let summary = service.checkout(cart).await.expect("checkout");
    assert_eq!(summary.cart_id, cart);
    assert_eq!(summary.cart_items.len(), 2);
    assert_eq!(summary.cart_items[0].id, first.item.id);
    assert_eq!(summary.cart_items[1].id, second.item.id);
    let statuses: Vec<_> = summary.cart_items.iter().map(|i| i.status).collect();
    assert_eq!(statuses, [CartItemStatus::Checkout; 2]);
    assert_eq!(summary.count, 12);
    assert_eq!(summary.total_price, Decimal::new(15_500, 2));

    let beans = products.get(beans.id).await.expect("get");
    let filters = products.get(filters.id).await.expect("get");
    assert_eq!(beans.stock_quantity, 10);
    assert_eq!(filters.stock_quantity, 13);

    let details = service.details(cart).await.expect("details");
    assert!(details.cart_items.is_empty());
    assert_eq!(details.count, 0);
}

#[tokio::test]
#[ignore = "Requires CARTWHEEL_TEST_DATABASE_URL"]
async fn test_checkout_empty_and_unknown_cart() {
    let pool = test_pool().await.expect(NEEDS_DB);
    let customer = create_customer(&pool).await.expect("customer");
    let service = CartService::new(&pool);

    let err = service.checkout(customer.cart_id).await.unwrap_err();
    assert_eq!(err.to_string(), "Cart is empty.");

    let err = service.checkout(CartId::new(i32::MAX)).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(ref m) if m == "Invalid cart id."));
}

#[tokio::test]
#[ignore = "Requires CARTWHEEL_TEST_DATABASE_URL"]
async fn test_checkout_is_all_or_nothing() {
    let pool = test_pool().await.expect(NEEDS_DB);
    let customer = create_customer(&pool).await.expect("customer");
    let plenty = create_product(&pool, 200, 50).await.expect("product");
    let scarce = create_product(&pool, 300, 5).await.expect("product");
    let cart = customer.cart_id;
    let service = CartService::new(&pool);
    let products = ProductService::new(&pool);

    let a = service.add(cart, plenty.id, 10).await.expect("add");
    let b = service.add(cart, scarce.id, 5).await.expect("add");

    // Stock drops after the item was added
    products.restock(scarce.id, 2).await.expect("restock");

    let err = service.checkout(cart).await.unwrap_err();
    let expected = LifecycleError::InsufficientStock {
        product_id: scarce.id,
        requested: 5,
        available: 2,
    };
    assert_eq!(lifecycle_error(err), expected);

    // Nothing changed
    let plenty = products.get(plenty.id).await.expect("get");
    let scarce = products.get(scarce.id).await.expect("get");
    assert_eq!(plenty.stock_quantity, 50);
    assert_eq!(scarce.stock_quantity, 2);
    let details = service.details(cart).await.expect("details");
    let ids: Vec<_> = details.cart_items.iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![a.item.id, b.item.id]);
}

#[tokio::test]
#[ignore = "Requires CARTWHEEL_TEST_DATABASE_URL"]
async fn test_checked_out_items_are_final() {
    let pool = test_pool().await.expect(NEEDS_DB);
    let customer = create_customer(&pool).await.expect("customer");
    let product = create_product(&pool, 450, 20).await.expect("product");
    let cart = customer.cart_id;
    let service = CartService::new(&pool);

    let added = service.add(cart, product.id, 2).await.expect("add");
    let item_id = added.item.id;
    service.checkout(cart).await.expect("checkout");

    let err = service.remove(item_id).await.unwrap_err();
    assert_eq!(lifecycle_error(err), LifecycleError::AlreadyCheckedOut);

    let err = service.update_quantity(item_id, 1).await.unwrap_err();
    assert_eq!(lifecycle_error(err), LifecycleError::AlreadyCheckedOut);

    // Buying the same product again starts a new line
    let again = service.add(cart, product.id, 3).await.expect("add again");
    assert!(again.created);
    assert_ne!(again.item.id, item_id);

    service.checkout(cart).await.expect("second checkout");
    let products = ProductService::new(&pool);
    let product = products.get(product.id).await.expect("get");
    assert_eq!(product.stock_quantity, 15);
}

#[tokio::test]
#[ignore = "Requires CARTWHEEL_TEST_DATABASE_URL"]
async fn test_concurrent_checkouts_never_oversell() {
    let pool = test_pool().await.expect(NEEDS_DB);
    let product = create_product(&pool, 100, 3).await.expect("product");

    let mut carts = Vec::new();
    for _ in 0..5 {
        let customer = create_customer(&pool).await.expect("customer");
        CartService::new(&pool)
            .add(customer.cart_id, product.id, 1)
            .await
            .expect("add");
        carts.push(customer.cart_id);
    }

    let handles: Vec<_> = carts
        .into_iter()
        .map(|cart_id| {
            let pool = pool.clone();
            tokio::spawn(async move { CartService::new(&pool).checkout(cart_id).await.is_ok() })
        })
        .collect();

    let mut succeeded = 0;
    for handle in handles {
        if handle.await.expect("join") {
            succeeded += 1;
        }
    }

    assert_eq!(succeeded, 3);
    let products = ProductService::new(&pool);
    let product = products.get(product.id).await.expect("get");
    assert_eq!(product.stock_quantity, 0);
}
