//! Business logic services.
//!
//! # Services
//!
//! - `cart` - Cart item lifecycle and checkout
//! - `customers` - Customer management (each customer owns one cart)
//! - `products` - Product catalog and stock levels

pub mod cart;
pub mod customers;
pub mod products;

pub use cart::{AddOutcome, CartService};
pub use customers::CustomerService;
pub use products::{NewProduct, ProductService};
