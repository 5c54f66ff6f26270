//! Domain models for the cart server.
//!
//! These types represent validated domain objects separate from database row
//! types. All of them serialize to the JSON shapes returned by the API.

pub mod cart;
pub mod customer;
pub mod product;

pub use cart::{Cart, CartDetails, CartItem, CartItemWithProduct, CheckoutSummary};
pub use customer::{Customer, CustomerWithCart};
pub use product::Product;
