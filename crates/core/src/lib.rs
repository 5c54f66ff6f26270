//! Cartwheel Core - Shared types and cart rules.
//!
//! This crate provides the types used across all Cartwheel components:
//! - `server` - JSON HTTP API for customers, products and carts
//! - `cli` - Command-line tools for migrations and seed data
//!
//! # Architecture
//!
//! The core crate contains only types and pure rules - no I/O, no database
//! access, no HTTP. The server decides *when* a rule runs (usually inside a
//! database transaction); this crate decides *whether* the change is allowed.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, quantities and statuses
//! - [`lifecycle`] - Cart item state machine and stock reconciliation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod lifecycle;
pub mod types;

pub use lifecycle::{
    CheckoutLine, CheckoutPlan, LifecycleError, StockDecrement, ensure_in_stock, plan_checkout,
};
pub use types::*;
