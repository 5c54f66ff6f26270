//! Cartwheel server library.
//!
//! HTTP API for customers, products and carts, backed by `PostgreSQL`.
//! Exposed as a library so the CLI and integration tests can reuse the
//! database layer and services.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
