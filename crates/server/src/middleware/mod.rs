//! HTTP middleware.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (one `http_request` span per request)
//! 3. Request ID (recorded on that span)

pub mod request_id;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
