//! Customer domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use cartwheel_core::{CartId, CustomerId};

/// Longest customer name accepted.
pub const MAX_CUSTOMER_NAME_LEN: usize = 100;

/// A customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Customer {
    /// Unique customer ID.
    pub id: CustomerId,
    /// Display name.
    pub name: String,
    /// When the customer was created.
    pub created_at: DateTime<Utc>,
}

/// A customer together with the cart provisioned for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerWithCart {
    #[serde(flatten)]
    pub customer: Customer,
    /// The customer's cart.
    pub cart_id: CartId,
}
