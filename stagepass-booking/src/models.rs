use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stagepass_cart::CartLineItem;
use uuid::Uuid;

/// A recorded purchase. Immutable once written; never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_email: String,
    pub items: Vec<CartLineItem>,
    pub total_cents: i64,
    /// Assigned by the document store when the write lands, never by the
    /// caller's clock.
    pub date: DateTime<Utc>,
}

/// A booking before the store has assigned its id and timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBooking {
    pub user_id: Uuid,
    pub user_email: String,
    pub items: Vec<CartLineItem>,
    pub total_cents: i64,
}

/// Order of an indexed `date` query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOrder {
    Desc,
    Asc,
}
