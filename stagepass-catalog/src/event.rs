use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A catalog entry customers can put tickets for in their cart.
///
/// Prices are integer cents so cart totals stay exact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Event {
    pub id: u32,
    pub title: String,
    pub date: NaiveDate,
    pub location: String,
    pub price_cents: i64,
    pub thumbnail: String,
    pub description: String,
}
