use serde::{Deserialize, Serialize};
use stagepass_catalog::Event;

/// One cart row: an event and how many tickets of it.
///
/// The event is flattened into the row, matching the persisted snapshot
/// layout where each entry is the event record plus a quantity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartLineItem {
    #[serde(flatten)]
    pub event: Event,
    pub quantity: u32,
}

impl CartLineItem {
    pub fn new(event: Event, quantity: u32) -> Self {
        Self { event, quantity }
    }

    pub fn line_total_cents(&self) -> i64 {
        self.event.price_cents * i64::from(self.quantity)
    }
}

/// Immutable picture of the cart handed to subscribers and API responses.
///
/// `revision` increases with every mutation; checkout lifecycles are keyed
/// to it so a recorded revision is never written twice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartView {
    pub items: Vec<CartLineItem>,
    pub total_cents: i64,
    pub revision: u64,
}

impl CartView {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total ticket count across all rows, saturating at `u32::MAX`.
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |count, line| count.saturating_add(line.quantity))
    }
}
