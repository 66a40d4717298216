use std::sync::Arc;

use stagepass_catalog::Event;
use tokio::sync::{watch, RwLock};

use crate::models::{CartLineItem, CartView};
use crate::snapshot::SnapshotStore;

#[derive(Debug, thiserror::Error)]
pub enum CartError {
    #[error("Quantity must be at least 1")]
    ZeroQuantity,
}

struct CartInner {
    items: Vec<CartLineItem>,
    revision: u64,
}

/// The single cart behind the storefront.
///
/// Rows keep insertion order and hold at most one entry per event id. Every
/// mutation recomputes the total, bumps the revision, replaces the persisted
/// snapshot and notifies subscribers. A snapshot write failure is logged and
/// never poisons the in-memory cart.
pub struct CartStore {
    inner: RwLock<CartInner>,
    view_tx: watch::Sender<CartView>,
    snapshot: Arc<dyn SnapshotStore>,
}

impl CartStore {
    pub fn new(snapshot: Arc<dyn SnapshotStore>) -> Self {
        let empty = CartView {
            items: Vec::new(),
            total_cents: 0,
            revision: 0,
        };
        let (view_tx, _) = watch::channel(empty);
        Self {
            inner: RwLock::new(CartInner {
                items: Vec::new(),
                revision: 0,
            }),
            view_tx,
            snapshot,
        }
    }

    /// Adopt the persisted cart, if there is one. Called once at startup.
    ///
    /// An unreadable snapshot is logged and the cart starts empty; the next
    /// mutation overwrites it.
    pub async fn restore(&self) {
        match self.snapshot.load().await {
            Ok(Some(items)) => {
                let mut inner = self.inner.write().await;
                inner.items = items;
                let view = Self::view_of(&inner);
                tracing::info!(
                    "Restored cart snapshot: {} rows, {} cents",
                    view.items.len(),
                    view.total_cents
                );
                self.view_tx.send_replace(view);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("Cart snapshot unreadable, starting empty: {}", e);
            }
        }
    }

    /// Put tickets for an event in the cart.
    ///
    /// A row for the same event id grows by `quantity`; otherwise a new row is
    /// appended.
    pub async fn add_to_cart(&self, event: Event, quantity: u32) -> Result<CartView, CartError> {
        if quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }

        let mut inner = self.inner.write().await;
        match inner.items.iter_mut().find(|line| line.event.id == event.id) {
            // Same saturation policy as update_quantity
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => inner.items.push(CartLineItem::new(event, quantity)),
        }
        Ok(self.commit(&mut inner).await)
    }

    /// Set the quantity of a row outright. Zero or negative removes the row.
    pub async fn update_quantity(&self, event_id: u32, quantity: i64) -> CartView {
        let mut inner = self.inner.write().await;
        if quantity <= 0 {
            inner.items.retain(|line| line.event.id != event_id);
        } else if let Some(line) = inner.items.iter_mut().find(|l| l.event.id == event_id) {
            // Quantities are u32 on the wire; anything larger saturates
            line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
        self.commit(&mut inner).await
    }

    /// Drop a row. Absent ids are a no-op.
    pub async fn remove_from_cart(&self, event_id: u32) -> CartView {
        let mut inner = self.inner.write().await;
        inner.items.retain(|line| line.event.id != event_id);
        self.commit(&mut inner).await
    }

    /// Empty the cart.
    pub async fn clear(&self) -> CartView {
        let mut inner = self.inner.write().await;
        inner.items.clear();
        self.commit(&mut inner).await
    }

    /// The cart as of this instant.
    pub fn view(&self) -> CartView {
        self.view_tx.borrow().clone()
    }

    /// Live feed of cart changes.
    pub fn subscribe(&self) -> watch::Receiver<CartView> {
        self.view_tx.subscribe()
    }

    // Seals a mutation: bump the revision, persist the full snapshot, notify.
    // Runs under the write lock so snapshots land in revision order.
    async fn commit(&self, inner: &mut CartInner) -> CartView {
        inner.revision += 1;
        let view = Self::view_of(inner);

        if let Err(e) = self.snapshot.save(&inner.items).await {
            tracing::error!("Cart snapshot write failed: {}", e);
        }
        self.view_tx.send_replace(view.clone());
        view
    }

    fn view_of(inner: &CartInner) -> CartView {
        CartView {
            items: inner.items.clone(),
            total_cents: inner.items.iter().map(CartLineItem::line_total_cents).sum(),
            revision: inner.revision,
        }
    }
}
