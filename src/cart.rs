//! Cart

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::{
    items::{CatalogItem, LineItem},
    storage::CartStorage,
};

/// Storage key the cart snapshot is persisted under.
pub const DEFAULT_STORAGE_KEY: &str = "tasty_cart";

/// The in-session list of items the user intends to purchase.
///
/// An explicitly owned store object: construct one per session and pass it
/// where it is needed, rather than reaching for an ambient singleton. Lines
/// keep insertion order. Every mutation re-persists the full snapshot to the
/// injected [`CartStorage`]; persistence failures are logged and swallowed so
/// the cart keeps working in memory even when storage is unavailable.
///
/// Invariants: at most one line per catalog id, and every present line has
/// `quantity >= 1`.
#[derive(Debug)]
pub struct Cart<S> {
    items: Vec<LineItem>,
    storage: S,
    storage_key: String,
}

impl<S: CartStorage> Cart<S> {
    /// Create an empty cart persisted under [`DEFAULT_STORAGE_KEY`].
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, DEFAULT_STORAGE_KEY)
    }

    /// Create an empty cart persisted under the given key.
    pub fn with_key(storage: S, storage_key: impl Into<String>) -> Self {
        Self {
            items: Vec::new(),
            storage,
            storage_key: storage_key.into(),
        }
    }

    /// Restore the cart persisted under [`DEFAULT_STORAGE_KEY`], or start
    /// empty if no snapshot exists.
    pub fn hydrate(storage: S) -> Self {
        Self::hydrate_with_key(storage, DEFAULT_STORAGE_KEY)
    }

    /// Restore the cart persisted under the given key, or start empty.
    ///
    /// A missing, unreadable or unparseable snapshot yields an empty cart
    /// rather than an error. Snapshot records are re-checked against the cart
    /// invariants on the way in: duplicate ids merge and zero-quantity lines
    /// drop, so an externally edited snapshot cannot violate them.
    pub fn hydrate_with_key(storage: S, storage_key: impl Into<String>) -> Self {
        let storage_key = storage_key.into();

        let items = match storage.load(&storage_key) {
            Ok(Some(payload)) => match serde_json::from_str::<Vec<LineItem>>(&payload) {
                Ok(lines) => sanitize(lines),
                Err(error) => {
                    warn!(key = %storage_key, %error, "discarding unparseable cart snapshot");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(error) => {
                warn!(key = %storage_key, %error, "failed to load cart snapshot");
                Vec::new()
            }
        };

        Self {
            items,
            storage,
            storage_key,
        }
    }

    /// Add `quantity` units of a catalog item to the cart.
    ///
    /// If a line with the same id already exists its quantity is incremented;
    /// otherwise a new line is appended. Merging is silent and deterministic.
    /// Adding zero units is a no-op, so a line is never created at quantity
    /// zero.
    pub fn add(&mut self, item: CatalogItem, quantity: u32) {
        if quantity == 0 {
            return;
        }

        match self.items.iter_mut().find(|line| line.id == item.id) {
            Some(line) => line.quantity += quantity,
            None => self.items.push(LineItem::new(item, quantity)),
        }

        debug!(lines = self.items.len(), "cart add");
        self.persist();
    }

    /// Set the named line's quantity to exactly `new_quantity`.
    ///
    /// A quantity of zero removes the line entirely. An unknown id is a
    /// no-op: nothing is raised and no line is created.
    pub fn update_quantity(&mut self, id: &str, new_quantity: u32) {
        let Some(position) = self.items.iter().position(|line| line.id == id) else {
            return;
        };

        if new_quantity == 0 {
            self.items.remove(position);
        } else if let Some(line) = self.items.get_mut(position) {
            line.quantity = new_quantity;
        }

        debug!(lines = self.items.len(), "cart update");
        self.persist();
    }

    /// The sum of `unit_price × quantity` over all lines; zero when empty.
    pub fn total(&self) -> Decimal {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Remove every line unconditionally.
    pub fn clear(&mut self) {
        self.items.clear();

        debug!("cart cleared");
        self.persist();
    }

    /// The lines currently in the cart, in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// The number of distinct lines in the cart.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart holds no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Re-persist the full snapshot. Best-effort: failures are logged, never
    /// surfaced, and the in-memory cart is the source of truth regardless.
    fn persist(&self) {
        let payload = match serde_json::to_string(&self.items) {
            Ok(payload) => payload,
            Err(error) => {
                warn!(key = %self.storage_key, %error, "failed to encode cart snapshot");
                return;
            }
        };

        if let Err(error) = self.storage.save(&self.storage_key, &payload) {
            warn!(key = %self.storage_key, %error, "failed to persist cart snapshot");
        }
    }
}

/// Re-impose the cart invariants on records loaded from storage.
fn sanitize(lines: Vec<LineItem>) -> Vec<LineItem> {
    let mut items: Vec<LineItem> = Vec::with_capacity(lines.len());

    for line in lines {
        if line.quantity == 0 {
            continue;
        }

        match items.iter_mut().find(|existing| existing.id == line.id) {
            Some(existing) => existing.quantity += line.quantity,
            None => items.push(line),
        }
    }

    items
}
