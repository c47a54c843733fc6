//! Line items

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A catalog entry as presented by the menu, without a quantity.
///
/// This is the shape callers pass to [`crate::cart::Cart::add`]; the cart
/// itself owns quantities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    /// Stable catalog identifier, unique per product.
    pub id: String,

    /// Display label.
    pub name: String,

    /// Non-negative price per unit, minor-unit-agnostic.
    pub unit_price: Decimal,

    /// Image URL or symbolic token, cosmetic only.
    pub image: String,
}

/// One product plus the quantity of it currently in the cart.
///
/// Invariant: `quantity >= 1` for any line present in a cart. A line never
/// exists at quantity zero; the cart removes it instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Stable catalog identifier; the cart's merge key.
    pub id: String,

    /// Display label, immutable once added.
    pub name: String,

    /// Non-negative price per unit.
    pub unit_price: Decimal,

    /// Units of this product in the cart.
    pub quantity: u32,

    /// Image URL or symbolic token, cosmetic only.
    pub image: String,
}

impl LineItem {
    /// Create a line for the given catalog item at the given quantity.
    pub fn new(item: CatalogItem, quantity: u32) -> Self {
        Self {
            id: item.id,
            name: item.name,
            unit_price: item.unit_price,
            quantity,
            image: item.image,
        }
    }

    /// The extended price of this line: `unit_price × quantity`.
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}
