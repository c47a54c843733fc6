//! Pricing

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::items::LineItem;

/// Errors related to pricing configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingConfigError {
    /// The tax rate was negative.
    #[error("tax rate {0} is negative")]
    NegativeTaxRate(Decimal),

    /// The delivery charge was negative.
    #[error("delivery charge {0} is negative")]
    NegativeDeliveryCharge(Decimal),
}

/// Configuration inputs to the pricing calculator.
///
/// Both values are supplied by configuration, never hard-coded at call sites.
/// The defaults carry the storefront's reference values: a 5% tax rate and a
/// flat delivery charge of 40 currency units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingConfig {
    tax_rate: Decimal,
    delivery_charge: Decimal,
}

impl PricingConfig {
    /// Create a pricing configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingConfigError`] if either value is negative.
    pub fn new(tax_rate: Decimal, delivery_charge: Decimal) -> Result<Self, PricingConfigError> {
        if tax_rate.is_sign_negative() && !tax_rate.is_zero() {
            return Err(PricingConfigError::NegativeTaxRate(tax_rate));
        }

        if delivery_charge.is_sign_negative() && !delivery_charge.is_zero() {
            return Err(PricingConfigError::NegativeDeliveryCharge(delivery_charge));
        }

        Ok(Self {
            tax_rate,
            delivery_charge,
        })
    }

    /// The fractional tax rate applied to the subtotal.
    pub fn tax_rate(&self) -> Decimal {
        self.tax_rate
    }

    /// The flat delivery charge added to every order.
    pub fn delivery_charge(&self) -> Decimal {
        self.delivery_charge
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            tax_rate: dec!(0.05),
            delivery_charge: dec!(40),
        }
    }
}

/// A priced breakdown of a cart snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    /// Sum of `unit_price × quantity` over all lines.
    pub subtotal: Decimal,

    /// `subtotal × tax_rate`.
    pub tax: Decimal,

    /// Flat delivery charge from configuration.
    pub delivery_charge: Decimal,

    /// `subtotal + tax + delivery_charge`.
    pub total: Decimal,
}

impl Totals {
    /// A copy rounded to `dp` decimal places for display.
    ///
    /// The calculator itself never rounds; rounding only ever happens here, at
    /// the edge, so no rounding error compounds across subtotal, tax and
    /// total.
    pub fn rounded(&self, dp: u32) -> Self {
        let round = |value: Decimal| {
            value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
        };

        Self {
            subtotal: round(self.subtotal),
            tax: round(self.tax),
            delivery_charge: round(self.delivery_charge),
            total: round(self.total),
        }
    }
}

/// Price a cart snapshot.
///
/// Pure and deterministic: identical inputs always produce identical totals,
/// and `total == subtotal + tax + delivery_charge` exactly. An empty snapshot
/// prices to a zero subtotal and tax, leaving only the delivery charge.
///
/// A negative unit price reaching this function is a broken cart invariant
/// upstream, a programmer error rather than an input to be corrected here.
pub fn compute_totals(items: &[LineItem], config: &PricingConfig) -> Totals {
    debug_assert!(
        items.iter().all(|item| !item.unit_price.is_sign_negative()),
        "negative unit price violates the cart invariant"
    );

    let subtotal: Decimal = items.iter().map(LineItem::line_total).sum();
    let tax = subtotal * config.tax_rate();
    let total = subtotal + tax + config.delivery_charge();

    Totals {
        subtotal,
        tax,
        delivery_charge: config.delivery_charge(),
        total,
    }
}
