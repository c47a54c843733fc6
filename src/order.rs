//! Orders

use jiff::{Timestamp, civil};
use serde::{Deserialize, Serialize};

use crate::{items::LineItem, pricing::Totals};

/// Where the order should be delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryAddress {
    /// Street and house number.
    pub street: String,

    /// City.
    pub city: String,

    /// State or region.
    pub state: String,

    /// Postal code.
    pub zip_code: String,

    /// What kind of address this is.
    pub kind: AddressKind,
}

/// The address categories offered at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressKind {
    /// A home address.
    Home,

    /// A work address.
    Work,

    /// Anything else.
    Other,
}

/// The delivery slot and destination chosen at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryDetails {
    /// Calendar date the order should arrive.
    pub date: civil::Date,

    /// Time of day the order should arrive.
    pub time: civil::Time,

    /// Destination address.
    pub address: DeliveryAddress,

    /// Free-form instructions for the delivery rider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

/// How the customer chose to pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// UPI / Google Pay.
    Upi,

    /// Credit or debit card.
    Card,

    /// Cash on delivery.
    #[serde(rename = "cod")]
    CashOnDelivery,
}

/// Order lifecycle states as the backend tracks them.
///
/// The checkout engine only ever emits [`OrderStatus::Pending`]; the later
/// states belong to the fulfilment side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Accepted, not yet picked up by the kitchen.
    Pending,

    /// Being prepared.
    Processing,

    /// Delivered to the customer.
    Delivered,

    /// Cancelled before delivery.
    Cancelled,
}

/// The ephemeral, fully priced snapshot of a cart submitted for persistence
/// as an order.
///
/// Built at submit time and handed to the order gateway; the cart is cleared
/// and the draft discarded once the gateway accepts it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    /// Snapshot copy of the cart lines at submit time.
    pub items: Vec<LineItem>,

    /// Priced breakdown of those lines.
    pub totals: Totals,

    /// Delivery slot and destination.
    pub delivery: DeliveryDetails,

    /// Chosen payment method.
    pub payment: PaymentMethod,

    /// Always [`OrderStatus::Pending`] at creation.
    pub status: OrderStatus,

    /// When the draft was created.
    pub created_at: Timestamp,
}

impl OrderDraft {
    /// Assemble a pending draft from a cart snapshot.
    pub fn new(
        items: Vec<LineItem>,
        totals: Totals,
        delivery: DeliveryDetails,
        payment: PaymentMethod,
    ) -> Self {
        Self {
            items,
            totals,
            delivery,
            payment,
            status: OrderStatus::Pending,
            created_at: Timestamp::now(),
        }
    }
}
