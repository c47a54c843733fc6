//! Tiffin prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, DEFAULT_STORAGE_KEY},
    checkout::{BlockReason, Checkout, CheckoutError, CheckoutState, SubmitRequest},
    collaborators::{
        Navigator, Notifier, OrderGateway, OrderGatewayError, OrderId, View,
    },
    items::{CatalogItem, LineItem},
    order::{
        AddressKind, DeliveryAddress, DeliveryDetails, OrderDraft, OrderStatus, PaymentMethod,
    },
    pricing::{PricingConfig, PricingConfigError, Totals, compute_totals},
    storage::{CartStorage, JsonFileStorage, MemoryStorage, StorageError},
};
