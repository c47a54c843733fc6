//! Tiffin
//!
//! Tiffin is the cart, pricing and checkout engine for a tiffin-delivery storefront.
//!
//! The cart keeps an ordered, invariant-checked list of line items and
//! persists its snapshot through a pluggable storage backend; the pricing
//! calculator turns a snapshot into an exact subtotal/tax/delivery breakdown;
//! the checkout orchestrator gates submission behind a small state machine
//! and hands accepted drafts to an external order gateway.

pub mod cart;
pub mod checkout;
pub mod collaborators;
pub mod items;
pub mod order;
pub mod prelude;
pub mod pricing;
pub mod storage;
