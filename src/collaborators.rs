//! Collaborator seams

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::order::OrderDraft;

/// Identifier assigned to an accepted order by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderId(pub String);

/// A gateway failure, always retryable from the customer's point of view.
///
/// Carries a short human-readable message; raw backend payloads are never
/// forwarded to the user.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct OrderGatewayError {
    message: String,
}

impl OrderGatewayError {
    /// Create a gateway error with the given user-facing message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The external order-persistence collaborator.
#[automock]
#[async_trait]
pub trait OrderGateway {
    /// Persist the draft as a pending order.
    ///
    /// # Errors
    ///
    /// Returns an [`OrderGatewayError`] if the backend rejects the draft or
    /// is unreachable; the submission may be retried by the user.
    async fn place_order(&self, draft: &OrderDraft) -> Result<OrderId, OrderGatewayError>;
}

/// Views the checkout flow can request a transition to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// The cart page, requested when submit is attempted on an empty cart.
    Cart,

    /// The order-confirmation page, requested on successful checkout.
    OrderConfirmation,
}

/// The navigation collaborator.
#[automock]
pub trait Navigator {
    /// Request a transition to the given view.
    fn navigate_to(&self, view: View);
}

/// The transient-notification (toast) collaborator.
///
/// Fire-and-forget; not part of the checkout state machine's correctness.
#[automock]
pub trait Notifier {
    /// Show a transient success message.
    fn success(&self, message: &str);

    /// Show a transient failure message.
    fn failure(&self, message: &str);
}
