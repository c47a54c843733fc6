//! Checkout

use std::time::Duration;

use jiff::civil;
use thiserror::Error;
use tracing::info;

use crate::{
    cart::Cart,
    collaborators::{Navigator, Notifier, OrderGateway, OrderGatewayError, OrderId, View},
    order::{DeliveryAddress, DeliveryDetails, OrderDraft, PaymentMethod},
    pricing::{PricingConfig, compute_totals},
    storage::CartStorage,
};

/// Why a submission was blocked. Each variant is a distinct user-facing
/// message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BlockReason {
    /// Submit was attempted on an empty cart; the orchestrator also requests
    /// navigation back to the cart view.
    #[error("your cart is empty")]
    EmptyCart,

    /// No delivery date was selected.
    #[error("please select a delivery date")]
    MissingDeliveryDate,

    /// No delivery time was selected.
    #[error("please select a delivery time")]
    MissingDeliveryTime,

    /// The terms-and-conditions checkbox was left unchecked.
    #[error("please accept the terms and conditions")]
    TermsNotAccepted,

    /// The order gateway rejected the draft or was unreachable; the user may
    /// retry with a fresh submit.
    #[error("{0}")]
    SubmissionFailed(String),
}

/// Errors returned by [`Checkout::submit`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// A submission is already in flight; re-entry is rejected by the state
    /// machine itself, not just by a disabled button.
    #[error("an order submission is already in progress")]
    SubmissionInProgress,

    /// A precondition failed or the gateway reported a retryable failure.
    #[error(transparent)]
    Blocked(#[from] BlockReason),
}

/// Where the checkout state machine currently is.
///
/// Validation is transient inside [`Checkout::submit`]: a submit either
/// reaches `Submitting` or lands in `Blocked` with a distinct reason, so no
/// observable `Validating` state exists between the two.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CheckoutState {
    /// Waiting for a submit.
    #[default]
    Idle,

    /// An order draft is with the gateway; re-entry is rejected.
    Submitting,

    /// The last submit was rejected; returns to `Idle` once the user corrects
    /// input and submits again. Never auto-retries.
    Blocked(BlockReason),

    /// The gateway accepted the order and the cart has been cleared.
    Completed,
}

/// The raw checkout form state as the user left it.
///
/// The orchestrator owns turning "option unset" and "checkbox false" into
/// [`BlockReason`]s; callers pass the form through unjudged.
#[derive(Debug, Clone)]
pub struct SubmitRequest {
    /// Chosen delivery date, if any.
    pub delivery_date: Option<civil::Date>,

    /// Chosen delivery time, if any.
    pub delivery_time: Option<civil::Time>,

    /// Destination address.
    pub address: DeliveryAddress,

    /// Free-form rider instructions.
    pub instructions: Option<String>,

    /// Chosen payment method.
    pub payment: PaymentMethod,

    /// Whether the terms-and-conditions checkbox was ticked.
    pub terms_accepted: bool,
}

/// Gates the transition from cart to submitted order.
///
/// Drives the linear `Idle → Submitting → Completed` machine with `Blocked`
/// reachable on any precondition or gateway failure. On success the cart is
/// cleared *before* the machine enters `Completed`, so a completed order
/// always implies an empty cart and the same items can never be submitted
/// twice.
#[derive(Debug)]
pub struct Checkout<G, N, T> {
    gateway: G,
    navigator: N,
    notifier: T,
    pricing: PricingConfig,
    timeout: Option<Duration>,
    state: CheckoutState,
}

impl<G, N, T> Checkout<G, N, T>
where
    G: OrderGateway,
    N: Navigator,
    T: Notifier,
{
    /// Create an orchestrator with default pricing and no submission timeout.
    pub fn new(gateway: G, navigator: N, notifier: T) -> Self {
        Self {
            gateway,
            navigator,
            notifier,
            pricing: PricingConfig::default(),
            timeout: None,
            state: CheckoutState::Idle,
        }
    }

    /// Use the given pricing configuration instead of the defaults.
    pub fn with_pricing(mut self, pricing: PricingConfig) -> Self {
        self.pricing = pricing;
        self
    }

    /// Bound how long a submission may stay with the gateway. Without one the
    /// machine stays in `Submitting` for as long as the gateway call runs.
    /// Expiry is a retryable submission failure like any other gateway error.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The machine's current state.
    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    /// Return the machine to `Idle`, e.g. to start a fresh order after
    /// `Completed`.
    pub fn reset(&mut self) {
        self.state = CheckoutState::Idle;
    }

    /// Validate preconditions and, if they all hold, price the cart and hand
    /// the draft to the order gateway.
    ///
    /// On success the cart is cleared, navigation to the confirmation view is
    /// requested and a success toast fired. On a gateway failure the cart is
    /// left exactly as it was and the failure is retryable by a fresh submit.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::SubmissionInProgress`] if a submission is already
    ///   in flight.
    /// - [`CheckoutError::Blocked`] if a precondition failed (the machine
    ///   lands in [`CheckoutState::Blocked`] with the same reason) or the
    ///   gateway reported a failure.
    pub async fn submit<S: CartStorage>(
        &mut self,
        cart: &mut Cart<S>,
        request: &SubmitRequest,
    ) -> Result<OrderId, CheckoutError> {
        if self.state == CheckoutState::Submitting {
            return Err(CheckoutError::SubmissionInProgress);
        }

        let delivery = match validate(cart, request) {
            Ok(delivery) => delivery,
            Err(reason) => {
                if reason == BlockReason::EmptyCart {
                    self.navigator.navigate_to(View::Cart);
                }
                self.state = CheckoutState::Blocked(reason.clone());
                return Err(reason.into());
            }
        };

        self.state = CheckoutState::Submitting;

        let totals = compute_totals(cart.items(), &self.pricing);
        let draft = OrderDraft::new(cart.items().to_vec(), totals, delivery, request.payment);

        match self.place_order(&draft).await {
            Ok(order_id) => {
                // Clear before Completed: a completed order implies an empty
                // cart, so the same items cannot be submitted twice.
                cart.clear();
                self.state = CheckoutState::Completed;

                info!(order = %order_id.0, total = %draft.totals.total, "order placed");
                self.navigator.navigate_to(View::OrderConfirmation);
                self.notifier.success("Order placed successfully");

                Ok(order_id)
            }
            Err(error) => {
                let reason = BlockReason::SubmissionFailed(error.to_string());
                self.state = CheckoutState::Blocked(reason.clone());
                self.notifier.failure(&error.to_string());

                Err(reason.into())
            }
        }
    }

    async fn place_order(&self, draft: &OrderDraft) -> Result<OrderId, OrderGatewayError> {
        match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, self.gateway.place_order(draft)).await
            {
                Ok(result) => result,
                Err(_) => Err(OrderGatewayError::new("order submission timed out")),
            },
            None => self.gateway.place_order(draft).await,
        }
    }
}

/// Check the submit preconditions in a fixed order: empty cart first (it
/// navigates rather than messages), then delivery date, time and terms.
fn validate<S: CartStorage>(
    cart: &Cart<S>,
    request: &SubmitRequest,
) -> Result<DeliveryDetails, BlockReason> {
    if cart.is_empty() {
        return Err(BlockReason::EmptyCart);
    }

    let date = request.delivery_date.ok_or(BlockReason::MissingDeliveryDate)?;
    let time = request.delivery_time.ok_or(BlockReason::MissingDeliveryTime)?;

    if !request.terms_accepted {
        return Err(BlockReason::TermsNotAccepted);
    }

    Ok(DeliveryDetails {
        date,
        time,
        address: request.address.clone(),
        instructions: request.instructions.clone(),
    })
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use super::*;
    use crate::{
        collaborators::{MockNavigator, MockNotifier, MockOrderGateway},
        items::CatalogItem,
        order::{AddressKind, OrderStatus},
        storage::MemoryStorage,
    };

    fn address() -> DeliveryAddress {
        DeliveryAddress {
            street: "14 MG Road".to_owned(),
            city: "Pune".to_owned(),
            state: "MH".to_owned(),
            zip_code: "411001".to_owned(),
            kind: AddressKind::Home,
        }
    }

    fn complete_request() -> SubmitRequest {
        SubmitRequest {
            delivery_date: Some(civil::date(2026, 9, 1)),
            delivery_time: Some(civil::time(8, 30, 0, 0)),
            address: address(),
            instructions: None,
            payment: PaymentMethod::Upi,
            terms_accepted: true,
        }
    }

    fn stocked_cart() -> Cart<MemoryStorage> {
        let mut cart = Cart::new(MemoryStorage::new());
        cart.add(
            CatalogItem {
                id: "thali".to_owned(),
                name: "Veg Thali".to_owned(),
                unit_price: dec!(100),
                image: String::new(),
            },
            2,
        );
        cart
    }

    fn quiet_notifier() -> MockNotifier {
        MockNotifier::new()
    }

    #[tokio::test]
    async fn empty_cart_blocks_and_navigates_to_cart_view() {
        let gateway = MockOrderGateway::new();
        let mut navigator = MockNavigator::new();
        navigator
            .expect_navigate_to()
            .withf(|view| *view == View::Cart)
            .times(1)
            .return_const(());

        let mut checkout = Checkout::new(gateway, navigator, quiet_notifier());
        let mut cart = Cart::new(MemoryStorage::new());

        let result = checkout.submit(&mut cart, &complete_request()).await;

        assert_eq!(
            result,
            Err(CheckoutError::Blocked(BlockReason::EmptyCart))
        );
        assert_eq!(
            checkout.state(),
            &CheckoutState::Blocked(BlockReason::EmptyCart)
        );
    }

    #[tokio::test]
    async fn missing_delivery_date_blocks() {
        let mut checkout =
            Checkout::new(MockOrderGateway::new(), MockNavigator::new(), quiet_notifier());
        let mut cart = stocked_cart();

        let request = SubmitRequest {
            delivery_date: None,
            ..complete_request()
        };

        let result = checkout.submit(&mut cart, &request).await;

        assert_eq!(
            result,
            Err(CheckoutError::Blocked(BlockReason::MissingDeliveryDate))
        );
        assert_eq!(cart.len(), 1, "blocked submit must not touch the cart");
    }

    #[tokio::test]
    async fn missing_delivery_time_blocks() {
        let mut checkout =
            Checkout::new(MockOrderGateway::new(), MockNavigator::new(), quiet_notifier());
        let mut cart = stocked_cart();

        let request = SubmitRequest {
            delivery_time: None,
            ..complete_request()
        };

        let result = checkout.submit(&mut cart, &request).await;

        assert_eq!(
            result,
            Err(CheckoutError::Blocked(BlockReason::MissingDeliveryTime))
        );
    }

    #[tokio::test]
    async fn unaccepted_terms_block() {
        let mut checkout =
            Checkout::new(MockOrderGateway::new(), MockNavigator::new(), quiet_notifier());
        let mut cart = stocked_cart();

        let request = SubmitRequest {
            terms_accepted: false,
            ..complete_request()
        };

        let result = checkout.submit(&mut cart, &request).await;

        assert_eq!(
            result,
            Err(CheckoutError::Blocked(BlockReason::TermsNotAccepted))
        );
    }

    #[tokio::test]
    async fn successful_submit_clears_cart_and_completes() -> TestResult {
        let mut gateway = MockOrderGateway::new();
        gateway
            .expect_place_order()
            .withf(|draft| {
                draft.status == OrderStatus::Pending
                    && draft.totals.subtotal == dec!(200)
                    && draft.totals.total == dec!(250)
            })
            .times(1)
            .returning(|_| Ok(OrderId("order-1".to_owned())));

        let mut navigator = MockNavigator::new();
        navigator
            .expect_navigate_to()
            .withf(|view| *view == View::OrderConfirmation)
            .times(1)
            .return_const(());

        let mut notifier = MockNotifier::new();
        notifier.expect_success().times(1).return_const(());

        let mut checkout = Checkout::new(gateway, navigator, notifier);
        let mut cart = stocked_cart();

        let order_id = checkout.submit(&mut cart, &complete_request()).await?;

        assert_eq!(order_id, OrderId("order-1".to_owned()));
        assert_eq!(checkout.state(), &CheckoutState::Completed);
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);

        Ok(())
    }

    #[tokio::test]
    async fn gateway_failure_blocks_and_preserves_cart() {
        let mut gateway = MockOrderGateway::new();
        gateway
            .expect_place_order()
            .times(1)
            .returning(|_| Err(OrderGatewayError::new("kitchen is offline")));

        let mut notifier = MockNotifier::new();
        notifier
            .expect_failure()
            .withf(|message| message == "kitchen is offline")
            .times(1)
            .return_const(());

        let mut checkout = Checkout::new(gateway, MockNavigator::new(), notifier);
        let mut cart = stocked_cart();
        let before: Vec<_> = cart.items().to_vec();

        let result = checkout.submit(&mut cart, &complete_request()).await;

        assert_eq!(
            result,
            Err(CheckoutError::Blocked(BlockReason::SubmissionFailed(
                "kitchen is offline".to_owned()
            )))
        );
        assert_eq!(cart.items(), before, "failed submit must not touch the cart");
    }

    #[tokio::test]
    async fn blocked_submission_is_retryable() -> TestResult {
        let mut gateway = MockOrderGateway::new();
        let mut attempts = 0_u32;
        gateway.expect_place_order().times(2).returning(move |_| {
            attempts += 1;
            if attempts == 1 {
                Err(OrderGatewayError::new("temporarily unavailable"))
            } else {
                Ok(OrderId("order-2".to_owned()))
            }
        });

        let mut navigator = MockNavigator::new();
        navigator.expect_navigate_to().times(1).return_const(());

        let mut notifier = MockNotifier::new();
        notifier.expect_failure().times(1).return_const(());
        notifier.expect_success().times(1).return_const(());

        let mut checkout = Checkout::new(gateway, navigator, notifier);
        let mut cart = stocked_cart();

        assert!(checkout.submit(&mut cart, &complete_request()).await.is_err());

        let order_id = checkout.submit(&mut cart, &complete_request()).await?;
        assert_eq!(order_id, OrderId("order-2".to_owned()));

        Ok(())
    }

    struct NeverGateway;

    #[async_trait]
    impl OrderGateway for NeverGateway {
        async fn place_order(&self, _draft: &OrderDraft) -> Result<OrderId, OrderGatewayError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn submission_timeout_is_a_retryable_failure() {
        let mut notifier = MockNotifier::new();
        notifier.expect_failure().times(1).return_const(());

        let mut checkout = Checkout::new(NeverGateway, MockNavigator::new(), notifier)
            .with_timeout(Duration::from_millis(10));
        let mut cart = stocked_cart();

        let result = checkout.submit(&mut cart, &complete_request()).await;

        assert_eq!(
            result,
            Err(CheckoutError::Blocked(BlockReason::SubmissionFailed(
                "order submission timed out".to_owned()
            )))
        );
        assert_eq!(cart.len(), 1);
    }

    #[tokio::test]
    async fn custom_pricing_configuration_flows_into_the_draft() -> TestResult {
        let mut gateway = MockOrderGateway::new();
        gateway
            .expect_place_order()
            .withf(|draft| draft.totals.tax == dec!(20) && draft.totals.total == dec!(230))
            .times(1)
            .returning(|_| Ok(OrderId("order-3".to_owned())));

        let mut navigator = MockNavigator::new();
        navigator.expect_navigate_to().times(1).return_const(());
        let mut notifier = MockNotifier::new();
        notifier.expect_success().times(1).return_const(());

        let pricing = PricingConfig::new(dec!(0.10), dec!(10))?;

        let mut checkout = Checkout::new(gateway, navigator, notifier).with_pricing(pricing);
        let mut cart = stocked_cart();

        let result = checkout.submit(&mut cart, &complete_request()).await;
        assert!(result.is_ok(), "submit should succeed: {result:?}");

        Ok(())
    }
}
