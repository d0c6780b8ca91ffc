//! Checkout state machine.

use crate::cart::{
    AppliedCoupon, Cart, CartPersistence, CartStore, CouponCatalog, CouponRejection, CouponSlot,
    PriceBreakdown, PricingRules,
};
use crate::checkout::{
    FieldError, OrderDraft, OrderError, OrderGateway, OrderReceipt, PaymentConfirmation,
    PaymentConfirmer, PaymentError, PaymentRequest, ShippingAddress, SubmitGate,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Where the user is sent after a successful order.
pub const DEFAULT_CONFIRMATION_PATH: &str = "/order-confirmation";

/// Shown after a successful order.
pub const ORDER_PLACED_MESSAGE: &str = "Order placed successfully!";

/// Checkout states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CheckoutState {
    /// Waiting for the user to submit.
    #[default]
    Idle,
    /// Checking the form and cart.
    FormValidating,
    /// Waiting on the payment provider.
    PaymentConfirming,
    /// Waiting on the backend to create the order.
    OrderSubmitting,
    /// Order placed, cart cleared.
    Succeeded,
    /// The last attempt failed; the user may submit again.
    Failed(CheckoutFailure),
}

impl CheckoutState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutState::Idle => "idle",
            CheckoutState::FormValidating => "form_validating",
            CheckoutState::PaymentConfirming => "payment_confirming",
            CheckoutState::OrderSubmitting => "order_submitting",
            CheckoutState::Succeeded => "succeeded",
            CheckoutState::Failed(_) => "failed",
        }
    }
}

impl fmt::Display for CheckoutState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which step a failed attempt stopped at, with the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckoutFailure {
    Payment(String),
    Order(String),
}

/// Why a submission did not place an order.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CheckoutError {
    /// One or more form fields are missing or invalid.
    #[error("Please correct the highlighted fields ({} errors)", .0.len())]
    Validation(Vec<FieldError>),

    /// Nothing to order.
    #[error("Your cart is empty")]
    EmptyCart,

    /// The payment provider has not loaded yet.
    #[error("Payment is not ready yet, please try again in a moment")]
    PaymentUnavailable,

    /// Another submission is still running.
    #[error("Your order is already being processed")]
    AlreadyInFlight,

    /// The payment was not confirmed.
    #[error("{0}")]
    Payment(#[from] PaymentError),

    /// The backend did not create the order.
    #[error("An error occurred while processing your order.")]
    Order(#[source] OrderError),
}

/// Result of a placed order.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSuccess {
    pub receipt: OrderReceipt,
    pub payment: PaymentConfirmation,
    /// Prices the order was placed at.
    pub breakdown: PriceBreakdown,
    /// User-facing confirmation.
    pub message: String,
    /// Route to navigate to.
    pub redirect_to: String,
}

/// Sequences form validation, payment confirmation and order submission.
///
/// Owns the checkout session's coupon. The cart is passed in per call so the
/// store stays owned by the caller.
pub struct CheckoutOrchestrator<P, O> {
    payment: P,
    orders: O,
    rules: PricingRules,
    catalog: CouponCatalog,
    coupon: CouponSlot,
    state: CheckoutState,
    gate: SubmitGate,
    confirmation_path: String,
}

impl<P, O> fmt::Debug for CheckoutOrchestrator<P, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckoutOrchestrator")
            .field("rules", &self.rules)
            .field("coupon", &self.coupon)
            .field("state", &self.state)
            .field("gate", &self.gate)
            .field("confirmation_path", &self.confirmation_path)
            .finish_non_exhaustive()
    }
}

impl<P: PaymentConfirmer, O: OrderGateway> CheckoutOrchestrator<P, O> {
    pub fn new(payment: P, orders: O, rules: PricingRules, catalog: CouponCatalog) -> Self {
        Self {
            payment,
            orders,
            rules,
            catalog,
            coupon: CouponSlot::new(),
            state: CheckoutState::Idle,
            gate: SubmitGate::new(),
            confirmation_path: DEFAULT_CONFIRMATION_PATH.to_string(),
        }
    }

    /// Share an in-flight gate with other submit handlers.
    pub fn with_gate(mut self, gate: SubmitGate) -> Self {
        self.gate = gate;
        self
    }

    pub fn with_confirmation_path(mut self, path: impl Into<String>) -> Self {
        self.confirmation_path = path.into();
        self
    }

    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    pub fn gate(&self) -> &SubmitGate {
        &self.gate
    }

    pub fn catalog(&self) -> &CouponCatalog {
        &self.catalog
    }

    pub fn applied_coupon(&self) -> Option<&AppliedCoupon> {
        self.coupon.applied()
    }

    /// Apply a coupon to the current cart, replacing any applied one.
    pub fn apply_coupon(
        &mut self,
        code: &str,
        cart: &Cart,
    ) -> Result<&AppliedCoupon, CouponRejection> {
        self.coupon.apply(&self.catalog, code, cart)
    }

    /// Drop the applied coupon.
    pub fn remove_coupon(&mut self) -> Option<AppliedCoupon> {
        self.coupon.remove()
    }

    /// Current price breakdown for `cart`.
    ///
    /// The applied coupon is checked against `cart` the same way `submit`
    /// checks it, so the preview matches what would be charged.
    pub fn price(&self, cart: &Cart) -> PriceBreakdown {
        let coupon = self.effective_coupon(cart);
        self.rules.price(cart, coupon.as_ref())
    }

    /// The applied coupon as it stands against `cart`, `None` when the cart no
    /// longer qualifies.
    fn effective_coupon(&self, cart: &Cart) -> Option<AppliedCoupon> {
        let code = &self.coupon.applied()?.code;
        self.catalog.apply(code, cart).ok()
    }

    /// Re-evaluate the applied coupon against the cart as it is now.
    ///
    /// The discount is recomputed from the current total. A coupon the cart no
    /// longer qualifies for is dropped.
    pub fn refresh_coupon(&mut self, cart: &Cart) -> Option<CouponRejection> {
        let code = self.coupon.applied()?.code.clone();
        match self.coupon.apply(&self.catalog, &code, cart) {
            Ok(_) => None,
            Err(rejection) => {
                self.coupon.remove();
                Some(rejection)
            }
        }
    }

    /// Run one checkout attempt.
    ///
    /// On success the cart and coupon are cleared. On any failure the cart,
    /// coupon and address are left as they were so the user can retry.
    pub async fn submit<S: CartPersistence>(
        &mut self,
        store: &mut CartStore<S>,
        address: &ShippingAddress,
    ) -> Result<CheckoutSuccess, CheckoutError> {
        let _guard = self
            .gate
            .try_acquire()
            .ok_or(CheckoutError::AlreadyInFlight)?;

        self.transition(CheckoutState::FormValidating);
        if let Err(errors) = address.validate() {
            self.transition(CheckoutState::Idle);
            return Err(CheckoutError::Validation(errors));
        }
        if store.cart().is_empty() {
            self.transition(CheckoutState::Idle);
            return Err(CheckoutError::EmptyCart);
        }
        if !self.payment.is_ready() {
            self.transition(CheckoutState::Idle);
            return Err(CheckoutError::PaymentUnavailable);
        }

        if let Some(rejection) = self.refresh_coupon(store.cart()) {
            tracing::warn!(%rejection, "applied coupon no longer valid for cart");
        }
        let breakdown = self.price(store.cart());

        self.transition(CheckoutState::PaymentConfirming);
        let request = PaymentRequest::new(breakdown.total, address);
        let payment = match self.payment.confirm(&request).await {
            Ok(confirmation) => confirmation,
            Err(error) => {
                tracing::warn!(%error, "payment failed");
                self.transition(CheckoutState::Failed(CheckoutFailure::Payment(
                    error.to_string(),
                )));
                return Err(error.into());
            }
        };

        self.transition(CheckoutState::OrderSubmitting);
        let draft = OrderDraft::new(store.cart(), address, self.coupon.applied());
        let receipt = match self.orders.create_order(&draft).await {
            Ok(receipt) => receipt,
            Err(error) => {
                tracing::warn!(%error, "order submission failed");
                let failure = CheckoutError::Order(error);
                self.transition(CheckoutState::Failed(CheckoutFailure::Order(
                    failure.to_string(),
                )));
                return Err(failure);
            }
        };

        store.clear();
        self.coupon.remove();
        self.transition(CheckoutState::Succeeded);
        tracing::info!(
            order_id = %receipt.order_id,
            total = %breakdown.total,
            items = draft.item_count(),
            "order placed"
        );

        Ok(CheckoutSuccess {
            receipt,
            payment,
            breakdown,
            message: ORDER_PLACED_MESSAGE.to_string(),
            redirect_to: self.confirmation_path.clone(),
        })
    }

    fn transition(&mut self, next: CheckoutState) {
        tracing::info!(from = %self.state, to = %next, "checkout transition");
        self.state = next;
    }
}
