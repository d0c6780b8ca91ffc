//! Checkout module.
//!
//! Contains the checkout state machine, shipping address validation, and the
//! payment and order boundaries.

mod address;
mod flow;
mod gate;
mod order;
mod payment;

pub use address::{AddressField, FieldError, ShippingAddress};
pub use flow::{
    CheckoutError, CheckoutFailure, CheckoutOrchestrator, CheckoutState, CheckoutSuccess,
    DEFAULT_CONFIRMATION_PATH, ORDER_PLACED_MESSAGE,
};
pub use gate::{SubmitGate, SubmitGuard};
pub use order::{
    HttpOrderGateway, OrderDraft, OrderError, OrderGateway, OrderLine, OrderReceipt,
    DEFAULT_ORDERS_PATH,
};
pub use payment::{PaymentConfirmation, PaymentConfirmer, PaymentError, PaymentRequest};

#[cfg(test)]
pub use order::MockOrderGateway;
#[cfg(test)]
pub use payment::MockPaymentConfirmer;
