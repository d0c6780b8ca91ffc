//! External payment confirmation boundary.

use crate::checkout::ShippingAddress;
use crate::money::Money;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What the payment provider is asked to confirm.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentRequest {
    /// Amount due after tax, shipping and discount.
    pub amount: Money,
    /// Billing contact.
    pub billing_name: String,
    pub billing_email: String,
}

impl PaymentRequest {
    pub fn new(amount: Money, address: &ShippingAddress) -> Self {
        Self {
            amount,
            billing_name: address.full_name.trim().to_string(),
            billing_email: address.email.trim().to_string(),
        }
    }
}

/// Provider acknowledgement of a confirmed payment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentConfirmation {
    /// Provider reference (e.g., a payment intent id).
    pub reference: String,
}

/// Payment failures. The user may retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaymentError {
    /// The card was declined or rejected by the provider.
    #[error("{0}")]
    Declined(String),

    /// The provider could not be reached.
    #[error("Payment provider unavailable: {0}")]
    Unavailable(String),
}

/// Confirms payment with an external provider.
#[cfg_attr(test, mockall::automock)]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait PaymentConfirmer: Send + Sync {
    /// Whether the provider has finished loading. Checkout is a no-op until it has.
    fn is_ready(&self) -> bool;

    /// Confirm the payment.
    async fn confirm(&self, request: &PaymentRequest) -> Result<PaymentConfirmation, PaymentError>;
}
