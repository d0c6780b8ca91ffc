//! Order drafts and the order creation boundary.

use crate::cart::{AppliedCoupon, Cart};
use crate::checkout::ShippingAddress;
use crate::ids::{OrderId, ProductId};
use crate::money::{serialize_decimal, Money};
use async_trait::async_trait;
use librant_data::{FetchClient, FetchError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default order creation path, relative to the API base URL.
pub const DEFAULT_ORDERS_PATH: &str = "/orders";

/// One ordered book.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// The payload sent to create an order.
///
/// Built from the cart at submission time and discarded afterwards.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub items: Vec<OrderLine>,
    pub shipping_address: ShippingAddress,
    /// Code of the applied coupon, `null` when none.
    pub applied_coupon: Option<String>,
    /// Discount amount as a decimal number.
    #[serde(serialize_with = "serialize_decimal")]
    pub discount: Money,
}

impl OrderDraft {
    /// Snapshot the cart, address and coupon into a draft.
    pub fn new(cart: &Cart, address: &ShippingAddress, coupon: Option<&AppliedCoupon>) -> Self {
        let items = cart
            .items()
            .iter()
            .map(|item| OrderLine {
                product_id: item.product_id.clone(),
                quantity: item.quantity,
            })
            .collect();

        Self {
            items,
            shipping_address: address.clone(),
            applied_coupon: coupon.map(|c| c.code.clone()),
            discount: coupon
                .map(|c| cart.total_amount().multiply_rate(c.discount_rate))
                .unwrap_or_else(|| Money::zero(cart.currency())),
        }
    }

    /// Total units ordered.
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|line| line.quantity).sum()
    }
}

/// Backend acknowledgement of a created order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderReceipt {
    /// Backend id, or a locally generated one when the response had none.
    pub order_id: OrderId,
    /// Server message, if any.
    pub message: Option<String>,
}

/// Order creation failures. The cart is kept and the user may retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    /// The backend answered with a non-success status.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The request never got an answer.
    #[error("Order request failed: {0}")]
    Transport(String),

    /// The draft could not be encoded.
    #[error("Invalid order payload: {0}")]
    Payload(String),
}

impl From<FetchError> for OrderError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::HttpError { status, message } => OrderError::Rejected { status, message },
            FetchError::JsonError(e) => OrderError::Payload(e),
            other => OrderError::Transport(other.to_string()),
        }
    }
}

/// Creates orders on the backend.
#[cfg_attr(test, mockall::automock)]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait OrderGateway: Send + Sync {
    async fn create_order(&self, draft: &OrderDraft) -> Result<OrderReceipt, OrderError>;
}

/// [`OrderGateway`] over the REST backend.
#[derive(Debug, Clone)]
pub struct HttpOrderGateway {
    client: FetchClient,
    orders_path: String,
}

impl HttpOrderGateway {
    /// Post orders to `orders_path` relative to the client's base URL.
    pub fn new(client: FetchClient, orders_path: impl Into<String>) -> Self {
        Self {
            client,
            orders_path: orders_path.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreatedOrder {
    #[serde(rename = "_id", alias = "id")]
    id: Option<String>,
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl OrderGateway for HttpOrderGateway {
    async fn create_order(&self, draft: &OrderDraft) -> Result<OrderReceipt, OrderError> {
        let response = self
            .client
            .post(self.orders_path.as_str())
            .header("Accept", "application/json")
            .json(draft)?
            .send()
            .await?;

        if !response.is_success() {
            return Err(OrderError::Rejected {
                status: response.status,
                message: response.error_message(),
            });
        }

        // A 2xx with an unexpected body still means the order exists.
        let (id, message) = match response.envelope::<CreatedOrder>() {
            Ok(envelope) => (envelope.data.and_then(|d| d.id), envelope.message),
            Err(error) => {
                tracing::warn!(%error, "unreadable order response body");
                (None, None)
            }
        };
        let order_id = match id {
            Some(id) => OrderId::new(id),
            None => {
                let generated = OrderId::generate();
                tracing::debug!(order_id = %generated, "order response had no id");
                generated
            }
        };

        Ok(OrderReceipt { order_id, message })
    }
}
