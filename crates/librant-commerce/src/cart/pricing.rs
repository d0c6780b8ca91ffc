//! Cart pricing calculations.

use crate::cart::{AppliedCoupon, Cart};
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Default sales tax rate.
pub const DEFAULT_TAX_RATE: f64 = 0.08;

/// Tax and shipping settings applied to every cart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingRules {
    /// Fraction of the subtotal charged as tax.
    pub tax_rate: f64,
    /// Flat shipping fee.
    pub shipping_fee: Money,
}

impl PricingRules {
    pub fn new(tax_rate: f64, shipping_fee: Money) -> Self {
        Self {
            tax_rate,
            shipping_fee,
        }
    }

    /// Default rules for `currency`: 8% tax, free shipping.
    pub fn for_currency(currency: Currency) -> Self {
        Self::new(DEFAULT_TAX_RATE, Money::zero(currency))
    }

    /// Compute the full breakdown for `cart` with an optional applied coupon.
    ///
    /// The discount is the coupon's rate applied to the current subtotal, so
    /// it tracks quantity edits made after the coupon was applied.
    /// `total = max(0, subtotal + tax + shipping - discount)`.
    pub fn price(&self, cart: &Cart, coupon: Option<&AppliedCoupon>) -> PriceBreakdown {
        let currency = cart.currency();
        let subtotal = cart.total_amount();
        let tax = subtotal.multiply_rate(self.tax_rate);
        let shipping = Money::new(self.shipping_fee.amount_cents, currency);
        let discount = coupon
            .map(|c| subtotal.multiply_rate(c.discount_rate))
            .unwrap_or_else(|| Money::zero(currency));

        let total = subtotal
            .amount_cents
            .saturating_add(tax.amount_cents)
            .saturating_add(shipping.amount_cents)
            .saturating_sub(discount.amount_cents);

        let lines = cart
            .items()
            .iter()
            .map(|item| LinePricing {
                product_id: item.product_id.clone(),
                title: item.title.clone(),
                unit_price: item.unit_price,
                quantity: item.quantity,
                total: item.total_price,
            })
            .collect();

        PriceBreakdown {
            subtotal,
            tax,
            shipping,
            discount,
            total: Money::new(total, currency).clamp_non_negative(),
            coupon_code: coupon.map(|c| c.code.clone()),
            lines,
            item_count: cart.item_count(),
            unique_item_count: cart.unique_item_count(),
        }
    }
}

impl Default for PricingRules {
    fn default() -> Self {
        Self::for_currency(Currency::default())
    }
}

/// Complete pricing breakdown for a cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceBreakdown {
    /// Sum of line totals.
    pub subtotal: Money,
    /// Tax on the subtotal.
    pub tax: Money,
    /// Shipping cost.
    pub shipping: Money,
    /// Coupon discount.
    pub discount: Money,
    /// Amount due, never negative.
    pub total: Money,
    /// Code of the coupon the discount came from.
    pub coupon_code: Option<String>,
    /// Per-line breakdown in cart order.
    pub lines: Vec<LinePricing>,
    /// Total units across lines.
    pub item_count: i64,
    /// Number of distinct lines.
    pub unique_item_count: usize,
}

impl PriceBreakdown {
    /// Check if a discount is applied.
    pub fn has_discount(&self) -> bool {
        self.discount.amount_cents > 0
    }

    /// Discount as a percentage of the subtotal.
    pub fn discount_percentage(&self) -> f64 {
        if self.subtotal.amount_cents == 0 {
            return 0.0;
        }
        (self.discount.amount_cents as f64 / self.subtotal.amount_cents as f64) * 100.0
    }
}

/// Pricing for a single cart line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinePricing {
    pub product_id: ProductId,
    pub title: String,
    pub unit_price: Money,
    pub quantity: i64,
    /// `unit_price * quantity`.
    pub total: Money,
}
