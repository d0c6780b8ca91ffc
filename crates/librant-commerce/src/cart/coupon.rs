//! Coupon catalog and evaluation.

use crate::cart::Cart;
use crate::money::Money;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Condition a cart must satisfy for a coupon to apply.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Eligibility {
    /// Any cart qualifies.
    Always,
    /// The cart must hold exactly one line and its title must match
    /// (trimmed, case-insensitive).
    SoleTitle { title: String },
    /// The cart total must reach `amount_cents` in the cart's currency.
    MinimumSubtotal { amount_cents: i64 },
}

impl Eligibility {
    /// Check the rule against `cart`, returning the reason when it fails.
    pub fn check(&self, cart: &Cart) -> Result<(), String> {
        match self {
            Eligibility::Always => Ok(()),
            Eligibility::SoleTitle { title } => {
                let matches = match cart.items() {
                    [only] => only.title.trim().to_lowercase() == title.trim().to_lowercase(),
                    _ => false,
                };
                if matches {
                    Ok(())
                } else {
                    Err(format!(
                        "This coupon is only valid for '{title}'. Please add only that book to your cart to use this coupon."
                    ))
                }
            }
            Eligibility::MinimumSubtotal { amount_cents } => {
                let minimum = Money::new(*amount_cents, cart.currency());
                if cart.total_amount().amount_cents >= *amount_cents {
                    Ok(())
                } else {
                    Err(format!(
                        "This coupon requires a subtotal of at least {}.",
                        minimum.display()
                    ))
                }
            }
        }
    }
}

/// A coupon definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Coupon {
    /// Canonical code (e.g., "WELCOME10").
    pub code: String,
    /// Shown to the user when the coupon is applied.
    pub description: String,
    /// Fraction of the cart total taken off, in `0.0..=1.0`.
    pub discount_rate: f64,
    /// Cart predicate.
    #[serde(default = "default_eligibility")]
    pub eligibility: Eligibility,
}

fn default_eligibility() -> Eligibility {
    Eligibility::Always
}

impl Coupon {
    /// A coupon any cart can use.
    pub fn general(code: impl Into<String>, description: impl Into<String>, rate: f64) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
            discount_rate: rate,
            eligibility: Eligibility::Always,
        }
    }

    /// Restrict this coupon with an eligibility rule.
    pub fn with_eligibility(mut self, eligibility: Eligibility) -> Self {
        self.eligibility = eligibility;
        self
    }

    fn matches(&self, normalized: &str) -> bool {
        self.code.trim().eq_ignore_ascii_case(normalized)
    }
}

/// Why a coupon could not be applied.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CouponRejection {
    /// Nothing was typed.
    #[error("Please enter a coupon code")]
    EmptyCode,

    /// No coupon with this code.
    #[error("Invalid coupon code")]
    InvalidCode(String),

    /// The coupon exists but the cart does not qualify.
    #[error("{reason}")]
    Ineligible { code: String, reason: String },
}

/// A coupon accepted for the current cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppliedCoupon {
    /// Canonical code from the catalog.
    pub code: String,
    /// Coupon description.
    pub description: String,
    /// Rate the discount was computed with.
    pub discount_rate: f64,
    /// `cart total * discount_rate` when the coupon was applied. Pricing
    /// recomputes it from the rate against the cart as it is now.
    pub discount_amount: Money,
}

impl AppliedCoupon {
    /// User-facing confirmation line.
    pub fn message(&self) -> String {
        format!("Coupon applied: {}", self.description)
    }
}

/// The set of coupons the storefront accepts.
#[derive(Debug, Clone, PartialEq)]
pub struct CouponCatalog {
    coupons: Vec<Coupon>,
}

impl CouponCatalog {
    pub fn new(coupons: Vec<Coupon>) -> Self {
        Self { coupons }
    }

    /// Look up a coupon by code, ignoring case and surrounding whitespace.
    pub fn find(&self, code: &str) -> Option<&Coupon> {
        let normalized = code.trim();
        self.coupons.iter().find(|c| c.matches(normalized))
    }

    /// All coupons in catalog order.
    pub fn coupons(&self) -> &[Coupon] {
        &self.coupons
    }

    /// Validate `code` against `cart` and compute the discount.
    pub fn apply(&self, code: &str, cart: &Cart) -> Result<AppliedCoupon, CouponRejection> {
        let normalized = code.trim();
        if normalized.is_empty() {
            return Err(CouponRejection::EmptyCode);
        }

        let coupon = self
            .find(normalized)
            .ok_or_else(|| CouponRejection::InvalidCode(normalized.to_string()))?;

        coupon
            .eligibility
            .check(cart)
            .map_err(|reason| CouponRejection::Ineligible {
                code: coupon.code.clone(),
                reason,
            })?;

        Ok(AppliedCoupon {
            code: coupon.code.clone(),
            description: coupon.description.clone(),
            discount_rate: coupon.discount_rate,
            discount_amount: cart.total_amount().multiply_rate(coupon.discount_rate),
        })
    }
}

impl Default for CouponCatalog {
    /// The storefront's launch coupons.
    fn default() -> Self {
        Self::new(vec![
            Coupon::general("WELCOME10", "10% off your order", 0.10),
            Coupon::general("BOOKS20", "20% off your order", 0.20),
            Coupon::general("FREESHIP", "Free shipping (5% off)", 0.05),
            Coupon::general("SUMMER30", "30% off summer special", 0.30).with_eligibility(
                Eligibility::SoleTitle {
                    title: "Teaches Chess".to_string(),
                },
            ),
        ])
    }
}

/// Holds at most one applied coupon for a checkout session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CouponSlot {
    applied: Option<AppliedCoupon>,
}

impl CouponSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `code`, replacing any coupon already held.
    ///
    /// A rejection leaves the slot as it was.
    pub fn apply(
        &mut self,
        catalog: &CouponCatalog,
        code: &str,
        cart: &Cart,
    ) -> Result<&AppliedCoupon, CouponRejection> {
        match catalog.apply(code, cart) {
            Ok(applied) => {
                tracing::info!(code = %applied.code, discount = %applied.discount_amount, "coupon applied");
                Ok(self.applied.insert(applied))
            }
            Err(rejection) => {
                tracing::warn!(code = code.trim(), %rejection, "coupon rejected");
                Err(rejection)
            }
        }
    }

    /// Drop the applied coupon without re-validating. Returns what was removed.
    pub fn remove(&mut self) -> Option<AppliedCoupon> {
        let removed = self.applied.take();
        if let Some(coupon) = &removed {
            tracing::info!(code = %coupon.code, "coupon removed");
        }
        removed
    }

    pub fn applied(&self) -> Option<&AppliedCoupon> {
        self.applied.as_ref()
    }

    /// Discount in effect for `cart`, zero when no coupon is held.
    pub fn discount(&self, cart: &Cart) -> Money {
        self.applied
            .as_ref()
            .map(|c| cart.total_amount().multiply_rate(c.discount_rate))
            .unwrap_or_else(|| Money::zero(cart.currency()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::ItemMetadata;
    use crate::ids::ProductId;
    use crate::money::Currency;

    fn cart_with(lines: &[(&str, &str, i64, i64)]) -> Cart {
        let mut cart = Cart::new(Currency::BDT);
        for (id, title, quantity, cents) in lines {
            cart.add_item(
                ProductId::new(*id),
                *quantity,
                Money::new(*cents, Currency::BDT),
                ItemMetadata::new(*title),
            )
            .unwrap();
        }
        cart
    }

    #[test]
    fn test_general_coupon() {
        let cart = cart_with(&[("b1", "Dune", 1, 10000)]);
        let applied = CouponCatalog::default().apply("WELCOME10", &cart).unwrap();

        assert_eq!(applied.code, "WELCOME10");
        assert_eq!(applied.discount_amount.amount_cents, 1000);
        assert_eq!(applied.message(), "Coupon applied: 10% off your order");
    }

    #[test]
    fn test_code_is_trimmed_and_case_insensitive() {
        let cart = cart_with(&[("b1", "Dune", 1, 10000)]);
        let applied = CouponCatalog::default().apply("  books20 ", &cart).unwrap();
        assert_eq!(applied.code, "BOOKS20");
        assert_eq!(applied.discount_amount.amount_cents, 2000);
    }

    #[test]
    fn test_empty_code_rejected_before_lookup() {
        let cart = cart_with(&[("b1", "Dune", 1, 10000)]);
        assert_eq!(
            CouponCatalog::default().apply("   ", &cart),
            Err(CouponRejection::EmptyCode)
        );
    }

    #[test]
    fn test_unknown_code() {
        let cart = cart_with(&[("b1", "Dune", 1, 10000)]);
        let err = CouponCatalog::default().apply("FREEBOOKS", &cart).unwrap_err();
        assert_eq!(err, CouponRejection::InvalidCode("FREEBOOKS".into()));
        assert_eq!(err.to_string(), "Invalid coupon code");
    }

    #[test]
    fn test_sole_title_rejects_mixed_cart() {
        let cart = cart_with(&[
            ("b1", "Teaches Chess", 1, 5000),
            ("b2", "Dune", 1, 5000),
        ]);
        let err = CouponCatalog::default().apply("SUMMER30", &cart).unwrap_err();

        match &err {
            CouponRejection::Ineligible { code, reason } => {
                assert_eq!(code, "SUMMER30");
                assert!(reason.contains("'Teaches Chess'"));
                assert!(reason.contains("only that book"));
            }
            other => panic!("unexpected rejection: {other:?}"),
        }
    }

    #[test]
    fn test_sole_title_accepts_matching_cart() {
        let cart = cart_with(&[("b1", "  teaches chess ", 1, 4500)]);
        let applied = CouponCatalog::default().apply("summer30", &cart).unwrap();
        assert_eq!(applied.discount_amount.amount_cents, 1350);
    }

    #[test]
    fn test_sole_title_rejects_empty_cart() {
        let cart = Cart::new(Currency::BDT);
        assert!(matches!(
            CouponCatalog::default().apply("SUMMER30", &cart),
            Err(CouponRejection::Ineligible { .. })
        ));
    }

    #[test]
    fn test_minimum_subtotal() {
        let catalog = CouponCatalog::new(vec![Coupon::general("BIG5", "5% off big orders", 0.05)
            .with_eligibility(Eligibility::MinimumSubtotal { amount_cents: 50000 })]);

        let small = cart_with(&[("b1", "Dune", 1, 49999)]);
        let err = catalog.apply("BIG5", &small).unwrap_err();
        assert!(err.to_string().contains("\u{09f3}500.00"));

        let big = cart_with(&[("b1", "Dune", 1, 50000)]);
        assert_eq!(catalog.apply("BIG5", &big).unwrap().discount_amount.amount_cents, 2500);
    }

    #[test]
    fn test_slot_replaces_instead_of_stacking() {
        let catalog = CouponCatalog::default();
        let cart = cart_with(&[("b1", "Dune", 1, 10000)]);
        let mut slot = CouponSlot::new();

        slot.apply(&catalog, "WELCOME10", &cart).unwrap();
        slot.apply(&catalog, "BOOKS20", &cart).unwrap();

        assert_eq!(slot.applied().unwrap().code, "BOOKS20");
        assert_eq!(slot.discount(&cart).amount_cents, 2000);
    }

    #[test]
    fn test_slot_keeps_coupon_on_rejection() {
        let catalog = CouponCatalog::default();
        let cart = cart_with(&[("b1", "Dune", 1, 10000)]);
        let mut slot = CouponSlot::new();

        slot.apply(&catalog, "WELCOME10", &cart).unwrap();
        assert!(slot.apply(&catalog, "NOPE", &cart).is_err());

        assert_eq!(slot.applied().unwrap().code, "WELCOME10");
    }

    #[test]
    fn test_slot_remove_resets_discount() {
        let catalog = CouponCatalog::default();
        let cart = cart_with(&[("b1", "Dune", 1, 10000)]);
        let mut slot = CouponSlot::new();
        slot.apply(&catalog, "WELCOME10", &cart).unwrap();

        let removed = slot.remove().unwrap();
        assert_eq!(removed.code, "WELCOME10");
        assert!(slot.applied().is_none());
        assert!(slot.discount(&cart).is_zero());
        assert!(slot.remove().is_none());
    }

    #[test]
    fn test_eligibility_deserializes_from_tagged_table() {
        let coupon: Coupon = serde_json::from_value(serde_json::json!({
            "code": "CHESS",
            "description": "Chess special",
            "discount_rate": 0.3,
            "eligibility": { "kind": "sole_title", "title": "Teaches Chess" }
        }))
        .unwrap();
        assert_eq!(
            coupon.eligibility,
            Eligibility::SoleTitle {
                title: "Teaches Chess".into()
            }
        );

        let plain: Coupon = serde_json::from_value(serde_json::json!({
            "code": "X",
            "description": "x",
            "discount_rate": 0.1
        }))
        .unwrap();
        assert_eq!(plain.eligibility, Eligibility::Always);
    }
}
