//! Shopping cart module.
//!
//! Contains the cart, coupons, pricing, and the persisted cart store.

mod cart;
mod coupon;
mod pricing;
mod store;

pub use cart::{Cart, CartItem, ItemMetadata, MAX_QUANTITY_PER_ITEM};
pub use coupon::{AppliedCoupon, Coupon, CouponCatalog, CouponRejection, CouponSlot, Eligibility};
pub use pricing::{LinePricing, PriceBreakdown, PricingRules, DEFAULT_TAX_RATE};
pub use store::{CachedCart, CartPersistence, CartStore};

#[cfg(test)]
pub use store::MockCartPersistence;
