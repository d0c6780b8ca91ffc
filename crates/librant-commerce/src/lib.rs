//! Storefront domain logic for Librant.
//!
//! This crate holds the bookstore's client-side core:
//!
//! - **Cart**: line items, coupons, pricing, and the persisted cart store
//! - **Checkout**: address validation, payment confirmation, order submission
//! - **Catalog**: book listings from the backend
//! - **Search**: browsing filters and sorting
//!
//! # Example
//!
//! ```rust
//! use librant_commerce::prelude::*;
//! use librant_cache::Cache;
//!
//! let mut store = CartStore::hydrate(
//!     CachedCart::with_owner(Cache::in_memory(), "guest"),
//!     Currency::BDT,
//! );
//! store
//!     .add_item(
//!         ProductId::new("64f1"),
//!         1,
//!         Money::new(10000, Currency::BDT),
//!         ItemMetadata::new("Dune"),
//!     )
//!     .unwrap();
//!
//! let catalog = CouponCatalog::default();
//! let coupon = catalog.apply("WELCOME10", store.cart()).unwrap();
//! let breakdown = PricingRules::default().price(store.cart(), Some(&coupon));
//!
//! assert_eq!(breakdown.total.display(), "\u{09f3}98.00");
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod search;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Cart
    pub use crate::cart::{
        AppliedCoupon, CachedCart, Cart, CartItem, CartPersistence, CartStore, Coupon,
        CouponCatalog, CouponRejection, CouponSlot, Eligibility, ItemMetadata, PriceBreakdown,
        PricingRules,
    };

    // Catalog
    pub use crate::catalog::Book;

    // Checkout
    pub use crate::checkout::{
        CheckoutError, CheckoutOrchestrator, CheckoutState, CheckoutSuccess, FieldError,
        HttpOrderGateway, OrderDraft, OrderError, OrderGateway, PaymentConfirmer, PaymentError,
        ShippingAddress, SubmitGate,
    };

    // Config
    pub use crate::config::StorefrontConfig;

    // Search
    pub use crate::search::{BookFilter, FilterToggle, SortOption};
}
