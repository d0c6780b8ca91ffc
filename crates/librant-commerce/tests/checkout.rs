//! End-to-end checkout behavior: cart store, coupons, pricing, payment and
//! order submission over the HTTP gateway.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use librant_cache::Cache;
use librant_commerce::cart::{CachedCart, CartStore, CouponCatalog, ItemMetadata, PricingRules};
use librant_commerce::checkout::{
    CheckoutError, CheckoutOrchestrator, CheckoutState, HttpOrderGateway, OrderDraft, OrderError,
    OrderGateway, OrderReceipt, PaymentConfirmation, PaymentConfirmer, PaymentError,
    PaymentRequest, ShippingAddress, SubmitGate,
};
use librant_commerce::config::StorefrontConfig;
use librant_commerce::money::{Currency, Money};
use librant_commerce::ProductId;
use librant_data::{FetchError, Request, Response, Transport};
use mockall::mock;
use serde_json::Value;

mock! {
    pub Payment {}

    #[async_trait]
    impl PaymentConfirmer for Payment {
        fn is_ready(&self) -> bool;
        async fn confirm(&self, request: &PaymentRequest) -> Result<PaymentConfirmation, PaymentError>;
    }
}

mock! {
    pub Orders {}

    #[async_trait]
    impl OrderGateway for Orders {
        async fn create_order(&self, draft: &OrderDraft) -> Result<OrderReceipt, OrderError>;
    }
}

mock! {
    pub Backend {}

    #[async_trait]
    impl Transport for Backend {
        async fn execute(&self, request: Request) -> Result<Response, FetchError>;
    }
}

/// Payment provider that never answers.
struct StalledPayment;

#[async_trait]
impl PaymentConfirmer for StalledPayment {
    fn is_ready(&self) -> bool {
        true
    }

    async fn confirm(&self, _request: &PaymentRequest) -> Result<PaymentConfirmation, PaymentError> {
        std::future::pending().await
    }
}

fn taka(cents: i64) -> Money {
    Money::new(cents, Currency::BDT)
}

fn address() -> ShippingAddress {
    ShippingAddress {
        full_name: "Rahim Uddin".into(),
        email: "rahim@example.com".into(),
        address_line1: "12 Lake Road".into(),
        address_line2: "Flat 4B".into(),
        city: "Dhaka".into(),
        state: "Dhaka".into(),
        country: "Bangladesh".into(),
        postal_code: "1205".into(),
        phone_number: "01700000000".into(),
    }
}

fn store(cache: &Cache, lines: &[(&str, &str, i64, i64)]) -> CartStore<CachedCart> {
    let mut store = CartStore::hydrate(CachedCart::with_owner(cache.clone(), "guest"), Currency::BDT);
    for (id, title, quantity, cents) in lines {
        store
            .add_item(ProductId::new(*id), *quantity, taka(*cents), ItemMetadata::new(*title))
            .unwrap();
    }
    store
}

fn ready_payment() -> MockPayment {
    let mut payment = MockPayment::new();
    payment.expect_is_ready().return_const(true);
    payment.expect_confirm().returning(|_| {
        Ok(PaymentConfirmation {
            reference: "pi_test".into(),
        })
    });
    payment
}

fn http_gateway(backend: MockBackend) -> HttpOrderGateway {
    StorefrontConfig::default().order_gateway(Arc::new(backend))
}

fn created(id: &str) -> Response {
    let body = format!(r#"{{"success":true,"message":"Order created","data":{{"_id":"{id}"}}}}"#);
    Response::new(201, HashMap::new(), body.into_bytes())
}

#[tokio::test]
async fn welcome_coupon_order_is_posted_and_cart_cleared() {
    let cache = Cache::in_memory();
    let mut store = store(&cache, &[("64f1", "Dune", 1, 10000)]);

    let bodies = Arc::new(Mutex::new(Vec::<Value>::new()));
    let seen = Arc::clone(&bodies);
    let mut backend = MockBackend::new();
    backend.expect_execute().times(1).returning(move |request: Request| {
        assert_eq!(request.url, "https://librant-server.vercel.app/orders");
        seen.lock().unwrap().push(request.json_body().unwrap().unwrap());
        Ok(created("ord-100"))
    });

    let mut checkout = CheckoutOrchestrator::new(
        ready_payment(),
        http_gateway(backend),
        PricingRules::default(),
        CouponCatalog::default(),
    );

    let coupon = checkout.apply_coupon("WELCOME10", store.cart()).unwrap();
    assert_eq!(coupon.discount_amount, taka(1000));

    let breakdown = checkout.price(store.cart());
    assert_eq!(breakdown.discount, taka(1000));
    assert_eq!(breakdown.tax, taka(800));
    assert_eq!(breakdown.total, taka(9800));

    let success = checkout.submit(&mut store, &address()).await.unwrap();
    assert_eq!(success.receipt.order_id.as_str(), "ord-100");
    assert_eq!(success.message, "Order placed successfully!");
    assert_eq!(success.redirect_to, "/order-confirmation");

    let body = bodies.lock().unwrap()[0].clone();
    assert_eq!(
        body,
        serde_json::json!({
            "items": [{ "productId": "64f1", "quantity": 1 }],
            "shippingAddress": {
                "fullName": "Rahim Uddin",
                "email": "rahim@example.com",
                "addressLine1": "12 Lake Road",
                "addressLine2": "Flat 4B",
                "city": "Dhaka",
                "state": "Dhaka",
                "country": "Bangladesh",
                "postalCode": "1205",
                "phoneNumber": "01700000000"
            },
            "appliedCoupon": "WELCOME10",
            "discount": 10.0
        })
    );

    assert!(store.cart().is_empty());
    assert!(store.cart().total_amount().is_zero());
    assert!(checkout.applied_coupon().is_none());

    let reloaded = CartStore::hydrate(CachedCart::with_owner(cache, "guest"), Currency::BDT);
    assert!(reloaded.cart().is_empty());
}

#[tokio::test]
async fn failed_submission_keeps_cart_and_retry_sends_same_draft() {
    let cache = Cache::in_memory();
    let mut store = store(
        &cache,
        &[("64f1", "Dune", 2, 4500), ("64f2", "Emma", 1, 1000)],
    );

    let bodies = Arc::new(Mutex::new(Vec::<Value>::new()));
    let seen = Arc::clone(&bodies);
    let mut backend = MockBackend::new();
    backend.expect_execute().times(2).returning(move |request: Request| {
        let mut seen = seen.lock().unwrap();
        seen.push(request.json_body().unwrap().unwrap());
        if seen.len() == 1 {
            Ok(Response::new(
                503,
                HashMap::new(),
                br#"{"success":false,"message":"Service unavailable"}"#.to_vec(),
            ))
        } else {
            Ok(created("ord-200"))
        }
    });

    let mut checkout = CheckoutOrchestrator::new(
        ready_payment(),
        http_gateway(backend),
        PricingRules::default(),
        CouponCatalog::default(),
    );
    checkout.apply_coupon("books20", store.cart()).unwrap();
    let before = checkout.price(store.cart());

    let err = checkout.submit(&mut store, &address()).await.unwrap_err();
    assert!(matches!(
        err,
        CheckoutError::Order(OrderError::Rejected { status: 503, .. })
    ));
    assert!(matches!(checkout.state(), CheckoutState::Failed(_)));
    assert_eq!(store.cart().item_count(), 3);
    assert_eq!(checkout.price(store.cart()), before);

    let success = checkout.submit(&mut store, &address()).await.unwrap();
    assert_eq!(success.breakdown, before);
    assert_eq!(success.receipt.order_id.as_str(), "ord-200");

    let bodies = bodies.lock().unwrap();
    assert_eq!(bodies[0], bodies[1]);
    assert_eq!(bodies[0]["appliedCoupon"], "BOOKS20");
}

#[tokio::test]
async fn sole_title_coupon_rejected_for_mixed_cart() {
    let cache = Cache::in_memory();
    let store = store(
        &cache,
        &[("64f1", "Teaches Chess", 1, 5000), ("64f2", "Dune", 1, 5000)],
    );

    let mut checkout = CheckoutOrchestrator::new(
        MockPayment::new(),
        MockOrders::new(),
        PricingRules::default(),
        CouponCatalog::default(),
    );

    let rejection = checkout.apply_coupon("SUMMER30", store.cart()).unwrap_err();
    assert!(rejection.to_string().contains("only valid for 'Teaches Chess'"));
    assert!(checkout.applied_coupon().is_none());

    let breakdown = checkout.price(store.cart());
    assert!(breakdown.discount.is_zero());
    assert_eq!(breakdown.total, taka(10800));
}

#[tokio::test]
async fn sole_title_coupon_accepted_for_single_copy() {
    let cache = Cache::in_memory();
    let store = store(&cache, &[("64f1", "Teaches Chess", 1, 5000)]);

    let mut checkout = CheckoutOrchestrator::new(
        MockPayment::new(),
        MockOrders::new(),
        PricingRules::default(),
        CouponCatalog::default(),
    );

    checkout.apply_coupon("SUMMER30", store.cart()).unwrap();
    let breakdown = checkout.price(store.cart());
    assert_eq!(breakdown.discount, taka(1500));
    assert_eq!(breakdown.total, taka(5000 + 400 - 1500));
}

#[tokio::test]
async fn removing_coupon_restores_full_total() {
    let cache = Cache::in_memory();
    let store = store(&cache, &[("64f1", "Dune", 3, 2500)]);

    let mut checkout = CheckoutOrchestrator::new(
        MockPayment::new(),
        MockOrders::new(),
        PricingRules::default(),
        CouponCatalog::default(),
    );

    checkout.apply_coupon("FREESHIP", store.cart()).unwrap();
    assert_eq!(checkout.price(store.cart()).discount, taka(375));

    let removed = checkout.remove_coupon().unwrap();
    assert_eq!(removed.code, "FREESHIP");

    let breakdown = checkout.price(store.cart());
    assert!(breakdown.discount.is_zero());
    assert_eq!(breakdown.total, taka(7500 + 600));
}

#[tokio::test]
async fn abandoned_submission_releases_gate_and_keeps_cart() {
    let cache = Cache::in_memory();
    let gate = SubmitGate::new();
    let mut stalled_store = store(&cache, &[("64f1", "Dune", 1, 10000)]);

    let mut orders = MockOrders::new();
    orders.expect_create_order().never();
    let mut stalled = CheckoutOrchestrator::new(
        StalledPayment,
        orders,
        PricingRules::default(),
        CouponCatalog::default(),
    )
    .with_gate(gate.clone());

    {
        let address = address();
        let mut attempt = std::pin::pin!(stalled.submit(&mut stalled_store, &address));
        tokio::select! {
            biased;
            _ = &mut attempt => panic!("stalled payment should not complete"),
            _ = std::future::ready(()) => {}
        }
        assert!(gate.is_in_flight());

        let mut payment = MockPayment::new();
        payment.expect_confirm().never();
        let mut other_store = store(&Cache::in_memory(), &[("64f9", "Emma", 1, 1000)]);
        let mut other = CheckoutOrchestrator::new(
            payment,
            MockOrders::new(),
            PricingRules::default(),
            CouponCatalog::default(),
        )
        .with_gate(gate.clone());

        let err = other.submit(&mut other_store, &address).await.unwrap_err();
        assert_eq!(err, CheckoutError::AlreadyInFlight);
    }

    assert!(!gate.is_in_flight());
    assert_eq!(stalled_store.cart().item_count(), 1);
    assert_eq!(stalled_store.cart().total_amount(), taka(10000));
}

#[test]
fn cart_total_tracks_long_mutation_sequence() {
    let cache = Cache::in_memory();
    let mut store = store(&cache, &[]);
    let ids = ["a", "b", "c", "d"];

    // Deterministic pseudo-random walk over add/update/remove.
    let mut seed: u64 = 0x5eed;
    for step in 0..500 {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let id = ProductId::new(ids[(seed >> 33) as usize % ids.len()]);
        let quantity = ((seed >> 17) % 5) as i64;
        let price = taka(100 + ((seed >> 40) % 900) as i64);

        match step % 3 {
            0 => {
                let _ = store.add_item(id, quantity, price, ItemMetadata::new("Book"));
            }
            1 => {
                let _ = store.update_quantity(&id, quantity);
            }
            _ => {
                store.remove_item(&id);
            }
        }

        let sum: i64 = store
            .cart()
            .items()
            .iter()
            .map(|item| item.total_price.amount_cents)
            .sum();
        assert_eq!(store.cart().total_amount().amount_cents, sum);
        for item in store.cart().items() {
            assert!(item.quantity >= 1);
            assert_eq!(
                item.total_price.amount_cents,
                item.unit_price.amount_cents * item.quantity
            );
        }
    }

    let reloaded = CartStore::hydrate(CachedCart::with_owner(cache, "guest"), Currency::BDT);
    assert_eq!(reloaded.cart(), store.cart());
}
