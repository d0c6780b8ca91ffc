//! Storefront configuration.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use anyhow::{ensure, Context, Result};
use librant_data::{FetchClient, Transport};
use serde::{Deserialize, Serialize};

use crate::cart::{Coupon, CouponCatalog, PricingRules, DEFAULT_TAX_RATE};
use crate::checkout::{HttpOrderGateway, DEFAULT_CONFIRMATION_PATH, DEFAULT_ORDERS_PATH};
use crate::money::{Currency, Money};

/// Production API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://librant-server.vercel.app";

/// Storefront configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    #[serde(default)]
    pub pricing: PricingConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub checkout: CheckoutConfig,

    /// Coupon table. The built-in coupons apply when the key is absent; an
    /// explicit empty list disables coupons.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupons: Option<Vec<Coupon>>,
}

impl StorefrontConfig {
    /// Load and validate a config file. `.json` files are read as JSON,
    /// anything else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))?
        };

        config
            .validate()
            .with_context(|| format!("Invalid config: {}", path.display()))?;
        tracing::debug!(path = %path.display(), "storefront config loaded");
        Ok(config)
    }

    /// Check rates, fees and coupon codes.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            (0.0..=1.0).contains(&self.pricing.tax_rate),
            "tax_rate must be between 0 and 1, got {}",
            self.pricing.tax_rate
        );
        ensure!(
            self.pricing.shipping_fee_cents >= 0,
            "shipping_fee_cents must not be negative"
        );
        ensure!(
            self.api.base_url.starts_with("http://") || self.api.base_url.starts_with("https://"),
            "api.base_url must be an http(s) URL, got {:?}",
            self.api.base_url
        );

        let mut seen = HashSet::new();
        for coupon in self.coupons.iter().flatten() {
            let code = coupon.code.trim().to_uppercase();
            ensure!(!code.is_empty(), "coupon code must not be empty");
            ensure!(
                (0.0..=1.0).contains(&coupon.discount_rate),
                "coupon {} discount_rate must be between 0 and 1, got {}",
                coupon.code,
                coupon.discount_rate
            );
            ensure!(seen.insert(code), "duplicate coupon code: {}", coupon.code);
        }
        Ok(())
    }

    /// Tax and shipping rules in the configured currency.
    pub fn pricing_rules(&self) -> PricingRules {
        PricingRules::new(
            self.pricing.tax_rate,
            Money::new(self.pricing.shipping_fee_cents, self.pricing.currency),
        )
    }

    /// Configured coupons, or the built-in ones.
    pub fn coupon_catalog(&self) -> CouponCatalog {
        match &self.coupons {
            Some(coupons) => CouponCatalog::new(coupons.clone()),
            None => CouponCatalog::default(),
        }
    }

    /// API client sending through `transport`.
    pub fn fetch_client(&self, transport: Arc<dyn Transport>) -> FetchClient {
        FetchClient::with_transport(transport)
            .with_base_url(self.api.base_url.clone())
            .with_default_header("Accept", "application/json")
    }

    /// Order gateway for the configured backend.
    pub fn order_gateway(&self, transport: Arc<dyn Transport>) -> HttpOrderGateway {
        HttpOrderGateway::new(self.fetch_client(transport), self.api.orders_path.clone())
    }
}

/// `[pricing]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    #[serde(default)]
    pub currency: Currency,

    #[serde(default = "default_tax_rate")]
    pub tax_rate: f64,

    #[serde(default)]
    pub shipping_fee_cents: i64,
}

fn default_tax_rate() -> f64 {
    DEFAULT_TAX_RATE
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            currency: Currency::default(),
            tax_rate: default_tax_rate(),
            shipping_fee_cents: 0,
        }
    }
}

/// `[api]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_orders_path")]
    pub orders_path: String,
}

fn default_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_orders_path() -> String {
    DEFAULT_ORDERS_PATH.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            orders_path: default_orders_path(),
        }
    }
}

/// `[checkout]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutConfig {
    #[serde(default = "default_confirmation_path")]
    pub confirmation_path: String,
}

fn default_confirmation_path() -> String {
    DEFAULT_CONFIRMATION_PATH.to_string()
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            confirmation_path: default_confirmation_path(),
        }
    }
}
