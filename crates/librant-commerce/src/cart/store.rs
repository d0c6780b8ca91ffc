//! Persisted cart container.

use crate::cart::{Cart, ItemMetadata};
use crate::error::CommerceError;
use crate::ids::{ProductId, UserId};
use crate::money::{Currency, Money};
use librant_cache::{cache_key, Cache};

/// Where a cart is loaded from and saved to.
#[cfg_attr(test, mockall::automock)]
pub trait CartPersistence {
    /// Load the saved cart, `None` if nothing was saved yet.
    fn load(&self) -> Result<Option<Cart>, CommerceError>;

    /// Replace the saved cart.
    fn save(&self, cart: &Cart) -> Result<(), CommerceError>;
}

/// Cart persistence over a [`Cache`] under a `cart:<owner>` key.
#[derive(Debug, Clone)]
pub struct CachedCart {
    cache: Cache,
    key: String,
}

impl CachedCart {
    /// Persist the cart of a signed-in user.
    pub fn for_user(cache: Cache, user: &UserId) -> Self {
        Self::with_owner(cache, user.as_str())
    }

    /// Persist under an arbitrary owner (e.g., "guest").
    pub fn with_owner(cache: Cache, owner: &str) -> Self {
        Self {
            cache,
            key: cache_key!("cart", owner),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl CartPersistence for CachedCart {
    fn load(&self) -> Result<Option<Cart>, CommerceError> {
        Ok(self.cache.get(&self.key)?)
    }

    fn save(&self, cart: &Cart) -> Result<(), CommerceError> {
        Ok(self.cache.set(&self.key, cart)?)
    }
}

/// The current shopping cart plus its persistence.
///
/// Every successful mutation is saved. A failed save is logged and the
/// in-memory cart keeps the change.
#[derive(Debug)]
pub struct CartStore<P> {
    cart: Cart,
    persistence: P,
}

impl<P: CartPersistence> CartStore<P> {
    /// Load the saved cart, or start empty in `currency`.
    ///
    /// A saved cart in another currency, or one that cannot be read, is
    /// discarded.
    pub fn hydrate(persistence: P, currency: Currency) -> Self {
        let cart = match persistence.load() {
            Ok(Some(mut cart)) if cart.currency() == currency => {
                let dropped = cart.normalize();
                if dropped > 0 {
                    tracing::warn!(dropped, "dropped invalid lines from saved cart");
                }
                tracing::debug!(items = cart.unique_item_count(), "cart hydrated");
                cart
            }
            Ok(Some(cart)) => {
                tracing::warn!(
                    saved = %cart.currency(),
                    expected = %currency,
                    "saved cart currency differs, starting empty"
                );
                Cart::new(currency)
            }
            Ok(None) => Cart::new(currency),
            Err(error) => {
                tracing::warn!(%error, "failed to load saved cart, starting empty");
                Cart::new(currency)
            }
        };

        Self { cart, persistence }
    }

    /// The current cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Add a book, merging with an existing line.
    pub fn add_item(
        &mut self,
        product_id: ProductId,
        quantity: i64,
        unit_price: Money,
        metadata: ItemMetadata,
    ) -> Result<(), CommerceError> {
        tracing::debug!(product_id = %product_id, quantity, "add to cart");
        self.cart.add_item(product_id, quantity, unit_price, metadata)?;
        self.persist();
        Ok(())
    }

    /// Set a line's quantity.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<(), CommerceError> {
        tracing::debug!(product_id = %product_id, quantity, "update cart quantity");
        self.cart.update_quantity(product_id, quantity)?;
        self.persist();
        Ok(())
    }

    /// Remove a line. Returns `false` when the book was not in the cart.
    pub fn remove_item(&mut self, product_id: &ProductId) -> bool {
        let removed = self.cart.remove_item(product_id);
        if removed {
            tracing::debug!(product_id = %product_id, "removed from cart");
            self.persist();
        }
        removed
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.cart.clear();
        tracing::debug!("cart cleared");
        self.persist();
    }

    fn persist(&self) {
        if let Err(error) = self.persistence.save(&self.cart) {
            tracing::warn!(%error, "failed to save cart");
        }
    }
}
