//! Cart and line item types.

use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Maximum quantity allowed per line item.
pub const MAX_QUANTITY_PER_ITEM: i64 = 9999;

/// Display data copied from the catalog when a book is added.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemMetadata {
    /// Book title (denormalized for display and coupon rules).
    pub title: String,
    /// Cover image URL.
    pub image: Option<String>,
}

impl ItemMetadata {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// A shopping cart.
///
/// Items keep insertion order, which is also display order. The cart total is
/// derived from the items on every read and never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    items: Vec<CartItem>,
    currency: Currency,
}

impl Cart {
    /// Create an empty cart priced in `currency`.
    pub fn new(currency: Currency) -> Self {
        Self {
            items: Vec::new(),
            currency,
        }
    }

    /// Add a book to the cart.
    ///
    /// Adding a book that is already present increases its quantity.
    ///
    /// Returns an error if:
    /// - Quantity is not positive
    /// - The unit price is negative
    /// - The resulting quantity would exceed MAX_QUANTITY_PER_ITEM
    /// - The price is in a different currency than the cart
    pub fn add_item(
        &mut self,
        product_id: ProductId,
        quantity: i64,
        unit_price: Money,
        metadata: ItemMetadata,
    ) -> Result<(), CommerceError> {
        if quantity < 1 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        if unit_price.is_negative() {
            return Err(CommerceError::NegativePrice(unit_price.amount_cents));
        }
        if unit_price.currency != self.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: unit_price.currency.code().to_string(),
            });
        }

        if let Some(existing) = self.items.iter_mut().find(|i| i.product_id == product_id) {
            let new_quantity = existing
                .quantity
                .checked_add(quantity)
                .ok_or(CommerceError::Overflow)?;
            check_limit(new_quantity)?;

            existing.set_quantity(new_quantity)?;
            return Ok(());
        }

        check_limit(quantity)?;
        let item = CartItem::new(product_id, quantity, unit_price, metadata)?;
        self.items.push(item);
        Ok(())
    }

    /// Set the quantity of a book already in the cart.
    ///
    /// Quantities below one are rejected; use [`Cart::remove_item`] to drop a line.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<(), CommerceError> {
        if quantity < 1 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        check_limit(quantity)?;

        let item = self
            .items
            .iter_mut()
            .find(|i| &i.product_id == product_id)
            .ok_or_else(|| CommerceError::ItemNotInCart(product_id.to_string()))?;
        item.set_quantity(quantity)
    }

    /// Remove a book from the cart. Returns whether a line was removed.
    pub fn remove_item(&mut self, product_id: &ProductId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| &i.product_id != product_id);
        self.items.len() < len_before
    }

    /// Clear all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Items in display order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Cart currency.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Sum of every line's total price.
    ///
    /// Saturates instead of overflowing; the per-line quantity cap keeps real
    /// carts far away from that limit.
    pub fn total_amount(&self) -> Money {
        let cents = self
            .items
            .iter()
            .fold(0_i64, |acc, i| acc.saturating_add(i.total_price.amount_cents));
        Money::new(cents, self.currency)
    }

    /// Get total item count (sum of quantities).
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Get number of distinct books.
    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get a line by book id.
    pub fn get_item(&self, product_id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|i| &i.product_id == product_id)
    }

    /// Re-establish line invariants on a cart that came from outside (storage).
    ///
    /// Lines with an out-of-range quantity or a foreign currency are dropped,
    /// line totals are recomputed. Returns the number of dropped lines.
    pub fn normalize(&mut self) -> usize {
        let currency = self.currency;
        let before = self.items.len();
        self.items.retain_mut(|item| {
            (1..=MAX_QUANTITY_PER_ITEM).contains(&item.quantity)
                && item.unit_price.currency == currency
                && !item.unit_price.is_negative()
                && item.refresh_total().is_ok()
        });
        before - self.items.len()
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new(Currency::default())
    }
}

fn check_limit(quantity: i64) -> Result<(), CommerceError> {
    if quantity > MAX_QUANTITY_PER_ITEM {
        return Err(CommerceError::QuantityExceedsLimit(
            quantity,
            MAX_QUANTITY_PER_ITEM,
        ));
    }
    Ok(())
}

/// A line in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    /// Book id.
    pub product_id: ProductId,
    /// Book title.
    pub title: String,
    /// Unit price.
    pub unit_price: Money,
    /// Quantity, at least 1.
    pub quantity: i64,
    /// Always `unit_price * quantity`.
    pub total_price: Money,
    /// Cover image URL.
    pub image: Option<String>,
}

impl CartItem {
    fn new(
        product_id: ProductId,
        quantity: i64,
        unit_price: Money,
        metadata: ItemMetadata,
    ) -> Result<Self, CommerceError> {
        let total_price = unit_price
            .try_multiply(quantity)
            .ok_or(CommerceError::Overflow)?;
        Ok(Self {
            product_id,
            title: metadata.title,
            unit_price,
            quantity,
            total_price,
            image: metadata.image,
        })
    }

    fn set_quantity(&mut self, quantity: i64) -> Result<(), CommerceError> {
        let total_price = self
            .unit_price
            .try_multiply(quantity)
            .ok_or(CommerceError::Overflow)?;
        self.quantity = quantity;
        self.total_price = total_price;
        Ok(())
    }

    fn refresh_total(&mut self) -> Result<(), CommerceError> {
        self.set_quantity(self.quantity)
    }
}
