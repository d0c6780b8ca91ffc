//! Book listings.

use crate::cart::ItemMetadata;
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// A book as the backend returns it.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub title: String,
    pub author: String,
    /// Price in major units.
    pub price: f64,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub in_stock: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    /// Older records use `imageUrl` instead of `image`.
    #[serde(default)]
    pub image_url: Option<String>,
}

/// A book listed in the storefront.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Book {
    pub id: ProductId,
    pub title: String,
    pub author: String,
    pub category: String,
    pub price: Money,
    /// Units in stock.
    pub quantity: i64,
    pub in_stock: bool,
    pub description: Option<String>,
    /// Cover image URL.
    pub image: Option<String>,
}

impl Book {
    /// Convert a backend record, pricing it in `currency`.
    pub fn from_record(record: BookRecord, currency: Currency) -> Self {
        let image = record
            .image
            .filter(|url| !url.trim().is_empty())
            .or(record.image_url)
            .map(|url| fix_image_url(&url));

        Self {
            id: record.id,
            title: record.title,
            author: record.author,
            category: record.category,
            price: Money::from_decimal(record.price, currency),
            quantity: record.quantity.unwrap_or(0),
            in_stock: record.in_stock,
            description: record.description,
            image,
        }
    }

    /// Display data for a cart line.
    pub fn item_metadata(&self) -> ItemMetadata {
        let metadata = ItemMetadata::new(self.title.clone());
        match &self.image {
            Some(image) => metadata.with_image(image.clone()),
            None => metadata,
        }
    }
}

/// Some stored cover URLs carry a broken `i.ibb.co.com` host.
fn fix_image_url(url: &str) -> String {
    url.replace("i.ibb.co.com", "i.ibb.co")
}
