//! Shopping cart persisted through an injected store.
//!
//! The cart is an unordered list of [`CartEntry`] values kept under a single
//! well-known key. Every mutation reads the whole list and writes it back in
//! full; there is no locking, so concurrent writers race and the last write
//! wins.
//!
//! Membership is decided by product identity alone. Callers check
//! [`contains`] before [`add`]; the store itself never deduplicates.

use std::future::Future;
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::product::{Product, VariationChoice};
use crate::types::{Price, ProductId};

/// Key the cart list is persisted under.
pub const CART_STORAGE_KEY: &str = "purchasedProducts";

/// Errors raised by a [`CartStore`] backend.
#[derive(Debug, Error)]
pub enum CartStoreError {
    /// The backend could not persist the list.
    #[error("cart storage failed: {0}")]
    Storage(String),
}

/// One product in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub thumbnail: String,
    /// Always 1; quantities are not incremented.
    pub quantity: u32,
    /// Variation choices recorded on the product when it was added.
    pub variations: Vec<VariationChoice>,
}

impl CartEntry {
    /// Snapshot a product into a new entry.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            thumbnail: product.thumbnail.clone(),
            quantity: 1,
            variations: product.variations.clone(),
        }
    }
}

/// Durable storage for the cart list.
pub trait CartStore {
    /// Read the full list. Unreadable content yields an empty list.
    fn get(&self) -> impl Future<Output = Vec<CartEntry>> + Send;

    /// Replace the full list.
    fn set(&self, entries: Vec<CartEntry>)
    -> impl Future<Output = Result<(), CartStoreError>> + Send;
}

/// What [`toggle`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartChange {
    Added,
    Removed,
}

/// Whether any stored entry has this product's identity.
pub async fn contains<S: CartStore + Sync>(store: &S, id: &ProductId) -> bool {
    store.get().await.iter().any(|entry| &entry.id == id)
}

/// Append an entry.
///
/// # Errors
///
/// Returns an error if the store fails to persist the list.
pub async fn add<S: CartStore + Sync>(store: &S, entry: CartEntry) -> Result<(), CartStoreError> {
    let mut entries = store.get().await;
    entries.push(entry);
    store.set(entries).await
}

/// Remove every entry with this identity. Absent ids leave the list unchanged.
///
/// # Errors
///
/// Returns an error if the store fails to persist the list.
pub async fn remove<S: CartStore + Sync>(store: &S, id: &ProductId) -> Result<(), CartStoreError> {
    let mut entries = store.get().await;
    entries.retain(|entry| &entry.id != id);
    store.set(entries).await
}

/// Add the product if it is not in the cart, remove it if it is.
///
/// # Errors
///
/// Returns an error if the store fails to persist the list.
pub async fn toggle<S: CartStore + Sync>(
    store: &S,
    product: &Product,
) -> Result<CartChange, CartStoreError> {
    if contains(store, &product.id).await {
        remove(store, &product.id).await?;
        Ok(CartChange::Removed)
    } else {
        add(store, CartEntry::from_product(product)).await?;
        Ok(CartChange::Added)
    }
}

/// Decode persisted cart content.
///
/// Anything other than a JSON array decodes to an empty list; array elements
/// that are not valid entries are dropped.
#[must_use]
pub fn decode_entries(value: serde_json::Value) -> Vec<CartEntry> {
    match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    }
}

/// In-process [`CartStore`], useful for tests and previews.
#[derive(Debug, Default)]
pub struct MemoryCartStore {
    entries: Mutex<Vec<CartEntry>>,
}

impl MemoryCartStore {
    #[must_use]
    pub fn new(entries: Vec<CartEntry>) -> Self {
        Self {
            entries: Mutex::new(entries),
        }
    }

    /// Copy of the stored list.
    #[must_use]
    pub fn snapshot(&self) -> Vec<CartEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl CartStore for MemoryCartStore {
    async fn get(&self) -> Vec<CartEntry> {
        self.snapshot()
    }

    async fn set(&self, entries: Vec<CartEntry>) -> Result<(), CartStoreError> {
        *self.entries.lock().unwrap_or_else(PoisonError::into_inner) = entries;
        Ok(())
    }
}
