//! Cart store backed by the visitor's session.

use tower_sessions::Session;
use verdant_core::cart::{CartEntry, CartStore, CartStoreError, decode_entries};

use crate::models::session_keys;

/// [`CartStore`] that keeps the cart list in the session.
///
/// Stored content that is not a list of entries reads as an empty cart.
#[derive(Clone)]
pub struct SessionCartStore {
    session: Session,
}

impl SessionCartStore {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }
}

impl CartStore for SessionCartStore {
    async fn get(&self) -> Vec<CartEntry> {
        match self.session.get_value(session_keys::CART).await {
            Ok(Some(value)) => decode_entries(value),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read cart from session");
                Vec::new()
            }
        }
    }

    async fn set(&self, entries: Vec<CartEntry>) -> Result<(), CartStoreError> {
        self.session
            .insert(session_keys::CART, entries)
            .await
            .map_err(|e| CartStoreError::Storage(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use tower_sessions::MemoryStore;
    use verdant_core::ProductId;
    use verdant_core::cart;

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    fn entry(id: &str) -> CartEntry {
        serde_json::from_value(json!({
            "id": id,
            "name": "Gold Circle",
            "price": {"amount": "35", "currency_code": "GBP"},
            "thumbnail": "/t.jpg",
            "quantity": 1,
            "variations": []
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_empty_session_has_empty_cart() {
        let store = SessionCartStore::new(session());
        assert!(store.get().await.is_empty());
    }

    #[tokio::test]
    async fn test_entries_round_trip_through_session() {
        let session = session();
        let store = SessionCartStore::new(session.clone());

        cart::add(&store, entry("p1")).await.unwrap();
        cart::add(&store, entry("p2")).await.unwrap();
        cart::remove(&store, &ProductId::new("p1")).await.unwrap();

        let reread = SessionCartStore::new(session);
        let ids: Vec<ProductId> = reread.get().await.into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![ProductId::new("p2")]);
    }

    #[tokio::test]
    async fn test_malformed_content_reads_as_empty() {
        let session = session();
        session
            .insert(session_keys::CART, json!({"not": "a list"}))
            .await
            .unwrap();

        let store = SessionCartStore::new(session);
        assert!(store.get().await.is_empty());
    }
}
