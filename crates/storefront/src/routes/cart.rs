//! Cart route handlers.
//!
//! The cart lives in the visitor's session; this page only reads it. Entries
//! are added and removed from the product page.

use askama::Template;
use askama_web::WebTemplate;
use rust_decimal::Decimal;
use tower_sessions::Session;
use tracing::instrument;
use verdant_core::cart::{CartEntry, CartStore};
use verdant_core::Price;

use crate::filters;
use crate::services::{SessionCartStore, Toast};

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub price: String,
    pub thumbnail: String,
    pub quantity: u32,
    /// Recorded variation choices as `axis: option` labels.
    pub variations: Vec<String>,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl CartView {
    /// Build the view from stored entries.
    #[must_use]
    pub fn from_entries(entries: &[CartEntry]) -> Self {
        let currency = entries
            .first()
            .map(|entry| entry.price.currency_code)
            .unwrap_or_default();
        let subtotal: Decimal = entries
            .iter()
            .map(|entry| entry.price.amount * Decimal::from(entry.quantity))
            .sum();

        Self {
            items: entries.iter().map(CartItemView::from).collect(),
            subtotal: Price::new(subtotal, currency).display(),
            item_count: entries.iter().map(|entry| entry.quantity).sum(),
        }
    }
}

impl From<&CartEntry> for CartItemView {
    fn from(entry: &CartEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            name: entry.name.clone(),
            price: entry.price.display(),
            thumbnail: entry.thumbnail.clone(),
            quantity: entry.quantity,
            variations: entry
                .variations
                .iter()
                .map(|choice| format!("{}: {}", choice.axis_id, choice.option_id))
                .collect(),
        }
    }
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub toast: Option<Toast>,
}

/// Display cart page.
#[instrument(skip(session))]
pub async fn show(session: Session) -> CartShowTemplate {
    let entries = SessionCartStore::new(session.clone()).get().await;

    CartShowTemplate {
        cart: CartView::from_entries(&entries),
        toast: Toast::take(&session).await,
    }
}
