//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                            - Home page with the Plant Stands carousel
//!                                     (?offset=&viewport= scroll position)
//! GET  /health                      - Health check
//!
//! # Products
//! GET  /products                    - All Products grid
//! GET  /products/{sku_id}           - Product detail (?image= main image)
//! GET  /products/{sku_id}/select    - Variation option change (?axis=&option=)
//! POST /products/{sku_id}/cart      - Add to / remove from cart
//!
//! # Cart
//! GET  /cart                        - Cart page
//! ```

pub mod cart;
pub mod home;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{sku_id}", get(products::show))
        .route("/{sku_id}/select", get(products::select))
        .route("/{sku_id}/cart", post(products::toggle_cart))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Product routes
        .nest("/products", product_routes())
        // Cart page
        .route("/cart", get(cart::show))
}
