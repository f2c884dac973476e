//! Catalog API client.
//!
//! # Architecture
//!
//! - Plain JSON over HTTP with `reqwest`; every response is wrapped in a
//!   `{ "success": bool, "data": ... }` envelope
//! - The catalog is the source of truth - no local sync, direct API calls
//! - In-memory caching via `moka` for API responses (5 minute TTL by default)
//! - Wire records are converted into `verdant_core` types at the boundary
//!
//! # Endpoints
//!
//! ```text
//! GET {base}/product-sku/{sku_id}                       - product detail for one SKU
//! GET {base}/variation-by-product-id/{product_id}       - variation axes with options
//! GET {base}/skus-variation-by-product-id/{product_id}  - SKUs with their option pairs
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use verdant_storefront::catalog::CatalogClient;
//!
//! let client = CatalogClient::new(&config.catalog)?;
//! let payload = client.load_detail(&SkuId::new("66f1c0ffee")).await?;
//! ```

mod cache;
mod client;
mod conversions;
pub mod types;

pub use client::CatalogClient;

use thiserror::Error;

/// Errors that can occur when talking to the catalog API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("Catalog returned HTTP {status} for {path}")]
    Status { status: u16, path: String },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The envelope reported `success: false` or carried no data.
    #[error("Catalog reported failure for {0}")]
    Unsuccessful(String),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// An endpoint URL could not be built from the base URL.
    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(String),
}
