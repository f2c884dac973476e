//! Business logic services for storefront.
//!
//! # Services
//!
//! - `product_detail` - Drives the product page fetch cycle against the catalog
//! - `session_cart` - Cart store kept in the visitor's session
//! - `toast` - One-shot notifications shown on the next page render

pub mod product_detail;
pub mod session_cart;
pub mod toast;

pub use product_detail::{DetailError, DetailSource, load_detail_page};
pub use session_cart::SessionCartStore;
pub use toast::Toast;
