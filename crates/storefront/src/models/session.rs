//! Session-related types.
//!
//! Keys for the values the storefront keeps in a visitor's session.

/// Session keys.
pub mod keys {
    /// Key for the persisted cart list.
    pub const CART: &str = verdant_core::cart::CART_STORAGE_KEY;

    /// Key for the pending toast notification.
    pub const TOAST: &str = "toast";
}
