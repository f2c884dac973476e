//! Core types for Verdant.
//!
//! This module provides type-safe wrappers for catalog identities and prices.

pub mod id;
pub mod price;

pub use id::*;
pub use price::{CurrencyCode, Price};
