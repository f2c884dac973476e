//! Verdant Core - Catalog types and storefront decision logic.
//!
//! This crate provides the types and pure logic behind the Verdant
//! storefront pages:
//! - product detail records, variation axes and SKUs
//! - variation selection and SKU resolution
//! - the product page fetch state machine
//! - the cart and its storage interface
//! - scroll-arrow control for carousels
//!
//! # Architecture
//!
//! The core crate performs no I/O: no HTTP clients, no session access. Cart
//! persistence goes through the [`cart::CartStore`] trait so storage can be
//! swapped for an in-memory store in tests.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and prices
//! - [`product`] / [`variation`] - Catalog records
//! - [`selection`] - Selection initializer and SKU resolver
//! - [`detail`] - Detail page state machine
//! - [`cart`] - Cart entries, store interface and toggle operations
//! - [`carousel`] - Scroll arrow controller

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod carousel;
pub mod cart;
pub mod detail;
pub mod product;
pub mod selection;
pub mod types;
pub mod variation;

pub use types::*;
