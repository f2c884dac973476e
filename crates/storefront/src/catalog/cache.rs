//! Cache types for catalog API responses.

use verdant_core::product::Product;
use verdant_core::variation::{Sku, VariationAxis};
use verdant_core::{BaseProductId, SkuId};

/// Cache key per endpoint and id.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    ProductSku(SkuId),
    Variations(BaseProductId),
    Skus(BaseProductId),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Variations(Vec<VariationAxis>),
    Skus(Vec<Sku>),
}
