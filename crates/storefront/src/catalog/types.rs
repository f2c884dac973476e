//! Wire types for the catalog API.
//!
//! Field names follow the upstream API, which prefixes columns with the
//! table they come from (`M06_` product SKUs, `M07_` images, `M08_` variation
//! axes, `M09_` options, `M10_` recorded product variations).

use rust_decimal::Decimal;
use serde::Deserialize;

/// Response envelope shared by every endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// The payload, when the API reported success.
    pub fn into_data(self) -> Option<T> {
        if self.success { self.data } else { None }
    }
}

/// `GET /product-sku/{id}` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductSkuRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "M06_M05_product_id")]
    pub product_id: String,
    #[serde(rename = "M06_product_sku_name")]
    pub name: String,
    #[serde(rename = "M06_MRP")]
    pub mrp: Decimal,
    #[serde(rename = "M06_price")]
    pub price: Decimal,
    #[serde(rename = "M06_quantity", default)]
    pub quantity: u64,
    #[serde(rename = "M06_description", default)]
    pub description: Option<String>,
    #[serde(rename = "M06_thumbnail_image", default)]
    pub thumbnail_image: Option<String>,
    #[serde(rename = "Images", default)]
    pub images: Vec<ImageRecord>,
    #[serde(rename = "Variations", default)]
    pub variations: Vec<ProductVariationRecord>,
}

/// An image attached to a product SKU.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "M07_image_path")]
    pub image_path: String,
}

/// A variation option recorded on the product SKU itself.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductVariationRecord {
    #[serde(rename = "M10_M08_product_variation_id")]
    pub variation_id: String,
    #[serde(rename = "M10_M09_variation_option_id")]
    pub option_id: String,
}

/// `GET /variation-by-product-id/{id}` list item.
#[derive(Debug, Clone, Deserialize)]
pub struct VariationRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "M08_name")]
    pub name: String,
    #[serde(default)]
    pub options: Vec<VariationOptionRecord>,
}

/// One option of a variation axis.
#[derive(Debug, Clone, Deserialize)]
pub struct VariationOptionRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "M09_name")]
    pub name: String,
}

/// `GET /skus-variation-by-product-id/{id}` list item.
#[derive(Debug, Clone, Deserialize)]
pub struct SkuRecord {
    #[serde(rename = "skuId")]
    pub sku_id: String,
    #[serde(default)]
    pub variations: Vec<SkuVariationRecord>,
}

/// The option a SKU selects on one variation axis.
#[derive(Debug, Clone, Deserialize)]
pub struct SkuVariationRecord {
    /// Variation axis id.
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub options: Option<SkuOptionRef>,
}

/// Reference to the chosen option.
#[derive(Debug, Clone, Deserialize)]
pub struct SkuOptionRef {
    #[serde(rename = "_id")]
    pub id: String,
}
