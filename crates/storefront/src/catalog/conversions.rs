//! Conversions from catalog wire records into `verdant_core` types.

use verdant_core::product::{Image, Product, VariationChoice};
use verdant_core::variation::{Sku, VariationAxis, VariationOption};
use verdant_core::{AxisId, BaseProductId, ImageId, OptionId, Price, ProductId, SkuId};

use super::types::{ProductSkuRecord, SkuRecord, VariationRecord};

pub fn convert_product(record: ProductSkuRecord) -> Product {
    Product {
        id: ProductId::new(record.id),
        base_product_id: BaseProductId::new(record.product_id),
        name: record.name,
        list_price: Price::from_amount(record.mrp),
        price: Price::from_amount(record.price),
        sold_quantity: record.quantity,
        description: record.description.unwrap_or_default(),
        thumbnail: record.thumbnail_image.unwrap_or_default(),
        images: record
            .images
            .into_iter()
            .map(|image| Image {
                id: ImageId::new(image.id),
                path: image.image_path,
            })
            .collect(),
        variations: record
            .variations
            .into_iter()
            .map(|v| VariationChoice::new(v.variation_id, v.option_id))
            .collect(),
    }
}

pub fn convert_variation(record: VariationRecord) -> VariationAxis {
    VariationAxis {
        id: AxisId::new(record.id),
        name: record.name,
        options: record
            .options
            .into_iter()
            .map(|option| VariationOption {
                id: OptionId::new(option.id),
                label: option.name,
            })
            .collect(),
    }
}

/// Convert a SKU record.
///
/// A SKU with any axis lacking an option reference is incomplete and is
/// converted without pairs, so it never matches a selection.
pub fn convert_sku(record: SkuRecord) -> Sku {
    let sku_id = SkuId::new(record.sku_id);
    let pairs: Option<Vec<VariationChoice>> = record
        .variations
        .into_iter()
        .map(|variation| {
            variation
                .options
                .map(|option| VariationChoice::new(variation.id, option.id))
        })
        .collect();

    match pairs {
        Some(pairs) if !pairs.is_empty() => Sku::new(sku_id, pairs),
        Some(_) => {
            tracing::warn!(sku_id = %sku_id, "SKU declares no variation options and can never be selected");
            Sku::new(sku_id, Vec::new())
        }
        None => {
            tracing::warn!(sku_id = %sku_id, "SKU has a variation without an option and can never be selected");
            Sku::new(sku_id, Vec::new())
        }
    }
}
