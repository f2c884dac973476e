//! Product detail records as served by the catalog.

use serde::{Deserialize, Serialize};

use crate::types::{AxisId, BaseProductId, ImageId, OptionId, Price, ProductId};

/// A purchasable product record (one SKU's detail view).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    /// The catalog product this SKU belongs to. Variation axes and the SKU
    /// list are keyed by this id.
    pub base_product_id: BaseProductId,
    pub name: String,
    pub list_price: Price,
    pub price: Price,
    pub sold_quantity: u64,
    pub description: String,
    pub thumbnail: String,
    /// Display order follows list order.
    pub images: Vec<Image>,
    /// Variation options recorded on the product itself. Only used to seed
    /// the initial selection.
    pub variations: Vec<VariationChoice>,
}

/// A product image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub id: ImageId,
    pub path: String,
}

/// One (axis, option) pair recorded on a product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariationChoice {
    pub axis_id: AxisId,
    pub option_id: OptionId,
}

impl VariationChoice {
    #[must_use]
    pub fn new(axis_id: impl Into<AxisId>, option_id: impl Into<OptionId>) -> Self {
        Self {
            axis_id: axis_id.into(),
            option_id: option_id.into(),
        }
    }
}

impl Product {
    /// The image shown large on the detail page.
    ///
    /// A chosen image wins when it belongs to this product; otherwise the
    /// first image, falling back to the thumbnail when there are no images.
    #[must_use]
    pub fn main_image(&self, chosen: Option<&ImageId>) -> &str {
        chosen
            .and_then(|id| self.images.iter().find(|image| &image.id == id))
            .or_else(|| self.images.first())
            .map_or(self.thumbnail.as_str(), |image| image.path.as_str())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use rust_decimal::Decimal;

    use super::*;

    /// A product with two images and Color=blue recorded.
    pub fn fern() -> Product {
        Product {
            id: ProductId::new("sku-fern-blue"),
            base_product_id: BaseProductId::new("fern"),
            name: "Boston Fern".to_string(),
            list_price: Price::from_amount(Decimal::new(30, 0)),
            price: Price::from_amount(Decimal::new(25, 0)),
            sold_quantity: 12,
            description: "Bushy and forgiving.".to_string(),
            thumbnail: "/img/fern-thumb.jpg".to_string(),
            images: vec![
                Image {
                    id: ImageId::new("img-1"),
                    path: "/img/fern-1.jpg".to_string(),
                },
                Image {
                    id: ImageId::new("img-2"),
                    path: "/img/fern-2.jpg".to_string(),
                },
            ],
            variations: vec![VariationChoice::new("color", "blue")],
        }
    }
}
