//! Variation axes and the SKUs that combine their options.

use serde::{Deserialize, Serialize};

use crate::product::VariationChoice;
use crate::types::{AxisId, OptionId, SkuId};

/// A product attribute with selectable options (e.g. "Color").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariationAxis {
    pub id: AxisId,
    pub name: String,
    /// Ordered; the first option is the default when nothing else is known.
    pub options: Vec<VariationOption>,
}

/// One selectable value on a [`VariationAxis`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariationOption {
    pub id: OptionId,
    pub label: String,
}

impl VariationAxis {
    /// The option used to fill a selection gap.
    #[must_use]
    pub fn first_option(&self) -> Option<&VariationOption> {
        self.options.first()
    }

    /// Look up an option on this axis.
    #[must_use]
    pub fn option(&self, id: &OptionId) -> Option<&VariationOption> {
        self.options.iter().find(|option| &option.id == id)
    }
}

/// A stock-keeping unit: one concrete variant, declared as the option it
/// selects on each axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sku {
    pub id: SkuId,
    pub pairs: Vec<VariationChoice>,
}

impl Sku {
    #[must_use]
    pub fn new(id: impl Into<SkuId>, pairs: Vec<VariationChoice>) -> Self {
        Self {
            id: id.into(),
            pairs,
        }
    }
}
