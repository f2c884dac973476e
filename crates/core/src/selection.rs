//! Variation selection and SKU resolution.
//!
//! A [`SelectionState`] maps each variation axis to the option the shopper
//! has chosen. [`SelectionState::initialize`] seeds it when a product is
//! first loaded, and [`resolve_sku`] maps a selection back to the single SKU
//! that represents it.
//!
//! Resolution must be stable: resolving the selection initialized from a
//! SKU's own product record yields that same SKU, otherwise the product page
//! would keep re-fetching.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::product::VariationChoice;
use crate::types::{AxisId, OptionId, SkuId};
use crate::variation::{Sku, VariationAxis};

/// The currently chosen option per variation axis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    choices: BTreeMap<AxisId, OptionId>,
}

impl SelectionState {
    /// Build the initial selection for a freshly loaded product.
    ///
    /// Axes recorded on the product are seeded from the product record. Every
    /// other axis gets its first declared option. Axes without any options
    /// cannot be filled and stay absent, which leaves the state incomplete.
    #[must_use]
    pub fn initialize(recorded: &[VariationChoice], axes: &[VariationAxis]) -> Self {
        let mut choices: BTreeMap<AxisId, OptionId> = recorded
            .iter()
            .map(|choice| (choice.axis_id.clone(), choice.option_id.clone()))
            .collect();

        for axis in axes {
            if choices.contains_key(&axis.id) {
                continue;
            }
            if let Some(option) = axis.first_option() {
                choices.insert(axis.id.clone(), option.id.clone());
            }
        }

        Self { choices }
    }

    /// Set the option for one axis, replacing any previous choice.
    pub fn choose(&mut self, axis_id: AxisId, option_id: OptionId) {
        self.choices.insert(axis_id, option_id);
    }

    /// The option chosen on an axis, if any.
    #[must_use]
    pub fn get(&self, axis_id: &AxisId) -> Option<&OptionId> {
        self.choices.get(axis_id)
    }

    /// Whether `option_id` is the current choice on `axis_id`.
    #[must_use]
    pub fn is_selected(&self, axis_id: &AxisId, option_id: &OptionId) -> bool {
        self.get(axis_id) == Some(option_id)
    }

    /// True when every given axis has a choice.
    #[must_use]
    pub fn is_complete(&self, axes: &[VariationAxis]) -> bool {
        axes.iter().all(|axis| self.choices.contains_key(&axis.id))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.choices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AxisId, &OptionId)> {
        self.choices.iter()
    }
}

impl FromIterator<(AxisId, OptionId)> for SelectionState {
    fn from_iter<T: IntoIterator<Item = (AxisId, OptionId)>>(iter: T) -> Self {
        Self {
            choices: iter.into_iter().collect(),
        }
    }
}

/// Whether a SKU satisfies the selection.
///
/// Every pair the SKU declares must equal the selected option on that axis.
/// A SKU declaring no pairs is incomplete catalog data and never matches.
#[must_use]
pub fn sku_matches(sku: &Sku, selection: &SelectionState) -> bool {
    !sku.pairs.is_empty()
        && sku
            .pairs
            .iter()
            .all(|pair| selection.get(&pair.axis_id) == Some(&pair.option_id))
}

/// Find the SKU matching a selection.
///
/// Returns the first matching SKU in input order. The catalog is expected to
/// hold at most one match per complete selection; this is not checked.
#[must_use]
pub fn resolve_sku<'a>(skus: &'a [Sku], selection: &SelectionState) -> Option<&'a SkuId> {
    skus.iter()
        .find(|sku| sku_matches(sku, selection))
        .map(|sku| &sku.id)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::variation::VariationOption;

    pub fn axis(id: &str, name: &str, options: &[&str]) -> VariationAxis {
        VariationAxis {
            id: AxisId::new(id),
            name: name.to_string(),
            options: options
                .iter()
                .map(|option| VariationOption {
                    id: OptionId::new(*option),
                    label: option.to_uppercase(),
                })
                .collect(),
        }
    }

    /// Color{red, blue} and Size{s, m, l}.
    pub fn color_and_size() -> Vec<VariationAxis> {
        vec![
            axis("color", "Color", &["red", "blue"]),
            axis("size", "Size", &["s", "m", "l"]),
        ]
    }

    pub fn sku(id: &str, pairs: &[(&str, &str)]) -> Sku {
        Sku::new(
            id,
            pairs
                .iter()
                .map(|(axis, option)| VariationChoice::new(*axis, *option))
                .collect(),
        )
    }

    /// One SKU per Color x Size combination, named `{color}-{size}`.
    pub fn full_grid() -> Vec<Sku> {
        let mut skus = Vec::new();
        for color in ["red", "blue"] {
            for size in ["s", "m", "l"] {
                skus.push(sku(
                    &format!("{color}-{size}"),
                    &[("color", color), ("size", size)],
                ));
            }
        }
        skus
    }

    pub fn selection(pairs: &[(&str, &str)]) -> SelectionState {
        pairs
            .iter()
            .map(|(axis, option)| (AxisId::new(*axis), OptionId::new(*option)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    // =========================================================================
    // Initializer
    // =========================================================================

    #[test]
    fn test_initialize_gap_fills_with_first_option() {
        let axes = color_and_size();
        let recorded = vec![VariationChoice::new("color", "blue")];

        let state = SelectionState::initialize(&recorded, &axes);

        assert_eq!(state, selection(&[("color", "blue"), ("size", "s")]));
        assert!(state.is_complete(&axes));
    }

    #[test]
    fn test_initialize_without_recorded_choices_uses_defaults() {
        let axes = color_and_size();
        let state = SelectionState::initialize(&[], &axes);
        assert_eq!(state, selection(&[("color", "red"), ("size", "s")]));
    }

    #[test]
    fn test_initialize_keeps_every_recorded_choice() {
        let axes = color_and_size();
        let recorded = vec![
            VariationChoice::new("color", "blue"),
            VariationChoice::new("size", "l"),
        ];
        let state = SelectionState::initialize(&recorded, &axes);
        assert_eq!(state, selection(&[("color", "blue"), ("size", "l")]));
    }

    #[test]
    fn test_initialize_skips_axis_without_options() {
        let axes = vec![axis("color", "Color", &["red"]), axis("pot", "Pot", &[])];
        let state = SelectionState::initialize(&[], &axes);
        assert_eq!(state.len(), 1);
        assert!(!state.is_complete(&axes));
    }

    // =========================================================================
    // Resolver
    // =========================================================================

    #[test]
    fn test_resolve_exact_match() {
        let skus = full_grid();
        let state = selection(&[("color", "blue"), ("size", "m")]);
        assert_eq!(resolve_sku(&skus, &state), Some(&SkuId::new("blue-m")));
    }

    #[test]
    fn test_resolve_every_complete_selection() {
        let skus = full_grid();
        for color in ["red", "blue"] {
            for size in ["s", "m", "l"] {
                let state = selection(&[("color", color), ("size", size)]);
                let expected = SkuId::new(format!("{color}-{size}"));
                assert_eq!(resolve_sku(&skus, &state), Some(&expected));
            }
        }
    }

    #[test]
    fn test_resolve_no_match() {
        let skus = vec![sku("red-s", &[("color", "red"), ("size", "s")])];
        let state = selection(&[("color", "blue"), ("size", "s")]);
        assert_eq!(resolve_sku(&skus, &state), None);
    }

    #[test]
    fn test_resolve_first_match_wins() {
        let skus = vec![sku("A", &[("color", "red")]), sku("B", &[("color", "red")])];
        let state = selection(&[("color", "red")]);
        assert_eq!(resolve_sku(&skus, &state), Some(&SkuId::new("A")));
    }

    #[test]
    fn test_resolve_partial_selection_does_not_match() {
        let skus = full_grid();
        let state = selection(&[("color", "red")]);
        assert_eq!(resolve_sku(&skus, &state), None);
    }

    #[test]
    fn test_zero_pair_sku_never_matches() {
        let skus = vec![sku("bare", &[]), sku("red-s", &[("color", "red"), ("size", "s")])];
        let state = selection(&[("color", "red"), ("size", "s")]);
        assert_eq!(resolve_sku(&skus, &state), Some(&SkuId::new("red-s")));
        assert!(!sku_matches(&skus[0], &state));
    }

    #[test]
    fn test_resolution_is_stable_for_recorded_choices() {
        let axes = color_and_size();
        let skus = full_grid();

        for sku in &skus {
            let state = SelectionState::initialize(&sku.pairs, &axes);
            assert_eq!(resolve_sku(&skus, &state), Some(&sku.id));
        }
    }

    #[test]
    fn test_choose_replaces_previous_option() {
        let mut state = selection(&[("color", "red"), ("size", "s")]);
        state.choose(AxisId::new("size"), OptionId::new("l"));
        assert!(state.is_selected(&AxisId::new("size"), &OptionId::new("l")));
        assert!(!state.is_selected(&AxisId::new("size"), &OptionId::new("s")));
        assert_eq!(state.len(), 2);
    }
}
