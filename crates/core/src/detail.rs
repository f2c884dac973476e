//! Fetch state machine for the product detail page.
//!
//! The page is keyed by a SKU id. Loading a SKU yields its product record
//! plus the catalog's variation axes and SKU list; from those the initial
//! selection is built and resolved back to a SKU. When the resolved SKU
//! differs from the loaded one, that SKU becomes the new fetch key.
//!
//! Responses are matched against the SKU currently loading. A response for
//! any other SKU is stale and discarded (latest id wins).

use crate::product::Product;
use crate::selection::{SelectionState, resolve_sku};
use crate::types::{AxisId, OptionId, SkuId};
use crate::variation::{Sku, VariationAxis};

/// Everything fetched for one SKU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailPayload {
    pub product: Product,
    pub axes: Vec<VariationAxis>,
    pub skus: Vec<Sku>,
}

/// A loaded detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailSnapshot {
    /// The SKU this page was fetched for.
    pub sku_id: SkuId,
    pub product: Product,
    pub axes: Vec<VariationAxis>,
    pub skus: Vec<Sku>,
    pub selection: SelectionState,
    /// SKU matching `selection`, if any.
    pub resolved: Option<SkuId>,
}

impl DetailSnapshot {
    /// Build the snapshot, initializing and resolving the selection.
    #[must_use]
    pub fn new(sku_id: SkuId, payload: DetailPayload) -> Self {
        let DetailPayload {
            product,
            axes,
            skus,
        } = payload;
        let selection = SelectionState::initialize(&product.variations, &axes);
        let resolved = resolve_sku(&skus, &selection).cloned();

        Self {
            sku_id,
            product,
            axes,
            skus,
            selection,
            resolved,
        }
    }

    /// Change one axis and re-resolve.
    pub fn choose(&mut self, axis_id: AxisId, option_id: OptionId) {
        self.selection.choose(axis_id, option_id);
        self.resolved = resolve_sku(&self.skus, &self.selection).cloned();
    }

    /// The SKU to fetch next, when resolution moved away from the loaded one.
    #[must_use]
    pub fn refetch_target(&self) -> Option<&SkuId> {
        self.resolved.as_ref().filter(|resolved| **resolved != self.sku_id)
    }
}

/// Where the detail page is in its fetch cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DetailState {
    #[default]
    Idle,
    Loading {
        sku_id: SkuId,
        /// Page still on display while the new SKU loads.
        previous: Option<Box<DetailSnapshot>>,
    },
    Ready(Box<DetailSnapshot>),
    Failed {
        sku_id: SkuId,
        reason: String,
    },
}

/// Inputs to the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailEvent {
    /// Start loading a SKU.
    Requested(SkuId),
    /// All three fetches for `sku_id` completed.
    Loaded {
        sku_id: SkuId,
        payload: Box<DetailPayload>,
    },
    /// Any fetch for `sku_id` failed.
    LoadFailed { sku_id: SkuId, reason: String },
    /// The shopper picked an option.
    SelectionChanged { axis_id: AxisId, option_id: OptionId },
}

/// Result of a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: DetailState,
    /// SKU the driver must fetch next, if any.
    pub fetch: Option<SkuId>,
}

impl Transition {
    const fn stay(state: DetailState) -> Self {
        Self { state, fetch: None }
    }
}

impl DetailState {
    /// Apply one event.
    #[must_use]
    pub fn transition(self, event: DetailEvent) -> Transition {
        match (self, event) {
            (Self::Loading { sku_id, previous }, DetailEvent::Requested(requested))
                if sku_id == requested =>
            {
                Transition::stay(Self::Loading { sku_id, previous })
            }
            (state, DetailEvent::Requested(sku_id)) => {
                let previous = match state {
                    Self::Ready(snapshot) => Some(snapshot),
                    Self::Loading { previous, .. } => previous,
                    Self::Idle | Self::Failed { .. } => None,
                };
                Transition {
                    fetch: Some(sku_id.clone()),
                    state: Self::Loading { sku_id, previous },
                }
            }
            (Self::Loading { sku_id, previous }, DetailEvent::Loaded { sku_id: loaded, payload }) => {
                if sku_id != loaded {
                    return Transition::stay(Self::Loading { sku_id, previous });
                }
                let snapshot = DetailSnapshot::new(sku_id, *payload);
                Transition {
                    fetch: snapshot.refetch_target().cloned(),
                    state: Self::Ready(Box::new(snapshot)),
                }
            }
            (
                Self::Loading { sku_id, previous },
                DetailEvent::LoadFailed {
                    sku_id: failed,
                    reason,
                },
            ) => {
                if sku_id != failed {
                    return Transition::stay(Self::Loading { sku_id, previous });
                }
                Transition::stay(match previous {
                    Some(snapshot) => Self::Ready(snapshot),
                    None => Self::Failed { sku_id, reason },
                })
            }
            (
                Self::Ready(mut snapshot),
                DetailEvent::SelectionChanged { axis_id, option_id },
            ) => {
                snapshot.choose(axis_id, option_id);
                Transition {
                    fetch: snapshot.refetch_target().cloned(),
                    state: Self::Ready(snapshot),
                }
            }
            (state, _) => Transition::stay(state),
        }
    }

    /// The loaded page, if any.
    #[must_use]
    pub fn snapshot(&self) -> Option<&DetailSnapshot> {
        match self {
            Self::Ready(snapshot) => Some(snapshot.as_ref()),
            Self::Loading { previous, .. } => previous.as_deref(),
            Self::Idle | Self::Failed { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::VariationChoice;
    use crate::product::fixtures::fern;
    use crate::selection::fixtures::{color_and_size, full_grid};
    use crate::types::ProductId;

    /// Payload for the `{color}-{size}` SKU of the full grid.
    fn payload(color: &str, size: &str) -> Box<DetailPayload> {
        let mut product = fern();
        product.id = ProductId::new(format!("{color}-{size}"));
        product.variations = vec![
            VariationChoice::new("color", color),
            VariationChoice::new("size", size),
        ];
        Box::new(DetailPayload {
            product,
            axes: color_and_size(),
            skus: full_grid(),
        })
    }

    fn loading(id: &str) -> DetailState {
        DetailState::Idle
            .transition(DetailEvent::Requested(SkuId::new(id)))
            .state
    }

    #[test]
    fn test_request_from_idle_starts_loading() {
        let t = DetailState::Idle.transition(DetailEvent::Requested(SkuId::new("red-s")));
        assert_eq!(t.fetch, Some(SkuId::new("red-s")));
        assert!(matches!(t.state, DetailState::Loading { ref sku_id, .. } if sku_id.as_str() == "red-s"));
    }

    #[test]
    fn test_repeat_request_for_loading_sku_does_not_refetch() {
        let t = loading("red-s").transition(DetailEvent::Requested(SkuId::new("red-s")));
        assert_eq!(t.fetch, None);
    }

    #[test]
    fn test_loaded_stable_selection_reaches_fixpoint() {
        let t = loading("blue-m").transition(DetailEvent::Loaded {
            sku_id: SkuId::new("blue-m"),
            payload: payload("blue", "m"),
        });

        assert_eq!(t.fetch, None);
        let resolved = t.state.snapshot().and_then(|s| s.resolved.clone());
        assert_eq!(resolved, Some(SkuId::new("blue-m")));
    }

    #[test]
    fn test_loaded_with_different_resolution_requests_refetch() {
        // Requested by a legacy id; the product record resolves to blue-s.
        let mut body = payload("blue", "s");
        body.product.variations.truncate(1);

        let t = loading("legacy-id").transition(DetailEvent::Loaded {
            sku_id: SkuId::new("legacy-id"),
            payload: body,
        });

        assert_eq!(t.fetch, Some(SkuId::new("blue-s")));
        assert!(matches!(t.state, DetailState::Ready(_)));
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let state = loading("red-s")
            .transition(DetailEvent::Requested(SkuId::new("blue-l")))
            .state;

        let t = state.transition(DetailEvent::Loaded {
            sku_id: SkuId::new("red-s"),
            payload: payload("red", "s"),
        });

        assert_eq!(t.fetch, None);
        assert!(matches!(t.state, DetailState::Loading { ref sku_id, .. } if sku_id.as_str() == "blue-l"));
    }

    #[test]
    fn test_failure_without_previous_page_fails() {
        let t = loading("red-s").transition(DetailEvent::LoadFailed {
            sku_id: SkuId::new("red-s"),
            reason: "timeout".to_string(),
        });
        assert!(matches!(t.state, DetailState::Failed { ref reason, .. } if reason == "timeout"));
        assert_eq!(t.fetch, None);
    }

    #[test]
    fn test_failure_keeps_previous_page() {
        let ready = loading("red-s")
            .transition(DetailEvent::Loaded {
                sku_id: SkuId::new("red-s"),
                payload: payload("red", "s"),
            })
            .state;
        let reloading = ready
            .transition(DetailEvent::Requested(SkuId::new("red-m")))
            .state;

        let t = reloading.transition(DetailEvent::LoadFailed {
            sku_id: SkuId::new("red-m"),
            reason: "502".to_string(),
        });

        let kept = t.state.snapshot().map(|s| s.sku_id.clone());
        assert_eq!(kept, Some(SkuId::new("red-s")));
    }

    #[test]
    fn test_selection_change_triggers_fetch_of_match() {
        let ready = loading("red-s")
            .transition(DetailEvent::Loaded {
                sku_id: SkuId::new("red-s"),
                payload: payload("red", "s"),
            })
            .state;

        let t = ready.transition(DetailEvent::SelectionChanged {
            axis_id: AxisId::new("size"),
            option_id: OptionId::new("l"),
        });

        assert_eq!(t.fetch, Some(SkuId::new("red-l")));
    }

    #[test]
    fn test_selection_without_match_does_not_fetch() {
        let mut body = payload("red", "s");
        body.skus.retain(|sku| sku.id.as_str() != "red-l");
        let ready = loading("red-s")
            .transition(DetailEvent::Loaded {
                sku_id: SkuId::new("red-s"),
                payload: body,
            })
            .state;

        let t = ready.transition(DetailEvent::SelectionChanged {
            axis_id: AxisId::new("size"),
            option_id: OptionId::new("l"),
        });

        assert_eq!(t.fetch, None);
        let snapshot = t.state.snapshot().cloned();
        assert_eq!(snapshot.as_ref().and_then(|s| s.resolved.clone()), None);
        assert!(snapshot.is_some_and(|s| s
            .selection
            .is_selected(&AxisId::new("size"), &OptionId::new("l"))));
    }

    #[test]
    fn test_selection_change_ignored_while_idle() {
        let t = DetailState::Idle.transition(DetailEvent::SelectionChanged {
            axis_id: AxisId::new("size"),
            option_id: OptionId::new("l"),
        });
        assert_eq!(t.state, DetailState::Idle);
        assert_eq!(t.fetch, None);
    }
}
