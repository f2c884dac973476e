//! Product page fetch cycle.
//!
//! Runs the [`DetailState`] machine against a [`DetailSource`]: request the
//! SKU, feed the fetch result back in, and keep following the resolved SKU
//! until resolution settles on the loaded one.

use std::collections::HashSet;
use std::future::Future;

use thiserror::Error;
use tracing::{instrument, warn};
use verdant_core::SkuId;
use verdant_core::detail::{DetailEvent, DetailPayload, DetailSnapshot, DetailState, Transition};

use crate::catalog::{CatalogClient, CatalogError};

/// Most SKUs followed for one page request.
pub const MAX_HOPS: usize = 4;

/// Why a product page could not be shown.
#[derive(Debug, Error)]
pub enum DetailError {
    /// The catalog does not know the requested SKU.
    #[error("product {0} not found")]
    NotFound(SkuId),

    /// A catalog request failed.
    #[error("product {sku_id} unavailable: {reason}")]
    Unavailable { sku_id: SkuId, reason: String },
}

/// Where product page data comes from.
pub trait DetailSource {
    /// Fetch the product for `sku_id` and its catalog's axes and SKU list.
    fn load_detail(
        &self,
        sku_id: &SkuId,
    ) -> impl Future<Output = Result<DetailPayload, CatalogError>> + Send;
}

impl DetailSource for CatalogClient {
    async fn load_detail(&self, sku_id: &SkuId) -> Result<DetailPayload, CatalogError> {
        Self::load_detail(self, sku_id).await
    }
}

/// Load the product page for `sku_id`.
///
/// Follows re-fetches while the resolved SKU differs from the loaded one.
/// Stops early when a SKU comes round a second time or after [`MAX_HOPS`]
/// fetches; the last loaded page is returned in both cases.
///
/// # Errors
///
/// Returns an error if the first fetch fails. Failures on later hops keep
/// the page that was already loaded.
#[instrument(skip_all, fields(sku_id = %sku_id))]
pub async fn load_detail_page<S: DetailSource + Sync>(
    source: &S,
    sku_id: SkuId,
) -> Result<Box<DetailSnapshot>, DetailError> {
    let mut state = DetailState::Idle;
    let mut visited = HashSet::new();
    let mut next = Some(sku_id.clone());
    let mut not_found = false;

    while let Some(target) = next.take() {
        if !visited.insert(target.clone()) {
            warn!(sku_id = %target, "SKU resolution is unstable, stopping re-fetch");
            break;
        }
        if visited.len() > MAX_HOPS {
            warn!(sku_id = %target, max_hops = MAX_HOPS, "Too many SKU re-fetches");
            break;
        }

        let Transition { state: loading, fetch } = state.transition(DetailEvent::Requested(target));
        state = loading;
        let Some(fetch_id) = fetch else {
            continue;
        };

        let event = match source.load_detail(&fetch_id).await {
            Ok(payload) => DetailEvent::Loaded {
                sku_id: fetch_id,
                payload: Box::new(payload),
            },
            Err(e) => {
                tracing::error!(sku_id = %fetch_id, error = %e, "Failed to load product detail");
                not_found = matches!(e, CatalogError::NotFound(_));
                DetailEvent::LoadFailed {
                    sku_id: fetch_id,
                    reason: e.to_string(),
                }
            }
        };

        let Transition { state: settled, fetch } = state.transition(event);
        state = settled;
        next = fetch;
    }

    match state {
        DetailState::Ready(snapshot) => Ok(snapshot),
        DetailState::Failed { sku_id, .. } if not_found => Err(DetailError::NotFound(sku_id)),
        DetailState::Failed { sku_id, reason } => Err(DetailError::Unavailable { sku_id, reason }),
        DetailState::Idle | DetailState::Loading { .. } => Err(DetailError::Unavailable {
            sku_id,
            reason: "product page did not finish loading".to_string(),
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use rust_decimal::Decimal;
    use verdant_core::product::{Product, VariationChoice};
    use verdant_core::variation::{Sku, VariationAxis, VariationOption};
    use verdant_core::{AxisId, BaseProductId, OptionId, Price, ProductId};

    use super::*;

    /// Serves canned payloads and counts fetches.
    #[derive(Default)]
    struct FakeSource {
        payloads: HashMap<SkuId, DetailPayload>,
        fetched: Mutex<Vec<SkuId>>,
    }

    impl FakeSource {
        fn with(mut self, payload: DetailPayload) -> Self {
            self.payloads
                .insert(SkuId::new(payload.product.id.as_str()), payload);
            self
        }

        fn fetched(&self) -> Vec<SkuId> {
            self.fetched.lock().unwrap().clone()
        }
    }

    impl DetailSource for FakeSource {
        async fn load_detail(&self, sku_id: &SkuId) -> Result<DetailPayload, CatalogError> {
            self.fetched.lock().unwrap().push(sku_id.clone());
            self.payloads
                .get(sku_id)
                .cloned()
                .ok_or_else(|| CatalogError::NotFound(format!("product-sku/{sku_id}")))
        }
    }

    fn color_axis() -> VariationAxis {
        VariationAxis {
            id: AxisId::new("color"),
            name: "Color".to_string(),
            options: ["red", "blue"]
                .into_iter()
                .map(|id| VariationOption {
                    id: OptionId::new(id),
                    label: id.to_string(),
                })
                .collect(),
        }
    }

    /// A product record for `id` recording `recorded` colors, in a catalog
    /// with `skus` as (sku id, color) pairs.
    fn payload(id: &str, recorded: &[&str], skus: &[(&str, &str)]) -> DetailPayload {
        DetailPayload {
            product: Product {
                id: ProductId::new(id),
                base_product_id: BaseProductId::new("stand"),
                name: format!("Stand {id}"),
                list_price: Price::from_amount(Decimal::new(40, 0)),
                price: Price::from_amount(Decimal::new(35, 0)),
                sold_quantity: 0,
                description: String::new(),
                thumbnail: String::new(),
                images: Vec::new(),
                variations: recorded
                    .iter()
                    .map(|color| VariationChoice::new("color", *color))
                    .collect(),
            },
            axes: vec![color_axis()],
            skus: skus
                .iter()
                .map(|(sku, color)| Sku::new(*sku, vec![VariationChoice::new("color", *color)]))
                .collect(),
        }
    }

    const CATALOG: &[(&str, &str)] = &[("sku-red", "red"), ("sku-blue", "blue")];

    #[tokio::test]
    async fn test_stable_page_fetches_once() {
        let source = FakeSource::default().with(payload("sku-blue", &["blue"], CATALOG));

        let page = load_detail_page(&source, SkuId::new("sku-blue"))
            .await
            .unwrap();

        assert_eq!(page.sku_id, SkuId::new("sku-blue"));
        assert_eq!(source.fetched(), vec![SkuId::new("sku-blue")]);
    }

    #[tokio::test]
    async fn test_follows_resolved_sku() {
        // sku-legacy records no color, so the first option (red) is selected.
        let source = FakeSource::default()
            .with(payload("sku-legacy", &[], CATALOG))
            .with(payload("sku-red", &["red"], CATALOG));

        let page = load_detail_page(&source, SkuId::new("sku-legacy"))
            .await
            .unwrap();

        assert_eq!(page.sku_id, SkuId::new("sku-red"));
        assert_eq!(
            source.fetched(),
            vec![SkuId::new("sku-legacy"), SkuId::new("sku-red")]
        );
    }

    #[tokio::test]
    async fn test_unstable_resolution_stops() {
        // Each record points at the other SKU.
        let source = FakeSource::default()
            .with(payload("sku-red", &["blue"], CATALOG))
            .with(payload("sku-blue", &["red"], CATALOG));

        let page = load_detail_page(&source, SkuId::new("sku-red"))
            .await
            .unwrap();

        assert_eq!(source.fetched().len(), 2);
        assert_eq!(page.sku_id, SkuId::new("sku-blue"));
    }

    #[tokio::test]
    async fn test_hop_limit() {
        let chain: Vec<(String, String)> = (0..=MAX_HOPS + 1)
            .map(|i| (format!("sku-{i}"), format!("c{i}")))
            .collect();
        let options: Vec<VariationOption> = chain
            .iter()
            .map(|(_, color)| VariationOption {
                id: OptionId::new(color.as_str()),
                label: color.clone(),
            })
            .collect();
        let skus: Vec<Sku> = chain
            .iter()
            .map(|(sku, color)| Sku::new(sku.as_str(), vec![VariationChoice::new("color", color.as_str())]))
            .collect();

        let mut source = FakeSource::default();
        for (i, (sku, _)) in chain.iter().enumerate() {
            // Each SKU records the next SKU's color.
            let next_color = chain.get(i + 1).map_or("c0", |(_, c)| c.as_str());
            let mut p = payload(sku, &[next_color], &[]);
            p.axes = vec![VariationAxis {
                id: AxisId::new("color"),
                name: "Color".to_string(),
                options: options.clone(),
            }];
            p.skus.clone_from(&skus);
            source = source.with(p);
        }

        let page = load_detail_page(&source, SkuId::new("sku-0")).await.unwrap();

        assert_eq!(source.fetched().len(), MAX_HOPS);
        assert_eq!(page.sku_id, SkuId::new(format!("sku-{}", MAX_HOPS - 1)));
    }

    #[tokio::test]
    async fn test_unknown_sku_is_not_found() {
        let source = FakeSource::default();

        let result = load_detail_page(&source, SkuId::new("missing")).await;

        assert!(matches!(result, Err(DetailError::NotFound(id)) if id == SkuId::new("missing")));
    }

    #[tokio::test]
    async fn test_failed_refetch_keeps_loaded_page() {
        // sku-legacy resolves to sku-red, which the source cannot serve.
        let source = FakeSource::default().with(payload("sku-legacy", &[], CATALOG));

        let page = load_detail_page(&source, SkuId::new("sku-legacy"))
            .await
            .unwrap();

        assert_eq!(page.sku_id, SkuId::new("sku-legacy"));
        assert_eq!(source.fetched().len(), 2);
    }
}
