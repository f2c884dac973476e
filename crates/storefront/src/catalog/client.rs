//! Catalog API client implementation.
//!
//! Uses `reqwest` for HTTP and caches responses with `moka`.

use std::sync::Arc;

use moka::future::Cache;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;
use verdant_core::detail::DetailPayload;
use verdant_core::product::Product;
use verdant_core::variation::{Sku, VariationAxis};
use verdant_core::{BaseProductId, SkuId};

use super::CatalogError;
use super::cache::{CacheKey, CacheValue};
use super::conversions::{convert_product, convert_sku, convert_variation};
use super::types::{Envelope, ProductSkuRecord, SkuRecord, VariationRecord};
use crate::config::CatalogConfig;

/// Client for the catalog API.
///
/// Cheap to clone; clones share the HTTP connection pool and the cache.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<CacheKey, CacheValue>,
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.cache_ttl)
            .build();

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("verdant-storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                base_url: config.base_url.clone(),
                cache,
            }),
        })
    }

    /// Build an endpoint URL from path segments, escaping each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, CatalogError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| CatalogError::InvalidUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Fetch an endpoint and unwrap its envelope.
    async fn fetch<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, CatalogError> {
        let url = self.endpoint(segments)?;
        let path = segments.join("/");

        let response = self.inner.client.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(path));
        }

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Catalog API returned non-success status"
            );
            return Err(CatalogError::Status {
                status: status.as_u16(),
                path,
            });
        }

        let envelope: Envelope<T> = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })?;

        envelope
            .into_data()
            .ok_or(CatalogError::Unsuccessful(path))
    }

    // =========================================================================
    // Catalog Methods
    // =========================================================================

    /// Get the product detail record for a SKU.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the API request fails.
    #[instrument(skip_all, fields(sku_id = %sku_id))]
    pub async fn get_product_by_sku(&self, sku_id: &SkuId) -> Result<Product, CatalogError> {
        let key = CacheKey::ProductSku(sku_id.clone());
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let record: ProductSkuRecord = self.fetch(&["product-sku", sku_id.as_str()]).await?;
        let product = convert_product(record);

        self.inner
            .cache
            .insert(key, CacheValue::Product(Box::new(product.clone())))
            .await;
        Ok(product)
    }

    /// Get the variation axes (with options) of a catalog product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or reports failure.
    #[instrument(skip_all, fields(product_id = %product_id))]
    pub async fn get_variations(
        &self,
        product_id: &BaseProductId,
    ) -> Result<Vec<VariationAxis>, CatalogError> {
        let key = CacheKey::Variations(product_id.clone());
        if let Some(CacheValue::Variations(axes)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for variations");
            return Ok(axes);
        }

        let records: Vec<VariationRecord> = self
            .fetch(&["variation-by-product-id", product_id.as_str()])
            .await?;
        let axes: Vec<VariationAxis> = records.into_iter().map(convert_variation).collect();

        self.inner
            .cache
            .insert(key, CacheValue::Variations(axes.clone()))
            .await;
        Ok(axes)
    }

    /// Get the SKUs of a catalog product with the options each one selects.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or reports failure.
    #[instrument(skip_all, fields(product_id = %product_id))]
    pub async fn get_skus(&self, product_id: &BaseProductId) -> Result<Vec<Sku>, CatalogError> {
        let key = CacheKey::Skus(product_id.clone());
        if let Some(CacheValue::Skus(skus)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for SKUs");
            return Ok(skus);
        }

        let records: Vec<SkuRecord> = self
            .fetch(&["skus-variation-by-product-id", product_id.as_str()])
            .await?;
        let skus: Vec<Sku> = records.into_iter().map(convert_sku).collect();

        self.inner
            .cache
            .insert(key, CacheValue::Skus(skus.clone()))
            .await;
        Ok(skus)
    }

    /// Load everything the product page needs for one SKU.
    ///
    /// The product is fetched first; its variation axes and SKU list are
    /// then fetched concurrently. Both must succeed.
    ///
    /// # Errors
    ///
    /// Returns the first error from any of the three requests.
    #[instrument(skip_all, fields(sku_id = %sku_id))]
    pub async fn load_detail(&self, sku_id: &SkuId) -> Result<DetailPayload, CatalogError> {
        let product = self.get_product_by_sku(sku_id).await?;

        let (axes, skus) = tokio::try_join!(
            self.get_variations(&product.base_product_id),
            self.get_skus(&product.base_product_id),
        )?;

        Ok(DetailPayload {
            product,
            axes,
            skus,
        })
    }
}
