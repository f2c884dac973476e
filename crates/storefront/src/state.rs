//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::{CatalogClient, CatalogError};
use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the catalog client and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, CatalogError> {
        let catalog = CatalogClient::new(&config.catalog)?;

        Ok(Self {
            inner: Arc::new(AppStateInner { config, catalog }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog API client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }
}
