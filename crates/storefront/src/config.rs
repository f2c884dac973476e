//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CATALOG_API_URL` - Base URL of the catalog API
//!   (e.g., `https://api.example.com/api/v1/customer`)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront (default: http://localhost:3000)
//! - `CATALOG_TIMEOUT_SECS` - Catalog request timeout (default: 10)
//! - `CATALOG_CACHE_TTL_SECS` - Catalog response cache TTL (default: 300)
//! - `CAROUSEL_VIEWPORT_PX` - Carousel width assumed when the client sends none (default: 960)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Performance trace sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Catalog API configuration
    pub catalog: CatalogConfig,
    /// Carousel viewport width used when the request does not provide one
    pub carousel_viewport_px: u32,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "production")
    pub sentry_environment: Option<String>,
    /// Error event sample rate
    pub sentry_sample_rate: f32,
    /// Performance trace sample rate
    pub sentry_traces_sample_rate: f32,
}

/// Catalog API configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL; endpoint paths are appended to it
    pub base_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
    /// How long responses stay cached
    pub cache_ttl: Duration,
}

impl CatalogConfig {
    /// Configuration with default timeout and cache TTL.
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Duration::from_secs(10),
            cache_ttl: Duration::from_secs(300),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env_or_default::<IpAddr>("STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env_or_default::<u16>("STOREFRONT_PORT", "3000")?;
        let base_url = get_env_or_default("STOREFRONT_BASE_URL", "http://localhost:3000");
        let catalog = CatalogConfig::from_env()?;
        let carousel_viewport_px = parse_env_or_default::<u32>("CAROUSEL_VIEWPORT_PX", "960")?;

        Ok(Self {
            host,
            port,
            base_url,
            catalog,
            carousel_viewport_px,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env_or_default::<f32>("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env_or_default::<f32>(
                "SENTRY_TRACES_SAMPLE_RATE",
                "0.0",
            )?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Configuration for tests and local tooling: binds to localhost and
    /// points the catalog client at `catalog_url`.
    #[must_use]
    pub fn for_catalog(catalog_url: Url) -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            catalog: CatalogConfig::new(catalog_url),
            carousel_viewport_px: 960,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }
}

impl CatalogConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let raw = get_required_env("CATALOG_API_URL")?;
        let base_url = parse_base_url(&raw)
            .map_err(|e| ConfigError::InvalidEnvVar("CATALOG_API_URL".to_string(), e))?;
        let timeout = parse_env_or_default::<u64>("CATALOG_TIMEOUT_SECS", "10")?;
        let cache_ttl = parse_env_or_default::<u64>("CATALOG_CACHE_TTL_SECS", "300")?;

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout),
            cache_ttl: Duration::from_secs(cache_ttl),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse the catalog base URL.
///
/// Only http(s) URLs are accepted. A trailing slash is enforced so endpoint
/// paths join onto the full base path instead of replacing its last segment.
fn parse_base_url(raw: &str) -> Result<Url, String> {
    let mut url = Url::parse(raw).map_err(|e| e.to_string())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base_url_adds_trailing_slash() {
        let url = parse_base_url("https://api.example.com/api/v1/customer").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/api/v1/customer/");
        assert_eq!(
            url.join("product-sku/abc").unwrap().as_str(),
            "https://api.example.com/api/v1/customer/product-sku/abc"
        );
    }

    #[test]
    fn test_parse_base_url_keeps_existing_slash() {
        let url = parse_base_url("http://localhost:8080/").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/");
    }

    #[test]
    fn test_parse_base_url_rejects_other_schemes() {
        assert!(parse_base_url("ftp://files.example.com").is_err());
        assert!(parse_base_url("not a url").is_err());
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig::for_catalog(Url::parse("http://localhost:9000/").unwrap());

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_catalog_defaults() {
        let catalog = CatalogConfig::new(Url::parse("http://localhost:9000/").unwrap());
        assert_eq!(catalog.timeout, Duration::from_secs(10));
        assert_eq!(catalog.cache_ttl, Duration::from_secs(300));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingEnvVar("CATALOG_API_URL".to_string());
        assert_eq!(
            err.to_string(),
            "Missing environment variable: CATALOG_API_URL"
        );
    }
}
