//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::filters;
use crate::services::DetailError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Product page could not be loaded.
    #[error(transparent)]
    Detail(#[from] DetailError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// 404 page.
#[derive(Template, WebTemplate)]
#[template(path = "error/not_found.html")]
pub struct NotFoundTemplate {
    pub what: String,
}

/// Shown when the catalog cannot serve a product page.
#[derive(Template, WebTemplate)]
#[template(path = "products/unavailable.html")]
pub struct ProductUnavailableTemplate {
    pub sku_id: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(
            self,
            Self::Internal(_) | Self::Detail(DetailError::Unavailable { .. })
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        match self {
            Self::Detail(DetailError::NotFound(sku_id)) => (
                StatusCode::NOT_FOUND,
                NotFoundTemplate {
                    what: format!("product {sku_id}"),
                },
            )
                .into_response(),
            Self::Detail(DetailError::Unavailable { sku_id, .. }) => (
                StatusCode::BAD_GATEWAY,
                ProductUnavailableTemplate {
                    sku_id: sku_id.into_inner(),
                },
            )
                .into_response(),
            Self::NotFound(what) => {
                (StatusCode::NOT_FOUND, NotFoundTemplate { what }).into_response()
            }
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()).into_response(),
            // Don't expose internal error details to clients
            Self::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Toggled cart entry", Some(&[("sku_id", "123")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use verdant_core::SkuId;

    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product-123".to_string());
        assert_eq!(err.to_string(), "Not found: product-123");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            let response = err.into_response();
            response.status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(DetailError::NotFound(SkuId::new("missing")).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(
                DetailError::Unavailable {
                    sku_id: SkuId::new("sku-1"),
                    reason: "timeout".to_string(),
                }
                .into()
            ),
            StatusCode::BAD_GATEWAY
        );
    }
}
