//! Integration tests for Verdant.
//!
//! The storefront router is driven in-process with `tower::ServiceExt::oneshot`
//! against a `wiremock` stand-in for the catalog API. No server or network
//! access beyond the local mock is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p verdant-integration-tests
//! ```
//!
//! # Catalog fixture
//!
//! One catalog product (`stand-1`, "Gold Circle") with two axes:
//!
//! ```text
//! color: gold, black     size: s, m
//!
//! sku-gold-s   gold / s
//! sku-gold-m   gold / m
//! sku-black-s  black / s      (black / m does not exist)
//! sku-legacy   records no options; resolves to gold / s
//! ```

#![allow(clippy::missing_panics_doc)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;
use url::Url;
use verdant_storefront::config::StorefrontConfig;
use verdant_storefront::state::AppState;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Path prefix the mock catalog serves under.
pub const API_PREFIX: &str = "/api/v1/customer";

/// Catalog product id shared by every fixture SKU.
pub const PRODUCT_ID: &str = "stand-1";

/// A storefront router wired to a mock catalog.
pub struct TestContext {
    pub catalog: MockServer,
    pub app: Router,
}

impl TestContext {
    /// Start a mock catalog serving the fixture and build the router.
    pub async fn new() -> Self {
        let catalog = MockServer::start().await;
        mount_fixture(&catalog).await;
        Self::with_catalog(catalog)
    }

    /// Build the router against an already configured mock catalog.
    pub fn with_catalog(catalog: MockServer) -> Self {
        let base = Url::parse(&format!("{}{API_PREFIX}/", catalog.uri()))
            .expect("mock server URI is a valid URL");
        let state = AppState::new(StorefrontConfig::for_catalog(base))
            .expect("catalog client builds");
        let app = verdant_storefront::app(state);
        Self { catalog, app }
    }

    /// Send a GET request, optionally with a session cookie.
    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        self.send("GET", uri, cookie).await
    }

    /// Send a POST request with an empty body, optionally with a session cookie.
    pub async fn post(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        self.send("POST", uri, cookie).await
    }

    async fn send(&self, method: &str, uri: &str, cookie: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = builder.body(Body::empty()).expect("request builds");

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        TestResponse::read(response).await
    }
}

/// A fully read response.
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    /// `name=value` part of the `set-cookie` header, if any.
    pub cookie: Option<String>,
    pub body: String,
}

impl TestResponse {
    async fn read(response: Response<Body>) -> Self {
        let status = response.status();
        let headers = response.headers();
        let location = headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let cookie = headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(String::from);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");

        Self {
            status,
            location,
            cookie,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

/// The `href` of the option link labelled `label` in a rendered product page,
/// with HTML escaping of `&` undone.
#[must_use]
pub fn option_href(body: &str, label: &str) -> Option<String> {
    let end = body
        .find(&format!(r#"class="option">{label}<"#))
        .or_else(|| body.find(&format!(r#"class="option is-selected">{label}<"#)))?;
    let anchor = body.get(..end)?;
    let start = anchor.rfind(r#"href=""#)? + r#"href=""#.len();
    let href = anchor.get(start..)?.split('"').next()?;
    Some(href.replace("&amp;", "&"))
}

// =============================================================================
// Catalog fixture
// =============================================================================

/// `product-sku` payload for one SKU.
#[must_use]
pub fn product_body(sku_id: &str, recorded: &[(&str, &str)]) -> Value {
    let variations: Vec<Value> = recorded
        .iter()
        .map(|(axis, option)| {
            json!({
                "M10_M08_product_variation_id": axis,
                "M10_M09_variation_option_id": option
            })
        })
        .collect();

    json!({
        "success": true,
        "data": {
            "_id": sku_id,
            "M06_M05_product_id": PRODUCT_ID,
            "M06_product_sku_name": "Gold Circle",
            "M06_MRP": 40,
            "M06_price": 35,
            "M06_quantity": 12,
            "M06_description": "A brass ring stand for trailing plants.",
            "M06_thumbnail_image": "/img/gold-circle-thumb.jpg",
            "Images": [
                {"_id": "img-front", "M07_image_path": "/img/gold-circle-front.jpg"},
                {"_id": "img-side", "M07_image_path": "/img/gold-circle-side.jpg"}
            ],
            "Variations": variations
        }
    })
}

fn variations_body() -> Value {
    json!({
        "success": true,
        "data": [
            {
                "_id": "color",
                "M08_name": "Color",
                "options": [
                    {"_id": "gold", "M09_name": "Gold"},
                    {"_id": "black", "M09_name": "Black"}
                ]
            },
            {
                "_id": "size",
                "M08_name": "Size",
                "options": [
                    {"_id": "s", "M09_name": "S"},
                    {"_id": "m", "M09_name": "M"}
                ]
            }
        ]
    })
}

fn sku(sku_id: &str, color: &str, size: &str) -> Value {
    json!({
        "skuId": sku_id,
        "variations": [
            {"_id": "color", "options": {"_id": color}},
            {"_id": "size", "options": {"_id": size}}
        ]
    })
}

fn skus_body() -> Value {
    json!({
        "success": true,
        "data": [
            sku("sku-gold-s", "gold", "s"),
            sku("sku-gold-m", "gold", "m"),
            sku("sku-black-s", "black", "s")
        ]
    })
}

/// Mount a `product-sku` response.
pub async fn mount_product(server: &MockServer, sku_id: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("{API_PREFIX}/product-sku/{sku_id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mount the variation axes and SKU list of the fixture product.
pub async fn mount_catalog_lists(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(format!("{API_PREFIX}/variation-by-product-id/{PRODUCT_ID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(variations_body()))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!(
            "{API_PREFIX}/skus-variation-by-product-id/{PRODUCT_ID}"
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(skus_body()))
        .mount(server)
        .await;
}

/// Mount the whole fixture catalog.
pub async fn mount_fixture(server: &MockServer) {
    mount_product(
        server,
        "sku-gold-s",
        product_body("sku-gold-s", &[("color", "gold"), ("size", "s")]),
    )
    .await;
    mount_product(
        server,
        "sku-gold-m",
        product_body("sku-gold-m", &[("color", "gold"), ("size", "m")]),
    )
    .await;
    mount_product(
        server,
        "sku-black-s",
        product_body("sku-black-s", &[("color", "black"), ("size", "s")]),
    )
    .await;
    mount_product(server, "sku-legacy", product_body("sku-legacy", &[])).await;
    mount_catalog_lists(server).await;
}
