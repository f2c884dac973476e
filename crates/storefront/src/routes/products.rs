//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, RawQuery, State},
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use url::form_urlencoded;
use verdant_core::cart::{self, CartChange};
use verdant_core::detail::{DetailEvent, DetailSnapshot, DetailState, Transition};
use verdant_core::product::VariationChoice;
use verdant_core::selection::SelectionState;
use verdant_core::{AxisId, CurrencyCode, ImageId, OptionId, Price, SkuId};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::services::{SessionCartStore, Toast, load_detail_page};
use crate::state::AppState;

// =============================================================================
// All Products grid (static content)
// =============================================================================

/// A card in the "All Products" grid.
#[derive(Clone)]
pub struct GridItemView {
    pub name: &'static str,
    pub image_url: &'static str,
    pub price: String,
}

/// Sizes offered on every grid card.
pub const GRID_SIZES: [&str; 3] = ["S", "M", "L"];

fn grid_item(name: &'static str, image_url: &'static str, dollars: i64) -> GridItemView {
    GridItemView {
        name,
        image_url,
        price: Price::new(Decimal::new(dollars, 0), CurrencyCode::USD).display(),
    }
}

/// The products shown on the grid page.
#[must_use]
pub fn all_products() -> Vec<GridItemView> {
    const PINKER_ZERO: &str = "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcTUcfZxzr3e5HpK6IZRem5KQZ4aUIzTj35pG53sIjbtFWq4qUQesLcoKu-fHAUEGmKQqX0&usqp=CAU";
    const BLUE_SEMTONE: &str = "https://img.freepik.com/premium-photo/white-pot-with-flowers-it-that-are-pink-yellow-pink_1089151-194448.jpg?w=360";
    const VIOLET_SW: &str = "https://img.freepik.com/premium-photo/photo-violet-flower-pot-as-houseplant-home-decoration-isolated-white-background_847439-1981.jpg";

    vec![
        grid_item(
            "Peporomia",
            "https://momentz.in/cdn/shop/products/MZ8854_b_1200x.jpg?v=1663244979",
            25,
        ),
        grid_item(
            "ChenduMalli",
            "https://img.freepik.com/premium-photo/flower-pot-with-pink-flowers-it_863013-13058.jpg?w=740",
            30,
        ),
        grid_item(
            "Gray Mank",
            "https://img.freepik.com/premium-photo/flower-pot-with-white-background_863013-13061.jpg",
            10,
        ),
        grid_item("Blue Semtone", BLUE_SEMTONE, 15),
        grid_item("Pinker Zero", PINKER_ZERO, 13),
        grid_item("Violet SW", VIOLET_SW, 23),
        grid_item(
            "Sea Malasia",
            "https://img.freepik.com/premium-photo/front-view-decorative-potted-plant-interior-home-decor-minimalist-white-background_655090-519884.jpg",
            19,
        ),
        grid_item("Blue Semtone", BLUE_SEMTONE, 15),
        grid_item("Pinker Zero", PINKER_ZERO, 13),
        grid_item("Violet SW", VIOLET_SW, 23),
    ]
}

// =============================================================================
// Product page views
// =============================================================================

/// Rating shown on every product page.
pub const PRODUCT_RATING: &str = "4.5";

/// Product page display data for templates.
pub struct ProductPageView {
    pub sku_id: String,
    pub name: String,
    pub list_price: String,
    pub price: String,
    pub sold_quantity: u64,
    pub description: String,
    pub main_image: String,
    pub thumbnails: Vec<ThumbnailView>,
    pub axes: Vec<AxisView>,
    pub in_cart: bool,
}

/// A product image thumbnail.
pub struct ThumbnailView {
    pub path: String,
    pub href: String,
    pub is_main: bool,
}

/// A variation axis with its option buttons.
pub struct AxisView {
    pub name: String,
    pub options: Vec<OptionView>,
}

/// One option button.
pub struct OptionView {
    pub label: String,
    pub href: String,
    pub selected: bool,
}

fn product_href(sku_id: &SkuId) -> String {
    format!("/products/{sku_id}")
}

/// Query key prefix for the selection an option link applies to.
const CURRENT_PREFIX: &str = "v.";

fn select_href(
    sku_id: &SkuId,
    current: &SelectionState,
    axis_id: &AxisId,
    option_id: &OptionId,
) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query
        .append_pair("axis", axis_id.as_str())
        .append_pair("option", option_id.as_str());
    for (axis, option) in current.iter() {
        query.append_pair(&format!("{CURRENT_PREFIX}{axis}"), option.as_str());
    }
    format!("/products/{sku_id}/select?{}", query.finish())
}

fn image_href(sku_id: &SkuId, image_id: &ImageId) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("image", image_id.as_str())
        .finish();
    format!("/products/{sku_id}?{query}")
}

impl ProductPageView {
    /// Build the view for a loaded page.
    #[must_use]
    pub fn new(snapshot: &DetailSnapshot, chosen_image: Option<&ImageId>, in_cart: bool) -> Self {
        let product = &snapshot.product;
        let main_image = product.main_image(chosen_image).to_string();

        let thumbnails = product
            .images
            .iter()
            .map(|image| ThumbnailView {
                path: image.path.clone(),
                href: image_href(&snapshot.sku_id, &image.id),
                is_main: image.path == main_image,
            })
            .collect();

        let axes = snapshot
            .axes
            .iter()
            .map(|axis| AxisView {
                name: axis.name.clone(),
                options: axis
                    .options
                    .iter()
                    .map(|option| OptionView {
                        label: option.label.clone(),
                        href: select_href(
                            &snapshot.sku_id,
                            &snapshot.selection,
                            &axis.id,
                            &option.id,
                        ),
                        selected: snapshot.selection.is_selected(&axis.id, &option.id),
                    })
                    .collect(),
            })
            .collect();

        Self {
            sku_id: snapshot.sku_id.to_string(),
            name: product.name.clone(),
            list_price: product.list_price.display(),
            price: product.price.display(),
            sold_quantity: product.sold_quantity,
            description: product.description.clone(),
            main_image,
            thumbnails,
            axes,
            in_cart,
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub products: Vec<GridItemView>,
    pub sizes: [&'static str; 3],
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: ProductPageView,
    pub rating: &'static str,
    pub toast: Option<Toast>,
    /// The selected options match no SKU.
    pub unavailable_combination: bool,
}

// =============================================================================
// Handlers
// =============================================================================

/// Query parameters for the product page.
#[derive(Debug, Deserialize)]
pub struct ShowQuery {
    /// Image to show as the main image.
    pub image: Option<String>,
}

/// A variation option change and the selection it applies to.
///
/// Parsed from `axis=<axis_id>&option=<option_id>` followed by one
/// `v.<axis_id>=<option_id>` pair per axis of the selection on display.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SelectQuery {
    pub axis: Option<AxisId>,
    pub option: Option<OptionId>,
    pub current: Vec<VariationChoice>,
}

impl SelectQuery {
    /// Parse a raw query string. Unrecognized keys are ignored.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        let mut parsed = Self::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "axis" => parsed.axis = Some(AxisId::new(value)),
                "option" => parsed.option = Some(OptionId::new(value)),
                other => {
                    if let Some(axis) = other.strip_prefix(CURRENT_PREFIX) {
                        parsed
                            .current
                            .push(VariationChoice::new(axis, value.into_owned()));
                    }
                }
            }
        }
        parsed
    }
}

/// Whether `option_id` is an option of axis `axis_id` on this page.
fn is_known_option(snapshot: &DetailSnapshot, axis_id: &AxisId, option_id: &OptionId) -> bool {
    snapshot
        .axes
        .iter()
        .find(|axis| &axis.id == axis_id)
        .is_some_and(|axis| axis.option(option_id).is_some())
}

/// Display product listing page.
#[instrument]
pub async fn index() -> ProductsIndexTemplate {
    ProductsIndexTemplate {
        products: all_products(),
        sizes: GRID_SIZES,
    }
}

/// Whether the product on `snapshot` is in the session's cart.
async fn in_cart(session: &Session, snapshot: &DetailSnapshot) -> bool {
    cart::contains(&SessionCartStore::new(session.clone()), &snapshot.product.id).await
}

/// Display product detail page.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(sku_id): Path<String>,
    Query(query): Query<ShowQuery>,
) -> Result<ProductShowTemplate> {
    let snapshot = load_detail_page(state.catalog(), SkuId::new(sku_id)).await?;
    let chosen_image = query.image.map(ImageId::new);
    let in_cart = in_cart(&session, &snapshot).await;

    Ok(ProductShowTemplate {
        product: ProductPageView::new(&snapshot, chosen_image.as_ref(), in_cart),
        rating: PRODUCT_RATING,
        toast: Toast::take(&session).await,
        unavailable_combination: false,
    })
}

/// Change one variation option.
///
/// The change applies on top of the selection the link was rendered with. A
/// selection that matches another SKU redirects to that SKU's page. Otherwise
/// the current product is rendered with the selection shown, plus a notice
/// when it matches nothing.
#[instrument(skip(state, session))]
pub async fn select(
    State(state): State<AppState>,
    session: Session,
    Path(sku_id): Path<String>,
    RawQuery(raw): RawQuery,
) -> Result<Response> {
    let SelectQuery {
        axis,
        option,
        current,
    } = SelectQuery::parse(raw.as_deref().unwrap_or_default());
    let (Some(axis_id), Some(option_id)) = (axis, option) else {
        return Err(AppError::BadRequest(
            "axis and option are required".to_string(),
        ));
    };

    let mut snapshot = load_detail_page(state.catalog(), SkuId::new(sku_id)).await?;

    if !is_known_option(&snapshot, &axis_id, &option_id) {
        return Err(AppError::BadRequest(format!(
            "unknown option {option_id} for variation {axis_id}"
        )));
    }
    for choice in current {
        if !is_known_option(&snapshot, &choice.axis_id, &choice.option_id) {
            return Err(AppError::BadRequest(format!(
                "unknown option {} for variation {}",
                choice.option_id, choice.axis_id
            )));
        }
        snapshot.selection.choose(choice.axis_id, choice.option_id);
    }

    let Transition { state: next, fetch } =
        DetailState::Ready(snapshot).transition(DetailEvent::SelectionChanged { axis_id, option_id });

    if let Some(target) = fetch {
        return Ok(Redirect::to(&product_href(&target)).into_response());
    }

    let DetailState::Ready(snapshot) = next else {
        return Err(AppError::Internal(
            "selection change left the product page".to_string(),
        ));
    };

    let in_cart = in_cart(&session, &snapshot).await;
    Ok(ProductShowTemplate {
        product: ProductPageView::new(&snapshot, None, in_cart),
        rating: PRODUCT_RATING,
        toast: Toast::take(&session).await,
        unavailable_combination: snapshot.resolved.is_none(),
    }
    .into_response())
}

/// Add the product to the cart, or remove it when already there.
#[instrument(skip(state, session))]
pub async fn toggle_cart(
    State(state): State<AppState>,
    session: Session,
    Path(sku_id): Path<String>,
) -> Result<Redirect> {
    let snapshot = load_detail_page(state.catalog(), SkuId::new(sku_id)).await?;
    let product = &snapshot.product;
    let store = SessionCartStore::new(session.clone());

    match cart::toggle(&store, product).await {
        Ok(CartChange::Added) => {
            add_breadcrumb("cart", "Added to cart", Some(&[("product_id", product.id.as_str())]));
            Toast::success(format!("{} added to cart!", product.name))
                .push(&session)
                .await;
        }
        Ok(CartChange::Removed) => {
            add_breadcrumb(
                "cart",
                "Removed from cart",
                Some(&[("product_id", product.id.as_str())]),
            );
            Toast::success(format!("{} removed from cart.", product.name))
                .push(&session)
                .await;
        }
        Err(e) => {
            tracing::error!(product_id = %product.id, error = %e, "Failed to update cart");
        }
    }

    Ok(Redirect::to(&product_href(&snapshot.sku_id)))
}
