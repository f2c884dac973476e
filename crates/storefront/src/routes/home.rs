//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::instrument;
use verdant_core::carousel::{ArrowState, ScrollController, ScrollDirection, ScrollMetrics};

use crate::filters;
use crate::state::AppState;

// =============================================================================
// Plant Stands (static content for the carousel)
// =============================================================================

/// Width of one carousel card including the gap after it, in pixels.
pub const CARD_WIDTH_PX: u32 = 320;

/// A card in the "Plant Stands" carousel.
#[derive(Clone)]
pub struct StandView {
    pub name: &'static str,
    pub image_url: &'static str,
}

/// The stands shown on the home page.
#[must_use]
pub fn plant_stands() -> Vec<StandView> {
    vec![
        StandView {
            name: "Chair Cup Stand",
            image_url: "https://www.puresweetjoy.co.za/wp-content/uploads/2016/04/Raised-Copper-Pipe-Pot-Plant-Stand-7-600x900.jpg",
        },
        StandView {
            name: "Gold Circle",
            image_url: "https://img.freepik.com/premium-photo/minimalist-plant-stand-interior_961875-146893.jpg",
        },
        StandView {
            name: "Hanger Circle",
            image_url: "https://images-cdn.ubuy.com.sa/65fb4475c0e3c2224044749e-riseon-boho-metal-plant-hanger-metal.jpg",
        },
    ]
}

// =============================================================================
// Carousel
// =============================================================================

/// Carousel position sent back by the arrow links.
#[derive(Debug, Default, Deserialize)]
pub struct CarouselQuery {
    /// Scroll offset in pixels.
    pub offset: Option<u32>,
    /// Width of the visible row in pixels.
    pub viewport: Option<u32>,
}

/// Carousel display data for templates.
pub struct CarouselView {
    pub stands: Vec<StandView>,
    pub offset: u32,
    pub viewport: u32,
    pub arrows: ArrowState,
    pub left_href: String,
    pub right_href: String,
    /// CSS `scroll-behavior` for arrow scrolls.
    pub scroll_behavior: &'static str,
}

impl CarouselView {
    /// Lay out `stands` at the requested position.
    ///
    /// The requested offset is clamped to the scrollable range, the way a
    /// browser's scroll surface clamps it.
    #[must_use]
    pub fn new(stands: Vec<StandView>, requested_offset: Option<u32>, viewport: u32) -> Self {
        let count = u32::try_from(stands.len()).unwrap_or(u32::MAX);
        let content = count.saturating_mul(CARD_WIDTH_PX);
        let at_start = ScrollMetrics::new(0, viewport, content);

        let mut controller = ScrollController::mount(&at_start);
        let metrics = match requested_offset {
            Some(requested) => {
                let metrics = ScrollMetrics::new(
                    at_start.clamp_offset(i64::from(requested)),
                    viewport,
                    content,
                );
                controller.on_scroll(&metrics);
                metrics
            }
            None => at_start,
        };

        let left = ScrollController::scroll(ScrollDirection::Left, &metrics);
        let right = ScrollController::scroll(ScrollDirection::Right, &metrics);

        Self {
            stands,
            offset: metrics.scroll_offset,
            viewport,
            arrows: controller.arrows(),
            left_href: carousel_href(metrics.scrolled(left).scroll_offset, viewport),
            right_href: carousel_href(metrics.scrolled(right).scroll_offset, viewport),
            scroll_behavior: right.behavior.css(),
        }
    }
}

fn carousel_href(offset: u32, viewport: u32) -> String {
    format!("/?offset={offset}&viewport={viewport}#plant-stands")
}

// =============================================================================
// Handler
// =============================================================================

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub carousel: CarouselView,
}

/// Display the home page.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>, Query(query): Query<CarouselQuery>) -> HomeTemplate {
    let viewport = query
        .viewport
        .filter(|width| *width > 0)
        .unwrap_or(state.config().carousel_viewport_px);

    HomeTemplate {
        carousel: CarouselView::new(plant_stands(), query.offset, viewport),
    }
}
