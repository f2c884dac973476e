//! Overflow and scroll control for horizontally scrolling rows.
//!
//! The controller tracks whether the left and right scroll arrows should be
//! visible and turns an arrow activation into a scroll of exactly one
//! viewport width. It never clamps: the scroll surface clamps at the content
//! boundaries (see [`ScrollMetrics::clamp_offset`]).

/// Geometry of a scroll container, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollMetrics {
    /// Distance scrolled from the left edge.
    pub scroll_offset: u32,
    /// Width of the visible part of the container.
    pub visible_width: u32,
    /// Width of the full content.
    pub content_width: u32,
}

impl ScrollMetrics {
    #[must_use]
    pub const fn new(scroll_offset: u32, visible_width: u32, content_width: u32) -> Self {
        Self {
            scroll_offset,
            visible_width,
            content_width,
        }
    }

    /// Content is wider than the viewport.
    #[must_use]
    pub const fn overflows(&self) -> bool {
        self.content_width > self.visible_width
    }

    /// Largest reachable offset.
    #[must_use]
    pub const fn max_offset(&self) -> u32 {
        self.content_width.saturating_sub(self.visible_width)
    }

    /// Clamp a requested offset the way a scroll surface does.
    #[must_use]
    pub fn clamp_offset(&self, requested: i64) -> u32 {
        let max = i64::from(self.max_offset());
        // Clamped into [0, u32::MAX], so the conversion cannot fail.
        u32::try_from(requested.clamp(0, max)).unwrap_or(0)
    }

    /// Metrics after the surface applies `command`.
    #[must_use]
    pub fn scrolled(&self, command: ScrollCommand) -> Self {
        Self {
            scroll_offset: self.clamp_offset(i64::from(self.scroll_offset) + command.delta),
            ..*self
        }
    }
}

/// Which scroll arrows are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArrowState {
    pub show_left: bool,
    pub show_right: bool,
}

/// Direction of an arrow activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Left,
    Right,
}

/// How the surface should animate a scroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

impl ScrollBehavior {
    /// Value for the CSS `scroll-behavior` property.
    #[must_use]
    pub const fn css(&self) -> &'static str {
        match self {
            Self::Smooth => "smooth",
            Self::Instant => "auto",
        }
    }
}

/// A relative scroll request for the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollCommand {
    /// Signed distance in pixels; negative scrolls left.
    pub delta: i64,
    pub behavior: ScrollBehavior,
}

/// Arrow visibility state for one scroll container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollController {
    arrows: ArrowState,
}

impl ScrollController {
    /// Seed the arrows when the container first renders.
    ///
    /// Only overflow is checked: the offset is zero at mount, so the left
    /// arrow starts hidden.
    #[must_use]
    pub const fn mount(metrics: &ScrollMetrics) -> Self {
        Self {
            arrows: ArrowState {
                show_left: false,
                show_right: metrics.overflows(),
            },
        }
    }

    /// Recompute both arrows after the container scrolled.
    pub fn on_scroll(&mut self, metrics: &ScrollMetrics) {
        let reach = u64::from(metrics.scroll_offset) + u64::from(metrics.visible_width);
        self.arrows = ArrowState {
            show_left: metrics.scroll_offset > 0,
            show_right: reach < u64::from(metrics.content_width),
        };
    }

    /// Re-check overflow after the viewport was resized.
    ///
    /// Only the right arrow follows overflow; the left arrow keeps its state
    /// until the next scroll event.
    pub const fn on_resize(&mut self, metrics: &ScrollMetrics) {
        self.arrows.show_right = metrics.overflows();
    }

    #[must_use]
    pub const fn arrows(&self) -> ArrowState {
        self.arrows
    }

    /// Scroll one viewport width in `direction`, animated.
    #[must_use]
    pub fn scroll(direction: ScrollDirection, metrics: &ScrollMetrics) -> ScrollCommand {
        let amount = i64::from(metrics.visible_width);
        ScrollCommand {
            delta: match direction {
                ScrollDirection::Left => -amount,
                ScrollDirection::Right => amount,
            },
            behavior: ScrollBehavior::Smooth,
        }
    }
}
