use gpui::{Bounds, Edges, Pixels, Point, Size, point, px, size};
use serde::{Deserialize, Serialize};

/// Flow direction of a drop list. Displacement and auto-scroll follow the
/// main axis: rows for `Vertical`, columns for `Horizontal`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

impl Orientation {
    pub fn main(self, position: Point<Pixels>) -> Pixels {
        match self {
            Orientation::Vertical => position.y,
            Orientation::Horizontal => position.x,
        }
    }

    pub fn cross(self, position: Point<Pixels>) -> Pixels {
        match self {
            Orientation::Vertical => position.x,
            Orientation::Horizontal => position.y,
        }
    }

    pub fn extent(self, size: Size<Pixels>) -> Pixels {
        match self {
            Orientation::Vertical => size.height,
            Orientation::Horizontal => size.width,
        }
    }

    pub fn start(self, bounds: &Bounds<Pixels>) -> Pixels {
        match self {
            Orientation::Vertical => bounds.top(),
            Orientation::Horizontal => bounds.left(),
        }
    }

    pub fn end(self, bounds: &Bounds<Pixels>) -> Pixels {
        match self {
            Orientation::Vertical => bounds.bottom(),
            Orientation::Horizontal => bounds.right(),
        }
    }

    pub fn cross_start(self, bounds: &Bounds<Pixels>) -> Pixels {
        match self {
            Orientation::Vertical => bounds.left(),
            Orientation::Horizontal => bounds.top(),
        }
    }

    pub fn margin_start(self, margins: &Edges<Pixels>) -> Pixels {
        match self {
            Orientation::Vertical => margins.top,
            Orientation::Horizontal => margins.left,
        }
    }

    pub fn margin_end(self, margins: &Edges<Pixels>) -> Pixels {
        match self {
            Orientation::Vertical => margins.bottom,
            Orientation::Horizontal => margins.right,
        }
    }

    pub fn cross_margin_start(self, margins: &Edges<Pixels>) -> Pixels {
        match self {
            Orientation::Vertical => margins.left,
            Orientation::Horizontal => margins.top,
        }
    }

    /// A vector of `amount` along the main axis.
    pub fn along(self, amount: Pixels) -> Point<Pixels> {
        match self {
            Orientation::Vertical => point(px(0.), amount),
            Orientation::Horizontal => point(amount, px(0.)),
        }
    }

    /// Builds a point from main/cross coordinates.
    pub fn compose(self, main: Pixels, cross: Pixels) -> Point<Pixels> {
        match self {
            Orientation::Vertical => point(cross, main),
            Orientation::Horizontal => point(main, cross),
        }
    }
}

/// Distance of the pointer from each edge of the grabbed element, measured
/// once at grab time.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoundingRectDistance {
    pub top: Pixels,
    pub bottom: Pixels,
    pub left: Pixels,
    pub right: Pixels,
}

impl BoundingRectDistance {
    pub fn measure(bounds: &Bounds<Pixels>, pointer: Point<Pixels>) -> Self {
        Self {
            top: pointer.y - bounds.top(),
            bottom: bounds.bottom() - pointer.y,
            left: pointer.x - bounds.left(),
            right: bounds.right() - pointer.x,
        }
    }

    /// Distance to the edge that leads along `orientation` (top or left).
    pub fn leading(&self, orientation: Orientation) -> Pixels {
        match orientation {
            Orientation::Vertical => self.top,
            Orientation::Horizontal => self.left,
        }
    }

    /// Distance to the trailing edge (bottom or right).
    pub fn trailing(&self, orientation: Orientation) -> Pixels {
        match orientation {
            Orientation::Vertical => self.bottom,
            Orientation::Horizontal => self.right,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScrollDirection {
    #[default]
    None,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
    TopLeft,
}

impl ScrollDirection {
    pub const ALL: [ScrollDirection; 9] = [
        ScrollDirection::None,
        ScrollDirection::Top,
        ScrollDirection::TopRight,
        ScrollDirection::Right,
        ScrollDirection::BottomRight,
        ScrollDirection::Bottom,
        ScrollDirection::BottomLeft,
        ScrollDirection::Left,
        ScrollDirection::TopLeft,
    ];

    /// Sign of the vertical component: -1 up, 1 down.
    pub fn vertical(self) -> i8 {
        match self {
            ScrollDirection::Top | ScrollDirection::TopRight | ScrollDirection::TopLeft => -1,
            ScrollDirection::Bottom | ScrollDirection::BottomRight | ScrollDirection::BottomLeft => {
                1
            }
            _ => 0,
        }
    }

    /// Sign of the horizontal component: -1 left, 1 right.
    pub fn horizontal(self) -> i8 {
        match self {
            ScrollDirection::Left | ScrollDirection::TopLeft | ScrollDirection::BottomLeft => -1,
            ScrollDirection::Right | ScrollDirection::TopRight | ScrollDirection::BottomRight => 1,
            _ => 0,
        }
    }

    pub fn is_corner(self) -> bool {
        self.vertical() != 0 && self.horizontal() != 0
    }
}

/// Which edge band of `bounds` the pointer is hovering, if any.
///
/// A band is `threshold * size` wide along its axis. Corners win over plain
/// edges when the pointer sits inside two bands at once.
pub fn scroll_direction(
    bounds: &Bounds<Pixels>,
    threshold: f32,
    pointer: Point<Pixels>,
) -> ScrollDirection {
    let x_threshold = bounds.size.width * threshold;
    let y_threshold = bounds.size.height * threshold;
    let (top, right, bottom, left) = (bounds.top(), bounds.right(), bounds.bottom(), bounds.left());

    let in_left = pointer.x >= left && pointer.x <= left + x_threshold;
    let in_right = pointer.x <= right && pointer.x >= right - x_threshold;

    if pointer.y >= top && pointer.y <= top + y_threshold {
        if in_left {
            return ScrollDirection::TopLeft;
        }
        if in_right {
            return ScrollDirection::TopRight;
        }
        return ScrollDirection::Top;
    }

    if pointer.y >= bottom - y_threshold && pointer.y <= bottom {
        if in_left {
            return ScrollDirection::BottomLeft;
        }
        if in_right {
            return ScrollDirection::BottomRight;
        }
        return ScrollDirection::Bottom;
    }

    if in_left {
        return ScrollDirection::Left;
    }
    if in_right {
        return ScrollDirection::Right;
    }

    ScrollDirection::None
}

/// Scroll state of a host element, in the same coordinate space as pointer
/// events.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollMetrics {
    pub bounds: Bounds<Pixels>,
    /// `x` is the horizontal scroll offset, `y` the vertical one.
    pub scroll_offset: Point<Pixels>,
    pub content_size: Size<Pixels>,
    pub viewport_size: Size<Pixels>,
}

impl ScrollMetrics {
    pub fn max_scroll(&self) -> Point<Pixels> {
        point(
            self.content_size.width - self.viewport_size.width,
            self.content_size.height - self.viewport_size.height,
        )
    }

    pub fn has_overflow(&self) -> bool {
        self.content_size.width > self.viewport_size.width
            || self.content_size.height > self.viewport_size.height
    }

    pub fn position(&self) -> ScrollPosition {
        ScrollPosition {
            top: self.scroll_offset.y,
            left: self.scroll_offset.x,
        }
    }
}

/// Whether `metrics` leaves any room to scroll towards `direction`.
pub fn can_scroll(metrics: &ScrollMetrics, direction: ScrollDirection) -> bool {
    let max = metrics.max_scroll();
    let offset = metrics.scroll_offset;
    let up = offset.y > px(0.);
    let down = offset.y < max.y;
    let left = offset.x > px(0.);
    let right = offset.x < max.x;

    match direction {
        ScrollDirection::None => false,
        ScrollDirection::Top => up,
        ScrollDirection::TopRight => up || right,
        ScrollDirection::Right => right,
        ScrollDirection::BottomRight => down || right,
        ScrollDirection::Bottom => down,
        ScrollDirection::BottomLeft => down || left,
        ScrollDirection::Left => left,
        ScrollDirection::TopLeft => up || left,
    }
}

/// Per-tick scroll delta: `x` is the left delta, `y` the top delta.
pub fn scroll_step(direction: ScrollDirection, step: Pixels) -> Point<Pixels> {
    point(
        step * direction.horizontal() as f32,
        step * direction.vertical() as f32,
    )
}

/// Like [`scroll_step`], but scales each axis by how deep into its
/// threshold band the pointer is. The band is split into `zones` slices and
/// the slice nearest the edge scrolls `zones * step` per tick.
pub fn zoned_scroll_step(
    bounds: &Bounds<Pixels>,
    threshold: f32,
    zones: u32,
    pointer: Point<Pixels>,
    direction: ScrollDirection,
    step: Pixels,
) -> Point<Pixels> {
    if zones <= 1 {
        return scroll_step(direction, step);
    }

    let x_threshold = bounds.size.width * threshold;
    let y_threshold = bounds.size.height * threshold;

    let vertical = match direction.vertical() {
        -1 => zone_multiplier(y_threshold, bounds.top() + y_threshold - pointer.y, zones) * -1.,
        1 => zone_multiplier(y_threshold, pointer.y - (bounds.bottom() - y_threshold), zones),
        _ => 0.,
    };
    let horizontal = match direction.horizontal() {
        -1 => zone_multiplier(x_threshold, bounds.left() + x_threshold - pointer.x, zones) * -1.,
        1 => zone_multiplier(x_threshold, pointer.x - (bounds.right() - x_threshold), zones),
        _ => 0.,
    };

    point(step * horizontal, step * vertical)
}

fn zone_multiplier(band: Pixels, depth: Pixels, zones: u32) -> f32 {
    let band = f32::from(band);
    let depth = f32::from(depth).max(0.);
    let zone_size = (band / zones as f32).ceil();
    if !zone_size.is_finite() || zone_size <= 0. {
        return 1.;
    }
    ((depth / zone_size).floor() + 1.).min(zones as f32)
}

/// Last observed scroll offsets of an ancestor.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollPosition {
    pub top: Pixels,
    pub left: Pixels,
}

impl ScrollPosition {
    /// How far content under a stationary pointer moved when scrolling from
    /// `self` to `next`.
    pub fn content_shift(&self, next: &ScrollPosition) -> Point<Pixels> {
        point(self.left - next.left, self.top - next.top)
    }
}

pub fn size_with_margins(bounds_size: Size<Pixels>, margins: &Edges<Pixels>) -> Size<Pixels> {
    size(
        bounds_size.width + margins.left + margins.right,
        bounds_size.height + margins.top + margins.bottom,
    )
}

pub(crate) fn translate(bounds: &mut Bounds<Pixels>, delta: Point<Pixels>) {
    bounds.origin = point(bounds.origin.x + delta.x, bounds.origin.y + delta.y);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Bounds<Pixels> {
        Bounds::new(point(px(x), px(y)), size(px(w), px(h)))
    }

    fn metrics(offset: (f32, f32), content: (f32, f32), viewport: (f32, f32)) -> ScrollMetrics {
        ScrollMetrics {
            bounds: rect(0., 0., viewport.0, viewport.1),
            scroll_offset: point(px(offset.0), px(offset.1)),
            content_size: size(px(content.0), px(content.1)),
            viewport_size: size(px(viewport.0), px(viewport.1)),
        }
    }

    #[test]
    fn scroll_direction_picks_edges_and_corners() {
        let bounds = rect(0., 0., 100., 200.);
        let at = |x: f32, y: f32| scroll_direction(&bounds, 0.1, point(px(x), px(y)));

        assert_eq!(at(50., 5.), ScrollDirection::Top);
        assert_eq!(at(50., 195.), ScrollDirection::Bottom);
        assert_eq!(at(5., 100.), ScrollDirection::Left);
        assert_eq!(at(95., 100.), ScrollDirection::Right);
        assert_eq!(at(5., 5.), ScrollDirection::TopLeft);
        assert_eq!(at(95., 5.), ScrollDirection::TopRight);
        assert_eq!(at(5., 195.), ScrollDirection::BottomLeft);
        assert_eq!(at(95., 195.), ScrollDirection::BottomRight);
        assert_eq!(at(50., 100.), ScrollDirection::None);
        assert_eq!(at(50., 250.), ScrollDirection::None);
    }

    #[test]
    fn band_edges_are_inclusive() {
        let bounds = rect(0., 0., 100., 100.);
        assert_eq!(
            scroll_direction(&bounds, 0.1, point(px(50.), px(10.))),
            ScrollDirection::Top
        );
        assert_eq!(
            scroll_direction(&bounds, 0.1, point(px(50.), px(10.5))),
            ScrollDirection::None
        );
    }

    #[test]
    fn can_scroll_tracks_remaining_room() {
        let top = metrics((0., 0.), (100., 400.), (100., 200.));
        assert!(!can_scroll(&top, ScrollDirection::Top));
        assert!(can_scroll(&top, ScrollDirection::Bottom));
        assert!(!can_scroll(&top, ScrollDirection::Left));
        assert!(can_scroll(&top, ScrollDirection::BottomLeft));

        let end = metrics((0., 200.), (100., 400.), (100., 200.));
        assert!(can_scroll(&end, ScrollDirection::Top));
        assert!(!can_scroll(&end, ScrollDirection::Bottom));
        assert!(!can_scroll(&end, ScrollDirection::None));
    }

    #[test]
    fn no_overflow_never_scrolls() {
        let still = metrics((0., 0.), (100., 100.), (100., 100.));
        assert!(!still.has_overflow());
        for direction in ScrollDirection::ALL {
            assert!(!can_scroll(&still, direction), "{direction:?}");
        }
    }

    #[test]
    fn scroll_step_is_signed_per_axis() {
        assert_eq!(
            scroll_step(ScrollDirection::TopLeft, px(2.)),
            point(px(-2.), px(-2.))
        );
        assert_eq!(
            scroll_step(ScrollDirection::Bottom, px(3.)),
            point(px(0.), px(3.))
        );
        assert_eq!(
            scroll_step(ScrollDirection::None, px(3.)),
            point(px(0.), px(0.))
        );
    }

    #[test]
    fn zoned_step_speeds_up_near_the_edge() {
        let bounds = rect(0., 0., 100., 100.);
        let step = |y: f32| {
            zoned_scroll_step(
                &bounds,
                0.3,
                3,
                point(px(50.), px(y)),
                ScrollDirection::Bottom,
                px(2.),
            )
        };

        assert_eq!(step(71.), point(px(0.), px(2.)));
        assert_eq!(step(85.), point(px(0.), px(4.)));
        assert_eq!(step(99.), point(px(0.), px(6.)));
        assert_eq!(step(100.), point(px(0.), px(6.)));
    }

    #[test]
    fn content_shift_is_negated_scroll_delta() {
        let before = ScrollPosition {
            top: px(10.),
            left: px(0.),
        };
        let after = ScrollPosition {
            top: px(30.),
            left: px(5.),
        };
        assert_eq!(before.content_shift(&after), point(px(-5.), px(-20.)));
    }
}
