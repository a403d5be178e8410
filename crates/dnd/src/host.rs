use std::cmp::Ordering;

use gpui::{Bounds, Edges, Pixels, Point, Size};

use crate::geometry::size_with_margins;
use crate::{DragAreaId, DraggableId, DropListId, ScrollContainerId, ScrollMetrics};

/// Border box and margins of a host element.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemLayout {
    pub bounds: Bounds<Pixels>,
    pub margins: Edges<Pixels>,
}

impl ItemLayout {
    pub fn new(bounds: Bounds<Pixels>) -> Self {
        Self {
            bounds,
            margins: Edges::default(),
        }
    }

    pub fn margins(mut self, margins: Edges<Pixels>) -> Self {
        self.margins = margins;
        self
    }

    pub fn outer_size(&self) -> Size<Pixels> {
        size_with_margins(self.bounds.size, &self.margins)
    }
}

/// Capabilities the view layer lends the engine for the duration of a call.
///
/// All geometry is in the coordinate space of pointer events. The engine
/// only reads layout through this trait; the one side effect it asks for is
/// [`DragHost::scroll_by`]. Everything else it wants on screen is exposed as
/// read-only state on [`crate::Draggable`] and [`crate::DropList`].
pub trait DragHost {
    fn item_layout(&self, draggable: DraggableId) -> Option<ItemLayout>;

    fn drop_list_bounds(&self, drop_list: DropListId) -> Option<Bounds<Pixels>>;

    /// Where the list's placeholder is currently laid out, if it has been
    /// painted yet.
    fn placeholder_bounds(&self, _drop_list: DropListId) -> Option<Bounds<Pixels>> {
        None
    }

    fn drag_area_bounds(&self, _area: DragAreaId) -> Option<Bounds<Pixels>> {
        None
    }

    /// Document order of two draggables.
    fn compare_order(&self, a: DraggableId, b: DraggableId) -> Ordering;

    /// Ancestors of the list that may scroll, innermost first.
    fn scroll_containers(&self, _drop_list: DropListId) -> Vec<ScrollContainerId> {
        Vec::new()
    }

    fn scroll_metrics(&self, _container: ScrollContainerId) -> Option<ScrollMetrics> {
        None
    }

    /// Scrolls `container` by `delta` (`x` left, `y` top).
    fn scroll_by(&mut self, _container: ScrollContainerId, _delta: Point<Pixels>) {}
}
