use std::collections::BTreeSet;

use gpui::{Bounds, Pixels, Point, point};

use crate::{DragAreaId, DraggableId};

/// A region that free (list-less) draggables may not leave.
#[derive(Clone, Debug)]
pub struct DragArea {
    id: DragAreaId,
    draggables: BTreeSet<DraggableId>,
}

impl DragArea {
    pub(crate) fn new(id: DragAreaId) -> Self {
        Self {
            id,
            draggables: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> DragAreaId {
        self.id
    }

    pub fn draggables(&self) -> impl Iterator<Item = DraggableId> + '_ {
        self.draggables.iter().copied()
    }

    pub(crate) fn add(&mut self, draggable: DraggableId) {
        self.draggables.insert(draggable);
    }

    pub(crate) fn remove(&mut self, draggable: DraggableId) {
        self.draggables.remove(&draggable);
    }
}

/// Allowed range of a draggable's translation for one gesture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Boundaries {
    pub min_x: Pixels,
    pub max_x: Pixels,
    pub min_y: Pixels,
    pub max_y: Pixels,
}

impl Boundaries {
    /// `element` is the draggable's on-screen bounds, already including
    /// `offset`.
    pub fn compute(area: &Bounds<Pixels>, element: &Bounds<Pixels>, offset: Point<Pixels>) -> Self {
        Self {
            min_x: area.left() - element.left() + offset.x,
            max_x: area.right() - element.right() + offset.x,
            min_y: area.top() - element.top() + offset.y,
            max_y: area.bottom() - element.bottom() + offset.y,
        }
    }

    /// Clamps a translation into range. An element larger than its area
    /// pins to the maximum rather than oscillating.
    pub fn clamp(&self, offset: Point<Pixels>) -> Point<Pixels> {
        point(
            clamp_axis(offset.x, self.min_x, self.max_x),
            clamp_axis(offset.y, self.min_y, self.max_y),
        )
    }
}

fn clamp_axis(value: Pixels, min: Pixels, max: Pixels) -> Pixels {
    let value = if value < min { min } else { value };
    if value > max { max } else { value }
}

#[cfg(test)]
mod tests {
    use gpui::{px, size};

    use super::*;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Bounds<Pixels> {
        Bounds::new(point(px(x), px(y)), size(px(w), px(h)))
    }

    #[test]
    fn clamps_translation_inside_area() {
        let area = rect(0., 0., 200., 100.);
        let element = rect(20., 10., 50., 20.);
        let bounds = Boundaries::compute(&area, &element, point(px(0.), px(0.)));

        assert_eq!(bounds.min_x, px(-20.));
        assert_eq!(bounds.max_x, px(130.));
        assert_eq!(
            bounds.clamp(point(px(500.), px(-50.))),
            point(px(130.), px(-10.))
        );
        assert_eq!(
            bounds.clamp(point(px(10.), px(10.))),
            point(px(10.), px(10.))
        );
    }

    #[test]
    fn existing_offset_is_part_of_the_range() {
        let area = rect(0., 0., 200., 100.);
        // Element laid out at x=20 but already translated by 30.
        let element = rect(50., 10., 50., 20.);
        let bounds = Boundaries::compute(&area, &element, point(px(30.), px(0.)));
        assert_eq!(bounds.min_x, px(-20.));
        assert_eq!(bounds.max_x, px(130.));
    }

    #[test]
    fn oversized_element_pins_to_max() {
        let area = rect(0., 0., 40., 40.);
        let element = rect(0., 0., 100., 100.);
        let bounds = Boundaries::compute(&area, &element, point(px(0.), px(0.)));
        assert_eq!(bounds.clamp(point(px(0.), px(0.))), point(px(-60.), px(-60.)));
    }
}
