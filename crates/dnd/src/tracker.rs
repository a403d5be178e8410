use gpui::{Bounds, Edges, Pixels, Point, px};

use crate::geometry::translate;
use crate::{DraggableId, Orientation};

/// Ordered list of tracked entries.
///
/// Every index argument saturates instead of failing: `insert_at` clamps to
/// `[0, len]`, `remove_at` and `move_to` clamp to `[0, len - 1]`. Overlapping
/// scroll and pointer updates can produce off-by-one indices and the list
/// must stay consistent regardless.
#[derive(Clone, Debug, PartialEq)]
pub struct PositionTracker<T> {
    items: Vec<T>,
}

impl<T> Default for PositionTracker<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> PositionTracker<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the tracked list wholesale.
    pub fn cache(&mut self, items: impl IntoIterator<Item = T>) {
        self.items = items.into_iter().collect();
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.iter_mut()
    }

    /// Inserts `item` and returns the index it actually landed at.
    pub fn insert_at(&mut self, item: T, index: usize) -> usize {
        let index = index.min(self.items.len());
        self.items.insert(index, item);
        index
    }

    pub fn remove_at(&mut self, index: usize) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }
        let index = index.min(self.items.len() - 1);
        Some(self.items.remove(index))
    }

    /// Moves the entry at `source` so that it ends up at `target`.
    ///
    /// Returns the clamped `(source, target)` pair that was applied.
    pub fn move_to(&mut self, source: usize, target: usize) -> (usize, usize) {
        if self.items.is_empty() {
            return (0, 0);
        }
        let last = self.items.len() - 1;
        let (source, target) = (source.min(last), target.min(last));
        if source != target {
            let item = self.items.remove(source);
            self.items.insert(target, item);
        }
        (source, target)
    }
}

impl<T: Clone> PositionTracker<T> {
    /// Non-mutating counterpart of [`PositionTracker::move_to`].
    pub fn moved(&self, source: usize, target: usize) -> Self {
        Self {
            items: move_item(&self.items, source, target),
        }
    }

    pub fn inserted(&self, item: T, index: usize) -> Self {
        Self {
            items: insert_item(&self.items, item, index),
        }
    }

    pub fn removed(&self, index: usize) -> Self {
        Self {
            items: remove_item(&self.items, index),
        }
    }
}

impl<T> FromIterator<T> for PositionTracker<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

/// Returns a copy of `items` with the element at `from` moved to `to`.
pub fn move_item<T: Clone>(items: &[T], from: usize, to: usize) -> Vec<T> {
    let mut out = items.to_vec();
    if out.is_empty() {
        return out;
    }
    let last = out.len() - 1;
    let (from, to) = (from.min(last), to.min(last));
    if from != to {
        let item = out.remove(from);
        out.insert(to, item);
    }
    out
}

pub fn insert_item<T: Clone>(items: &[T], item: T, index: usize) -> Vec<T> {
    let mut out = Vec::with_capacity(items.len() + 1);
    let index = index.min(items.len());
    out.extend_from_slice(&items[..index]);
    out.push(item);
    out.extend_from_slice(&items[index..]);
    out
}

pub fn remove_item<T: Clone>(items: &[T], index: usize) -> Vec<T> {
    if items.is_empty() {
        return Vec::new();
    }
    let index = index.min(items.len() - 1);
    items
        .iter()
        .enumerate()
        .filter(|(ix, _)| *ix != index)
        .map(|(_, item)| item.clone())
        .collect()
}

/// Cached geometry of one draggable inside a drop list.
///
/// `rect` is the flow position of the element (with the dragged element
/// taken out of the flow) and `offset` is the main-axis displacement
/// currently applied on top of it. Scrolling shifts `rect` in place.
#[derive(Clone, Debug, PartialEq)]
pub struct DraggablePosition {
    pub draggable: DraggableId,
    pub rect: Bounds<Pixels>,
    pub margins: Edges<Pixels>,
    pub offset: Pixels,
}

impl DraggablePosition {
    pub fn new(draggable: DraggableId, rect: Bounds<Pixels>, margins: Edges<Pixels>) -> Self {
        Self {
            draggable,
            rect,
            margins,
            offset: px(0.),
        }
    }

    pub fn visual_start(&self, orientation: Orientation) -> Pixels {
        orientation.start(&self.rect) + self.offset
    }

    pub fn visual_end(&self, orientation: Orientation) -> Pixels {
        orientation.end(&self.rect) + self.offset
    }

    pub fn midpoint(&self, orientation: Orientation) -> Pixels {
        self.visual_start(orientation) + orientation.extent(self.rect.size) / 2.
    }

    /// Strictly inside the displaced element along the main axis.
    pub fn straddles(&self, orientation: Orientation, edge: Pixels) -> bool {
        edge > self.visual_start(orientation) && edge < self.visual_end(orientation)
    }

    pub fn shift(&mut self, delta: Point<Pixels>) {
        translate(&mut self.rect, delta);
    }
}

impl PositionTracker<DraggablePosition> {
    pub fn index_of(&self, draggable: DraggableId) -> Option<usize> {
        self.items
            .iter()
            .position(|entry| entry.draggable == draggable)
    }

    pub fn shift_all(&mut self, delta: Point<Pixels>) {
        for entry in &mut self.items {
            entry.shift(delta);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker(items: &[char]) -> PositionTracker<char> {
        items.iter().copied().collect()
    }

    #[test]
    fn move_to_places_item_at_target() {
        let mut list = tracker(&['a', 'b', 'c', 'd']);
        assert_eq!(list.move_to(0, 2), (0, 2));
        assert_eq!(list.items(), &['b', 'c', 'a', 'd']);

        list.move_to(3, 0);
        assert_eq!(list.items(), &['d', 'b', 'c', 'a']);
    }

    #[test]
    fn move_to_same_index_is_noop() {
        let mut list = tracker(&['a', 'b', 'c']);
        list.move_to(1, 1);
        assert_eq!(list.items(), &['a', 'b', 'c']);
    }

    #[test]
    fn out_of_range_indices_saturate() {
        let mut list = tracker(&['a', 'b', 'c']);
        assert_eq!(list.move_to(10, 0), (2, 0));
        assert_eq!(list.items(), &['c', 'a', 'b']);

        assert_eq!(list.insert_at('z', 99), 3);
        assert_eq!(list.items(), &['c', 'a', 'b', 'z']);

        assert_eq!(list.remove_at(99), Some('z'));
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn empty_tracker_operations_do_not_panic() {
        let mut list = PositionTracker::<char>::new();
        assert_eq!(list.remove_at(0), None);
        assert_eq!(list.move_to(3, 4), (0, 0));
        assert_eq!(list.insert_at('a', 5), 0);
        assert_eq!(list.items(), &['a']);
    }

    #[test]
    fn immutable_variants_leave_source_untouched() {
        let list = tracker(&['a', 'b', 'c']);
        assert_eq!(list.moved(0, 2).items(), &['b', 'c', 'a']);
        assert_eq!(list.inserted('x', 1).items(), &['a', 'x', 'b', 'c']);
        assert_eq!(list.removed(7).items(), &['a', 'b']);
        assert_eq!(list.items(), &['a', 'b', 'c']);
    }
}
