#![allow(dead_code)]

use std::cmp::Ordering;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use gpui::{Bounds, Pixels, Point, Size, point, px, size};
use gpui_dnd::{
    DragAreaId, DragDrop, DragDropEvent, DragHost, DraggableId, DraggableOptions, DropListId,
    ItemLayout, Orientation, ScrollContainerId, ScrollMetrics, TransitionTarget,
};

pub fn pt(x: f32, y: f32) -> Point<Pixels> {
    point(px(x), px(y))
}

pub fn rect(x: f32, y: f32, w: f32, h: f32) -> Bounds<Pixels> {
    Bounds::new(point(px(x), px(y)), size(px(w), px(h)))
}

pub fn item_size(w: f32, h: f32) -> Size<Pixels> {
    size(px(w), px(h))
}

/// Scripted layout: absolutely positioned items, list bounds and scroll
/// containers that the tests move around by hand.
#[derive(Default)]
pub struct FakeHost {
    items: HashMap<DraggableId, ItemLayout>,
    item_lists: HashMap<DraggableId, DropListId>,
    order: Vec<DraggableId>,
    lists: HashMap<DropListId, Bounds<Pixels>>,
    placeholders: HashMap<DropListId, Bounds<Pixels>>,
    areas: HashMap<DragAreaId, Bounds<Pixels>>,
    containers: HashMap<ScrollContainerId, ScrollMetrics>,
    container_lists: HashMap<ScrollContainerId, Vec<DropListId>>,
    pub scrolled: Vec<(ScrollContainerId, Point<Pixels>)>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_list(&mut self, list: DropListId, bounds: Bounds<Pixels>) {
        self.lists.insert(list, bounds);
    }

    /// Registers `count` draggables in `list`, laid out back to back from the
    /// list's origin along `orientation`.
    pub fn stack(
        &mut self,
        engine: &mut DragDrop,
        list: DropListId,
        orientation: Orientation,
        count: usize,
        item: Size<Pixels>,
    ) -> Vec<DraggableId> {
        let origin = self
            .lists
            .get(&list)
            .map(|bounds| bounds.origin)
            .unwrap_or_else(|| pt(0., 0.));
        (0..count)
            .map(|ix| {
                let id = engine
                    .create_draggable(DraggableOptions::new().drop_list(list))
                    .unwrap();
                let offset = orientation.along(orientation.extent(item) * ix as f32);
                self.place(
                    id,
                    Bounds::new(point(origin.x + offset.x, origin.y + offset.y), item),
                );
                self.item_lists.insert(id, list);
                id
            })
            .collect()
    }

    pub fn place(&mut self, id: DraggableId, bounds: Bounds<Pixels>) {
        self.items.insert(id, ItemLayout::new(bounds));
        if !self.order.contains(&id) {
            self.order.push(id);
        }
    }

    pub fn set_placeholder(&mut self, list: DropListId, bounds: Bounds<Pixels>) {
        self.placeholders.insert(list, bounds);
    }

    pub fn set_area(&mut self, area: DragAreaId, bounds: Bounds<Pixels>) {
        self.areas.insert(area, bounds);
    }

    pub fn add_scroll_container(
        &mut self,
        id: ScrollContainerId,
        lists: &[DropListId],
        bounds: Bounds<Pixels>,
        content: Size<Pixels>,
    ) {
        self.containers.insert(
            id,
            ScrollMetrics {
                bounds,
                scroll_offset: pt(0., 0.),
                content_size: content,
                viewport_size: bounds.size,
            },
        );
        self.container_lists.insert(id, lists.to_vec());
    }

    pub fn scroll_offset(&self, id: ScrollContainerId) -> Point<Pixels> {
        self.containers
            .get(&id)
            .map(|metrics| metrics.scroll_offset)
            .unwrap_or_else(|| pt(0., 0.))
    }

    /// Scrolls like a wheel event would: content moves, nothing is recorded.
    pub fn wheel(&mut self, id: ScrollContainerId, delta: Point<Pixels>) {
        self.apply_scroll(id, delta);
    }

    fn apply_scroll(&mut self, id: ScrollContainerId, delta: Point<Pixels>) {
        let Some(metrics) = self.containers.get_mut(&id) else {
            return;
        };
        let max = metrics.max_scroll();
        let clamp = |value: Pixels, max: Pixels| px(f32::from(value).clamp(0., f32::from(max)));
        let next = point(
            clamp(metrics.scroll_offset.x + delta.x, max.x),
            clamp(metrics.scroll_offset.y + delta.y, max.y),
        );
        let moved = point(
            next.x - metrics.scroll_offset.x,
            next.y - metrics.scroll_offset.y,
        );
        metrics.scroll_offset = next;

        let lists = self.container_lists.get(&id).cloned().unwrap_or_default();
        for (item, list) in &self.item_lists {
            if !lists.contains(list) {
                continue;
            }
            if let Some(layout) = self.items.get_mut(item) {
                layout.bounds.origin = point(
                    layout.bounds.origin.x - moved.x,
                    layout.bounds.origin.y - moved.y,
                );
            }
        }
    }
}

impl DragHost for FakeHost {
    fn item_layout(&self, draggable: DraggableId) -> Option<ItemLayout> {
        self.items.get(&draggable).cloned()
    }

    fn drop_list_bounds(&self, drop_list: DropListId) -> Option<Bounds<Pixels>> {
        self.lists.get(&drop_list).cloned()
    }

    fn placeholder_bounds(&self, drop_list: DropListId) -> Option<Bounds<Pixels>> {
        self.placeholders.get(&drop_list).cloned()
    }

    fn drag_area_bounds(&self, area: DragAreaId) -> Option<Bounds<Pixels>> {
        self.areas.get(&area).cloned()
    }

    fn compare_order(&self, a: DraggableId, b: DraggableId) -> Ordering {
        let position = |id: DraggableId| self.order.iter().position(|other| *other == id);
        position(a).cmp(&position(b))
    }

    fn scroll_containers(&self, drop_list: DropListId) -> Vec<ScrollContainerId> {
        let mut containers: Vec<_> = self
            .container_lists
            .iter()
            .filter(|(_, lists)| lists.contains(&drop_list))
            .map(|(id, _)| *id)
            .collect();
        containers.sort();
        containers
    }

    fn scroll_metrics(&self, container: ScrollContainerId) -> Option<ScrollMetrics> {
        self.containers.get(&container).cloned()
    }

    fn scroll_by(&mut self, container: ScrollContainerId, delta: Point<Pixels>) {
        self.scrolled.push((container, delta));
        self.apply_scroll(container, delta);
    }
}

/// Moves the pointer from `from` to `to` in `steps` equal increments.
pub fn drag_through(
    engine: &mut DragDrop,
    host: &FakeHost,
    from: Point<Pixels>,
    to: Point<Pixels>,
    steps: usize,
) {
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        let position = point(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t);
        engine.pointer_move(position, host).unwrap();
    }
}

/// Runs the frame that starts the settle animation, then reports its end.
pub fn settle(engine: &mut DragDrop, host: &mut FakeHost, draggable: DraggableId) -> Instant {
    let now = Instant::now();
    engine.animation_frame(now, host);
    engine.transition_end(TransitionTarget::Preview(draggable));
    now
}

pub fn dropped(events: &[DragDropEvent]) -> Vec<&gpui_dnd::DropListDropEvent> {
    events
        .iter()
        .filter_map(|event| match event {
            DragDropEvent::Dropped(drop) => Some(drop),
            _ => None,
        })
        .collect()
}

pub fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}
