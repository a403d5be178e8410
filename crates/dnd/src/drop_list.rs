use std::collections::{BTreeSet, HashMap};
use std::time::{Duration, Instant};

use gpui::{Pixels, Point, Size, px, size};
use tracing::{debug, trace};

use crate::config::ResolvedListConfig;
use crate::draggable::{DragSubject, Draggables};
use crate::engine::FrameTask;
use crate::geometry::size_with_margins;
use crate::{
    AutoScrollConfig, DragHost, DragSession, DraggableId, DraggablePosition, DropListDropEvent,
    DropListEnterEvent, DropListExitEvent, DropListId, GestureSubscription, GroupId, Orientation,
    PositionTracker, ScrollContainerId, ScrollDirection, ScrollPosition, can_scroll,
    scroll_direction, scroll_step, zoned_scroll_step,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaceholderPhase {
    /// Freshly created with zero main-axis extent; grows on the next frame.
    Growing,
    Shown,
    /// Shrinking after the draggable left; removed once the shrink ends
    /// unless the pointer came back.
    Collapsing,
}

/// Slot reserved for the dragged element, rendered at the end of the list.
#[derive(Clone, Debug, PartialEq)]
pub struct Placeholder {
    size: Size<Pixels>,
    orientation: Orientation,
    phase: PlaceholderPhase,
    transition: Option<Duration>,
    deadline: Option<Instant>,
}

impl Placeholder {
    /// Full size of the dragged element, margins included.
    pub fn size(&self) -> Size<Pixels> {
        self.size
    }

    pub fn phase(&self) -> PlaceholderPhase {
        self.phase
    }

    pub fn transition(&self) -> Option<Duration> {
        self.transition
    }

    /// The size to lay the placeholder out with right now.
    pub fn rendered_size(&self) -> Size<Pixels> {
        match (self.phase, self.orientation) {
            (PlaceholderPhase::Shown, _) => self.size,
            (_, Orientation::Vertical) => size(self.size.width, px(0.)),
            (_, Orientation::Horizontal) => size(px(0.), self.size.height),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ActiveScroll {
    container: ScrollContainerId,
    direction: ScrollDirection,
}

/// An ordered container of draggables.
///
/// Registration is unordered; order is derived on demand from the host's
/// document-order comparison. `source_index`/`target_index` are `None`
/// whenever no drag is hovering this list.
pub struct DropList {
    id: DropListId,
    session: DragSession,
    group: Option<GroupId>,
    orientation: Orientation,
    animation_duration: Duration,
    auto_scroll: AutoScrollConfig,
    draggables: BTreeSet<DraggableId>,
    positions: PositionTracker<DraggablePosition>,
    source_index: Option<usize>,
    target_index: Option<usize>,
    placeholder: Option<Placeholder>,
    pointer_over: bool,
    scroll_containers: Vec<ScrollContainerId>,
    scroll_positions: HashMap<ScrollContainerId, ScrollPosition>,
    active_scroll: Option<ActiveScroll>,
    subscription: Option<GestureSubscription>,
}

impl DropList {
    pub(crate) fn new(
        id: DropListId,
        session: DragSession,
        group: Option<GroupId>,
        config: ResolvedListConfig,
    ) -> Self {
        Self {
            id,
            session,
            group,
            orientation: config.orientation,
            animation_duration: config.animation_duration,
            auto_scroll: config.auto_scroll,
            draggables: BTreeSet::new(),
            positions: PositionTracker::new(),
            source_index: None,
            target_index: None,
            placeholder: None,
            pointer_over: false,
            scroll_containers: Vec::new(),
            scroll_positions: HashMap::new(),
            active_scroll: None,
            subscription: None,
        }
    }

    pub fn id(&self) -> DropListId {
        self.id
    }

    pub fn group(&self) -> Option<GroupId> {
        self.group
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn animation_duration(&self) -> Duration {
        self.animation_duration
    }

    pub fn draggables(&self) -> impl Iterator<Item = DraggableId> + '_ {
        self.draggables.iter().copied()
    }

    pub fn positions(&self) -> &PositionTracker<DraggablePosition> {
        &self.positions
    }

    pub fn source_index(&self) -> Option<usize> {
        self.source_index
    }

    pub fn target_index(&self) -> Option<usize> {
        self.target_index
    }

    pub fn placeholder(&self) -> Option<&Placeholder> {
        self.placeholder.as_ref()
    }

    pub fn is_pointer_over(&self) -> bool {
        self.pointer_over
    }

    /// The container and direction of the running auto-scroll loop.
    pub fn auto_scroll_target(&self) -> Option<(ScrollContainerId, ScrollDirection)> {
        self.active_scroll
            .map(|active| (active.container, active.direction))
    }

    /// Registered draggables in document order.
    pub fn sorted_draggables(&self, host: &dyn DragHost) -> Vec<DraggableId> {
        let mut sorted: Vec<_> = self.draggables.iter().copied().collect();
        sorted.sort_by(|a, b| host.compare_order(*a, *b));
        sorted
    }

    pub(crate) fn set_group(&mut self, group: Option<GroupId>) {
        self.group = group;
    }

    pub(crate) fn add_draggable(&mut self, draggable: DraggableId) {
        self.draggables.insert(draggable);
    }

    pub(crate) fn remove_draggable(&mut self, draggable: DraggableId) {
        self.draggables.remove(&draggable);
        if let Some(ix) = self.positions.index_of(draggable) {
            self.positions.remove_at(ix);
        }
    }

    fn extent_of(&self, subject: &DragSubject) -> Pixels {
        self.orientation.extent(subject.outer_size)
    }

    fn cache_positions(&mut self, excluding: Option<DraggableId>, host: &dyn DragHost) {
        let positions = self
            .sorted_draggables(host)
            .into_iter()
            .filter(|id| Some(*id) != excluding)
            .filter_map(|id| {
                let layout = host.item_layout(id)?;
                Some(DraggablePosition::new(id, layout.bounds, layout.margins))
            })
            .collect::<Vec<_>>();
        self.positions.cache(positions);
    }

    fn cache_scroll_containers(&mut self, host: &dyn DragHost) {
        self.scroll_containers.clear();
        self.scroll_positions.clear();
        for container in host.scroll_containers(self.id) {
            let Some(metrics) = host.scroll_metrics(container) else {
                continue;
            };
            if metrics.has_overflow() {
                self.scroll_containers.push(container);
                self.scroll_positions.insert(container, metrics.position());
            }
        }
    }

    fn subscribe(&mut self) {
        // The old guard shares this gesture's generation; drop it first.
        self.subscription = None;
        self.subscription = Some(self.session.subscribe(self.id));
    }

    /// Begins a gesture whose draggable lives in this list.
    ///
    /// Once the dragged element leaves the flow, everything after it
    /// collapses into its slot. The cached rects are moved accordingly and the
    /// siblings are translated back by the dragged extent, so the gap is
    /// there before the first pointer move.
    pub(crate) fn start_dragging_sequence(
        &mut self,
        subject: &DragSubject,
        draggables: &mut Draggables,
        host: &dyn DragHost,
        frames: &mut Vec<FrameTask>,
    ) {
        self.pointer_over = true;
        self.subscribe();
        self.cache_scroll_containers(host);
        self.cache_positions(None, host);

        let index = match self.positions.index_of(subject.id) {
            Some(index) => index,
            None => self
                .positions
                .insert_at(subject.position(), self.positions.len()),
        };

        let extent = self.extent_of(subject);
        let collapse = self.orientation.along(px(0.) - extent);
        let gap = self.orientation.along(extent);
        for (ix, entry) in self.positions.iter_mut().enumerate() {
            if ix > index {
                entry.shift(collapse);
                entry.offset = extent;
                draggables.displace(entry.draggable, gap, None);
            }
        }

        self.placeholder = Some(Placeholder {
            size: subject.outer_size,
            orientation: self.orientation,
            phase: PlaceholderPhase::Shown,
            transition: None,
            deadline: None,
        });
        self.source_index = Some(index);
        self.target_index = Some(index);
        frames.push(FrameTask::EnableTransitions(self.id));

        debug!(drop_list = ?self.id, draggable = ?subject.id, index, "dragging sequence started");
    }

    /// Turns on sibling transitions after the initial displacement has been
    /// rendered without one.
    pub(crate) fn enable_transitions(&self, draggables: &mut Draggables) {
        let active = self.session.current();
        for id in &self.draggables {
            if Some(*id) != active {
                draggables.set_transition(*id, Some(self.animation_duration));
            }
        }
    }

    /// Insertion index for the dragged element given the pointer position.
    ///
    /// The pointer is projected onto the dragged element's leading and
    /// trailing edges. A sibling only qualifies when one of those edges is
    /// strictly inside it; its midpoint then decides before or after. With
    /// no qualifying sibling the previous target is kept.
    pub(crate) fn drop_index_from_point(
        &self,
        subject: &DragSubject,
        pointer: Point<Pixels>,
    ) -> Option<usize> {
        let orientation = self.orientation;
        let main = orientation.main(pointer);
        let leading = main - subject.distance.leading(orientation);
        let trailing = main + subject.distance.trailing(orientation);

        let hit = |edge: Pixels| {
            self.positions
                .iter()
                .enumerate()
                .filter(|(_, entry)| entry.draggable != subject.id)
                .find(|(_, entry)| entry.straddles(orientation, edge))
        };
        let at_leading = hit(leading);
        let at_trailing = hit(trailing);

        if self.target_index.is_none() {
            // Entering: the dragged element is not in `positions` yet, so the
            // result is an insertion slot rather than a move target.
            let (ix, entry, edge) = at_leading
                .map(|(ix, entry)| (ix, entry, leading))
                .or_else(|| at_trailing.map(|(ix, entry)| (ix, entry, trailing)))?;
            return Some(if edge < entry.midpoint(orientation) {
                ix
            } else {
                ix + 1
            });
        }

        if let Some((ix, entry)) = at_leading {
            if leading < entry.midpoint(orientation) {
                return Some(ix);
            }
        }
        if let Some((ix, entry)) = at_trailing {
            if trailing > entry.midpoint(orientation) {
                return Some(ix);
            }
        }
        self.target_index
    }

    /// Slot for an entering element that overlaps no sibling: after every
    /// sibling whose midpoint lies before its leading edge.
    fn fallback_index(&self, subject: &DragSubject, pointer: Point<Pixels>) -> usize {
        let orientation = self.orientation;
        let leading = orientation.main(pointer) - subject.distance.leading(orientation);
        self.positions
            .iter()
            .filter(|entry| entry.draggable != subject.id)
            .filter(|entry| entry.midpoint(orientation) < leading)
            .count()
    }

    /// Applies the displacement for the dragged element sitting at `index`:
    /// siblings after it make room, siblings before it return to rest.
    fn displace_around(&mut self, index: usize, subject: &DragSubject, draggables: &mut Draggables) {
        let extent = self.extent_of(subject);
        let orientation = self.orientation;
        let transition = Some(self.animation_duration);
        for (ix, entry) in self.positions.iter_mut().enumerate() {
            if entry.draggable == subject.id {
                continue;
            }
            entry.offset = if ix > index { extent } else { px(0.) };
            draggables.displace(entry.draggable, orientation.along(entry.offset), transition);
        }
    }

    /// Recomputes the target index and reflows siblings when it changed.
    /// Returns the applied `(from, to)` move.
    pub(crate) fn sort_draggables(
        &mut self,
        subject: &DragSubject,
        pointer: Point<Pixels>,
        draggables: &mut Draggables,
    ) -> Option<(usize, usize)> {
        let current = self.target_index?;
        let next = self.drop_index_from_point(subject, pointer)?;
        if next == current {
            return None;
        }

        let from = self.positions.index_of(subject.id).unwrap_or(current);
        let (from, to) = self.positions.move_to(from, next);
        self.target_index = Some(to);
        self.displace_around(to, subject, draggables);

        trace!(drop_list = ?self.id, from, to, "target index changed");
        Some((from, to))
    }

    /// Moves the dragged element straight to `index`, bypassing pointer
    /// projection.
    pub(crate) fn sort_to(
        &mut self,
        subject: &DragSubject,
        index: usize,
        draggables: &mut Draggables,
    ) {
        let Some(from) = self.positions.index_of(subject.id) else {
            return;
        };
        let (_, to) = self.positions.move_to(from, index);
        self.target_index = Some(to);
        self.displace_around(to, subject, draggables);
    }

    fn init_placeholder(&mut self, subject: &DragSubject, frames: &mut Vec<FrameTask>) {
        let transition = Some(self.animation_duration);
        match self.placeholder.as_mut() {
            Some(placeholder) => {
                placeholder.size = subject.outer_size;
                placeholder.phase = PlaceholderPhase::Shown;
                placeholder.transition = transition;
                placeholder.deadline = None;
            }
            None => {
                self.placeholder = Some(Placeholder {
                    size: subject.outer_size,
                    orientation: self.orientation,
                    phase: PlaceholderPhase::Growing,
                    transition,
                    deadline: None,
                });
                frames.push(FrameTask::GrowPlaceholder(self.id));
            }
        }
    }

    pub(crate) fn grow_placeholder(&mut self) {
        if let Some(placeholder) = self.placeholder.as_mut() {
            if placeholder.phase == PlaceholderPhase::Growing {
                placeholder.phase = PlaceholderPhase::Shown;
            }
        }
    }

    /// Hands the dragged element to this list at the slot under the pointer.
    pub(crate) fn enter(
        &mut self,
        subject: &DragSubject,
        pointer: Point<Pixels>,
        draggables: &mut Draggables,
        host: &dyn DragHost,
        frames: &mut Vec<FrameTask>,
    ) -> DropListEnterEvent {
        self.prepare_enter(subject, host, frames);
        let index = self
            .drop_index_from_point(subject, pointer)
            .unwrap_or_else(|| self.fallback_index(subject, pointer));
        self.insert_subject(subject, index, draggables)
    }

    /// Hands the dragged element to this list at a fixed slot.
    pub(crate) fn enter_at(
        &mut self,
        subject: &DragSubject,
        index: usize,
        draggables: &mut Draggables,
        host: &dyn DragHost,
        frames: &mut Vec<FrameTask>,
    ) -> DropListEnterEvent {
        self.prepare_enter(subject, host, frames);
        self.insert_subject(subject, index, draggables)
    }

    fn prepare_enter(
        &mut self,
        subject: &DragSubject,
        host: &dyn DragHost,
        frames: &mut Vec<FrameTask>,
    ) {
        self.pointer_over = true;
        self.subscribe();
        if self.positions.is_empty() {
            self.cache_positions(Some(subject.id), host);
        } else {
            // Kept rects missed every scroll since this list was exited.
            let containers: Vec<_> = self.scroll_positions.keys().copied().collect();
            for container in containers {
                self.apply_scroll(container, host);
            }
        }
        self.cache_scroll_containers(host);
        self.init_placeholder(subject, frames);
        self.source_index = None;
        self.target_index = None;
    }

    fn insert_subject(
        &mut self,
        subject: &DragSubject,
        index: usize,
        draggables: &mut Draggables,
    ) -> DropListEnterEvent {
        let index = self.positions.insert_at(subject.position(), index);
        self.source_index = Some(index);
        self.target_index = Some(index);
        self.displace_around(index, subject, draggables);

        debug!(drop_list = ?self.id, draggable = ?subject.id, index, "entered drop list");
        DropListEnterEvent {
            draggable: subject.id,
            drop_list: self.id,
            index,
        }
    }

    /// Gives the dragged element up to a sibling list.
    pub(crate) fn exit(
        &mut self,
        subject: &DragSubject,
        draggables: &mut Draggables,
    ) -> DropListExitEvent {
        self.pointer_over = false;
        if let Some(ix) = self.positions.index_of(subject.id) {
            self.positions.remove_at(ix);
        }

        let transition = Some(self.animation_duration);
        let zero = self.orientation.along(px(0.));
        for entry in self.positions.iter_mut() {
            entry.offset = px(0.);
        }
        for id in &self.draggables {
            if *id != subject.id {
                draggables.displace(*id, zero, transition);
            }
        }

        self.source_index = None;
        self.target_index = None;
        self.stop_scrolling();
        self.subscription = None;

        if let Some(placeholder) = self.placeholder.as_mut() {
            placeholder.phase = PlaceholderPhase::Collapsing;
            placeholder.transition = transition;
            placeholder.deadline = None;
        }

        debug!(drop_list = ?self.id, draggable = ?subject.id, "left drop list");
        DropListExitEvent {
            draggable: subject.id,
            drop_list: self.id,
        }
    }

    /// Completion of the placeholder's collapse. Returns whether it was
    /// removed.
    pub(crate) fn placeholder_transition_end(&mut self) -> bool {
        let collapsing = self
            .placeholder
            .as_ref()
            .is_some_and(|placeholder| placeholder.phase == PlaceholderPhase::Collapsing);
        if collapsing && !self.pointer_over {
            self.placeholder = None;
            return true;
        }
        false
    }

    /// Arms or checks the fallback timer of a collapsing placeholder.
    /// Returns `true` when the timer fired and the placeholder was removed.
    pub(crate) fn expire_placeholder(&mut self, now: Instant, grace: Duration) -> bool {
        let duration = self.animation_duration;
        let Some(placeholder) = self.placeholder.as_mut() else {
            return false;
        };
        if placeholder.phase != PlaceholderPhase::Collapsing {
            return false;
        }
        match placeholder.deadline {
            None => {
                placeholder.deadline = Some(now + duration + grace);
                false
            }
            Some(deadline) if deadline <= now => self.placeholder_transition_end(),
            Some(_) => false,
        }
    }

    pub(crate) fn has_collapsing_placeholder(&self) -> bool {
        self.placeholder
            .as_ref()
            .is_some_and(|placeholder| placeholder.phase == PlaceholderPhase::Collapsing)
    }

    /// Starts the auto-scroll loop on the innermost cached ancestor that the
    /// pointer is near an edge of and that can still scroll that way; stops
    /// it when there is none.
    pub(crate) fn start_scrolling_if_needed(
        &mut self,
        pointer: Point<Pixels>,
        host: &dyn DragHost,
    ) {
        let threshold = self.auto_scroll.threshold;
        let next = self.scroll_containers.iter().find_map(|container| {
            let metrics = host.scroll_metrics(*container)?;
            let direction = scroll_direction(&metrics.bounds, threshold, pointer);
            can_scroll(&metrics, direction).then_some(ActiveScroll {
                container: *container,
                direction,
            })
        });

        if next != self.active_scroll {
            match next {
                Some(active) => trace!(
                    drop_list = ?self.id,
                    container = ?active.container,
                    direction = ?active.direction,
                    "auto-scroll started"
                ),
                None => trace!(drop_list = ?self.id, "auto-scroll stopped"),
            }
        }
        self.active_scroll = next;
    }

    pub(crate) fn stop_scrolling(&mut self) {
        if self.active_scroll.take().is_some() {
            trace!(drop_list = ?self.id, "auto-scroll stopped");
        }
    }

    pub(crate) fn is_auto_scrolling(&self) -> bool {
        self.active_scroll.is_some()
    }

    /// One frame of the auto-scroll loop. Stops the loop once the container
    /// runs out of room.
    pub(crate) fn auto_scroll_tick(&mut self, host: &mut dyn DragHost) -> bool {
        let Some(active) = self.active_scroll else {
            return false;
        };
        let metrics = host
            .scroll_metrics(active.container)
            .filter(|metrics| can_scroll(metrics, active.direction));
        let Some(metrics) = metrics else {
            self.stop_scrolling();
            return false;
        };

        let step = self.auto_scroll.step_pixels();
        let delta = match self.session.last_pointer() {
            Some(pointer) => zoned_scroll_step(
                &metrics.bounds,
                self.auto_scroll.threshold,
                self.auto_scroll.speed_zones,
                pointer,
                active.direction,
                step,
            ),
            None => scroll_step(active.direction, step),
        };
        host.scroll_by(active.container, delta);
        true
    }

    /// Corrects cached rects after an ancestor scrolled. Returns how far the
    /// content moved, or `None` for containers this list does not track.
    pub(crate) fn apply_scroll(
        &mut self,
        container: ScrollContainerId,
        host: &dyn DragHost,
    ) -> Option<Point<Pixels>> {
        let previous = self.scroll_positions.get(&container).copied()?;
        let next = host.scroll_metrics(container)?.position();
        let shift = previous.content_shift(&next);
        self.scroll_positions.insert(container, next);
        self.positions.shift_all(shift);
        Some(shift)
    }

    /// Stops per-gesture bookkeeping at pointer-up.
    pub(crate) fn end_drag_sequence(&mut self) {
        self.stop_scrolling();
        self.subscription = None;
    }

    /// Screen position the settling preview should land on.
    ///
    /// The placeholder sits after every sibling, so the landing spot is the
    /// placeholder's start minus the extents of the siblings displaced past
    /// the target index. Before the host has laid the placeholder out, the
    /// spot is derived from the neighbouring entries instead.
    pub(crate) fn drop_position(&self, subject: &DragSubject, host: &dyn DragHost) -> Point<Pixels> {
        let orientation = self.orientation;
        let margins = &subject.layout.margins;
        let target = self
            .target_index
            .or_else(|| self.positions.index_of(subject.id))
            .unwrap_or(0);

        if let Some(placeholder) = host.placeholder_bounds(self.id) {
            let displaced = self
                .positions
                .iter()
                .enumerate()
                .filter(|(ix, entry)| *ix > target && entry.draggable != subject.id)
                .fold(px(0.), |acc, (_, entry)| {
                    acc + orientation.extent(size_with_margins(entry.rect.size, &entry.margins))
                });
            return orientation.compose(
                orientation.start(&placeholder) - displaced + orientation.margin_start(margins),
                orientation.cross_start(&placeholder) + orientation.cross_margin_start(margins),
            );
        }

        let neighbour = |ix: usize| {
            self.positions
                .get(ix)
                .filter(|entry| entry.draggable != subject.id)
        };
        let cross_of = |entry: &DraggablePosition| {
            orientation.cross_start(&entry.rect) - orientation.cross_margin_start(&entry.margins)
                + orientation.cross_margin_start(margins)
        };

        if let Some(next) = neighbour(target + 1) {
            let slot_end = next.visual_start(orientation) - orientation.margin_start(&next.margins);
            return orientation.compose(
                slot_end - orientation.extent(subject.outer_size) + orientation.margin_start(margins),
                cross_of(next),
            );
        }
        if let Some(prev) = target.checked_sub(1).and_then(neighbour) {
            let slot_start = prev.visual_end(orientation) + orientation.margin_end(&prev.margins);
            return orientation.compose(
                slot_start + orientation.margin_start(margins),
                cross_of(prev),
            );
        }
        if let Some(bounds) = host.drop_list_bounds(self.id) {
            return orientation.compose(
                orientation.start(&bounds) + orientation.margin_start(margins),
                orientation.cross_start(&bounds) + orientation.cross_margin_start(margins),
            );
        }
        subject.layout.bounds.origin
    }

    /// Commits the gesture into this list. Runs after the settle animation.
    pub(crate) fn drop(
        &mut self,
        draggable: DraggableId,
        source_drop_list: DropListId,
        source_index: usize,
    ) -> DropListDropEvent {
        let target_index = self.target_index.unwrap_or(source_index);
        self.placeholder = None;
        self.positions.clear();
        self.source_index = None;
        self.target_index = None;
        self.pointer_over = false;
        self.end_drag_sequence();

        debug!(
            drop_list = ?self.id,
            ?draggable,
            source = ?source_drop_list,
            source_index,
            target_index,
            "dropped"
        );
        DropListDropEvent {
            draggable,
            source_index,
            target_index,
            source_drop_list,
            target_drop_list: self.id,
        }
    }

    /// Returns every registered draggable to rest and forgets all gesture
    /// state.
    pub(crate) fn reset(&mut self, draggables: &mut Draggables) {
        for entry in self.positions.iter() {
            draggables.reset(entry.draggable);
        }
        for id in &self.draggables {
            draggables.reset(*id);
        }
        self.positions.clear();
        self.placeholder = None;
        self.source_index = None;
        self.target_index = None;
        self.pointer_over = false;
        self.scroll_containers.clear();
        self.scroll_positions.clear();
        self.end_drag_sequence();
    }
}
