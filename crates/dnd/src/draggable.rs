use std::collections::HashMap;
use std::time::{Duration, Instant};

use gpui::{Pixels, Point, Size, point, px};

use crate::{
    BoundingRectDistance, Boundaries, DragAreaId, DragError, DragSession, DraggableId,
    DraggablePosition, DropListId, ItemLayout,
};

/// Where a draggable is in its gesture.
///
/// `Idle -> Grabbed -> Moving* -> Settling -> Idle`; free draggables skip
/// `Settling`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DragPhase {
    #[default]
    Idle,
    Grabbed,
    Moving,
    Settling,
}

/// Fixed-position clone of a hosted draggable that follows the pointer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Preview {
    pub origin: Point<Pixels>,
    pub size: Size<Pixels>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DraggableOptions {
    drop_list: Option<DropListId>,
    area: Option<DragAreaId>,
}

impl DraggableOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drop_list(mut self, drop_list: DropListId) -> Self {
        self.drop_list = Some(drop_list);
        self
    }

    /// Keep a free draggable inside `area`. Ignored for hosted draggables.
    pub fn area(mut self, area: DragAreaId) -> Self {
        self.area = Some(area);
        self
    }

    pub(crate) fn drop_list_id(&self) -> Option<DropListId> {
        self.drop_list
    }

    pub(crate) fn area_id(&self) -> Option<DragAreaId> {
        self.area
    }
}

pub struct Draggable {
    id: DraggableId,
    session: DragSession,
    /// List the element is registered in.
    home_list: Option<DropListId>,
    /// List currently hosting the gesture; differs from `home_list` after a
    /// cross-list handoff.
    drop_list: Option<DropListId>,
    area: Option<DragAreaId>,
    phase: DragPhase,
    start_position: Point<Pixels>,
    move_position: Point<Pixels>,
    pointer_distance: BoundingRectDistance,
    grab_layout: Option<ItemLayout>,
    boundaries: Option<Boundaries>,
    preview: Option<Preview>,
    detached: bool,
    interaction_suppressed: bool,
    transition: Option<Duration>,
    settle_deadline: Option<Instant>,
}

impl Draggable {
    pub(crate) fn new(id: DraggableId, session: DragSession, options: DraggableOptions) -> Self {
        Self {
            id,
            session,
            home_list: options.drop_list_id(),
            drop_list: options.drop_list_id(),
            area: options.area_id(),
            phase: DragPhase::Idle,
            start_position: point(px(0.), px(0.)),
            move_position: point(px(0.), px(0.)),
            pointer_distance: BoundingRectDistance::default(),
            grab_layout: None,
            boundaries: None,
            preview: None,
            detached: false,
            interaction_suppressed: false,
            transition: None,
            settle_deadline: None,
        }
    }

    pub fn id(&self) -> DraggableId {
        self.id
    }

    pub fn home_list(&self) -> Option<DropListId> {
        self.home_list
    }

    pub fn drop_list(&self) -> Option<DropListId> {
        self.drop_list
    }

    pub fn area(&self) -> Option<DragAreaId> {
        self.area
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn is_dragging(&self) -> bool {
        self.phase != DragPhase::Idle
    }

    /// Translation to apply to the visible element (the preview while one
    /// exists, the element itself otherwise).
    pub fn transform(&self) -> Point<Pixels> {
        self.move_position
    }

    /// Transform transition to render with, `None` for an instant jump.
    pub fn transition(&self) -> Option<Duration> {
        self.transition
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    /// The live element has been swapped for an anchor and should not take
    /// part in its list's flow.
    pub fn is_detached(&self) -> bool {
        self.detached
    }

    /// Pointer, touch and selection interaction is disabled on the element.
    pub fn interaction_suppressed(&self) -> bool {
        self.interaction_suppressed
    }

    pub fn pointer_distance(&self) -> BoundingRectDistance {
        self.pointer_distance
    }

    pub fn settle_deadline(&self) -> Option<Instant> {
        self.settle_deadline
    }

    pub(crate) fn set_home_list(&mut self, drop_list: Option<DropListId>) {
        self.home_list = drop_list;
        if !self.is_dragging() {
            self.drop_list = drop_list;
        }
    }

    pub(crate) fn set_drop_list(&mut self, drop_list: Option<DropListId>) {
        self.drop_list = drop_list;
    }

    pub(crate) fn set_position(&mut self, position: Point<Pixels>) {
        self.move_position = position;
    }

    pub(crate) fn reset_position(&mut self) {
        self.set_position(point(px(0.), px(0.)));
    }

    pub(crate) fn set_transition(&mut self, transition: Option<Duration>) {
        self.transition = transition;
    }

    pub(crate) fn grab(
        &mut self,
        pointer: Point<Pixels>,
        layout: ItemLayout,
        hosted: bool,
        boundaries: Option<Boundaries>,
    ) -> Result<(), DragError> {
        self.session.try_start(self.id)?;

        self.pointer_distance = BoundingRectDistance::measure(&layout.bounds, pointer);
        self.start_position = point(
            pointer.x - self.move_position.x,
            pointer.y - self.move_position.y,
        );
        self.boundaries = if hosted { None } else { boundaries };

        if hosted {
            self.preview = Some(Preview {
                origin: layout.bounds.origin,
                size: layout.bounds.size,
            });
            self.detached = true;
        }
        self.interaction_suppressed = true;
        self.transition = None;
        self.grab_layout = Some(layout);
        self.phase = DragPhase::Grabbed;
        Ok(())
    }

    /// Moves the visible element so that it keeps its grab offset from
    /// `pointer`.
    pub(crate) fn follow(&mut self, pointer: Point<Pixels>) -> Point<Pixels> {
        let position = point(
            pointer.x - self.start_position.x,
            pointer.y - self.start_position.y,
        );
        let position = match &self.boundaries {
            Some(boundaries) => boundaries.clamp(position),
            None => position,
        };
        self.phase = DragPhase::Moving;
        self.set_position(position);
        position
    }

    pub(crate) fn subject(&self) -> Option<DragSubject> {
        let layout = self.grab_layout.clone()?;
        Some(DragSubject {
            id: self.id,
            distance: self.pointer_distance,
            outer_size: layout.outer_size(),
            layout,
        })
    }

    pub(crate) fn release_interaction(&mut self) {
        self.interaction_suppressed = false;
    }

    /// Re-anchors the preview at `destination` without moving it on screen.
    /// The following frame animates the transform back to zero.
    pub(crate) fn begin_settle(&mut self, destination: Point<Pixels>) {
        if let Some(preview) = self.preview.as_mut() {
            let visible = point(
                preview.origin.x + self.move_position.x,
                preview.origin.y + self.move_position.y,
            );
            preview.origin = destination;
            self.move_position = point(visible.x - destination.x, visible.y - destination.y);
        }
        self.transition = None;
        self.phase = DragPhase::Settling;
    }

    pub(crate) fn start_settle_transition(&mut self, duration: Duration, deadline: Instant) {
        self.transition = Some(duration);
        self.reset_position();
        self.settle_deadline = Some(deadline);
    }

    pub(crate) fn settle_started(&self) -> bool {
        self.phase == DragPhase::Settling && self.settle_deadline.is_some()
    }

    pub(crate) fn shift_preview(&mut self, delta: Point<Pixels>) {
        if let Some(preview) = self.preview.as_mut() {
            preview.origin = point(preview.origin.x + delta.x, preview.origin.y + delta.y);
        }
    }

    /// Ends a hosted gesture: the element is back in flow, unstyled.
    pub(crate) fn finish_settle(&mut self) {
        self.preview = None;
        self.detached = false;
        self.transition = None;
        self.settle_deadline = None;
        self.reset_position();
        self.drop_list = self.home_list;
        self.end_gesture();
    }

    /// Ends a free gesture. The element keeps its translation so the next
    /// grab continues from where this one stopped.
    pub(crate) fn finish_free(&mut self) {
        self.end_gesture();
    }

    fn end_gesture(&mut self) {
        self.phase = DragPhase::Idle;
        self.interaction_suppressed = false;
        self.boundaries = None;
        self.grab_layout = None;
    }
}

/// Snapshot of the dragged element that drop lists reason about.
#[derive(Clone, Debug)]
pub(crate) struct DragSubject {
    pub id: DraggableId,
    pub distance: BoundingRectDistance,
    pub layout: ItemLayout,
    pub outer_size: Size<Pixels>,
}

impl DragSubject {
    /// Tracker entry for the dragged element at its grab-time rect.
    pub fn position(&self) -> DraggablePosition {
        DraggablePosition::new(self.id, self.layout.bounds, self.layout.margins.clone())
    }
}

#[derive(Default)]
pub(crate) struct Draggables {
    items: HashMap<DraggableId, Draggable>,
}

impl Draggables {
    pub fn insert(&mut self, draggable: Draggable) {
        self.items.insert(draggable.id(), draggable);
    }

    pub fn remove(&mut self, id: DraggableId) -> Option<Draggable> {
        self.items.remove(&id)
    }

    pub fn get(&self, id: DraggableId) -> Option<&Draggable> {
        self.items.get(&id)
    }

    pub fn get_mut(&mut self, id: DraggableId) -> Option<&mut Draggable> {
        self.items.get_mut(&id)
    }

    /// Displaces a sibling by `offset`, animated over `transition`.
    pub fn displace(
        &mut self,
        id: DraggableId,
        offset: Point<Pixels>,
        transition: Option<Duration>,
    ) {
        if let Some(draggable) = self.items.get_mut(&id) {
            draggable.set_position(offset);
            if transition.is_some() {
                draggable.set_transition(transition);
            }
        }
    }

    pub fn set_transition(&mut self, id: DraggableId, transition: Option<Duration>) {
        if let Some(draggable) = self.items.get_mut(&id) {
            draggable.set_transition(transition);
        }
    }

    /// Strips displacement and transition from an idle sibling.
    pub fn reset(&mut self, id: DraggableId) {
        let Some(draggable) = self.items.get_mut(&id) else {
            return;
        };
        if !draggable.is_dragging() {
            draggable.reset_position();
            draggable.set_transition(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use gpui::{Bounds, size};

    use super::*;

    fn layout() -> ItemLayout {
        ItemLayout::new(Bounds::new(point(px(10.), px(20.)), size(px(100.), px(40.))))
    }

    #[test]
    fn grab_records_edge_distances_and_claims_session() {
        let session = DragSession::new();
        let mut draggable = Draggable::new(
            DraggableId::from_raw(1),
            session.clone(),
            DraggableOptions::new().drop_list(DropListId::from_raw(9)),
        );

        draggable
            .grab(point(px(30.), px(30.)), layout(), true, None)
            .unwrap();

        let distance = draggable.pointer_distance();
        assert_eq!(distance.top, px(10.));
        assert_eq!(distance.bottom, px(30.));
        assert_eq!(distance.left, px(20.));
        assert_eq!(distance.right, px(80.));
        assert_eq!(session.current(), Some(draggable.id()));
        assert!(draggable.is_detached());
        assert_eq!(
            draggable.preview().map(|preview| preview.origin),
            Some(point(px(10.), px(20.)))
        );
    }

    #[test]
    fn grab_fails_while_session_is_taken() {
        let session = DragSession::new();
        session.try_start(DraggableId::from_raw(2)).unwrap();
        let mut draggable =
            Draggable::new(DraggableId::from_raw(1), session, DraggableOptions::new());

        let result = draggable.grab(point(px(0.), px(0.)), layout(), false, None);
        assert_eq!(result, Err(DragError::AlreadyDragging));
        assert_eq!(draggable.phase(), DragPhase::Idle);
    }

    #[test]
    fn free_drag_keeps_offset_between_gestures() {
        let session = DragSession::new();
        let mut draggable = Draggable::new(
            DraggableId::from_raw(1),
            session.clone(),
            DraggableOptions::new(),
        );

        draggable
            .grab(point(px(50.), px(50.)), layout(), false, None)
            .unwrap();
        assert!(draggable.interaction_suppressed());
        draggable.follow(point(px(80.), px(60.)));
        draggable.finish_free();
        session.end();
        assert_eq!(draggable.transform(), point(px(30.), px(10.)));

        draggable
            .grab(point(px(0.), px(0.)), layout(), false, None)
            .unwrap();
        draggable.follow(point(px(5.), px(5.)));
        assert_eq!(draggable.transform(), point(px(35.), px(15.)));
    }

    #[test]
    fn begin_settle_keeps_preview_in_place() {
        let session = DragSession::new();
        let mut draggable = Draggable::new(
            DraggableId::from_raw(1),
            session,
            DraggableOptions::new().drop_list(DropListId::from_raw(1)),
        );
        draggable
            .grab(point(px(20.), px(30.)), layout(), true, None)
            .unwrap();
        draggable.follow(point(px(20.), px(130.)));

        draggable.begin_settle(point(px(10.), px(60.)));

        let preview = draggable.preview().copied().unwrap();
        assert_eq!(preview.origin, point(px(10.), px(60.)));
        // Still drawn at y = 20 + 100.
        assert_eq!(draggable.transform(), point(px(0.), px(60.)));
        assert_eq!(draggable.phase(), DragPhase::Settling);
    }
}
