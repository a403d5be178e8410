use std::collections::BTreeMap;
use std::mem;
use std::time::Instant;

use gpui::{Pixels, Point};
use tracing::{debug, warn};

use crate::draggable::{DragSubject, Draggables};
use crate::{
    Boundaries, DragArea, DragAreaId, DragDropConfig, DragDropEvent, DragError, DragHost,
    DragSession, Draggable, DraggableId, DraggableOptions, DropList, DropListConfig, DropListGroup,
    DropListId, GroupId, ScrollContainerId,
};

/// Work deferred to the next animation frame so the host renders one state
/// before the engine switches to the next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FrameTask {
    EnableTransitions(DropListId),
    GrowPlaceholder(DropListId),
    BeginSettle(DraggableId),
}

/// Element whose transition the host reports as finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionTarget {
    Preview(DraggableId),
    Placeholder(DropListId),
}

struct Gesture {
    draggable: DraggableId,
    source_list: Option<DropListId>,
    origin_index: Option<usize>,
    current_list: Option<DropListId>,
    released: bool,
}

/// Arena and event router for every draggable, drop list, group and drag
/// area of one window.
pub struct DragDrop {
    config: DragDropConfig,
    session: DragSession,
    next_id: u64,
    draggables: Draggables,
    drop_lists: BTreeMap<DropListId, DropList>,
    groups: BTreeMap<GroupId, DropListGroup>,
    areas: BTreeMap<DragAreaId, DragArea>,
    gesture: Option<Gesture>,
    frames: Vec<FrameTask>,
    events: Vec<DragDropEvent>,
}

impl Default for DragDrop {
    fn default() -> Self {
        Self::new(DragDropConfig::default())
    }
}

impl DragDrop {
    pub fn new(config: DragDropConfig) -> Self {
        Self {
            config,
            session: DragSession::new(),
            next_id: 0,
            draggables: Draggables::default(),
            drop_lists: BTreeMap::new(),
            groups: BTreeMap::new(),
            areas: BTreeMap::new(),
            gesture: None,
            frames: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &DragDropConfig {
        &self.config
    }

    pub fn session(&self) -> &DragSession {
        &self.session
    }

    fn next_raw_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn create_group(&mut self) -> GroupId {
        let id = GroupId::from_raw(self.next_raw_id());
        self.groups.insert(id, DropListGroup::new(id));
        id
    }

    pub fn remove_group(&mut self, id: GroupId) -> Result<(), DragError> {
        let group = self.groups.remove(&id).ok_or(DragError::UnknownGroup(id))?;
        for list in group.lists() {
            if let Some(list) = self.drop_lists.get_mut(&list) {
                list.set_group(None);
            }
        }
        Ok(())
    }

    pub fn create_drop_list(
        &mut self,
        config: DropListConfig,
        group: Option<GroupId>,
    ) -> Result<DropListId, DragError> {
        if let Some(group) = group {
            if !self.groups.contains_key(&group) {
                return Err(DragError::UnknownGroup(group));
            }
        }
        config
            .validate()
            .map_err(|err| DragError::InvalidConfig(err.to_string()))?;
        let id = DropListId::from_raw(self.next_raw_id());
        let resolved = config.resolve(&self.config);
        self.drop_lists
            .insert(id, DropList::new(id, self.session.clone(), group, resolved));
        if let Some(group) = group.and_then(|group| self.groups.get_mut(&group)) {
            group.add(id);
        }
        Ok(id)
    }

    /// Moves a list into `group`, or out of any group with `None`.
    pub fn set_drop_list_group(
        &mut self,
        id: DropListId,
        group: Option<GroupId>,
    ) -> Result<(), DragError> {
        if let Some(group) = group {
            if !self.groups.contains_key(&group) {
                return Err(DragError::UnknownGroup(group));
            }
        }
        let list = self
            .drop_lists
            .get_mut(&id)
            .ok_or(DragError::UnknownDropList(id))?;
        if let Some(previous) = list.group().and_then(|previous| self.groups.get_mut(&previous)) {
            previous.remove(id);
        }
        list.set_group(group);
        if let Some(group) = group.and_then(|group| self.groups.get_mut(&group)) {
            group.add(id);
        }
        Ok(())
    }

    /// Unregisters a list. Its draggables stay registered but become free.
    pub fn remove_drop_list(&mut self, id: DropListId) -> Result<(), DragError> {
        if self
            .gesture
            .as_ref()
            .is_some_and(|gesture| {
                gesture.source_list == Some(id) || gesture.current_list == Some(id)
            })
        {
            self.cancel_gesture();
        }
        let list = self
            .drop_lists
            .remove(&id)
            .ok_or(DragError::UnknownDropList(id))?;
        if let Some(group) = list.group().and_then(|group| self.groups.get_mut(&group)) {
            group.remove(id);
        }
        for draggable in list.draggables() {
            if let Some(draggable) = self.draggables.get_mut(draggable) {
                draggable.set_home_list(None);
            }
        }
        Ok(())
    }

    pub fn create_drag_area(&mut self) -> DragAreaId {
        let id = DragAreaId::from_raw(self.next_raw_id());
        self.areas.insert(id, DragArea::new(id));
        id
    }

    pub fn remove_drag_area(&mut self, id: DragAreaId) -> Result<(), DragError> {
        self.areas
            .remove(&id)
            .map(|_| ())
            .ok_or(DragError::UnknownDragArea(id))
    }

    pub fn create_draggable(&mut self, options: DraggableOptions) -> Result<DraggableId, DragError> {
        if let Some(list) = options.drop_list_id() {
            if !self.drop_lists.contains_key(&list) {
                return Err(DragError::UnknownDropList(list));
            }
        }
        if let Some(area) = options.area_id() {
            if !self.areas.contains_key(&area) {
                return Err(DragError::UnknownDragArea(area));
            }
        }

        let id = DraggableId::from_raw(self.next_raw_id());
        self.draggables
            .insert(Draggable::new(id, self.session.clone(), options));
        if let Some(list) = options
            .drop_list_id()
            .and_then(|list| self.drop_lists.get_mut(&list))
        {
            list.add_draggable(id);
        }
        if let Some(area) = options.area_id().and_then(|area| self.areas.get_mut(&area)) {
            area.add(id);
        }
        Ok(id)
    }

    pub fn remove_draggable(&mut self, id: DraggableId) -> Result<(), DragError> {
        if self.active_draggable() == Some(id) {
            self.cancel_gesture();
        }
        let draggable = self
            .draggables
            .remove(id)
            .ok_or(DragError::UnknownDraggable(id))?;
        if let Some(list) = draggable
            .home_list()
            .and_then(|list| self.drop_lists.get_mut(&list))
        {
            list.remove_draggable(id);
        }
        if let Some(area) = draggable.area().and_then(|area| self.areas.get_mut(&area)) {
            area.remove(id);
        }
        Ok(())
    }

    /// Re-registers a draggable in another list (or none). Used when the
    /// host moves an item between lists outside of a gesture.
    pub fn move_draggable(
        &mut self,
        id: DraggableId,
        drop_list: Option<DropListId>,
    ) -> Result<(), DragError> {
        if let Some(list) = drop_list {
            if !self.drop_lists.contains_key(&list) {
                return Err(DragError::UnknownDropList(list));
            }
        }
        let draggable = self
            .draggables
            .get_mut(id)
            .ok_or(DragError::UnknownDraggable(id))?;
        if let Some(previous) = draggable
            .home_list()
            .and_then(|previous| self.drop_lists.get_mut(&previous))
        {
            previous.remove_draggable(id);
        }
        draggable.set_home_list(drop_list);
        if let Some(list) = drop_list.and_then(|list| self.drop_lists.get_mut(&list)) {
            list.add_draggable(id);
        }
        Ok(())
    }

    pub fn draggable(&self, id: DraggableId) -> Option<&Draggable> {
        self.draggables.get(id)
    }

    pub fn drop_list(&self, id: DropListId) -> Option<&DropList> {
        self.drop_lists.get(&id)
    }

    pub fn drop_lists(&self) -> impl Iterator<Item = &DropList> {
        self.drop_lists.values()
    }

    pub fn group(&self, id: GroupId) -> Option<&DropListGroup> {
        self.groups.get(&id)
    }

    pub fn drag_area(&self, id: DragAreaId) -> Option<&DragArea> {
        self.areas.get(&id)
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_dragging()
    }

    pub fn active_draggable(&self) -> Option<DraggableId> {
        self.gesture.as_ref().map(|gesture| gesture.draggable)
    }

    /// List currently hosting the active gesture.
    pub fn active_drop_list(&self) -> Option<DropListId> {
        self.gesture.as_ref().and_then(|gesture| gesture.current_list)
    }

    /// Takes every event emitted since the last call, oldest first.
    pub fn drain_events(&mut self) -> Vec<DragDropEvent> {
        mem::take(&mut self.events)
    }

    /// Whether the host should keep scheduling [`DragDrop::animation_frame`].
    pub fn needs_animation_frame(&self) -> bool {
        !self.frames.is_empty()
            || self
                .gesture
                .as_ref()
                .is_some_and(|gesture| gesture.released)
            || self
                .drop_lists
                .values()
                .any(|list| list.is_auto_scrolling() || list.has_collapsing_placeholder())
    }

    /// Starts a gesture on `id`.
    ///
    /// Fails with [`DragError::AlreadyDragging`] while another gesture,
    /// including one that is still settling, owns the session.
    pub fn pointer_down(
        &mut self,
        id: DraggableId,
        pointer: Point<Pixels>,
        host: &dyn DragHost,
    ) -> Result<(), DragError> {
        let draggable = self
            .draggables
            .get(id)
            .ok_or(DragError::UnknownDraggable(id))?;
        if self.session.is_dragging() {
            debug!(draggable = ?id, active = ?self.session.current(), "pointer down ignored, drag in progress");
            return Err(DragError::AlreadyDragging);
        }
        let layout = host.item_layout(id).ok_or(DragError::MissingLayout(id))?;

        let home_list = draggable
            .home_list()
            .filter(|list| self.drop_lists.contains_key(list));
        let boundaries = match (home_list, draggable.area()) {
            (None, Some(area)) => host
                .drag_area_bounds(area)
                .map(|bounds| Boundaries::compute(&bounds, &layout.bounds, draggable.transform())),
            _ => None,
        };

        let Some(draggable) = self.draggables.get_mut(id) else {
            return Err(DragError::UnknownDraggable(id));
        };
        draggable.grab(pointer, layout, home_list.is_some(), boundaries)?;
        draggable.set_drop_list(home_list);
        let subject = draggable.subject();
        self.session.record_pointer(pointer);

        let mut origin_index = None;
        if let (Some(list_id), Some(subject)) = (home_list, subject) {
            if let Some(list) = self.drop_lists.get_mut(&list_id) {
                list.start_dragging_sequence(&subject, &mut self.draggables, host, &mut self.frames);
                origin_index = list.source_index();
            }
        }

        debug!(draggable = ?id, drop_list = ?home_list, index = ?origin_index, "drag started");
        self.gesture = Some(Gesture {
            draggable: id,
            source_list: home_list,
            origin_index,
            current_list: home_list,
            released: false,
        });
        Ok(())
    }

    pub fn pointer_move(
        &mut self,
        pointer: Point<Pixels>,
        host: &dyn DragHost,
    ) -> Result<(), DragError> {
        let gesture = self.gesture.as_ref().ok_or(DragError::NotDragging)?;
        if gesture.released {
            return Ok(());
        }
        let id = gesture.draggable;
        self.session.record_pointer(pointer);
        self.draggables
            .get_mut(id)
            .ok_or(DragError::UnknownDraggable(id))?
            .follow(pointer);
        self.update_drop_list(pointer, host);
        Ok(())
    }

    /// Runs the gesture's list logic for `pointer`: cross-list handoff,
    /// auto-scroll evaluation and reordering.
    fn update_drop_list(&mut self, pointer: Point<Pixels>, host: &dyn DragHost) {
        let Some((id, current)) = self
            .gesture
            .as_ref()
            .and_then(|gesture| Some((gesture.draggable, gesture.current_list?)))
        else {
            return;
        };
        let Some(subject) = self.draggables.get(id).and_then(Draggable::subject) else {
            return;
        };

        let sibling = self
            .drop_lists
            .get(&current)
            .and_then(DropList::group)
            .and_then(|group| self.groups.get(&group))
            .and_then(|group| group.hit_test(pointer, current, host))
            .filter(|sibling| self.drop_lists.contains_key(sibling));
        let current = match sibling {
            Some(sibling) => {
                self.hand_off(&subject, current, sibling, pointer, host);
                sibling
            }
            None => current,
        };

        let Some(list) = self.drop_lists.get_mut(&current) else {
            return;
        };
        list.start_scrolling_if_needed(pointer, host);
        list.sort_draggables(&subject, pointer, &mut self.draggables);
    }

    fn hand_off(
        &mut self,
        subject: &DragSubject,
        from: DropListId,
        to: DropListId,
        pointer: Point<Pixels>,
        host: &dyn DragHost,
    ) {
        if let Some(list) = self.drop_lists.get_mut(&from) {
            let exit = list.exit(subject, &mut self.draggables);
            self.events.push(DragDropEvent::Exited(exit));
        }
        if let Some(list) = self.drop_lists.get_mut(&to) {
            let enter = list.enter(subject, pointer, &mut self.draggables, host, &mut self.frames);
            self.events.push(DragDropEvent::Entered(enter));
        }
        self.set_current_list(subject.id, to);
    }

    fn set_current_list(&mut self, id: DraggableId, list: DropListId) {
        if let Some(gesture) = self.gesture.as_mut() {
            gesture.current_list = Some(list);
        }
        if let Some(draggable) = self.draggables.get_mut(id) {
            draggable.set_drop_list(Some(list));
        }
    }

    /// Ends the pointer part of the gesture. Hosted draggables then settle
    /// towards their placeholder; free draggables are done immediately.
    pub fn pointer_up(
        &mut self,
        pointer: Point<Pixels>,
        host: &dyn DragHost,
    ) -> Result<(), DragError> {
        let gesture = self.gesture.as_mut().ok_or(DragError::NotDragging)?;
        if gesture.released {
            return Ok(());
        }
        gesture.released = true;
        let id = gesture.draggable;
        let current = gesture.current_list;
        self.session.record_pointer(pointer);

        let draggable = self
            .draggables
            .get_mut(id)
            .ok_or(DragError::UnknownDraggable(id))?;
        draggable.release_interaction();

        let Some(mut current) = current else {
            draggable.finish_free();
            self.gesture = None;
            self.session.end();
            debug!(draggable = ?id, "free drag ended");
            return Ok(());
        };
        let Some(subject) = draggable.subject() else {
            self.cancel_gesture();
            return Ok(());
        };

        if let Some(list) = self.drop_lists.get_mut(&current) {
            list.end_drag_sequence();
        }
        let outside = !self.drop_lists.keys().any(|list| {
            host.drop_list_bounds(*list)
                .is_some_and(|bounds| bounds.contains(&pointer))
        });
        if outside {
            current = self.return_to_source(&subject, current, host);
        }

        let Some(list) = self.drop_lists.get(&current) else {
            self.cancel_gesture();
            return Ok(());
        };
        let destination = list.drop_position(&subject, host);
        if let Some(draggable) = self.draggables.get_mut(id) {
            draggable.begin_settle(destination);
        }
        self.frames.push(FrameTask::BeginSettle(id));
        debug!(draggable = ?id, drop_list = ?current, "settling");
        Ok(())
    }

    /// Puts the dragged element back at its original slot. Returns the list
    /// now hosting it.
    fn return_to_source(
        &mut self,
        subject: &DragSubject,
        current: DropListId,
        host: &dyn DragHost,
    ) -> DropListId {
        let Some((source, origin)) = self
            .gesture
            .as_ref()
            .and_then(|gesture| Some((gesture.source_list?, gesture.origin_index?)))
        else {
            return current;
        };
        if !self.drop_lists.contains_key(&source) {
            return current;
        }

        debug!(draggable = ?subject.id, drop_list = ?source, index = origin, "released outside, returning to source");
        if source == current {
            if let Some(list) = self.drop_lists.get_mut(&source) {
                list.sort_to(subject, origin, &mut self.draggables);
            }
            return source;
        }

        if let Some(list) = self.drop_lists.get_mut(&current) {
            let exit = list.exit(subject, &mut self.draggables);
            self.events.push(DragDropEvent::Exited(exit));
        }
        if let Some(list) = self.drop_lists.get_mut(&source) {
            let enter = list.enter_at(subject, origin, &mut self.draggables, host, &mut self.frames);
            list.end_drag_sequence();
            self.events.push(DragDropEvent::Entered(enter));
        }
        self.set_current_list(subject.id, source);
        source
    }

    /// Reports that `container` scrolled.
    ///
    /// Mid-gesture, every subscribed list shifts its cached rects and the
    /// last pointer position is replayed. While settling, the preview is
    /// moved along with the content it is landing in.
    pub fn scroll(&mut self, container: ScrollContainerId, host: &dyn DragHost) {
        let Some(gesture) = self.gesture.as_ref() else {
            return;
        };

        if gesture.released {
            let id = gesture.draggable;
            let shift = gesture
                .current_list
                .and_then(|list| self.drop_lists.get_mut(&list))
                .and_then(|list| list.apply_scroll(container, host));
            if let (Some(shift), Some(draggable)) = (shift, self.draggables.get_mut(id)) {
                draggable.shift_preview(shift);
            }
            return;
        }

        let mut shifted = false;
        for list in self.session.subscribers() {
            if let Some(list) = self.drop_lists.get_mut(&list) {
                shifted |= list.apply_scroll(container, host).is_some();
            }
        }
        if shifted {
            if let Some(pointer) = self.session.last_pointer() {
                self.update_drop_list(pointer, host);
            }
        }
    }

    /// Advances frame-sequenced work, the auto-scroll loop and the fallback
    /// timers. Returns [`DragDrop::needs_animation_frame`].
    pub fn animation_frame(&mut self, now: Instant, host: &mut dyn DragHost) -> bool {
        let grace = self.config.settle_grace();
        for task in mem::take(&mut self.frames) {
            match task {
                FrameTask::EnableTransitions(list) => {
                    if let Some(list) = self.drop_lists.get(&list) {
                        list.enable_transitions(&mut self.draggables);
                    }
                }
                FrameTask::GrowPlaceholder(list) => {
                    if let Some(list) = self.drop_lists.get_mut(&list) {
                        list.grow_placeholder();
                    }
                }
                FrameTask::BeginSettle(id) => {
                    let duration = self
                        .active_drop_list()
                        .and_then(|list| self.drop_lists.get(&list))
                        .map(DropList::animation_duration)
                        .unwrap_or_else(|| self.config.animation_duration());
                    if let Some(draggable) = self.draggables.get_mut(id) {
                        draggable.start_settle_transition(duration, now + duration + grace);
                    }
                }
            }
        }

        self.auto_scroll(host);

        let expired = self.gesture.as_ref().and_then(|gesture| {
            let draggable = self.draggables.get(gesture.draggable)?;
            let deadline = draggable.settle_deadline()?;
            (gesture.released && deadline <= now).then_some(gesture.draggable)
        });
        if let Some(id) = expired {
            warn!(draggable = ?id, "settle transition did not report completion, forcing it");
            self.finish_settle();
        }

        for list in self.drop_lists.values_mut() {
            if list.expire_placeholder(now, grace) {
                warn!(drop_list = ?list.id(), "placeholder collapse did not report completion, removed it");
            }
        }

        self.needs_animation_frame()
    }

    fn auto_scroll(&mut self, host: &mut dyn DragHost) {
        let Some(current) = self
            .gesture
            .as_ref()
            .filter(|gesture| !gesture.released)
            .and_then(|gesture| gesture.current_list)
        else {
            return;
        };
        let Some(list) = self.drop_lists.get_mut(&current) else {
            return;
        };
        let Some((container, _)) = list.auto_scroll_target() else {
            return;
        };
        if list.auto_scroll_tick(host) {
            self.scroll(container, &*host);
        }
    }

    /// The host's "transition finished" signal.
    pub fn transition_end(&mut self, target: TransitionTarget) {
        match target {
            TransitionTarget::Preview(id) => {
                let settling = self.gesture.as_ref().is_some_and(|gesture| {
                    gesture.draggable == id && gesture.released
                }) && self
                    .draggables
                    .get(id)
                    .is_some_and(Draggable::settle_started);
                if settling {
                    self.finish_settle();
                }
            }
            TransitionTarget::Placeholder(list) => {
                if let Some(list) = self.drop_lists.get_mut(&list) {
                    list.placeholder_transition_end();
                }
            }
        }
    }

    /// Commits a settled gesture: emits the drop event, re-homes the
    /// draggable on a cross-list drop and frees the session.
    fn finish_settle(&mut self) {
        let Some(gesture) = self.gesture.take() else {
            return;
        };
        let id = gesture.draggable;
        if let Some(draggable) = self.draggables.get_mut(id) {
            draggable.finish_settle();
        }

        let mut touched: Vec<DropListId> = Vec::new();
        if let (Some(source), Some(target)) = (gesture.source_list, gesture.current_list) {
            let origin = gesture.origin_index.unwrap_or(0);
            if let Some(list) = self.drop_lists.get_mut(&target) {
                let event = list.drop(id, source, origin);
                if event.is_cross_list() {
                    if let Err(err) = self.move_draggable(id, Some(target)) {
                        warn!(draggable = ?id, %err, "failed to re-home dropped draggable");
                    }
                }
                self.events.push(DragDropEvent::Dropped(event));
            }
            touched.push(source);
            touched.push(target);
            if let Some(group) = self
                .drop_lists
                .get(&source)
                .and_then(DropList::group)
                .and_then(|group| self.groups.get(&group))
            {
                touched.extend(group.lists());
            }
        }

        for list in touched {
            if let Some(list) = self.drop_lists.get_mut(&list) {
                list.reset(&mut self.draggables);
            }
        }
        self.session.end();
        debug!(draggable = ?id, "drag ended");
    }

    /// Abandons the active gesture without emitting a drop.
    fn cancel_gesture(&mut self) {
        let Some(gesture) = self.gesture.take() else {
            return;
        };
        if let Some(draggable) = self.draggables.get_mut(gesture.draggable) {
            draggable.finish_settle();
        }
        for list in self.drop_lists.values_mut() {
            list.reset(&mut self.draggables);
        }
        self.frames.clear();
        self.session.end();
        debug!(draggable = ?gesture.draggable, "drag cancelled");
    }
}
