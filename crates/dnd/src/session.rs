use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::{Rc, Weak};

use gpui::{Pixels, Point};

use crate::{DragError, DraggableId, DropListId};

#[derive(Default)]
struct SessionState {
    active: Option<DraggableId>,
    last_pointer: Option<Point<Pixels>>,
    subscribers: BTreeSet<DropListId>,
    generation: u64,
}

/// The single drag session shared by every draggable and drop list.
///
/// Cloning yields another handle to the same session. Only the active
/// draggable writes to it; everyone else reads.
#[derive(Clone, Default)]
pub struct DragSession {
    state: Rc<RefCell<SessionState>>,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the session for `draggable`. Fails while another gesture
    /// (including one that is still settling) owns it.
    pub fn try_start(&self, draggable: DraggableId) -> Result<(), DragError> {
        let mut state = self.state.borrow_mut();
        if state.active.is_some() {
            return Err(DragError::AlreadyDragging);
        }
        state.active = Some(draggable);
        state.last_pointer = None;
        state.subscribers.clear();
        state.generation += 1;
        Ok(())
    }

    pub fn current(&self) -> Option<DraggableId> {
        self.state.borrow().active
    }

    pub fn is_dragging(&self) -> bool {
        self.state.borrow().active.is_some()
    }

    pub fn record_pointer(&self, position: Point<Pixels>) {
        self.state.borrow_mut().last_pointer = Some(position);
    }

    pub fn last_pointer(&self) -> Option<Point<Pixels>> {
        self.state.borrow().last_pointer
    }

    /// Releases the session and drops every gesture subscription.
    pub fn end(&self) {
        let mut state = self.state.borrow_mut();
        state.active = None;
        state.last_pointer = None;
        state.subscribers.clear();
        state.generation += 1;
    }

    /// Subscribes `drop_list` to the current gesture's broadcasts until the
    /// returned guard is dropped or the session ends.
    pub fn subscribe(&self, drop_list: DropListId) -> GestureSubscription {
        let mut state = self.state.borrow_mut();
        state.subscribers.insert(drop_list);
        GestureSubscription {
            state: Rc::downgrade(&self.state),
            drop_list,
            generation: state.generation,
        }
    }

    pub fn subscribers(&self) -> Vec<DropListId> {
        self.state.borrow().subscribers.iter().copied().collect()
    }
}

/// Membership of one drop list in the current gesture's fan-out.
pub struct GestureSubscription {
    state: Weak<RefCell<SessionState>>,
    drop_list: DropListId,
    generation: u64,
}

impl GestureSubscription {
    pub fn drop_list(&self) -> DropListId {
        self.drop_list
    }
}

impl Drop for GestureSubscription {
    fn drop(&mut self) {
        let Some(state) = self.state.upgrade() else {
            return;
        };
        let Ok(mut state) = state.try_borrow_mut() else {
            return;
        };
        // A guard from an earlier gesture must not evict a newer subscriber.
        if state.generation == self.generation {
            state.subscribers.remove(&self.drop_list);
        }
    }
}
