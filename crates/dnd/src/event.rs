use crate::{DraggableId, DropListId};

/// A draggable started hovering a drop list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DropListEnterEvent {
    pub draggable: DraggableId,
    pub drop_list: DropListId,
    pub index: usize,
}

/// A draggable left a drop list for a sibling.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DropListExitEvent {
    pub draggable: DraggableId,
    pub drop_list: DropListId,
}

/// A completed drag. The host applies it to its own data; the engine never
/// touches application data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DropListDropEvent {
    pub draggable: DraggableId,
    pub source_index: usize,
    pub target_index: usize,
    pub source_drop_list: DropListId,
    pub target_drop_list: DropListId,
}

impl DropListDropEvent {
    pub fn is_cross_list(&self) -> bool {
        self.source_drop_list != self.target_drop_list
    }

    pub fn is_noop(&self) -> bool {
        !self.is_cross_list() && self.source_index == self.target_index
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DragDropEvent {
    Entered(DropListEnterEvent),
    Exited(DropListExitEvent),
    Dropped(DropListDropEvent),
}
