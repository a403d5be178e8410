use thiserror::Error;

use crate::{DragAreaId, DraggableId, DropListId, GroupId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DragError {
    #[error("a drag session is already in progress")]
    AlreadyDragging,
    #[error("no drag session is in progress")]
    NotDragging,
    #[error("unknown draggable {0:?}")]
    UnknownDraggable(DraggableId),
    #[error("unknown drop list {0:?}")]
    UnknownDropList(DropListId),
    #[error("unknown drop list group {0:?}")]
    UnknownGroup(GroupId),
    #[error("unknown drag area {0:?}")]
    UnknownDragArea(DragAreaId),
    #[error("host has no layout for {0:?}")]
    MissingLayout(DraggableId),
    #[error("{0}")]
    InvalidConfig(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse drag-and-drop config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid drag-and-drop config: {0}")]
    Invalid(String),
}
