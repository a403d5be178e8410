//! Pointer-driven drag-and-drop reflow engine.
//!
//! The engine owns every [`Draggable`], [`DropList`], [`DropListGroup`] and
//! [`DragArea`] in an arena behind [`DragDrop`]. Hosts feed it pointer,
//! scroll and animation-frame events together with a [`DragHost`] that
//! answers layout questions, and render from the read model the engine
//! exposes (transforms, previews, placeholders).

mod area;
mod config;
mod draggable;
mod drop_list;
mod engine;
mod error;
mod event;
mod geometry;
mod group;
mod host;
mod id;
mod session;
mod tracker;

pub use area::{Boundaries, DragArea};
pub use config::{AutoScrollConfig, DragDropConfig, DropListConfig};
pub use draggable::{DragPhase, Draggable, DraggableOptions, Preview};
pub use drop_list::{DropList, Placeholder, PlaceholderPhase};
pub use engine::{DragDrop, TransitionTarget};
pub use error::{ConfigError, DragError};
pub use event::{DragDropEvent, DropListDropEvent, DropListEnterEvent, DropListExitEvent};
pub use geometry::{
    BoundingRectDistance, Orientation, ScrollDirection, ScrollMetrics, ScrollPosition, can_scroll,
    scroll_direction, scroll_step, size_with_margins, zoned_scroll_step,
};
pub use group::DropListGroup;
pub use host::{DragHost, ItemLayout};
pub use id::{DragAreaId, DraggableId, DropListId, GroupId, ScrollContainerId};
pub use session::{DragSession, GestureSubscription};
pub use tracker::{DraggablePosition, PositionTracker, insert_item, move_item, remove_item};
