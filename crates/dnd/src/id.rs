use std::fmt;

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u64);

        impl $name {
            pub(crate) fn from_raw(raw: u64) -> Self {
                Self(raw)
            }

            pub fn as_u64(self) -> u64 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

arena_id!(
    /// Handle of a registered [`crate::Draggable`].
    DraggableId,
    "draggable"
);
arena_id!(
    /// Handle of a registered [`crate::DropList`].
    DropListId,
    "drop-list"
);
arena_id!(
    /// Handle of a registered [`crate::DropListGroup`].
    GroupId,
    "group"
);
arena_id!(
    /// Handle of a registered [`crate::DragArea`].
    DragAreaId,
    "drag-area"
);

/// A scrollable element owned by the host.
///
/// Unlike the other ids this one is minted by the host, which is the only
/// party that knows which of its elements overflow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScrollContainerId(pub u64);
