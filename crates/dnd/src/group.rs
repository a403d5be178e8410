use std::collections::BTreeSet;

use gpui::{Pixels, Point};

use crate::{DragHost, DropListId, GroupId};

/// Drop lists that accept each other's draggables.
#[derive(Clone, Debug)]
pub struct DropListGroup {
    id: GroupId,
    lists: BTreeSet<DropListId>,
}

impl DropListGroup {
    pub(crate) fn new(id: GroupId) -> Self {
        Self {
            id,
            lists: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn add(&mut self, drop_list: DropListId) {
        self.lists.insert(drop_list);
    }

    pub fn remove(&mut self, drop_list: DropListId) {
        self.lists.remove(&drop_list);
    }

    pub fn contains(&self, drop_list: DropListId) -> bool {
        self.lists.contains(&drop_list)
    }

    pub fn lists(&self) -> impl Iterator<Item = DropListId> + '_ {
        self.lists.iter().copied()
    }

    pub fn siblings(&self, excluding: DropListId) -> Vec<DropListId> {
        self.lists
            .iter()
            .copied()
            .filter(|list| *list != excluding)
            .collect()
    }

    /// The sibling of `excluding` whose bounds contain `position`.
    pub fn hit_test(
        &self,
        position: Point<Pixels>,
        excluding: DropListId,
        host: &dyn DragHost,
    ) -> Option<DropListId> {
        self.siblings(excluding).into_iter().find(|list| {
            host.drop_list_bounds(*list)
                .is_some_and(|bounds| bounds.contains(&position))
        })
    }
}
