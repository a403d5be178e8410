use std::cmp::Ordering;

use gpui::{Bounds, Edges, Pixels, Point, Size, point, px, size};
use gpui_dnd::{DragHost, DraggableId, DropListId, ItemLayout, ScrollContainerId, ScrollMetrics};

pub const PADDING: f32 = 24.;
pub const HEADER_HEIGHT: f32 = 40.;
pub const COLUMN_WIDTH: f32 = 260.;
pub const COLUMN_GAP: f32 = 24.;
pub const CARD_INSET: f32 = 8.;
pub const CARD_HEIGHT: f32 = 52.;
pub const CARD_MARGIN: f32 = 4.;

/// Distance between the tops of two consecutive cards.
pub const CARD_PITCH: f32 = CARD_HEIGHT + 2. * CARD_MARGIN;

/// Layout of one column, in window coordinates.
#[derive(Clone, Debug)]
pub struct ColumnLayout {
    pub list: DropListId,
    /// The scrolling viewport the cards are clipped to.
    pub bounds: Bounds<Pixels>,
    pub scroll: Pixels,
    /// Every card of the column in data order.
    pub order: Vec<DraggableId>,
    /// Cards that take up a slot; a detached card leaves the flow.
    pub flow: Vec<DraggableId>,
    /// Main-axis extent of the placeholder, appended after the flow.
    pub placeholder: Option<Pixels>,
}

impl ColumnLayout {
    pub fn column_bounds(index: usize, viewport: Size<Pixels>) -> Bounds<Pixels> {
        let x = PADDING + index as f32 * (COLUMN_WIDTH + COLUMN_GAP);
        let y = PADDING + HEADER_HEIGHT;
        let height = (f32::from(viewport.height) - y - PADDING).max(CARD_PITCH);
        Bounds::new(point(px(x), px(y)), size(px(COLUMN_WIDTH), px(height)))
    }

    pub fn slot_bounds(&self, slot: usize) -> Bounds<Pixels> {
        let origin = self.bounds.origin;
        Bounds::new(
            point(
                origin.x + px(CARD_INSET),
                origin.y + px(slot as f32 * CARD_PITCH + CARD_MARGIN) - self.scroll,
            ),
            size(px(COLUMN_WIDTH - 2. * CARD_INSET), px(CARD_HEIGHT)),
        )
    }

    pub fn placeholder_bounds(&self) -> Option<Bounds<Pixels>> {
        let extent = self.placeholder?;
        let slot = self.slot_bounds(self.flow.len());
        Some(Bounds::new(
            point(slot.origin.x, slot.origin.y - px(CARD_MARGIN)),
            size(slot.size.width, extent),
        ))
    }

    pub fn content_height(&self) -> Pixels {
        px(self.flow.len() as f32 * CARD_PITCH) + self.placeholder.unwrap_or_default()
    }

    pub fn max_scroll(&self) -> Pixels {
        px((f32::from(self.content_height()) - f32::from(self.bounds.size.height)).max(0.))
    }
}

pub fn card_margins() -> Edges<Pixels> {
    Edges {
        top: px(CARD_MARGIN),
        bottom: px(CARD_MARGIN),
        left: px(0.),
        right: px(0.),
    }
}

/// Snapshot of the board's layout lent to the engine for a single call.
///
/// Each column is its own scroll container, numbered by column index.
#[derive(Clone, Debug, Default)]
pub struct BoardHost {
    pub columns: Vec<ColumnLayout>,
}

impl BoardHost {
    fn column(&self, list: DropListId) -> Option<&ColumnLayout> {
        self.columns.iter().find(|column| column.list == list)
    }

    fn position(&self, id: DraggableId) -> Option<(usize, usize)> {
        self.columns.iter().enumerate().find_map(|(ix, column)| {
            column
                .order
                .iter()
                .position(|card| *card == id)
                .map(|slot| (ix, slot))
        })
    }
}

impl DragHost for BoardHost {
    fn item_layout(&self, draggable: DraggableId) -> Option<ItemLayout> {
        self.columns.iter().find_map(|column| {
            let slot = column.flow.iter().position(|card| *card == draggable)?;
            Some(ItemLayout::new(column.slot_bounds(slot)).margins(card_margins()))
        })
    }

    fn drop_list_bounds(&self, drop_list: DropListId) -> Option<Bounds<Pixels>> {
        self.column(drop_list).map(|column| column.bounds)
    }

    fn placeholder_bounds(&self, drop_list: DropListId) -> Option<Bounds<Pixels>> {
        self.column(drop_list)?.placeholder_bounds()
    }

    fn compare_order(&self, a: DraggableId, b: DraggableId) -> Ordering {
        self.position(a).cmp(&self.position(b))
    }

    fn scroll_containers(&self, drop_list: DropListId) -> Vec<ScrollContainerId> {
        self.columns
            .iter()
            .position(|column| column.list == drop_list)
            .map(|ix| vec![ScrollContainerId(ix as u64)])
            .unwrap_or_default()
    }

    fn scroll_metrics(&self, container: ScrollContainerId) -> Option<ScrollMetrics> {
        let column = self.columns.get(container.0 as usize)?;
        Some(ScrollMetrics {
            bounds: column.bounds,
            scroll_offset: point(px(0.), column.scroll),
            content_size: size(column.bounds.size.width, column.content_height()),
            viewport_size: column.bounds.size,
        })
    }

    fn scroll_by(&mut self, container: ScrollContainerId, delta: Point<Pixels>) {
        let Some(column) = self.columns.get_mut(container.0 as usize) else {
            return;
        };
        column.scroll = px(f32::from(column.scroll + delta.y).clamp(0., f32::from(column.max_scroll())));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpui_dnd::{DragDrop, DraggableOptions, DropListConfig};

    fn board(cards: usize) -> (DragDrop, BoardHost) {
        let mut engine = DragDrop::default();
        let list = engine.create_drop_list(DropListConfig::new(), None).unwrap();
        let order: Vec<_> = (0..cards)
            .map(|_| {
                engine
                    .create_draggable(DraggableOptions::new().drop_list(list))
                    .unwrap()
            })
            .collect();
        let column = ColumnLayout {
            list,
            bounds: ColumnLayout::column_bounds(0, size(px(800.), px(400.))),
            scroll: px(0.),
            flow: order.clone(),
            order,
            placeholder: None,
        };
        (engine, BoardHost { columns: vec![column] })
    }

    #[test]
    fn cards_stack_by_pitch() {
        let (_, host) = board(3);
        let column = &host.columns[0];
        let first = host.item_layout(column.order[0]).unwrap();
        let second = host.item_layout(column.order[1]).unwrap();
        assert_eq!(
            second.bounds.origin.y - first.bounds.origin.y,
            px(CARD_PITCH)
        );
        assert_eq!(first.outer_size().height, px(CARD_PITCH));
    }

    #[test]
    fn scroll_by_is_clamped_to_content() {
        let (_, mut host) = board(10);
        let container = host.scroll_containers(host.columns[0].list)[0];
        host.scroll_by(container, point(px(0.), px(10_000.)));
        assert_eq!(host.columns[0].scroll, host.columns[0].max_scroll());
        host.scroll_by(container, point(px(0.), px(-10_000.)));
        assert_eq!(host.columns[0].scroll, px(0.));
    }

    #[test]
    fn reorders_through_the_board_layout() {
        let (mut engine, host) = board(3);
        let cards = host.columns[0].order.clone();
        let start = host.item_layout(cards[0]).unwrap().bounds.center();

        engine.pointer_down(cards[0], start, &host).unwrap();
        engine
            .pointer_move(point(start.x, start.y + px(2. * CARD_PITCH - 10.)), &host)
            .unwrap();
        let list = engine.drop_list(host.columns[0].list).unwrap();
        assert_eq!(list.target_index(), Some(2));
    }
}
