use std::collections::HashMap;
use std::time::Instant;

use gpui::{
    AnyElement, Bounds, Context, FontWeight, Hsla, InteractiveElement as _, IntoElement,
    MouseButton, MouseDownEvent, MouseMoveEvent, MouseUpEvent, ParentElement as _, Pixels, Point,
    Render, ScrollWheelEvent, SharedString, Size, Styled as _, Window, div, point, px, size,
};
use gpui_component::ActiveTheme as _;
use gpui_dnd::{
    DragDrop, DragDropConfig, DragDropEvent, DragError, DragPhase, DraggableId, DraggableOptions,
    DropListConfig, DropListDropEvent, DropListId, PlaceholderPhase, ScrollContainerId,
    TransitionTarget, insert_item, move_item, remove_item,
};
use tracing::{debug, info, trace};

use crate::host::{BoardHost, COLUMN_WIDTH, ColumnLayout, HEADER_HEIGHT, PADDING};
use crate::tween::Tween;

const COLUMNS: [(&str, &[&str]); 3] = [
    (
        "Backlog",
        &[
            "Sketch the settings page",
            "Collect crash reports",
            "Audit keyboard shortcuts",
            "Draft release notes",
            "Profile startup time",
            "Review font fallback",
            "Split the renderer crate",
            "Write onboarding copy",
            "Triage stale issues",
        ],
    ),
    (
        "In progress",
        &[
            "Drag and drop between columns",
            "Dark theme polish",
            "Search index rebuild",
        ],
    ),
    ("Done", &["Bootstrap the workspace", "Window chrome"]),
];

#[derive(Clone, Debug)]
struct Card {
    id: DraggableId,
    title: SharedString,
}

struct Column {
    title: SharedString,
    list: DropListId,
    cards: Vec<Card>,
    scroll: Pixels,
}

#[derive(Clone, Copy)]
struct Palette {
    background: Hsla,
    foreground: Hsla,
    muted: Hsla,
    muted_foreground: Hsla,
    border: Hsla,
    drag_border: Hsla,
    popover: Hsla,
    popover_foreground: Hsla,
}

/// Kanban board hosting one drop list per column, all in one group.
pub struct Board {
    engine: DragDrop,
    columns: Vec<Column>,
    viewport: Size<Pixels>,
    transforms: HashMap<DraggableId, Tween>,
    placeholders: HashMap<DropListId, Tween>,
}

impl Board {
    pub fn new(config: DragDropConfig) -> Result<Self, DragError> {
        let mut engine = DragDrop::new(config);
        let group = engine.create_group();

        let mut columns = Vec::with_capacity(COLUMNS.len());
        for (title, titles) in COLUMNS {
            let list = engine.create_drop_list(DropListConfig::new(), Some(group))?;
            let mut cards = Vec::with_capacity(titles.len());
            for title in titles {
                let id = engine.create_draggable(DraggableOptions::new().drop_list(list))?;
                cards.push(Card {
                    id,
                    title: SharedString::from(*title),
                });
            }
            columns.push(Column {
                title: title.into(),
                list,
                cards,
                scroll: px(0.),
            });
        }

        Ok(Self {
            engine,
            columns,
            viewport: size(px(1024.), px(720.)),
            transforms: HashMap::new(),
            placeholders: HashMap::new(),
        })
    }

    fn host(&self) -> BoardHost {
        let columns = self
            .columns
            .iter()
            .enumerate()
            .map(|(ix, column)| {
                let order: Vec<_> = column.cards.iter().map(|card| card.id).collect();
                let flow = order
                    .iter()
                    .copied()
                    .filter(|id| {
                        !self
                            .engine
                            .draggable(*id)
                            .is_some_and(|draggable| draggable.is_detached())
                    })
                    .collect();
                let placeholder = self
                    .engine
                    .drop_list(column.list)
                    .and_then(|list| list.placeholder())
                    .map(|placeholder| placeholder.rendered_size().height);
                ColumnLayout {
                    list: column.list,
                    bounds: ColumnLayout::column_bounds(ix, self.viewport),
                    scroll: column.scroll,
                    order,
                    flow,
                    placeholder,
                }
            })
            .collect();
        BoardHost { columns }
    }

    /// Keeps scroll offsets the engine changed through the host.
    fn absorb(&mut self, host: BoardHost) {
        for (column, layout) in self.columns.iter_mut().zip(host.columns) {
            column.scroll = layout.scroll;
        }
    }

    fn on_card_down(&mut self, id: DraggableId, position: Point<Pixels>, cx: &mut Context<Self>) {
        let host = self.host();
        match self.engine.pointer_down(id, position, &host) {
            Ok(()) => cx.notify(),
            Err(err) => debug!(%err, "card not grabbed"),
        }
    }

    fn on_mouse_move(&mut self, event: &MouseMoveEvent, _: &mut Window, cx: &mut Context<Self>) {
        if !self.engine.is_dragging() {
            return;
        }
        let host = self.host();
        if self.engine.pointer_move(event.position, &host).is_ok() {
            self.apply_events();
            cx.notify();
        }
    }

    fn on_mouse_up(&mut self, event: &MouseUpEvent, _: &mut Window, cx: &mut Context<Self>) {
        if !self.engine.is_dragging() {
            return;
        }
        let host = self.host();
        if self.engine.pointer_up(event.position, &host).is_ok() {
            self.apply_events();
            cx.notify();
        }
    }

    fn on_wheel(
        &mut self,
        column: usize,
        event: &ScrollWheelEvent,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        let delta = event.delta.pixel_delta(window.line_height());
        let mut host = self.host();
        let Some(layout) = host.columns.get_mut(column) else {
            return;
        };
        let next = px(f32::from(layout.scroll - delta.y).clamp(0., f32::from(layout.max_scroll())));
        if next == layout.scroll {
            return;
        }
        layout.scroll = next;
        self.engine.scroll(ScrollContainerId(column as u64), &host);
        self.absorb(host);
        self.apply_events();
        cx.notify();
    }

    /// Runs the engine's frame work.
    fn advance(&mut self, now: Instant) {
        if !self.engine.needs_animation_frame() {
            return;
        }
        let mut host = self.host();
        self.engine.animation_frame(now, &mut host);
        self.absorb(host);
        self.apply_events();
    }

    /// Points every tween at the engine's current read model and reports
    /// finished transitions back. Returns whether anything is still moving.
    fn sync_tweens(&mut self, now: Instant) -> bool {
        let mut animating = false;
        let mut finished = Vec::new();

        for column in &self.columns {
            for card in &column.cards {
                let Some(draggable) = self.engine.draggable(card.id) else {
                    continue;
                };
                let tween = self
                    .transforms
                    .entry(card.id)
                    .or_insert_with(|| Tween::at(draggable.transform(), now));
                tween.retarget(draggable.transform(), draggable.transition(), now);
                let (_, done) = tween.value(now);
                animating |= !done;

                let settling =
                    draggable.phase() == DragPhase::Settling && draggable.settle_deadline().is_some();
                if settling && done && tween.target() == point(px(0.), px(0.)) {
                    finished.push(TransitionTarget::Preview(card.id));
                }
            }

            let placeholder = self
                .engine
                .drop_list(column.list)
                .and_then(|list| list.placeholder());
            match placeholder {
                Some(placeholder) => {
                    let extent = point(px(0.), placeholder.rendered_size().height);
                    let tween = self
                        .placeholders
                        .entry(column.list)
                        .or_insert_with(|| Tween::at(point(px(0.), px(0.)), now));
                    tween.retarget(extent, placeholder.transition(), now);
                    let (_, done) = tween.value(now);
                    animating |= !done;
                    if done && placeholder.phase() == PlaceholderPhase::Collapsing {
                        finished.push(TransitionTarget::Placeholder(column.list));
                    }
                }
                None => {
                    self.placeholders.remove(&column.list);
                }
            }
        }

        for target in finished {
            trace!(?target, "transition finished");
            self.engine.transition_end(target);
        }
        self.apply_events();
        animating
    }

    fn apply_events(&mut self) {
        for event in self.engine.drain_events() {
            match event {
                DragDropEvent::Dropped(drop) => self.apply_drop(&drop),
                DragDropEvent::Entered(enter) => {
                    debug!(card = ?enter.draggable, column = ?enter.drop_list, index = enter.index, "entered column")
                }
                DragDropEvent::Exited(exit) => {
                    debug!(card = ?exit.draggable, column = ?exit.drop_list, "left column")
                }
            }
        }
    }

    fn column_index(&self, list: DropListId) -> Option<usize> {
        self.columns.iter().position(|column| column.list == list)
    }

    fn apply_drop(&mut self, drop: &DropListDropEvent) {
        let (Some(source), Some(target)) = (
            self.column_index(drop.source_drop_list),
            self.column_index(drop.target_drop_list),
        ) else {
            return;
        };
        if drop.is_noop() {
            return;
        }

        if source == target {
            let column = &mut self.columns[source];
            column.cards = move_item(&column.cards, drop.source_index, drop.target_index);
        } else {
            let Some(card) = self.columns[source].cards.get(drop.source_index).cloned() else {
                return;
            };
            let from = &mut self.columns[source];
            from.cards = remove_item(&from.cards, drop.source_index);
            let to = &mut self.columns[target];
            to.cards = insert_item(&to.cards, card, drop.target_index);
        }
        info!(
            from = %self.columns[source].title,
            to = %self.columns[target].title,
            source_index = drop.source_index,
            target_index = drop.target_index,
            "card moved"
        );
    }

    fn render_card(
        &self,
        card: &Card,
        bounds: Bounds<Pixels>,
        column: &ColumnLayout,
        now: Instant,
        palette: Palette,
        cx: &mut Context<Self>,
    ) -> AnyElement {
        let offset = self
            .transforms
            .get(&card.id)
            .map(|tween| tween.value(now).0)
            .unwrap_or_default();
        let id = card.id;

        div()
            .absolute()
            .left(bounds.origin.x - column.bounds.origin.x + offset.x)
            .top(bounds.origin.y - column.bounds.origin.y + offset.y)
            .w(bounds.size.width)
            .h(bounds.size.height)
            .px(px(10.))
            .flex()
            .items_center()
            .rounded(px(8.))
            .bg(palette.background)
            .border_1()
            .border_color(palette.border)
            .text_sm()
            .text_color(palette.foreground)
            .cursor_grab()
            .child(card.title.clone())
            .on_mouse_down(
                MouseButton::Left,
                cx.listener(move |this, event: &MouseDownEvent, _, cx| {
                    this.on_card_down(id, event.position, cx);
                }),
            )
            .into_any_element()
    }

    fn render_column(
        &self,
        ix: usize,
        column: &Column,
        layout: &ColumnLayout,
        now: Instant,
        palette: Palette,
        cx: &mut Context<Self>,
    ) -> AnyElement {
        let mut cards = Vec::with_capacity(layout.flow.len());
        for (slot, id) in layout.flow.iter().enumerate() {
            if let Some(card) = column.cards.iter().find(|card| card.id == *id) {
                cards.push(self.render_card(card, layout.slot_bounds(slot), layout, now, palette, cx));
            }
        }

        let placeholder = layout.placeholder_bounds().map(|bounds| {
            let extent = self
                .placeholders
                .get(&column.list)
                .map(|tween| tween.value(now).0.y)
                .unwrap_or(bounds.size.height);
            div()
                .absolute()
                .left(bounds.origin.x - layout.bounds.origin.x)
                .top(bounds.origin.y - layout.bounds.origin.y)
                .w(bounds.size.width)
                .h(extent)
                .rounded(px(8.))
                .bg(palette.muted)
                .border_1()
                .border_color(palette.drag_border)
        });

        let header = div()
            .absolute()
            .left(layout.bounds.origin.x)
            .top(px(PADDING))
            .w(px(COLUMN_WIDTH))
            .h(px(HEADER_HEIGHT))
            .flex()
            .items_center()
            .gap_2()
            .font_weight(FontWeight::SEMIBOLD)
            .text_color(palette.foreground)
            .child(column.title.clone())
            .child(
                div()
                    .text_xs()
                    .text_color(palette.muted_foreground)
                    .child(column.cards.len().to_string()),
            );

        let body = div()
            .absolute()
            .left(layout.bounds.origin.x)
            .top(layout.bounds.origin.y)
            .w(layout.bounds.size.width)
            .h(layout.bounds.size.height)
            .overflow_hidden()
            .rounded(px(10.))
            .bg(palette.muted)
            .children(cards)
            .children(placeholder)
            .on_scroll_wheel(cx.listener(move |this, event: &ScrollWheelEvent, window, cx| {
                this.on_wheel(ix, event, window, cx);
            }));

        div().child(header).child(body).into_any_element()
    }

    fn render_preview(&self, now: Instant, palette: Palette) -> Option<AnyElement> {
        let id = self.engine.active_draggable()?;
        let preview = self.engine.draggable(id)?.preview().copied()?;
        let title = self
            .columns
            .iter()
            .flat_map(|column| column.cards.iter())
            .find(|card| card.id == id)?
            .title
            .clone();
        let offset = self
            .transforms
            .get(&id)
            .map(|tween| tween.value(now).0)
            .unwrap_or_default();

        Some(
            div()
                .absolute()
                .left(preview.origin.x + offset.x)
                .top(preview.origin.y + offset.y)
                .w(preview.size.width)
                .h(preview.size.height)
                .px(px(10.))
                .flex()
                .items_center()
                .rounded(px(8.))
                .bg(palette.popover)
                .border_1()
                .border_color(palette.border)
                .shadow_md()
                .text_color(palette.popover_foreground)
                .text_sm()
                .cursor_grabbing()
                .child(title)
                .into_any_element(),
        )
    }
}

impl Render for Board {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let now = Instant::now();
        self.viewport = window.viewport_size();
        self.advance(now);
        if self.sync_tweens(now) || self.engine.needs_animation_frame() {
            window.request_animation_frame();
        }

        let theme = cx.theme();
        let palette = Palette {
            background: theme.background,
            foreground: theme.foreground,
            muted: theme.muted,
            muted_foreground: theme.muted_foreground,
            border: theme.border,
            drag_border: theme.drag_border,
            popover: theme.popover,
            popover_foreground: theme.popover_foreground,
        };

        let host = self.host();
        let columns: Vec<_> = self
            .columns
            .iter()
            .zip(&host.columns)
            .enumerate()
            .map(|(ix, (column, layout))| self.render_column(ix, column, layout, now, palette, cx))
            .collect();

        div()
            .size_full()
            .relative()
            .bg(palette.background)
            .children(columns)
            .children(self.render_preview(now, palette))
            .on_mouse_move(cx.listener(Self::on_mouse_move))
            .on_mouse_up(MouseButton::Left, cx.listener(Self::on_mouse_up))
    }
}
