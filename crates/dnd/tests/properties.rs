//! Property tests for the position tracker and the scroll helpers.

use gpui::{Bounds, point, px, size};
use gpui_dnd::{
    PositionTracker, ScrollDirection, ScrollMetrics, can_scroll, move_item, scroll_direction,
};
use proptest::prelude::*;

fn items(max_len: usize) -> impl Strategy<Value = Vec<u32>> {
    proptest::collection::vec(0u32..1000, 1..=max_len)
}

fn sorted(mut values: Vec<u32>) -> Vec<u32> {
    values.sort_unstable();
    values
}

proptest! {
    #[test]
    fn move_to_preserves_items_and_lands_at_target(
        values in items(32),
        from in 0usize..32,
        to in 0usize..32,
    ) {
        let from = from % values.len();
        let to = to % values.len();
        let mut tracker: PositionTracker<u32> = values.iter().copied().collect();

        tracker.move_to(from, to);

        prop_assert_eq!(tracker.len(), values.len());
        prop_assert_eq!(tracker.items()[to], values[from]);
        prop_assert_eq!(sorted(tracker.items().to_vec()), sorted(values.clone()));
        let expected = move_item(&values, from, to);
        prop_assert_eq!(tracker.items(), expected.as_slice());
    }

    #[test]
    fn move_to_same_index_changes_nothing(values in items(32), index in 0usize..64) {
        let mut tracker: PositionTracker<u32> = values.iter().copied().collect();
        tracker.move_to(index, index);
        prop_assert_eq!(tracker.items(), values.as_slice());
    }

    #[test]
    fn insert_and_remove_clamp_and_change_length_by_one(
        values in items(32),
        index in 0usize..1000,
        item in 0u32..1000,
    ) {
        let mut tracker: PositionTracker<u32> = values.iter().copied().collect();

        let landed = tracker.insert_at(item, index);
        prop_assert_eq!(tracker.len(), values.len() + 1);
        prop_assert!(landed <= values.len());
        prop_assert_eq!(tracker.items()[landed], item);

        prop_assert!(tracker.remove_at(index).is_some());
        prop_assert_eq!(tracker.len(), values.len());
    }

    #[test]
    fn scroll_direction_is_total_and_prefers_corners(
        x in -50f32..250.,
        y in -50f32..250.,
        width in 10f32..200.,
        height in 10f32..200.,
        threshold in 0.01f32..0.5,
    ) {
        let bounds = Bounds::new(point(px(0.), px(0.)), size(px(width), px(height)));
        let direction = scroll_direction(&bounds, threshold, point(px(x), px(y)));
        prop_assert!(ScrollDirection::ALL.contains(&direction));

        let near_top = y >= 0. && y <= height * threshold;
        let near_bottom = y >= height - height * threshold && y <= height;
        let near_left = x >= 0. && x <= width * threshold;
        let near_right = x >= width - width * threshold && x <= width;
        if (near_top || near_bottom) && (near_left || near_right) {
            prop_assert!(direction.is_corner(), "{:?} at ({}, {})", direction, x, y);
        }
        if !(near_top || near_bottom || near_left || near_right) {
            prop_assert_eq!(direction, ScrollDirection::None);
        }
    }

    #[test]
    fn can_scroll_is_false_without_overflow(
        width in 1f32..500.,
        height in 1f32..500.,
    ) {
        let viewport = size(px(width), px(height));
        let metrics = ScrollMetrics {
            bounds: Bounds::new(point(px(0.), px(0.)), viewport),
            scroll_offset: point(px(0.), px(0.)),
            content_size: viewport,
            viewport_size: viewport,
        };
        for direction in ScrollDirection::ALL {
            prop_assert!(!can_scroll(&metrics, direction));
        }
    }
}
