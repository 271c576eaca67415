//! Property-based tests for the virtualized list core.
//!
//! Properties under test:
//! 1. The window is contiguous, bounded and covers every visible row
//! 2. Offsets are prefix sums of row heights
//! 3. Writing the same height twice is a no-op
//! 4. AtEnd stays pinned to the bottom through any height corrections
//! 5. UserScrolled shifts by exactly the delta of corrections above the viewport
//! 6. Notifications from unmounted rows never reach the cache
//! 7. The virtualized widget draws the same frame as the render-everything list

use chatscroll::model::{Author, ConversationId, MessageStore};
use chatscroll::view::{
    measure_rows, ColorConfig, MarkdownRowRenderer, MessageStyles, SimpleListView,
    VirtualListView,
};
use chatscroll::view_state::{
    max_scroll, AnchorMode, HeightMeasurementCache, HeightUpdate, LineOffset, ListConfig,
    RowHeight, RowIndex, RowWindowCalculator, ScrollAnchorController, ScrollPosition, Viewport,
    VirtualList,
};
use proptest::prelude::*;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;

// ===== Strategies =====

/// Row heights between 1 and 20 lines.
fn arb_heights(max_rows: usize) -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(1u32..=20, 0..max_rows)
}

/// Short message bodies, some of them long enough to wrap.
fn arb_bodies() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{1,8}( [a-z]{1,8}){0,12}", 1..25)
}

fn cache_from(heights: &[u32], estimate: u32) -> HeightMeasurementCache {
    let mut cache = HeightMeasurementCache::new(RowHeight::clamped(estimate));
    cache.resize(heights.len());
    for (i, h) in heights.iter().enumerate() {
        cache.set(RowIndex::new(i), RowHeight::clamped(*h));
    }
    cache
}

fn plain_renderer() -> MarkdownRowRenderer {
    MarkdownRowRenderer::new(MessageStyles::with_color_config(ColorConfig::new(false)))
        .with_timestamps(false)
}

fn buffer_lines(buf: &Buffer) -> Vec<String> {
    (0..buf.area.height)
        .map(|y| {
            (0..buf.area.width)
                .map(|x| buf[(x, y)].symbol())
                .collect::<String>()
        })
        .collect()
}

proptest! {
    // ===== Window =====

    #[test]
    fn window_is_contiguous_bounded_and_covers_viewport(
        heights in arb_heights(200),
        viewport_height in 0usize..60,
        scroll in 0usize..3000,
        overscan in 0usize..5,
    ) {
        let cache = cache_from(&heights, 4);
        let n = heights.len();
        let window = RowWindowCalculator::new(overscan)
            .compute(n, viewport_height, LineOffset::new(scroll), &cache);

        prop_assert!(window.start_index() <= window.end_index());
        prop_assert!(window.end_index().get() <= n);

        for (k, row) in window.rows().iter().enumerate() {
            prop_assert_eq!(row.index.get(), window.start_index().get() + k);
            prop_assert_eq!(row.top, cache.offset_of(row.index));
            prop_assert_eq!(row.height, cache.get(row.index));
        }
        for pair in window.rows().windows(2) {
            prop_assert_eq!(pair[1].top, pair[0].bottom());
        }

        if viewport_height > 0 {
            for i in 0..n {
                let row = RowIndex::new(i);
                let top = cache.offset_of(row).get();
                let bottom = top + cache.get(row).lines();
                let visible = top < scroll + viewport_height && bottom > scroll;
                if visible {
                    prop_assert!(window.contains(row), "visible row {} missing", i);
                }
            }
        }
    }

    // ===== Height cache =====

    #[test]
    fn offsets_are_prefix_sums(heights in arb_heights(150)) {
        let cache = cache_from(&heights, 7);
        let mut expected = 0usize;
        for (i, h) in heights.iter().enumerate() {
            prop_assert_eq!(cache.offset_of(RowIndex::new(i)).get(), expected);
            expected += *h as usize;
        }
        prop_assert_eq!(cache.total_height(), expected);
    }

    #[test]
    fn setting_same_height_twice_is_noop(
        heights in arb_heights(50).prop_filter("non-empty", |h| !h.is_empty()),
        pick in any::<prop::sample::Index>(),
        new_height in 1u32..=30,
    ) {
        let mut cache = cache_from(&heights, 4);
        let row = RowIndex::new(pick.index(heights.len()));

        cache.set(row, RowHeight::clamped(new_height));
        let total = cache.total_height();
        let second = cache.set(row, RowHeight::clamped(new_height));

        prop_assert_eq!(second, HeightUpdate::Unchanged);
        prop_assert_eq!(cache.total_height(), total);
    }

    // ===== Anchor =====

    #[test]
    fn at_end_stays_pinned_through_corrections(
        heights in prop::collection::vec(1u32..=20, 1..80),
        corrections in prop::collection::vec((any::<prop::sample::Index>(), 1u32..=30), 1..20),
        viewport_height in 1usize..40,
    ) {
        let mut cache = cache_from(&heights, 4);
        let mut anchor = ScrollAnchorController::default();
        anchor.reconcile(cache.total_height(), viewport_height);

        for (pick, h) in corrections {
            let row = RowIndex::new(pick.index(heights.len()));
            let top = cache.offset_of(row);
            let update = cache.set(row, RowHeight::clamped(h));
            anchor.on_height_corrected(top, update, cache.total_height(), viewport_height);

            prop_assert_eq!(anchor.mode(), AnchorMode::AtEnd);
            prop_assert_eq!(
                anchor.scroll_top(),
                max_scroll(cache.total_height(), viewport_height)
            );
        }
    }

    #[test]
    fn user_scrolled_shifts_by_delta_above_viewport(
        heights in prop::collection::vec(1u32..=20, 2..80),
        pick in any::<prop::sample::Index>(),
        new_height in 1u32..=30,
        scroll_fraction in 0.0f64..1.0,
        viewport_height in 1usize..20,
    ) {
        let mut cache = cache_from(&heights, 4);
        let total = cache.total_height();
        let max = max_scroll(total, viewport_height).get();
        prop_assume!(max > 0);
        let requested = ((max as f64) * scroll_fraction) as usize;
        prop_assume!(requested < max);

        let mut anchor = ScrollAnchorController::default();
        anchor.reconcile(total, viewport_height);
        let start = anchor.user_scroll_to(LineOffset::new(requested), total, viewport_height);
        prop_assert_eq!(anchor.mode(), AnchorMode::UserScrolled);

        let row = RowIndex::new(pick.index(heights.len()));
        let top = cache.offset_of(row);
        let old_bottom = top.get() + cache.get(row).lines();
        let update = cache.set(row, RowHeight::clamped(new_height));
        let new_total = cache.total_height();
        let after = anchor.on_height_corrected(top, update, new_total, viewport_height);

        let new_max = max_scroll(new_total, viewport_height).get();
        if old_bottom <= start.get() {
            let expected = (start.get() as isize + update.delta()) as usize;
            prop_assert_eq!(after.get(), expected.min(new_max));
        } else {
            prop_assert_eq!(after.get(), start.get().min(new_max));
        }
    }

    // ===== Observers =====

    #[test]
    fn unmounted_rows_never_write_the_cache(
        count in 20usize..200,
        jump_fraction in 0.0f64..1.0,
        reported in 1usize..40,
    ) {
        let store = MessageStore::with_generated(ConversationId::new(1), count);
        let mut list = VirtualList::new(ListConfig::default());
        list.sync(&store.snapshot());
        list.set_viewport(Viewport::new(40, 10));

        let stale: Vec<_> = list.mounted_rows().filter_map(|r| r.token).collect();
        list.scroll_to(&ScrollPosition::Fraction(jump_fraction * 0.5));

        let before: Vec<_> = list.cache().records().to_vec();
        for token in stale {
            if !list.watcher().is_live(token) {
                prop_assert!(!list.report_size(token, reported));
            }
        }
        list.flush();

        for (i, record) in before.iter().enumerate() {
            let row = RowIndex::new(i);
            if !list.watcher().is_observed(row) {
                prop_assert_eq!(list.cache().record(row), Some(*record));
            }
        }
    }

    // ===== Rendering =====

    #[test]
    fn virtualized_frame_matches_simple_frame(
        bodies in arb_bodies(),
        width in 12u16..50,
        height in 3u16..16,
        scroll_fraction in 0.0f64..=1.0,
    ) {
        let mut store = MessageStore::new(ConversationId::new(1));
        for (i, body) in bodies.iter().enumerate() {
            let author = if i % 2 == 0 { Author::Peer } else { Author::User };
            store.push(author, body.clone());
        }
        let snapshot = store.snapshot();
        let renderer = plain_renderer();
        let area = Rect::new(0, 0, width, height);

        // Every row stays mounted so all offsets are measured.
        let mut list = VirtualList::new(ListConfig {
            overscan: 64,
            ..ListConfig::default()
        });
        list.sync(&snapshot);
        list.set_viewport(Viewport::new(width, height));
        measure_rows(&mut list, &snapshot, &renderer, width);
        list.scroll_to(&ScrollPosition::Fraction(scroll_fraction));
        let report = measure_rows(&mut list, &snapshot, &renderer, width);
        prop_assert!(report.settled);

        let mut virtual_buf = Buffer::empty(area);
        VirtualListView::new(&list, &snapshot, &renderer).render(area, &mut virtual_buf);
        let mut simple_buf = Buffer::empty(area);
        SimpleListView::new(&snapshot, &renderer, 1, list.scroll_top().get())
            .render(area, &mut simple_buf);

        prop_assert_eq!(buffer_lines(&virtual_buf), buffer_lines(&simple_buf));
    }
}
