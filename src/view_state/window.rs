//! Windowed row calculation.
//!
//! Computes the minimal contiguous range of rows to materialize for a scroll
//! offset and viewport height, widened by an overscan margin, together with
//! the top offset of each materialized row.

use super::height_cache::HeightMeasurementCache;
use super::types::{LineOffset, RowHeight, RowIndex};

/// Rows rendered beyond the strictly visible range on each side.
pub const DEFAULT_OVERSCAN: usize = 3;

/// One row to materialize and where it goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterializedRow {
    /// Row index.
    pub index: RowIndex,
    /// Top offset from the start of the content.
    pub top: LineOffset,
    /// Height used for layout (measured or estimated).
    pub height: RowHeight,
}

impl MaterializedRow {
    /// Offset of the line just below this row.
    pub fn bottom(&self) -> LineOffset {
        self.top.saturating_add(self.height.lines())
    }
}

/// Derived window over a list: which rows are materialized and where.
///
/// Recomputed whenever the row count, any height, the viewport or the scroll
/// offset changes. Never stored across renders by anything but the list that
/// produced it.
///
/// # Invariants
/// - `start_index <= end_index <= total_count`
/// - `rows[k].index == start_index + k`
/// - `rows[k + 1].top == rows[k].bottom()`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WindowState {
    start_index: RowIndex,
    end_index: RowIndex,
    rows: Vec<MaterializedRow>,
    total_height: usize,
    scroll_top: LineOffset,
    viewport_height: usize,
}

impl WindowState {
    fn empty(total_height: usize, scroll_top: LineOffset, viewport_height: usize) -> Self {
        Self {
            total_height,
            scroll_top,
            viewport_height,
            ..Self::default()
        }
    }

    /// First materialized row (inclusive).
    pub fn start_index(&self) -> RowIndex {
        self.start_index
    }

    /// Last materialized row (inclusive), or `None` for an empty window.
    pub fn stop_index(&self) -> Option<RowIndex> {
        self.rows.last().map(|r| r.index)
    }

    /// One past the last materialized row.
    pub fn end_index(&self) -> RowIndex {
        self.end_index
    }

    /// Materialized rows in index order.
    pub fn rows(&self) -> &[MaterializedRow] {
        &self.rows
    }

    /// Top offsets of the materialized rows, in index order.
    pub fn offsets(&self) -> impl Iterator<Item = LineOffset> + '_ {
        self.rows.iter().map(|r| r.top)
    }

    /// Materialized row with the given index.
    pub fn row(&self, index: RowIndex) -> Option<&MaterializedRow> {
        index
            .get()
            .checked_sub(self.start_index.get())
            .and_then(|k| self.rows.get(k))
    }

    /// Whether the row is materialized.
    pub fn contains(&self, index: RowIndex) -> bool {
        self.start_index <= index && index < self.end_index
    }

    /// Number of materialized rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether nothing is materialized.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of all row heights, estimates included.
    pub fn total_height(&self) -> usize {
        self.total_height
    }

    /// Scroll offset the window was computed for.
    pub fn scroll_top(&self) -> LineOffset {
        self.scroll_top
    }

    /// Viewport height the window was computed for.
    pub fn viewport_height(&self) -> usize {
        self.viewport_height
    }
}

/// Decides which rows to materialize and at what vertical offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowWindowCalculator {
    overscan: usize,
}

impl Default for RowWindowCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_OVERSCAN)
    }
}

impl RowWindowCalculator {
    /// Create a calculator with the given overscan (rows per side).
    pub fn new(overscan: usize) -> Self {
        Self { overscan }
    }

    /// Overscan rows per side.
    pub fn overscan(&self) -> usize {
        self.overscan
    }

    /// Compute the window.
    ///
    /// Visible rows are those intersecting `[scroll_top, scroll_top + viewport_height)`.
    /// Rows without a cache record use the cache's default estimate. A zero
    /// viewport, an empty list or a scroll offset past the content yields an
    /// empty window; nothing here fails.
    ///
    /// Cost is O(log² n + window) thanks to the cache's Fenwick-backed offsets.
    pub fn compute(
        &self,
        total_count: usize,
        viewport_height: usize,
        scroll_top: LineOffset,
        cache: &HeightMeasurementCache,
    ) -> WindowState {
        let total_height = offset_at(cache, total_count, total_count);

        if total_count == 0 || viewport_height == 0 {
            return WindowState::empty(total_height, scroll_top, viewport_height);
        }

        let Some(first_visible) = row_at(cache, total_count, total_height, scroll_top.get())
        else {
            return WindowState::empty(total_height, scroll_top, viewport_height);
        };

        let last_line = scroll_top.get().saturating_add(viewport_height - 1);
        let visible_end = row_at(cache, total_count, total_height, last_line)
            .map_or(total_count, |row| row + 1);

        let start = first_visible.saturating_sub(self.overscan);
        let end = visible_end.saturating_add(self.overscan).min(total_count);

        let mut top = offset_at(cache, total_count, start);
        let rows = (start..end)
            .map(|i| {
                let height = cache.get(RowIndex::new(i));
                let row = MaterializedRow {
                    index: RowIndex::new(i),
                    top: LineOffset::new(top),
                    height,
                };
                top += height.lines();
                row
            })
            .collect();

        WindowState {
            start_index: RowIndex::new(start),
            end_index: RowIndex::new(end),
            rows,
            total_height,
            scroll_top,
            viewport_height,
        }
    }
}

/// offsets[i] over `total_count` rows, extending the cache with default estimates.
fn offset_at(cache: &HeightMeasurementCache, total_count: usize, i: usize) -> usize {
    let i = i.min(total_count);
    let cached = cache.len();
    if i <= cached {
        cache.offset_of(RowIndex::new(i)).get()
    } else {
        cache.total_height() + (i - cached) * cache.default_height().lines()
    }
}

/// Row containing `line`, or `None` past the end of the content.
fn row_at(
    cache: &HeightMeasurementCache,
    total_count: usize,
    total_height: usize,
    line: usize,
) -> Option<usize> {
    if line >= total_height {
        return None;
    }
    let cached_total = offset_at(cache, total_count, cache.len());
    if line < cached_total {
        cache.row_at(LineOffset::new(line)).map(|r| r.get())
    } else {
        let past = (line - cached_total) / cache.default_height().lines();
        Some(cache.len().min(total_count) + past)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(lines: u32) -> RowHeight {
        RowHeight::new(lines).unwrap()
    }

    fn uniform_cache(len: usize, height: u32) -> HeightMeasurementCache {
        let mut cache = HeightMeasurementCache::new(h(height));
        cache.resize(len);
        cache
    }

    #[test]
    fn empty_list_gives_empty_window() {
        let cache = uniform_cache(0, 50);
        let window = RowWindowCalculator::new(3).compute(0, 100, LineOffset::new(0), &cache);
        assert!(window.is_empty());
        assert_eq!(window.total_height(), 0);
        assert_eq!(window.stop_index(), None);
    }

    #[test]
    fn zero_viewport_gives_empty_window_without_panicking() {
        let cache = uniform_cache(5, 50);
        let window = RowWindowCalculator::new(3).compute(5, 0, LineOffset::new(0), &cache);
        assert!(window.is_empty());
        assert_eq!(window.total_height(), 250);
    }

    #[test]
    fn three_unmeasured_rows_fill_a_120_line_viewport() {
        let cache = uniform_cache(3, 50);
        let window = RowWindowCalculator::new(0).compute(3, 120, LineOffset::new(0), &cache);

        assert_eq!(window.start_index(), RowIndex::new(0));
        assert_eq!(window.stop_index(), Some(RowIndex::new(2)));
        let offsets: Vec<usize> = window.offsets().map(|o| o.get()).collect();
        assert_eq!(offsets, vec![0, 50, 100]);
        assert_eq!(window.total_height(), 150);
    }

    #[test]
    fn overscan_widens_both_sides() {
        let cache = uniform_cache(100, 10);
        let window = RowWindowCalculator::new(3).compute(100, 30, LineOffset::new(500), &cache);

        // Visible rows 50..=52, overscan adds 3 on each side.
        assert_eq!(window.start_index(), RowIndex::new(47));
        assert_eq!(window.stop_index(), Some(RowIndex::new(55)));
        assert_eq!(window.row(RowIndex::new(47)).map(|r| r.top.get()), Some(470));
    }

    #[test]
    fn overscan_clamps_at_list_edges() {
        let cache = uniform_cache(5, 10);
        let window = RowWindowCalculator::new(3).compute(5, 20, LineOffset::new(0), &cache);
        assert_eq!(window.start_index(), RowIndex::new(0));
        assert_eq!(window.end_index(), RowIndex::new(5));
    }

    #[test]
    fn row_ending_exactly_at_scroll_top_is_not_visible() {
        let cache = uniform_cache(10, 10);
        let window = RowWindowCalculator::new(0).compute(10, 10, LineOffset::new(20), &cache);
        assert_eq!(window.start_index(), RowIndex::new(2));
        assert_eq!(window.stop_index(), Some(RowIndex::new(2)));
    }

    #[test]
    fn overscan_mounts_row_ending_at_scroll_top() {
        let cache = uniform_cache(10, 10);
        let window = RowWindowCalculator::new(1).compute(10, 10, LineOffset::new(20), &cache);
        assert!(window.contains(RowIndex::new(1)));
        assert_eq!(window.start_index(), RowIndex::new(1));
        assert_eq!(window.stop_index(), Some(RowIndex::new(3)));
    }

    #[test]
    fn variable_heights_place_rows_at_prefix_sums() {
        let mut cache = uniform_cache(4, 50);
        cache.set(RowIndex::new(0), h(1));
        cache.set(RowIndex::new(1), h(200));
        let window = RowWindowCalculator::new(0).compute(4, 60, LineOffset::new(190), &cache);

        assert_eq!(window.start_index(), RowIndex::new(1));
        assert_eq!(window.stop_index(), Some(RowIndex::new(2)));
        assert_eq!(window.rows()[1].top.get(), 201);
    }

    #[test]
    fn scroll_past_content_gives_empty_window() {
        let cache = uniform_cache(3, 10);
        let window = RowWindowCalculator::new(3).compute(3, 10, LineOffset::new(500), &cache);
        assert!(window.is_empty());
    }

    #[test]
    fn rows_missing_from_cache_use_default_estimate() {
        let cache = uniform_cache(2, 10);
        let window = RowWindowCalculator::new(0).compute(6, 15, LineOffset::new(35), &cache);

        assert_eq!(window.total_height(), 60);
        assert_eq!(window.start_index(), RowIndex::new(3));
        assert_eq!(window.stop_index(), Some(RowIndex::new(4)));
        assert_eq!(window.row(RowIndex::new(4)).map(|r| r.top.get()), Some(40));
    }

    #[test]
    fn count_smaller_than_cache_ignores_extra_records() {
        let cache = uniform_cache(10, 10);
        let window = RowWindowCalculator::new(5).compute(3, 100, LineOffset::new(0), &cache);
        assert_eq!(window.total_height(), 30);
        assert_eq!(window.end_index(), RowIndex::new(3));
    }

    #[test]
    fn contains_matches_range() {
        let cache = uniform_cache(10, 10);
        let window = RowWindowCalculator::new(0).compute(10, 25, LineOffset::new(10), &cache);
        assert!(window.contains(RowIndex::new(1)));
        assert!(window.contains(RowIndex::new(3)));
        assert!(!window.contains(RowIndex::new(4)));
        assert!(!window.contains(RowIndex::new(0)));
    }
}
