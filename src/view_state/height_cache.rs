//! Per-row height measurement cache.
//!
//! Stores the last known height of every row, hands out a fixed estimate for
//! rows that have never been measured, and keeps running offsets in a
//! [`HeightIndex`] so corrections are O(log n).
//!
//! # Ownership
//! One cache per list instance. It is discarded with the list when the
//! conversation changes; heights are never reused across conversations.

use super::height_index::HeightIndex;
use super::types::{LineOffset, RowHeight, RowIndex};

/// Height knowledge for a single row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeightRecord {
    /// Whether `height` came from a real measurement.
    pub measured: bool,
    /// Measured height, or the estimate used until a measurement arrives.
    pub height: RowHeight,
}

impl HeightRecord {
    /// An unmeasured record carrying the given estimate.
    pub fn estimated(height: RowHeight) -> Self {
        Self {
            measured: false,
            height,
        }
    }

    /// A measured record.
    pub fn measured(height: RowHeight) -> Self {
        Self {
            measured: true,
            height,
        }
    }
}

/// Outcome of [`HeightMeasurementCache::set`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeightUpdate {
    /// The stored height did not change. No recompute is needed.
    Unchanged,
    /// The stored height changed.
    Changed {
        /// Height before the write.
        old: RowHeight,
        /// Height after the write.
        new: RowHeight,
    },
}

impl HeightUpdate {
    /// Signed change in lines (0 when unchanged).
    pub fn delta(&self) -> isize {
        match self {
            Self::Unchanged => 0,
            Self::Changed { old, new } => new.lines() as isize - old.lines() as isize,
        }
    }

    /// Whether a recompute should be triggered.
    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Changed { .. })
    }
}

/// Row-index keyed height cache with O(log n) offsets.
///
/// # Invariants
/// - `records.len() == index.len()`
/// - `index.height(i) == records[i].height` for every row
#[derive(Debug, Clone)]
pub struct HeightMeasurementCache {
    records: Vec<HeightRecord>,
    index: HeightIndex,
    default_height: RowHeight,
}

impl HeightMeasurementCache {
    /// Estimate used for rows that were never measured.
    pub const DEFAULT_ESTIMATE: RowHeight = RowHeight::clamped(50);

    /// Create an empty cache with the given estimate for unmeasured rows.
    pub fn new(default_height: RowHeight) -> Self {
        Self {
            records: Vec::new(),
            index: HeightIndex::default(),
            default_height,
        }
    }

    /// Estimate used for unmeasured rows.
    pub fn default_height(&self) -> RowHeight {
        self.default_height
    }

    /// Number of rows with a record.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the cache holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Height for a row: the measured value if present, else the estimate.
    ///
    /// Never fails. Rows past the end report the default estimate.
    pub fn get(&self, row: RowIndex) -> RowHeight {
        self.records
            .get(row.get())
            .map_or(self.default_height, |r| r.height)
    }

    /// Record for a row, if one exists.
    pub fn record(&self, row: RowIndex) -> Option<HeightRecord> {
        self.records.get(row.get()).copied()
    }

    /// Whether the row carries a real measurement.
    pub fn is_measured(&self, row: RowIndex) -> bool {
        self.records.get(row.get()).is_some_and(|r| r.measured)
    }

    /// Record a measured height. Last write wins.
    ///
    /// Returns [`HeightUpdate::Unchanged`] when the stored height is already
    /// `height`, even if the row flips from estimated to measured, so callers
    /// never recompute on a zero delta. Rows past the end are created lazily.
    pub fn set(&mut self, row: RowIndex, height: RowHeight) -> HeightUpdate {
        let idx = row.get();
        if idx >= self.records.len() {
            self.resize(idx + 1);
        }

        let record = &mut self.records[idx];
        let old = record.height;
        *record = HeightRecord::measured(height);
        if old == height {
            return HeightUpdate::Unchanged;
        }

        self.index.set(idx, height.lines());
        HeightUpdate::Changed { old, new: height }
    }

    /// Mark one row as needing a fresh measurement.
    ///
    /// The last height stays in place as the estimate so offsets do not jump
    /// before the new measurement lands. Returns whether the row existed.
    pub fn invalidate(&mut self, row: RowIndex) -> bool {
        match self.records.get_mut(row.get()) {
            Some(record) => {
                record.measured = false;
                true
            }
            None => false,
        }
    }

    /// Mark every row as needing a fresh measurement (e.g. viewport width changed).
    pub fn invalidate_all(&mut self) {
        self.records.iter_mut().for_each(|r| r.measured = false);
    }

    /// Reset every record to an unmeasured default estimate.
    pub fn clear_all(&mut self) {
        let len = self.records.len();
        self.records.clear();
        self.records
            .resize(len, HeightRecord::estimated(self.default_height));
        self.index
            .rebuild(std::iter::repeat(self.default_height.lines()).take(len));
    }

    /// Grow with unmeasured estimates or shrink to exactly `len` rows.
    pub fn resize(&mut self, len: usize) {
        if len < self.records.len() {
            self.records.truncate(len);
            self.index.truncate(len);
            return;
        }
        while self.records.len() < len {
            self.records.push(HeightRecord::estimated(self.default_height));
            self.index.push(self.default_height.lines());
        }
    }

    /// Replace every record at once (used after a mid-list splice).
    pub fn replace_records(&mut self, records: Vec<HeightRecord>) {
        self.index.rebuild(records.iter().map(|r| r.height.lines()));
        self.records = records;
    }

    /// All records in row order.
    pub fn records(&self) -> &[HeightRecord] {
        &self.records
    }

    /// Top offset of `row`: the sum of `get(j)` for `j < row`.
    ///
    /// `offset_of(len())` equals [`total_height`](Self::total_height).
    pub fn offset_of(&self, row: RowIndex) -> LineOffset {
        LineOffset::new(self.index.offset_of(row.get()))
    }

    /// Sum of every row height, estimates included.
    pub fn total_height(&self) -> usize {
        self.index.total()
    }

    /// Row containing the given absolute line, or `None` past the end.
    pub fn row_at(&self, offset: LineOffset) -> Option<RowIndex> {
        self.index.lower_bound(offset.get()).map(RowIndex::new)
    }
}

impl Default for HeightMeasurementCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ESTIMATE)
    }
}
