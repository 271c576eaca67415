//! Per-instance state of one virtualized chat list.
//!
//! `VirtualList` owns the height cache, the resize watcher, the window
//! calculator and the anchor controller for exactly one conversation. It is
//! the only place that sequences them:
//!
//! ```text
//! sync / viewport / scroll ─► anchor ─► window ─► mount/unmount observers
//!                                         ▲                 │
//!                                         │        measure + notify
//!                                         └── corrections ◄─ flush
//! ```
//!
//! Nothing here touches a terminal. The view supplies measurements through
//! [`VirtualList::layout`] or [`VirtualList::report_size`].

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::model::{ConversationId, MessageId, MessageSnapshot};

use super::anchor::{AnchorMode, ScrollAnchorController, DEFAULT_AT_END_THRESHOLD};
use super::height_cache::{HeightMeasurementCache, HeightRecord};
use super::resize_watcher::{ObserverToken, ResizeWatcher};
use super::scroll::ScrollPosition;
use super::types::{LineOffset, RowHeight, RowIndex, Viewport};
use super::window::{RowWindowCalculator, WindowState, DEFAULT_OVERSCAN};

/// Upper bound on measure/correct/recompute rounds per frame.
///
/// Corrections can move new rows into the window, which then need measuring
/// too. Hitting the bound leaves the rest for the next frame.
pub const MAX_LAYOUT_PASSES: usize = 4;

/// Tunables of a list instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListConfig {
    /// Estimate for rows that were never measured.
    pub estimated_row_height: RowHeight,
    /// Rows materialized beyond the visible range on each side.
    pub overscan: usize,
    /// Fixed height of the header spacer (row 0).
    pub header_height: RowHeight,
    /// Distance from the end within which scrolling down re-engages follow mode.
    pub at_end_threshold: usize,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            estimated_row_height: HeightMeasurementCache::DEFAULT_ESTIMATE,
            overscan: DEFAULT_OVERSCAN,
            header_height: RowHeight::ONE,
            at_end_threshold: DEFAULT_AT_END_THRESHOLD,
        }
    }
}

/// How a snapshot differed from the previously synced one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Same conversation, same ids.
    Unchanged,
    /// Messages added at the end.
    Append {
        /// Number of new rows.
        added: usize,
    },
    /// Messages removed from the end.
    Truncate {
        /// Number of removed rows.
        removed: usize,
    },
    /// Messages inserted, removed or reordered elsewhere.
    Splice {
        /// Height change applied above the first visible surviving row.
        shift_above: isize,
    },
    /// A different conversation: all per-row state was discarded.
    Reset,
}

/// Result of a [`VirtualList::layout`] run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutReport {
    /// Passes executed.
    pub passes: usize,
    /// Whether the last pass produced no height change.
    pub settled: bool,
}

/// One mounted row handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MountedRow {
    /// Row index.
    pub index: RowIndex,
    /// Top offset in content coordinates.
    pub top: LineOffset,
    /// Layout height (measured or estimated).
    pub height: RowHeight,
    /// Observer token, `None` for the header spacer.
    pub token: Option<ObserverToken>,
}

/// Complete state of one virtualized list instance.
///
/// # Invariants
/// - `cache.len() == total_count()` after every public call
/// - the spacer record holds `header_height` and is never observed
/// - only rows inside the current window are observed
#[derive(Debug)]
pub struct VirtualList {
    config: ListConfig,
    conversation: Option<ConversationId>,
    ids: Vec<MessageId>,
    cache: HeightMeasurementCache,
    watcher: ResizeWatcher,
    calculator: RowWindowCalculator,
    anchor: ScrollAnchorController,
    viewport: Viewport,
    window: WindowState,
}

impl Default for VirtualList {
    fn default() -> Self {
        Self::new(ListConfig::default())
    }
}

impl VirtualList {
    /// Create a list bound to no conversation yet. Only the spacer row exists.
    pub fn new(config: ListConfig) -> Self {
        let mut list = Self {
            config,
            conversation: None,
            ids: Vec::new(),
            cache: HeightMeasurementCache::new(config.estimated_row_height),
            watcher: ResizeWatcher::new(),
            calculator: RowWindowCalculator::new(config.overscan),
            anchor: ScrollAnchorController::new(config.at_end_threshold),
            viewport: Viewport::default(),
            window: WindowState::default(),
        };
        list.reset_rows();
        list
    }

    fn reset_rows(&mut self) {
        self.cache.clear_all();
        self.cache.resize(self.total_count());
        self.cache.set(RowIndex::SPACER, self.config.header_height);
    }

    /// Configuration the list was built with.
    pub fn config(&self) -> &ListConfig {
        &self.config
    }

    /// Conversation the list is bound to.
    pub fn conversation(&self) -> Option<ConversationId> {
        self.conversation
    }

    /// Ids of the rendered messages, in row order (row 1 first).
    pub fn ids(&self) -> &[MessageId] {
        &self.ids
    }

    /// Number of rows, the spacer included.
    pub fn total_count(&self) -> usize {
        self.ids.len() + 1
    }

    /// Sum of all row heights, estimates included.
    pub fn total_height(&self) -> usize {
        self.cache.total_height()
    }

    /// Height cache.
    pub fn cache(&self) -> &HeightMeasurementCache {
        &self.cache
    }

    /// Resize watcher.
    pub fn watcher(&self) -> &ResizeWatcher {
        &self.watcher
    }

    /// Current scroll offset.
    pub fn scroll_top(&self) -> LineOffset {
        self.anchor.scroll_top()
    }

    /// Current anchor mode.
    pub fn anchor_mode(&self) -> AnchorMode {
        self.anchor.mode()
    }

    /// Current viewport.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Window computed by the last recompute.
    pub fn window(&self) -> &WindowState {
        &self.window
    }

    fn viewport_height(&self) -> usize {
        usize::from(self.viewport.height)
    }

    /// Mounted rows with their observer tokens, in row order.
    pub fn mounted_rows(&self) -> impl Iterator<Item = MountedRow> + '_ {
        self.window.rows().iter().map(|row| MountedRow {
            index: row.index,
            top: row.top,
            height: row.height,
            token: self.watcher.token_for(row.index),
        })
    }

    /// Bring the list in line with a new data snapshot.
    pub fn sync(&mut self, snapshot: &MessageSnapshot) -> SyncOutcome {
        let new_ids = snapshot.ids();
        let vh = self.viewport_height();

        if self.conversation != Some(snapshot.conversation()) {
            debug!(
                conversation = %snapshot.conversation(),
                rows = new_ids.len() + 1,
                "list reset for conversation"
            );
            self.conversation = Some(snapshot.conversation());
            self.ids = new_ids;
            self.watcher.unobserve_all();
            self.reset_rows();
            self.anchor.reset();
            self.anchor.reconcile(self.total_height(), vh);
            self.recompute();
            return SyncOutcome::Reset;
        }

        if new_ids == self.ids {
            return SyncOutcome::Unchanged;
        }

        let outcome = if new_ids.starts_with(&self.ids) {
            let added = new_ids.len() - self.ids.len();
            self.ids = new_ids;
            self.cache.resize(self.total_count());
            self.anchor.reconcile(self.total_height(), vh);
            SyncOutcome::Append { added }
        } else if self.ids.starts_with(&new_ids) {
            let removed = self.ids.len() - new_ids.len();
            self.ids = new_ids;
            let total = self.total_count();
            self.watcher.retain_rows(|row| row.get() < total);
            self.cache.resize(total);
            self.anchor.reconcile(self.total_height(), vh);
            SyncOutcome::Truncate { removed }
        } else {
            let shift_above = self.splice(new_ids);
            self.anchor
                .on_content_shifted_above(shift_above, self.total_height(), vh);
            SyncOutcome::Splice { shift_above }
        };

        debug!(?outcome, rows = self.total_count(), "list synced");
        self.recompute();
        outcome
    }

    /// Realign per-row state after an arbitrary id change.
    ///
    /// Records follow their message id. Observers whose slot now shows a
    /// different message are detached, retiring their epoch. Returns how far
    /// the first visible surviving row moved.
    fn splice(&mut self, new_ids: Vec<MessageId>) -> isize {
        let old_rows: HashMap<MessageId, RowIndex> = self
            .ids
            .iter()
            .enumerate()
            .map(|(i, id)| (*id, RowIndex::for_message(i)))
            .collect();

        let anchor = self.first_visible_survivor(&new_ids);

        let mut records = Vec::with_capacity(new_ids.len() + 1);
        records.push(HeightRecord::measured(self.config.header_height));
        records.extend(new_ids.iter().map(|id| {
            old_rows
                .get(id)
                .and_then(|row| self.cache.record(*row))
                .unwrap_or(HeightRecord::estimated(self.cache.default_height()))
        }));

        let old_ids = &self.ids;
        let detached = self.watcher.retain_rows(|row| match row.message_index() {
            None => true,
            Some(m) => old_ids.get(m).is_some_and(|id| new_ids.get(m) == Some(id)),
        });

        self.cache.replace_records(records);
        self.ids = new_ids;

        let shift = anchor.map_or(0, |(old_top, new_row)| {
            self.cache.offset_of(new_row).get() as isize - old_top.get() as isize
        });
        trace!(detached, shift, "rows realigned by id");
        shift
    }

    /// Old top and new row of the first row at or below the scroll offset that
    /// survives into `new_ids`.
    fn first_visible_survivor(&self, new_ids: &[MessageId]) -> Option<(LineOffset, RowIndex)> {
        let new_rows: HashMap<MessageId, RowIndex> = new_ids
            .iter()
            .enumerate()
            .map(|(i, id)| (*id, RowIndex::for_message(i)))
            .collect();

        let first = self.cache.row_at(self.scroll_top())?;
        (first.get()..self.total_count()).find_map(|i| {
            let row = RowIndex::new(i);
            let id = self.ids.get(row.message_index()?)?;
            let new_row = new_rows.get(id)?;
            Some((self.cache.offset_of(row), *new_row))
        })
    }

    /// Apply new viewport dimensions.
    ///
    /// A width change invalidates every measurement (text re-wraps). Returns
    /// whether the width changed.
    pub fn set_viewport(&mut self, viewport: Viewport) -> bool {
        if viewport == self.viewport {
            return false;
        }
        let width_changed = self.viewport.width != 0 && self.viewport.width != viewport.width;
        if width_changed {
            debug!(
                from = self.viewport.width,
                to = viewport.width,
                "viewport width changed, invalidating measurements"
            );
            self.cache.invalidate_all();
            self.watcher.rearm();
        }
        self.viewport = viewport;
        self.anchor
            .reconcile(self.total_height(), self.viewport_height());
        self.recompute();
        width_changed
    }

    /// User scroll by a signed number of lines.
    pub fn scroll_by(&mut self, delta: isize) {
        self.anchor
            .user_scroll_by(delta, self.total_height(), self.viewport_height());
        self.recompute();
    }

    /// Programmatic or keyboard scroll to a semantic position.
    pub fn scroll_to(&mut self, position: &ScrollPosition) {
        let total_count = self.total_count();
        let total_height = self.cache.total_height();
        let vh = usize::from(self.viewport.height);
        let cache = &self.cache;
        self.anchor.scroll_to(position, total_height, vh, |row| {
            (row.get() < total_count).then(|| (cache.offset_of(row), cache.get(row)))
        });
        self.recompute();
    }

    /// Re-engage follow mode and pin to the newest message.
    pub fn jump_to_latest(&mut self) {
        self.anchor
            .jump_to_latest(self.total_height(), self.viewport_height());
        self.recompute();
    }

    /// Recompute the window and mount/unmount observers to match it.
    pub fn recompute(&mut self) {
        self.window = self.calculator.compute(
            self.total_count(),
            self.viewport_height(),
            self.anchor.scroll_top(),
            &self.cache,
        );

        let window = &self.window;
        let detached = self.watcher.retain_rows(|row| window.contains(row));
        for row in self.window.rows() {
            self.watcher.observe(row.index, row.index != RowIndex::SPACER);
        }
        if detached > 0 {
            trace!(detached, mounted = self.watcher.observed_count(), "observers updated");
        }
    }

    /// Report the laid-out box height of a mounted row.
    pub fn report_size(&mut self, token: ObserverToken, box_height: usize) -> bool {
        self.watcher.notify(token, box_height)
    }

    /// Apply pending size notifications and the anchor corrections they imply.
    ///
    /// Returns whether any height changed (and the window was recomputed).
    pub fn flush(&mut self) -> bool {
        if !self.watcher.has_pending() {
            return false;
        }
        let applied = self.watcher.flush(&mut self.cache);
        if applied.is_empty() {
            return false;
        }

        let total = self.cache.total_height();
        let vh = self.viewport_height();
        for resize in &applied {
            self.anchor
                .on_height_corrected(resize.top, resize.update, total, vh);
        }
        self.recompute();
        true
    }

    /// Run measure/correct/recompute passes until heights settle.
    ///
    /// `measure` returns the laid-out height of a message row, or `None` when
    /// the row has nothing to measure. Bounded by [`MAX_LAYOUT_PASSES`].
    pub fn layout<F>(&mut self, mut measure: F) -> LayoutReport
    where
        F: FnMut(RowIndex) -> Option<usize>,
    {
        for pass in 1..=MAX_LAYOUT_PASSES {
            let mounted: Vec<MountedRow> = self.mounted_rows().collect();
            for row in mounted {
                let Some(token) = row.token else { continue };
                if let Some(lines) = measure(row.index) {
                    self.watcher.notify(token, lines);
                }
            }
            if !self.flush() {
                return LayoutReport {
                    passes: pass,
                    settled: true,
                };
            }
        }
        debug!(
            passes = MAX_LAYOUT_PASSES,
            "layout did not settle, deferring to next frame"
        );
        LayoutReport {
            passes: MAX_LAYOUT_PASSES,
            settled: false,
        }
    }
}

#[cfg(test)]
#[path = "virtual_list_tests.rs"]
mod tests;
