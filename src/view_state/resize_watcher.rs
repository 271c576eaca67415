//! Resize observation for materialized rows.
//!
//! A terminal has no native resize observer, so the view reports the laid-out
//! box height of every mounted row after each render and whenever async
//! content finishes loading. The watcher turns those reports into size-change
//! notifications, coalesces them per row, and writes them into the
//! [`HeightMeasurementCache`] on [`flush`](ResizeWatcher::flush).
//!
//! # Liveness
//! Every `observe` hands out an [`ObserverToken`] carrying a fresh epoch.
//! Unmounting a row (or remapping its identity) retires the epoch, so a late
//! notification for an old mount is dropped instead of landing on a slot that
//! now belongs to a different logical row.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, trace};

use super::height_cache::{HeightMeasurementCache, HeightUpdate};
use super::types::{LineOffset, RowHeight, RowIndex};

/// Handle for one mount of one row. Only the current token of a row may write its height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverToken {
    row: RowIndex,
    epoch: u64,
}

impl ObserverToken {
    /// Row this token observes.
    pub fn row(&self) -> RowIndex {
        self.row
    }
}

#[derive(Debug, Clone, Copy)]
struct Observation {
    epoch: u64,
    /// Last reported box height; starts at zero so the first paint always notifies.
    last_box: usize,
}

/// A height correction applied to the cache during [`ResizeWatcher::flush`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedResize {
    /// Row whose height changed.
    pub row: RowIndex,
    /// Top offset of the row when the change was applied.
    pub top: LineOffset,
    /// Old and new heights.
    pub update: HeightUpdate,
}

/// Tracks which rows are observed and queues their size changes.
#[derive(Debug, Default)]
pub struct ResizeWatcher {
    observations: HashMap<RowIndex, Observation>,
    /// Latest unapplied box height per row, tagged with the epoch that reported it.
    pending: BTreeMap<RowIndex, (u64, usize)>,
    next_epoch: u64,
    dropped: u64,
}

impl ResizeWatcher {
    /// Create a watcher with no observations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start observing a row once its content node is available.
    ///
    /// `has_content` is false when the row never mounted a content node (the
    /// header spacer, for instance); that is a silent no-op returning `None`.
    /// Observing an already observed row returns its existing token.
    pub fn observe(&mut self, row: RowIndex, has_content: bool) -> Option<ObserverToken> {
        if !has_content {
            trace!(row = row.get(), "observer target missing, skipping");
            return None;
        }

        if let Some(existing) = self.observations.get(&row) {
            return Some(ObserverToken {
                row,
                epoch: existing.epoch,
            });
        }

        self.next_epoch += 1;
        let epoch = self.next_epoch;
        self.observations.insert(
            row,
            Observation {
                epoch,
                last_box: 0,
            },
        );
        Some(ObserverToken { row, epoch })
    }

    /// Current token for a row, if observed.
    pub fn token_for(&self, row: RowIndex) -> Option<ObserverToken> {
        self.observations
            .get(&row)
            .map(|o| ObserverToken { row, epoch: o.epoch })
    }

    /// Stop observing a row and discard its pending notification.
    pub fn unobserve(&mut self, row: RowIndex) -> bool {
        self.pending.remove(&row);
        self.observations.remove(&row).is_some()
    }

    /// Detach every observer whose row fails `keep`. Returns how many were detached.
    pub fn retain_rows(&mut self, mut keep: impl FnMut(RowIndex) -> bool) -> usize {
        let before = self.observations.len();
        self.observations.retain(|row, _| keep(*row));
        let observations = &self.observations;
        self.pending.retain(|row, _| observations.contains_key(row));
        before - self.observations.len()
    }

    /// Detach every observer.
    pub fn unobserve_all(&mut self) {
        self.observations.clear();
        self.pending.clear();
    }

    /// Forget the last reported box of every observer so the next report notifies again.
    ///
    /// Used after measurements are invalidated wholesale (viewport width change).
    pub fn rearm(&mut self) {
        self.observations.values_mut().for_each(|o| o.last_box = 0);
    }

    /// Whether the token still belongs to a mounted row.
    pub fn is_live(&self, token: ObserverToken) -> bool {
        self.observations
            .get(&token.row)
            .is_some_and(|o| o.epoch == token.epoch)
    }

    /// Number of observed rows.
    pub fn observed_count(&self) -> usize {
        self.observations.len()
    }

    /// Whether the row is currently observed.
    pub fn is_observed(&self, row: RowIndex) -> bool {
        self.observations.contains_key(&row)
    }

    /// Number of notifications dropped because their row was no longer live.
    pub fn dropped_count(&self) -> u64 {
        self.dropped
    }

    /// Report the current box height of an observed row.
    ///
    /// Queues a size-change notification when the height differs from the last
    /// report. Rapid reports for the same row coalesce to the latest value.
    /// Returns whether a notification is now pending for the row.
    pub fn notify(&mut self, token: ObserverToken, box_height: usize) -> bool {
        let Some(observation) = self.observations.get_mut(&token.row) else {
            self.dropped += 1;
            debug!(row = token.row.get(), "dropping size notification for unmounted row");
            return false;
        };
        if observation.epoch != token.epoch {
            self.dropped += 1;
            debug!(row = token.row.get(), "dropping size notification from stale mount");
            return false;
        }
        if observation.last_box == box_height {
            return self.pending.contains_key(&token.row);
        }

        observation.last_box = box_height;
        self.pending.insert(token.row, (token.epoch, box_height));
        true
    }

    /// Whether any notification awaits a flush.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Apply pending notifications to the cache, one write per row, in row order.
    ///
    /// Notifications whose mount was retired since they were queued are dropped.
    /// Zero-height boxes (content not painted yet) leave the record untouched.
    /// Only writes that actually changed a height are returned.
    pub fn flush(&mut self, cache: &mut HeightMeasurementCache) -> Vec<AppliedResize> {
        let pending = std::mem::take(&mut self.pending);
        let mut applied = Vec::new();

        for (row, (epoch, box_height)) in pending {
            if !self.is_live(ObserverToken { row, epoch }) {
                self.dropped += 1;
                continue;
            }
            let Some(height) = RowHeight::from_measured(box_height) else {
                continue;
            };
            let top = cache.offset_of(row);
            let update = cache.set(row, height);
            if update.is_changed() {
                trace!(row = row.get(), delta = update.delta(), "row height corrected");
                applied.push(AppliedResize { row, top, update });
            }
        }

        applied
    }
}
