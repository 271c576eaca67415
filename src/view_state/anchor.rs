//! Scroll anchoring across data and measurement changes.
//!
//! Two modes:
//! - [`AnchorMode::AtEnd`] pins the bottom of the content to the bottom of
//!   the viewport. New messages and height corrections keep it pinned.
//! - [`AnchorMode::UserScrolled`] keeps whatever the user is looking at still:
//!   height changes above the viewport shift the scroll offset by the same
//!   delta, changes inside or below it do not.
//!
//! Transitions:
//! - AtEnd → UserScrolled on any user scroll that leaves the maximum offset.
//! - UserScrolled → AtEnd on [`jump_to_latest`](ScrollAnchorController::jump_to_latest),
//!   or when a downward user scroll lands within `at_end_threshold` lines of
//!   the end (it snaps to the end).

use tracing::debug;

use super::height_cache::HeightUpdate;
use super::scroll::ScrollPosition;
use super::types::{LineOffset, RowHeight, RowIndex};

/// Lines from the end within which a downward scroll re-engages AtEnd.
pub const DEFAULT_AT_END_THRESHOLD: usize = 2;

/// Which visual anchor is being preserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnchorMode {
    /// Following the latest message.
    #[default]
    AtEnd,
    /// The user scrolled away from the end.
    UserScrolled,
}

/// Maximum scroll offset for a content/viewport pair.
pub fn max_scroll(total_height: usize, viewport_height: usize) -> LineOffset {
    LineOffset::new(total_height.saturating_sub(viewport_height))
}

/// Owns the scroll offset and the anchor state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollAnchorController {
    mode: AnchorMode,
    scroll_top: LineOffset,
    at_end_threshold: usize,
}

impl Default for ScrollAnchorController {
    fn default() -> Self {
        Self::new(DEFAULT_AT_END_THRESHOLD)
    }
}

impl ScrollAnchorController {
    /// Create a controller anchored at the end.
    pub fn new(at_end_threshold: usize) -> Self {
        Self {
            mode: AnchorMode::AtEnd,
            scroll_top: LineOffset::default(),
            at_end_threshold,
        }
    }

    /// Current anchor mode.
    pub fn mode(&self) -> AnchorMode {
        self.mode
    }

    /// Whether the latest message is being followed.
    pub fn is_at_end(&self) -> bool {
        self.mode == AnchorMode::AtEnd
    }

    /// Current scroll offset.
    pub fn scroll_top(&self) -> LineOffset {
        self.scroll_top
    }

    fn set_mode(&mut self, mode: AnchorMode) {
        if self.mode != mode {
            debug!(from = ?self.mode, to = ?mode, "anchor mode changed");
            self.mode = mode;
        }
    }

    /// Apply a user-initiated scroll to an absolute offset.
    pub fn user_scroll_to(
        &mut self,
        requested: LineOffset,
        total_height: usize,
        viewport_height: usize,
    ) -> LineOffset {
        let max = max_scroll(total_height, viewport_height);
        let target = requested.min(max);
        let moving_down = target >= self.scroll_top;
        let near_end = max.get() - target.get() <= self.at_end_threshold;

        if target == max || (moving_down && near_end && self.mode == AnchorMode::UserScrolled) {
            self.set_mode(AnchorMode::AtEnd);
            self.scroll_top = max;
        } else {
            self.set_mode(AnchorMode::UserScrolled);
            self.scroll_top = target;
        }
        self.scroll_top
    }

    /// Apply a user-initiated relative scroll.
    pub fn user_scroll_by(
        &mut self,
        delta: isize,
        total_height: usize,
        viewport_height: usize,
    ) -> LineOffset {
        let requested = self.scroll_top.shifted(delta);
        self.user_scroll_to(requested, total_height, viewport_height)
    }

    /// Apply a semantic scroll request. `Bottom` is the same as jumping to latest.
    pub fn scroll_to<F>(
        &mut self,
        position: &ScrollPosition,
        total_height: usize,
        viewport_height: usize,
        row_lookup: F,
    ) -> LineOffset
    where
        F: Fn(RowIndex) -> Option<(LineOffset, RowHeight)>,
    {
        if *position == ScrollPosition::Bottom {
            return self.jump_to_latest(total_height, viewport_height);
        }
        let resolved = position.resolve(total_height, viewport_height, row_lookup);
        self.user_scroll_to(resolved, total_height, viewport_height)
    }

    /// Explicit "jump to latest": re-engage AtEnd and pin to the bottom.
    pub fn jump_to_latest(&mut self, total_height: usize, viewport_height: usize) -> LineOffset {
        self.set_mode(AnchorMode::AtEnd);
        self.scroll_top = max_scroll(total_height, viewport_height);
        self.scroll_top
    }

    /// Re-sync after the content height or viewport changed.
    ///
    /// AtEnd pins to the bottom; UserScrolled only clamps into range.
    pub fn reconcile(&mut self, total_height: usize, viewport_height: usize) -> LineOffset {
        let max = max_scroll(total_height, viewport_height);
        self.scroll_top = match self.mode {
            AnchorMode::AtEnd => max,
            AnchorMode::UserScrolled => self.scroll_top.min(max),
        };
        self.scroll_top
    }

    /// React to one row's height correction.
    ///
    /// `top` is the row's offset when the correction was applied and
    /// `total_height` the content height after it.
    pub fn on_height_corrected(
        &mut self,
        top: LineOffset,
        update: HeightUpdate,
        total_height: usize,
        viewport_height: usize,
    ) -> LineOffset {
        if let (AnchorMode::UserScrolled, HeightUpdate::Changed { old, .. }) = (self.mode, update) {
            let old_bottom = top.saturating_add(old.lines());
            if old_bottom <= self.scroll_top {
                self.scroll_top = self.scroll_top.shifted(update.delta());
            }
        }
        self.reconcile(total_height, viewport_height)
    }

    /// React to content inserted or removed entirely above the viewport.
    ///
    /// In UserScrolled mode the offset moves by `delta` so visible rows stay put.
    pub fn on_content_shifted_above(
        &mut self,
        delta: isize,
        total_height: usize,
        viewport_height: usize,
    ) -> LineOffset {
        if self.mode == AnchorMode::UserScrolled {
            self.scroll_top = self.scroll_top.shifted(delta);
        }
        self.reconcile(total_height, viewport_height)
    }

    /// Return to the initial state (new conversation).
    pub fn reset(&mut self) {
        self.set_mode(AnchorMode::AtEnd);
        self.scroll_top = LineOffset::default();
    }
}
