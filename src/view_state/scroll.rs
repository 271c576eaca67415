//! Semantic scroll position

use super::types::{LineOffset, RowHeight, RowIndex};

/// Where a row lands in the viewport when scrolled to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowAlign {
    /// Row top at the viewport top.
    Start,
    /// Row bottom at the viewport bottom.
    #[default]
    End,
}

/// Semantic scroll request within a virtual list.
///
/// A sum type that captures scroll intent independent of the current layout:
/// - `Top`: Always shows from line 0
/// - `Bottom`: Always shows last lines in viewport
/// - `AtLine`: Specific absolute line offset
/// - `AtRow`: Bring a specific row into view with an alignment
/// - `Fraction`: Proportional position (for scrollbar)
///
/// # Clamping Behavior
/// Every variant resolves into `[0, max(0, total_height - viewport_height)]`,
/// so no request can produce a blank viewport.
#[derive(Debug, Clone, PartialEq)]
pub enum ScrollPosition {
    /// View from the very top (line 0).
    Top,

    /// View from the very bottom.
    /// Resolves to: total_height - viewport_height (clamped to 0).
    Bottom,

    /// Specific line offset from top.
    AtLine(LineOffset),

    /// Bring a row into view.
    /// Resolves through the row's current top offset and height; an unknown
    /// row resolves to the top.
    AtRow {
        /// Row to show.
        row: RowIndex,
        /// Where the row lands.
        align: RowAlign,
    },

    /// Fractional position (0.0 = top, 1.0 = bottom).
    /// Clamped to [0.0, 1.0] on resolution.
    Fraction(f64),
}

impl Default for ScrollPosition {
    fn default() -> Self {
        Self::Bottom
    }
}

impl ScrollPosition {
    /// Resolve to absolute line offset.
    ///
    /// # Arguments
    /// - `total_height`: Total height of content in lines
    /// - `viewport_height`: Height of viewport in lines
    /// - `row_lookup`: Top offset and height of a row by index
    pub fn resolve<F>(&self, total_height: usize, viewport_height: usize, row_lookup: F) -> LineOffset
    where
        F: Fn(RowIndex) -> Option<(LineOffset, RowHeight)>,
    {
        let max_offset = total_height.saturating_sub(viewport_height);

        let raw = match self {
            Self::Top => 0,
            Self::Bottom => max_offset,
            Self::AtLine(offset) => offset.get(),
            Self::AtRow { row, align } => match row_lookup(*row) {
                Some((top, height)) => match align {
                    RowAlign::Start => top.get(),
                    RowAlign::End => (top.get() + height.lines()).saturating_sub(viewport_height),
                },
                None => 0,
            },
            Self::Fraction(fraction) => {
                let clamped = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
                (clamped * max_offset as f64).round() as usize
            }
        };

        LineOffset::new(raw.min(max_offset))
    }

    /// Create an end-aligned AtRow position.
    pub fn at_row(row: RowIndex) -> Self {
        Self::AtRow {
            row,
            align: RowAlign::End,
        }
    }

    /// Create AtLine position.
    pub fn at_line(offset: usize) -> Self {
        Self::AtLine(LineOffset::new(offset))
    }
}
