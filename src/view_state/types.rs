//! Core view-state newtypes

/// Height of a row in terminal lines. Always >= 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowHeight(u32);

/// Error returned when attempting to create a RowHeight of zero via the smart constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("RowHeight must be >= 1 (got {0})")]
pub struct InvalidRowHeight(pub u32);

impl RowHeight {
    /// Minimum valid row height.
    pub const ONE: Self = Self(1);

    /// Const constructor that clamps zero up to one.
    pub const fn clamped(height: u32) -> Self {
        if height == 0 {
            Self::ONE
        } else {
            Self(height)
        }
    }

    /// Smart constructor that validates row height is >= 1.
    pub fn new(height: u32) -> Result<Self, InvalidRowHeight> {
        if height == 0 {
            Err(InvalidRowHeight(height))
        } else {
            Ok(Self(height))
        }
    }

    /// Build a height from a measured line count.
    ///
    /// Returns `None` for zero (content not painted yet) and saturates at `u32::MAX`.
    pub fn from_measured(lines: usize) -> Option<Self> {
        let lines = u32::try_from(lines).unwrap_or(u32::MAX);
        Self::new(lines).ok()
    }

    /// Get the raw value.
    pub fn get(&self) -> u32 {
        self.0
    }

    /// Height as a `usize` line count.
    pub fn lines(&self) -> usize {
        self.0 as usize
    }
}

impl Default for RowHeight {
    fn default() -> Self {
        Self::ONE
    }
}

/// Absolute line offset from the top of the list content. 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct LineOffset(usize);

impl LineOffset {
    /// Create a new LineOffset from a raw value.
    pub fn new(offset: usize) -> Self {
        Self(offset)
    }

    /// Get the raw usize value.
    pub fn get(&self) -> usize {
        self.0
    }

    /// Add an amount to this offset, saturating at usize::MAX.
    pub fn saturating_add(&self, amount: usize) -> Self {
        Self(self.0.saturating_add(amount))
    }

    /// Subtract an amount from this offset, saturating at 0.
    pub fn saturating_sub(&self, amount: usize) -> Self {
        Self(self.0.saturating_sub(amount))
    }

    /// Shift by a signed delta, saturating at both ends.
    pub fn shifted(&self, delta: isize) -> Self {
        if delta >= 0 {
            self.saturating_add(delta.unsigned_abs())
        } else {
            self.saturating_sub(delta.unsigned_abs())
        }
    }
}

/// Row index within a virtual list. Dense and 0-based.
///
/// Row 0 is the header spacer; row `i > 0` renders message `i - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RowIndex(usize);

impl RowIndex {
    /// The header spacer row.
    pub const SPACER: Self = Self(0);

    /// Create a new RowIndex from a raw 0-based value.
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Row that renders the message at `message_index`.
    pub fn for_message(message_index: usize) -> Self {
        Self(message_index + 1)
    }

    /// Get the raw 0-based index value.
    pub fn get(&self) -> usize {
        self.0
    }

    /// Message index rendered by this row, or `None` for the spacer.
    pub fn message_index(&self) -> Option<usize> {
        self.0.checked_sub(1)
    }

    /// Get the next row index.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl From<usize> for RowIndex {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

/// Viewport dimensions in terminal cells. Owned by the surrounding layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    /// Width in terminal columns.
    pub width: u16,
    /// Height in terminal rows.
    pub height: u16,
}

impl Viewport {
    /// Create new viewport dimensions.
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Whether either dimension is zero. Degenerate viewports materialize nothing.
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}
