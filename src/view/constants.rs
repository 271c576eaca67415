//! Layout and timing constants for the demo shell.

use std::time::Duration;

/// Height of the status bar in lines.
pub const STATUS_BAR_HEIGHT: u16 = 1;

/// Event poll timeout; each timeout advances async content by one tick.
pub const TICK_INTERVAL: Duration = Duration::from_millis(250);

/// Lines scrolled per mouse wheel notch.
pub const MOUSE_SCROLL_LINES: isize = 3;

/// Height of a loaded demo image in lines.
pub const IMAGE_LINES: u16 = 8;

/// Ticks before a demo image finishes loading.
pub const IMAGE_DELAY_TICKS: u8 = 4;

/// Width of the drawn image block in columns.
pub const IMAGE_WIDTH: usize = 18;
