//! View-state layer - the pure core of the virtualized chat list
//!
//! Decides which rows exist, how tall they are, which of them to materialize
//! and where the viewport sits. No terminal I/O happens here; the `view`
//! module renders what this layer decides and feeds measurements back.
//!
//! # Module Structure
//!
//! - `types`: Core newtypes (RowIndex, RowHeight, LineOffset, Viewport)
//! - `height_index`: HeightIndex - O(log n) prefix sums via Fenwick tree
//! - `height_cache`: HeightMeasurementCache - per-row measured/estimated heights
//! - `resize_watcher`: ResizeWatcher - observer tokens and coalesced size changes
//! - `window`: RowWindowCalculator - visible range plus overscan
//! - `anchor`: ScrollAnchorController - follow-latest and offset preservation
//! - `scroll`: ScrollPosition - semantic scroll requests
//! - `virtual_list`: VirtualList - per-instance state sequencing all of the above

pub mod anchor;
pub mod height_cache;
pub mod height_index;
pub mod resize_watcher;
pub mod scroll;
pub mod types;
pub mod virtual_list;
pub mod window;

pub use anchor::{max_scroll, AnchorMode, ScrollAnchorController};
pub use height_cache::{HeightMeasurementCache, HeightRecord, HeightUpdate};
pub use resize_watcher::{AppliedResize, ObserverToken, ResizeWatcher};
pub use scroll::{RowAlign, ScrollPosition};
pub use types::{InvalidRowHeight, LineOffset, RowHeight, RowIndex, Viewport};
pub use virtual_list::{ListConfig, LayoutReport, MountedRow, SyncOutcome, VirtualList};
pub use window::{MaterializedRow, RowWindowCalculator, WindowState};
