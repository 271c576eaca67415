//! chatscroll
//!
//! Dynamic-height virtualized chat message list for the terminal.
//!
//! Follows a Pure Core / Impure Shell split: `view_state` decides row
//! heights, the materialized window and the scroll anchor without touching
//! the terminal; `view` renders that decision with ratatui and feeds
//! measured heights back.

pub mod config;
pub mod logging;
pub mod model;
pub mod view;
pub mod view_state;
