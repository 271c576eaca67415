//! Status bar shown below the list.

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::view_state::AnchorMode;

/// Figures shown in the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusInfo {
    /// Current anchor mode.
    pub mode: AnchorMode,
    /// Whether rows are virtualized.
    pub virtualized: bool,
    /// Rows currently mounted.
    pub mounted: usize,
    /// Total rows, spacer included.
    pub total_rows: usize,
    /// First visible content line.
    pub scroll_top: usize,
    /// Total content height in lines.
    pub total_height: usize,
}

/// Render the status bar line.
pub fn status_line(info: StatusInfo) -> Line<'static> {
    let (badge, badge_style) = match info.mode {
        AnchorMode::AtEnd => (" LATEST ", Style::default().add_modifier(Modifier::REVERSED)),
        AnchorMode::UserScrolled => (
            " SCROLLED ",
            Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD),
        ),
    };
    let list = if info.virtualized {
        format!(" rows {}/{}", info.mounted, info.total_rows)
    } else {
        format!(" rows {0}/{0} (simple)", info.total_rows)
    };

    Line::from(vec![
        Span::styled(badge, badge_style),
        Span::raw(list),
        Span::raw(format!("  line {}/{}", info.scroll_top, info.total_height)),
        Span::styled(
            "  End:latest a:send i:image x/m:delete n:new v:mode q:quit",
            Style::default().add_modifier(Modifier::DIM),
        ),
    ])
}
