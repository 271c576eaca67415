//! List widgets: the virtualized list and the render-everything baseline.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;

use super::renderer::{measure_message, row_paragraph, RowRenderer};
use crate::model::{ChatMessage, MessageSnapshot};
use crate::view_state::{LayoutReport, RowIndex, VirtualList};

fn clamp_u16(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

/// Draw the part of a message laid out at `[top, top + height)` that falls
/// inside the view starting at `scroll_top`.
///
/// Only the offset within the message reaches the paragraph, so content
/// taller than `u16::MAX` lines stays addressable.
fn render_row_slice<R>(
    renderer: &R,
    message: &ChatMessage,
    top: usize,
    height: usize,
    scroll_top: usize,
    area: Rect,
    buf: &mut Buffer,
) where
    R: RowRenderer + ?Sized,
{
    let bottom = top + height;
    let view_bottom = scroll_top + usize::from(area.height);
    if bottom <= scroll_top || top >= view_bottom {
        return;
    }

    let skip = scroll_top.saturating_sub(top);
    let y = top.saturating_sub(scroll_top);
    let visible = (height - skip).min(usize::from(area.height) - y);
    let row_area = Rect::new(
        area.x,
        area.y + clamp_u16(y),
        area.width,
        clamp_u16(visible),
    );

    row_paragraph(renderer.render_lines(message))
        .scroll((clamp_u16(skip), 0))
        .render(row_area, buf);
}

/// Measure the mounted rows of `list` at `width` until heights settle.
///
/// Rows whose message is missing from `snapshot` are left unmeasured.
pub fn measure_rows<R>(
    list: &mut VirtualList,
    snapshot: &MessageSnapshot,
    renderer: &R,
    width: u16,
) -> LayoutReport
where
    R: RowRenderer + ?Sized,
{
    list.layout(|row: RowIndex| {
        let message = snapshot.message(row.message_index()?)?;
        Some(measure_message(renderer, message, width))
    })
}

/// Draws only the mounted rows of a [`VirtualList`].
///
/// Each row is placed at its layout offset relative to the scroll position
/// and clipped to its layout height. The header spacer draws nothing.
pub struct VirtualListView<'a, R: ?Sized> {
    list: &'a VirtualList,
    snapshot: &'a MessageSnapshot,
    renderer: &'a R,
}

impl<'a, R: RowRenderer + ?Sized> VirtualListView<'a, R> {
    /// Widget for the given list state.
    pub fn new(list: &'a VirtualList, snapshot: &'a MessageSnapshot, renderer: &'a R) -> Self {
        Self {
            list,
            snapshot,
            renderer,
        }
    }
}

impl<R: RowRenderer + ?Sized> Widget for VirtualListView<'_, R> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let scroll_top = self.list.scroll_top().get();

        for row in self.list.mounted_rows() {
            let Some(message) = row
                .index
                .message_index()
                .and_then(|i| self.snapshot.message(i))
            else {
                continue;
            };

            render_row_slice(
                self.renderer,
                message,
                row.top.get(),
                row.height.lines(),
                scroll_top,
                area,
                buf,
            );
        }
    }
}

/// Total content height of the non-virtualized list at `width`.
pub fn simple_total_height<R>(
    snapshot: &MessageSnapshot,
    renderer: &R,
    header_height: usize,
    width: u16,
) -> usize
where
    R: RowRenderer + ?Sized,
{
    header_height
        + snapshot
            .messages()
            .map(|message| measure_message(renderer, message, width))
            .sum::<usize>()
}

/// Baseline list that lays out every message on every frame.
///
/// Keeps no cached state; used to compare against the virtualized path.
pub struct SimpleListView<'a, R: ?Sized> {
    snapshot: &'a MessageSnapshot,
    renderer: &'a R,
    header_height: usize,
    scroll_top: usize,
}

impl<'a, R: RowRenderer + ?Sized> SimpleListView<'a, R> {
    /// Widget rendering `snapshot` scrolled to `scroll_top`.
    pub fn new(
        snapshot: &'a MessageSnapshot,
        renderer: &'a R,
        header_height: usize,
        scroll_top: usize,
    ) -> Self {
        Self {
            snapshot,
            renderer,
            header_height,
            scroll_top,
        }
    }
}

impl<R: RowRenderer + ?Sized> Widget for SimpleListView<'_, R> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let view_bottom = self.scroll_top + usize::from(area.height);
        let mut top = self.header_height;
        for message in self.snapshot.messages() {
            if top >= view_bottom {
                break;
            }
            let height = measure_message(self.renderer, message, area.width);
            render_row_slice(
                self.renderer,
                message,
                top,
                height,
                self.scroll_top,
                area,
                buf,
            );
            top += height;
        }
    }
}
