//! Message row rendering and measurement.
//!
//! Rows are rendered to owned ratatui lines and wrapped at the viewport width
//! by a [`Paragraph`]. Measuring a row uses the same paragraph, so a measured
//! height is exactly the number of lines the row occupies on screen.

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use tui_markdown::from_str;

use super::constants::IMAGE_WIDTH;
use super::styles::MessageStyles;
use crate::model::{ChatMessage, ImageAttachment};

/// Turns a message into display lines.
///
/// Implementations must be deterministic for a given message: the list
/// measures and draws a row through separate calls.
pub trait RowRenderer {
    /// Unwrapped lines for one message.
    fn render_lines(&self, message: &ChatMessage) -> Vec<Line<'static>>;
}

/// Paragraph used both to draw and to measure a row.
pub fn row_paragraph(lines: Vec<Line<'static>>) -> Paragraph<'static> {
    Paragraph::new(lines).wrap(Wrap { trim: false })
}

/// Laid-out height of a message at `width` columns.
///
/// Zero width yields zero, which the height cache ignores.
pub fn measure_message<R>(renderer: &R, message: &ChatMessage, width: u16) -> usize
where
    R: RowRenderer + ?Sized,
{
    if width == 0 {
        return 0;
    }
    row_paragraph(renderer.render_lines(message)).line_count(width)
}

/// Renders a header line, the markdown body, an optional image block and a
/// blank separator.
#[derive(Debug, Clone)]
pub struct MarkdownRowRenderer {
    styles: MessageStyles,
    show_timestamps: bool,
}

impl MarkdownRowRenderer {
    /// Renderer with the given styles and timestamps shown.
    pub fn new(styles: MessageStyles) -> Self {
        Self {
            styles,
            show_timestamps: true,
        }
    }

    /// Show or hide the send time in row headers.
    pub fn with_timestamps(mut self, show: bool) -> Self {
        self.show_timestamps = show;
        self
    }

    fn header_line(&self, message: &ChatMessage) -> Line<'static> {
        let style = self
            .styles
            .style_for_author(message.author)
            .add_modifier(Modifier::BOLD);
        let mut spans = vec![Span::styled(message.author.label(), style)];
        if self.show_timestamps && !message.id.is_guide() {
            spans.push(Span::styled(
                format!("  {}", message.sent_at.format("%H:%M")),
                self.styles.meta(),
            ));
        }
        Line::from(spans)
    }

    fn image_lines(&self, image: ImageAttachment) -> Vec<Line<'static>> {
        if !image.is_loaded() {
            return vec![Line::from(Span::styled(
                "[loading image…]",
                self.styles.placeholder(),
            ))];
        }
        let rows = usize::from(image.lines);
        (0..rows)
            .map(|row| {
                let fill = if row == 0 || row + 1 == rows { "▄" } else { "█" };
                Line::from(Span::styled(fill.repeat(IMAGE_WIDTH), self.styles.image()))
            })
            .collect()
    }
}

impl Default for MarkdownRowRenderer {
    fn default() -> Self {
        Self::new(MessageStyles::default())
    }
}

impl RowRenderer for MarkdownRowRenderer {
    fn render_lines(&self, message: &ChatMessage) -> Vec<Line<'static>> {
        let mut lines = vec![self.header_line(message)];
        lines.extend(render_markdown_with_style(
            &message.body,
            self.styles.style_for_author(message.author),
        ));
        if let Some(image) = message.image {
            lines.extend(self.image_lines(image));
        }
        lines.push(Line::default());
        lines
    }
}

/// Render markdown to owned lines, patching each span onto `base_style`.
fn render_markdown_with_style(markdown_text: &str, base_style: Style) -> Vec<Line<'static>> {
    let text = from_str(markdown_text);

    text.lines
        .into_iter()
        .map(|line| {
            let owned_spans: Vec<_> = line
                .spans
                .into_iter()
                .map(|span| Span {
                    content: span.content.into_owned().into(),
                    style: base_style.patch(span.style),
                })
                .collect();
            Line::from(owned_spans)
        })
        .collect()
}
