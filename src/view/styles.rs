//! Message styling configuration.
//!
//! Provides distinct colors per author plus styles for image placeholders.

use crate::model::Author;
use ratatui::style::{Color, Modifier, Style};

// ===== ColorConfig =====

/// Configuration for color output.
///
/// Colors are disabled when the `NO_COLOR` environment variable is set to
/// any value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConfig {
    enabled: bool,
}

impl ColorConfig {
    /// Read color support from the environment.
    pub fn from_env() -> Self {
        Self {
            enabled: std::env::var_os("NO_COLOR").is_none(),
        }
    }

    /// Explicitly enabled or disabled colors.
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Check if colors are enabled.
    pub fn colors_enabled(self) -> bool {
        self.enabled
    }
}

// ===== MessageStyles =====

/// Styling for message rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageStyles {
    user_style: Style,
    peer_style: Style,
    system_style: Style,
    image_style: Style,
    placeholder_style: Style,
    meta_style: Style,
}

impl MessageStyles {
    /// Default colors, honoring `NO_COLOR`.
    pub fn new() -> Self {
        Self::with_color_config(ColorConfig::from_env())
    }

    /// Build styles for the given color configuration.
    ///
    /// Without colors only modifiers (bold, italic, dim) remain.
    pub fn with_color_config(config: ColorConfig) -> Self {
        if config.colors_enabled() {
            Self {
                user_style: Style::default().fg(Color::Cyan),
                peer_style: Style::default().fg(Color::Green),
                system_style: Style::default().fg(Color::Yellow),
                image_style: Style::default().fg(Color::Magenta),
                placeholder_style: Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
                meta_style: Style::default().fg(Color::DarkGray),
            }
        } else {
            Self {
                user_style: Style::default(),
                peer_style: Style::default(),
                system_style: Style::default(),
                image_style: Style::default(),
                placeholder_style: Style::default().add_modifier(Modifier::ITALIC),
                meta_style: Style::default().add_modifier(Modifier::DIM),
            }
        }
    }

    /// Style for a message author.
    pub fn style_for_author(&self, author: Author) -> Style {
        match author {
            Author::User => self.user_style,
            Author::Peer => self.peer_style,
            Author::System => self.system_style,
        }
    }

    /// Style for a loaded image block.
    pub fn image(&self) -> Style {
        self.image_style
    }

    /// Style for an image still loading.
    pub fn placeholder(&self) -> Style {
        self.placeholder_style
    }

    /// Style for timestamps and other metadata.
    pub fn meta(&self) -> Style {
        self.meta_style
    }
}

impl Default for MessageStyles {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial(no_color)]
    fn color_config_respects_no_color_env_var() {
        std::env::set_var("NO_COLOR", "");
        let config = ColorConfig::from_env();
        std::env::remove_var("NO_COLOR");
        assert!(!config.colors_enabled(), "NO_COLOR with any value disables colors");
    }

    #[test]
    #[serial(no_color)]
    fn color_config_enables_colors_by_default() {
        std::env::remove_var("NO_COLOR");
        assert!(ColorConfig::from_env().colors_enabled());
    }

    #[test]
    fn authors_get_distinct_colors() {
        let styles = MessageStyles::with_color_config(ColorConfig::new(true));
        let user = styles.style_for_author(Author::User);
        let peer = styles.style_for_author(Author::Peer);
        assert!(user.fg.is_some());
        assert_ne!(user, peer);
    }

    #[test]
    fn disabled_colors_leave_no_foreground() {
        let styles = MessageStyles::with_color_config(ColorConfig::new(false));
        assert_eq!(styles.style_for_author(Author::Peer).fg, None);
        assert_eq!(styles.image().fg, None);
    }
}
