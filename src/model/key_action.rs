//! Domain-level keyboard actions independent of key bindings.

/// Domain-level actions that can be mapped to key bindings.
///
/// These represent user intent, not specific keys. The mapping from
/// `crossterm::event::KeyEvent` to `KeyAction` is handled by `KeyBindings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    // Scrolling
    /// Scroll up by one line. Default: k/↑
    ScrollUp,
    /// Scroll down by one line. Default: j/↓
    ScrollDown,
    /// Scroll up by one page. Default: Ctrl+u/Page Up
    PageUp,
    /// Scroll down by one page. Default: Ctrl+d/Page Down
    PageDown,
    /// Jump to the oldest message. Default: g/Home
    ScrollToTop,
    /// Follow the newest message again. Default: G/End
    JumpToLatest,

    // Conversation edits
    /// Send a text message. Default: a
    AppendMessage,
    /// Send a message with an image that loads later. Default: i
    AppendImage,
    /// Delete the newest message. Default: x
    DeleteLast,
    /// Delete the message in the middle. Default: m
    DeleteMiddle,
    /// Switch to a fresh conversation. Default: n
    NewConversation,

    // Display
    /// Toggle between virtualized and full rendering. Default: v
    ToggleVirtualization,

    // Application
    /// Quit. Default: q (Ctrl+C always quits)
    Quit,
}
