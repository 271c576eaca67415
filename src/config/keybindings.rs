//! Keyboard bindings configuration.

use crate::model::KeyAction;
use crossterm::event::KeyEvent;
use std::collections::HashMap;

/// Maps keyboard events to domain actions.
///
/// Provides default arrow and vim-style bindings.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: HashMap<KeyEvent, KeyAction>,
}

impl KeyBindings {
    /// Look up the action for a key event.
    pub fn get(&self, key: KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&key).copied()
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        use crossterm::event::{KeyCode, KeyModifiers};

        let none = KeyModifiers::NONE;
        let entries = [
            // Line scrolling
            (KeyCode::Up, none, KeyAction::ScrollUp),
            (KeyCode::Char('k'), none, KeyAction::ScrollUp),
            (KeyCode::Down, none, KeyAction::ScrollDown),
            (KeyCode::Char('j'), none, KeyAction::ScrollDown),
            // Page navigation
            (KeyCode::PageUp, none, KeyAction::PageUp),
            (KeyCode::Char('u'), KeyModifiers::CONTROL, KeyAction::PageUp),
            (KeyCode::PageDown, none, KeyAction::PageDown),
            (KeyCode::Char('d'), KeyModifiers::CONTROL, KeyAction::PageDown),
            // Ends
            (KeyCode::Home, none, KeyAction::ScrollToTop),
            (KeyCode::Char('g'), none, KeyAction::ScrollToTop),
            (KeyCode::End, none, KeyAction::JumpToLatest),
            (KeyCode::Char('G'), KeyModifiers::SHIFT, KeyAction::JumpToLatest),
            // Conversation edits
            (KeyCode::Char('a'), none, KeyAction::AppendMessage),
            (KeyCode::Char('i'), none, KeyAction::AppendImage),
            (KeyCode::Char('x'), none, KeyAction::DeleteLast),
            (KeyCode::Char('m'), none, KeyAction::DeleteMiddle),
            (KeyCode::Char('n'), none, KeyAction::NewConversation),
            // Display
            (KeyCode::Char('v'), none, KeyAction::ToggleVirtualization),
            // Quit
            (KeyCode::Char('q'), none, KeyAction::Quit),
        ];

        let bindings = entries
            .into_iter()
            .map(|(code, modifiers, action)| (KeyEvent::new(code, modifiers), action))
            .collect();

        Self { bindings }
    }
}
