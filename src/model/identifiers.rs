//! Identifier newtypes for messages and conversations.

use std::fmt;

/// Stable identity of a chat message.
///
/// Identity survives edits and re-renders; two rows showing the same
/// `MessageId` show the same logical message. Real messages start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageId(u64);

impl MessageId {
    /// The synthetic guide message shown in an empty conversation.
    pub const GUIDE: Self = Self(0);

    /// Create an id for a real message. Zero is reserved for the guide.
    pub fn new(raw: u64) -> Result<Self, InvalidMessageId> {
        if raw == 0 {
            Err(InvalidMessageId::Reserved)
        } else {
            Ok(Self(raw))
        }
    }

    /// Raw value.
    pub fn get(&self) -> u64 {
        self.0
    }

    /// Whether this is the synthetic guide message.
    pub fn is_guide(&self) -> bool {
        *self == Self::GUIDE
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_guide() {
            write!(f, "guide")
        } else {
            write!(f, "msg-{}", self.0)
        }
    }
}

/// Identity of one conversation. A list instance is bound to exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ConversationId(u64);

impl ConversationId {
    /// Create a conversation id.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw value.
    pub fn get(&self) -> u64 {
        self.0
    }

    /// The id that follows this one.
    pub fn next(&self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conversation-{}", self.0)
    }
}

// ===== Error Types =====

/// Rejected message id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidMessageId {
    /// Zero belongs to the guide message.
    #[error("message id 0 is reserved for the guide message")]
    Reserved,
}
