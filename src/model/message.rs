//! Chat message content.

use chrono::{DateTime, Utc};

use super::identifiers::MessageId;

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Author {
    /// The local user.
    User,
    /// The other side of the conversation.
    Peer,
    /// System notices, including the guide message.
    System,
}

impl Author {
    /// Short label shown in the row header.
    pub fn label(&self) -> &'static str {
        match self {
            Author::User => "you",
            Author::Peer => "peer",
            Author::System => "system",
        }
    }
}

/// An image attachment whose final size is only known once it loads.
///
/// Before loading it renders as a single placeholder line; afterwards it
/// occupies `lines` lines. This is what makes a mounted row grow without its
/// message changing identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageAttachment {
    /// Rendered height once loaded.
    pub lines: u16,
    /// Store ticks left before the image finishes loading.
    pub ticks_until_loaded: u8,
}

impl ImageAttachment {
    /// Whether the image has finished loading.
    pub fn is_loaded(&self) -> bool {
        self.ticks_until_loaded == 0
    }
}

/// One message of a conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Stable identity.
    pub id: MessageId,
    /// Author.
    pub author: Author,
    /// Markdown body.
    pub body: String,
    /// Optional image, loaded asynchronously.
    pub image: Option<ImageAttachment>,
    /// When the message was sent.
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    /// A plain text message.
    pub fn text(id: MessageId, author: Author, body: impl Into<String>) -> Self {
        Self {
            id,
            author,
            body: body.into(),
            image: None,
            sent_at: Utc::now(),
        }
    }

    /// The guide shown when a conversation has no messages yet.
    pub fn guide() -> Self {
        Self::text(
            MessageId::GUIDE,
            Author::System,
            "**No messages yet.** Press `a` to send one, `i` to send an image.",
        )
    }

    /// Attach an image.
    pub fn with_image(mut self, image: ImageAttachment) -> Self {
        self.image = Some(image);
        self
    }

    /// Whether the message is still waiting on async content.
    pub fn is_loading(&self) -> bool {
        self.image.is_some_and(|img| !img.is_loaded())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guide_uses_reserved_id() {
        let guide = ChatMessage::guide();
        assert!(guide.id.is_guide());
        assert_eq!(guide.author, Author::System);
    }

    #[test]
    fn image_loading_state() {
        let id = MessageId::new(1).unwrap();
        let msg = ChatMessage::text(id, Author::Peer, "pic").with_image(ImageAttachment {
            lines: 6,
            ticks_until_loaded: 2,
        });
        assert!(msg.is_loading());

        let loaded = ChatMessage::text(id, Author::Peer, "pic").with_image(ImageAttachment {
            lines: 6,
            ticks_until_loaded: 0,
        });
        assert!(!loaded.is_loading());
    }
}
