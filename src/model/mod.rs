//! Domain model: messages, conversations and the observable store.

pub mod error;
pub mod identifiers;
pub mod key_action;
pub mod message;
pub mod store;

// Re-export for convenience
pub use error::AppError;
pub use identifiers::{ConversationId, InvalidMessageId, MessageId};
pub use key_action::KeyAction;
pub use message::{Author, ChatMessage, ImageAttachment};
pub use store::{MessageSnapshot, MessageStore, StoreEvent};
