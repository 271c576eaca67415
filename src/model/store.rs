//! Observable message store.
//!
//! The store is the single writer of conversation data. Readers take a cheap
//! [`MessageSnapshot`] (copy-on-write, `Arc`-shared) and subscribe to a
//! [`StoreEvent`] channel to learn when to take a new one. Nothing polls.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use tracing::debug;

use super::identifiers::{ConversationId, MessageId};
use super::message::{Author, ChatMessage, ImageAttachment};

/// Change notification sent to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    /// Messages were added or removed.
    MessagesChanged {
        /// Conversation that changed.
        conversation: ConversationId,
        /// Revision after the change.
        revision: u64,
    },
    /// A message kept its identity but its rendered content changed.
    ContentChanged {
        /// The message.
        id: MessageId,
        /// Revision after the change.
        revision: u64,
    },
    /// A different conversation is now active.
    ConversationSwitched {
        /// The new conversation.
        conversation: ConversationId,
        /// Revision after the switch.
        revision: u64,
    },
}

/// Immutable view of one conversation at one revision.
///
/// An empty conversation is presented as a single guide message so the list
/// always has something to show.
#[derive(Debug, Clone)]
pub struct MessageSnapshot {
    conversation: ConversationId,
    revision: u64,
    messages: Arc<Vec<ChatMessage>>,
    guide: Option<Arc<ChatMessage>>,
}

impl MessageSnapshot {
    /// Build a snapshot directly from messages.
    pub fn new(conversation: ConversationId, revision: u64, messages: Vec<ChatMessage>) -> Self {
        Self::from_shared(conversation, revision, Arc::new(messages))
    }

    fn from_shared(
        conversation: ConversationId,
        revision: u64,
        messages: Arc<Vec<ChatMessage>>,
    ) -> Self {
        let guide = messages.is_empty().then(|| Arc::new(ChatMessage::guide()));
        Self {
            conversation,
            revision,
            messages,
            guide,
        }
    }

    /// Conversation this snapshot belongs to.
    pub fn conversation(&self) -> ConversationId {
        self.conversation
    }

    /// Store revision this snapshot was taken at.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of displayed messages, the guide included.
    pub fn len(&self) -> usize {
        self.messages.len().max(1)
    }

    /// Always false: an empty conversation still shows its guide.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether only the guide message is shown.
    pub fn is_guide_only(&self) -> bool {
        self.guide.is_some()
    }

    /// Displayed message at `index`.
    pub fn message(&self, index: usize) -> Option<&ChatMessage> {
        match &self.guide {
            Some(guide) => (index == 0).then_some(guide.as_ref()),
            None => self.messages.get(index),
        }
    }

    /// Displayed messages in order.
    pub fn messages(&self) -> impl Iterator<Item = &ChatMessage> + '_ {
        self.guide.as_deref().into_iter().chain(self.messages.iter())
    }

    /// Ids of the displayed messages in order, the guide included.
    pub fn ids(&self) -> Vec<MessageId> {
        self.messages().map(|m| m.id).collect()
    }
}

/// Owns the active conversation and notifies subscribers of every change.
#[derive(Debug)]
pub struct MessageStore {
    conversation: ConversationId,
    messages: Arc<Vec<ChatMessage>>,
    next_id: u64,
    revision: u64,
    subscribers: Vec<Sender<StoreEvent>>,
}

impl MessageStore {
    /// Create an empty store for a conversation.
    pub fn new(conversation: ConversationId) -> Self {
        Self {
            conversation,
            messages: Arc::new(Vec::new()),
            next_id: 1,
            revision: 0,
            subscribers: Vec::new(),
        }
    }

    /// Create a store pre-filled with `count` generated messages.
    pub fn with_generated(conversation: ConversationId, count: usize) -> Self {
        let mut store = Self::new(conversation);
        let messages = store.generate(count);
        store.messages = Arc::new(messages);
        store
    }

    fn generate(&mut self, count: usize) -> Vec<ChatMessage> {
        (0..count)
            .map(|i| {
                let author = if i % 2 == 0 { Author::Peer } else { Author::User };
                let id = self.allocate_id();
                ChatMessage::text(id, author, demo_body(id.get() as usize))
            })
            .collect()
    }

    fn allocate_id(&mut self) -> MessageId {
        let raw = self.next_id;
        self.next_id += 1;
        MessageId::new(raw).unwrap_or(MessageId::GUIDE)
    }

    /// Register a new subscriber.
    pub fn subscribe(&mut self) -> Receiver<StoreEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    fn publish(&mut self, event: StoreEvent) {
        self.subscribers.retain(|tx| tx.send(event).is_ok());
    }

    fn bump(&mut self) -> u64 {
        self.revision += 1;
        self.revision
    }

    fn messages_changed(&mut self) {
        let revision = self.bump();
        let conversation = self.conversation;
        self.publish(StoreEvent::MessagesChanged {
            conversation,
            revision,
        });
    }

    /// Active conversation.
    pub fn conversation(&self) -> ConversationId {
        self.conversation
    }

    /// Current revision.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of real messages (the guide is not counted).
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the conversation has no real messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Snapshot of the current state. O(1).
    pub fn snapshot(&self) -> MessageSnapshot {
        MessageSnapshot::from_shared(self.conversation, self.revision, Arc::clone(&self.messages))
    }

    /// Append a text message.
    pub fn push(&mut self, author: Author, body: impl Into<String>) -> MessageId {
        let id = self.allocate_id();
        Arc::make_mut(&mut self.messages).push(ChatMessage::text(id, author, body));
        self.messages_changed();
        id
    }

    /// Append a message with an image that finishes loading after `delay_ticks` ticks.
    pub fn push_image(
        &mut self,
        author: Author,
        caption: impl Into<String>,
        lines: u16,
        delay_ticks: u8,
    ) -> MessageId {
        let id = self.allocate_id();
        let message = ChatMessage::text(id, author, caption).with_image(ImageAttachment {
            lines,
            ticks_until_loaded: delay_ticks,
        });
        Arc::make_mut(&mut self.messages).push(message);
        self.messages_changed();
        id
    }

    /// Remove the newest message.
    pub fn remove_last(&mut self) -> Option<ChatMessage> {
        let removed = Arc::make_mut(&mut self.messages).pop();
        if removed.is_some() {
            self.messages_changed();
        }
        removed
    }

    /// Remove a message by id.
    pub fn remove(&mut self, id: MessageId) -> Option<ChatMessage> {
        let position = self.messages.iter().position(|m| m.id == id)?;
        let removed = Arc::make_mut(&mut self.messages).remove(position);
        self.messages_changed();
        Some(removed)
    }

    /// Remove the message in the middle of the conversation.
    pub fn remove_middle(&mut self) -> Option<ChatMessage> {
        let id = self.messages.get(self.messages.len() / 2)?.id;
        self.remove(id)
    }

    /// Make `conversation` active with `count` generated messages.
    pub fn switch_conversation(&mut self, conversation: ConversationId, count: usize) {
        let messages = self.generate(count);
        self.conversation = conversation;
        self.messages = Arc::new(messages);
        let revision = self.bump();
        debug!(%conversation, count, "conversation switched");
        self.publish(StoreEvent::ConversationSwitched {
            conversation,
            revision,
        });
    }

    /// Advance async content by one tick.
    ///
    /// Returns the ids of messages whose content finished loading.
    pub fn tick(&mut self) -> Vec<MessageId> {
        if !self.messages.iter().any(ChatMessage::is_loading) {
            return Vec::new();
        }

        let mut loaded = Vec::new();
        for message in Arc::make_mut(&mut self.messages).iter_mut() {
            if let Some(image) = message.image.as_mut() {
                if image.ticks_until_loaded > 0 {
                    image.ticks_until_loaded -= 1;
                    if image.ticks_until_loaded == 0 {
                        loaded.push(message.id);
                    }
                }
            }
        }

        for id in &loaded {
            let revision = self.bump();
            self.publish(StoreEvent::ContentChanged { id: *id, revision });
        }
        loaded
    }
}

/// Deterministic filler text of varying length for generated messages.
fn demo_body(seed: usize) -> String {
    const WORDS: &[&str] = &[
        "scroll", "anchor", "window", "row", "height", "measure", "viewport", "overscan",
        "message", "latest", "offset", "estimate", "render", "observer", "terminal",
    ];
    let words = 3 + (seed * 7) % 40;
    let mut body = format!("**#{seed}** ");
    for i in 0..words {
        if i > 0 {
            body.push(' ');
        }
        body.push_str(WORDS[(seed + i * 3) % WORDS.len()]);
    }
    if seed % 5 == 0 {
        body.push_str("\n\n- first point\n- second point");
    }
    body
}
