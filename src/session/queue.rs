//! Pending-result queue.
//!
//! Tool results produced while handling one assistant turn wait here until
//! the session sends them. The session drains this queue before it asks the
//! source for another prompt.

use std::collections::VecDeque;

use super::message::{Message, MessageType};

/// FIFO of messages waiting to join the conversation.
#[derive(Debug, Default, Clone)]
pub struct PendingQueue {
    items: VecDeque<Message>,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a message at the back.
    pub fn push_back(&mut self, message: Message) {
        self.items.push_back(message);
    }

    /// Take the oldest message.
    pub fn pop_front(&mut self) -> Option<Message> {
        self.items.pop_front()
    }

    pub fn front(&self) -> Option<&Message> {
        self.items.front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True when anything other than a tool result is waiting.
    pub fn is_mixed(&self) -> bool {
        self.items
            .iter()
            .any(|m| m.message_type() != MessageType::ToolResult)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.items.iter()
    }
}
