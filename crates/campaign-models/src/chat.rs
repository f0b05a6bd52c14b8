use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Number of messages kept for display (five user/assistant exchanges).
pub const DEFAULT_HISTORY_CAP: usize = 10;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Rolling chat history for one UI session.
///
/// Holds at most `cap` messages; older messages fall off the front.
#[derive(Debug, Clone)]
pub struct ChatHistory {
    cap: usize,
    messages: VecDeque<ChatMessage>,
}

impl ChatHistory {
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            messages: VecDeque::with_capacity(cap),
        }
    }

    pub fn push(&mut self, message: ChatMessage) {
        if self.cap == 0 {
            return;
        }
        while self.messages.len() >= self.cap {
            self.messages.pop_front();
        }
        self.messages.push_back(message);
    }

    /// Record one query/plan exchange.
    pub fn push_exchange(&mut self, query: &str, campaign_plan: &str) {
        self.push(ChatMessage::user(query));
        self.push(ChatMessage::assistant(campaign_plan));
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.messages.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }
}

impl Default for ChatHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAP)
    }
}
