//! Conversation aggregate for the support assistant.
//!
//! A conversation opens with the assistant greeting and then alternates:
//! one user message, then one assistant reply. The message list is
//! append-only.

use serde::Serialize;

use super::message::{ChatMessage, MessageId, Role};
use crate::domain::foundation::{ChatSessionId, DomainError, ErrorCode, ValidationError};

/// Greeting shown when the widget opens.
pub const GREETING: &str = "Hi! 👋 I'm creAnva's AI assistant. I can help you with:\n\n\
• Getting started with screen recording\n\
• Understanding our AI features\n\
• Pricing and plans\n\
• Technical support\n\n\
How can I help you today?";

/// Suggested prompts offered at the start of a conversation.
pub const QUICK_REPLIES: [&str; 4] = [
    "How do I start recording?",
    "What does AI enhancement do?",
    "Tell me about pricing",
    "How to export my video?",
];

/// Quick replies stay visible while the conversation is this short.
const QUICK_REPLY_WINDOW: usize = 2;

#[derive(Debug, Clone, Serialize)]
pub struct Conversation {
    id: ChatSessionId,
    messages: Vec<ChatMessage>,
    awaiting_reply: bool,
}

impl Conversation {
    /// Starts a conversation containing only the greeting.
    pub fn new(id: ChatSessionId) -> Self {
        let greeting = ChatMessage::new(MessageId::new(1), Role::Assistant, GREETING)
            .expect("greeting is non-empty");
        Self {
            id,
            messages: vec![greeting],
            awaiting_reply: false,
        }
    }

    pub fn id(&self) -> ChatSessionId {
        self.id
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// True between a user message and the assistant's reply.
    pub fn is_awaiting_reply(&self) -> bool {
        self.awaiting_reply
    }

    /// Prompts to offer the user, empty once the conversation is underway.
    pub fn quick_replies(&self) -> &'static [&'static str] {
        if self.messages.len() <= QUICK_REPLY_WINDOW {
            &QUICK_REPLIES
        } else {
            &[]
        }
    }

    /// Appends a user message.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the text is blank
    /// - `InvalidStateTransition` if the previous message has no reply yet
    pub fn record_user_message(&mut self, text: impl Into<String>) -> Result<&ChatMessage, DomainError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ValidationError::empty_field("content").into());
        }
        if self.awaiting_reply {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "The assistant is still replying to the previous message",
            ));
        }

        self.append(Role::User, text)?;
        self.awaiting_reply = true;
        Ok(self.last_appended())
    }

    /// Appends the assistant's reply to the pending user message.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if no user message is waiting
    pub fn record_assistant_reply(&mut self, text: impl Into<String>) -> Result<&ChatMessage, DomainError> {
        if !self.awaiting_reply {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "There is no user message waiting for a reply",
            ));
        }

        self.append(Role::Assistant, text.into())?;
        self.awaiting_reply = false;
        Ok(self.last_appended())
    }

    fn append(&mut self, role: Role, text: String) -> Result<(), DomainError> {
        let id = self
            .messages
            .last()
            .map(|m| m.id().next())
            .unwrap_or_else(|| MessageId::new(1));
        self.messages.push(ChatMessage::new(id, role, text)?);
        Ok(())
    }

    fn last_appended(&self) -> &ChatMessage {
        &self.messages[self.messages.len() - 1]
    }
}
