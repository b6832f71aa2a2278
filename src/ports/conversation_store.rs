//! Conversation store port.
//!
//! Holds assistant conversations between requests. The only adapter today
//! is in-memory; the widget never persisted chats.

use async_trait::async_trait;

use crate::domain::assistant::Conversation;
use crate::domain::foundation::{ChatSessionId, DomainError};

/// Storage port for assistant conversations.
///
/// Implementations must ensure:
/// - `save` replaces any previous copy with the same id
/// - messages come back in the order they were appended
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Insert or replace a conversation.
    async fn save(&self, conversation: &Conversation) -> Result<(), DomainError>;

    /// Load a conversation by id. Returns `None` if unknown.
    async fn find(&self, id: ChatSessionId) -> Result<Option<Conversation>, DomainError>;

    /// Remove a conversation. Returns false if it did not exist.
    async fn remove(&self, id: ChatSessionId) -> Result<bool, DomainError>;
}
