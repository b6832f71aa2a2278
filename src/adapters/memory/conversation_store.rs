//! In-memory conversation store.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::assistant::Conversation;
use crate::domain::foundation::{ChatSessionId, DomainError};
use crate::ports::ConversationStore;

/// Conversations kept in a map for the life of the process.
#[derive(Default)]
pub struct InMemoryConversationStore {
    conversations: RwLock<HashMap<ChatSessionId, Conversation>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored conversations.
    pub async fn len(&self) -> usize {
        self.conversations.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.conversations.read().await.is_empty()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn save(&self, conversation: &Conversation) -> Result<(), DomainError> {
        self.conversations
            .write()
            .await
            .insert(conversation.id(), conversation.clone());
        Ok(())
    }

    async fn find(&self, id: ChatSessionId) -> Result<Option<Conversation>, DomainError> {
        Ok(self.conversations.read().await.get(&id).cloned())
    }

    async fn remove(&self, id: ChatSessionId) -> Result<bool, DomainError> {
        Ok(self.conversations.write().await.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_replaces_previous_copy() {
        let store = InMemoryConversationStore::new();
        let mut conversation = Conversation::new(ChatSessionId::new());
        store.save(&conversation).await.unwrap();

        conversation.record_user_message("hello").unwrap();
        store.save(&conversation).await.unwrap();

        let found = store.find(conversation.id()).await.unwrap().unwrap();
        assert_eq!(found.messages().len(), 2);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn find_unknown_returns_none() {
        let store = InMemoryConversationStore::new();
        assert!(store.find(ChatSessionId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn remove_reports_whether_it_existed() {
        let store = InMemoryConversationStore::new();
        let conversation = Conversation::new(ChatSessionId::new());
        store.save(&conversation).await.unwrap();

        assert!(store.remove(conversation.id()).await.unwrap());
        assert!(!store.remove(conversation.id()).await.unwrap());
        assert!(store.is_empty().await);
    }
}
