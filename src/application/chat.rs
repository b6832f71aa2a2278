//! ChatService - the support assistant's request handling.
//!
//! Sending a message records it, waits the simulated reply latency, then
//! appends the rule-table answer. While the reply is pending the stored
//! conversation reports `awaiting_reply` and further messages are refused.
//!
//! The wait and the reply run on their own task, so a caller that goes
//! away mid-wait still leaves the conversation answered.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::Mutex;
use tokio::time;

use crate::domain::assistant::{ChatMessage, Conversation, RuleBook};
use crate::domain::foundation::{ChatSessionId, DomainError, ErrorCode};
use crate::ports::ConversationStore;

/// The two messages produced by one send.
#[derive(Debug, Clone, Serialize)]
pub struct ChatExchange {
    pub user_message: ChatMessage,
    pub reply: ChatMessage,
    pub quick_replies: &'static [&'static str],
}

pub struct ChatService {
    store: Arc<dyn ConversationStore>,
    rules: &'static RuleBook,
    reply_latency: Duration,
    // Serializes load-modify-save across callers and reply tasks.
    write_lock: Arc<Mutex<()>>,
}

impl ChatService {
    pub fn new(store: Arc<dyn ConversationStore>, reply_latency: Duration) -> Self {
        Self {
            store,
            rules: RuleBook::standard(),
            reply_latency,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Opens a conversation holding just the greeting.
    pub async fn open(&self) -> Result<Conversation, DomainError> {
        let conversation = Conversation::new(ChatSessionId::new());
        self.store.save(&conversation).await?;
        tracing::debug!(chat_id = %conversation.id(), "Conversation opened");
        Ok(conversation)
    }

    pub async fn get(&self, id: ChatSessionId) -> Result<Conversation, DomainError> {
        load(self.store.as_ref(), id).await
    }

    /// Records the user's message and, after the reply latency, the
    /// assistant's answer.
    ///
    /// The reply is written by a spawned task; dropping this future does
    /// not cancel it.
    ///
    /// # Errors
    ///
    /// - `ChatSessionNotFound` if the conversation does not exist, or was
    ///   closed before the reply landed
    /// - `EmptyField` if the text is blank
    /// - `InvalidStateTransition` if a reply is still pending
    pub async fn send_message(
        &self,
        id: ChatSessionId,
        text: &str,
    ) -> Result<ChatExchange, DomainError> {
        let user_message = {
            let _guard = self.write_lock.lock().await;
            let mut conversation = self.get(id).await?;
            let message = conversation.record_user_message(text)?.clone();
            self.store.save(&conversation).await?;
            message
        };

        let pending = PendingReply {
            store: Arc::clone(&self.store),
            write_lock: Arc::clone(&self.write_lock),
            rules: self.rules,
            latency: self.reply_latency,
            id,
            text: text.to_owned(),
        };
        let (reply, quick_replies) = tokio::spawn(pending.deliver())
            .await
            .map_err(|e| {
                DomainError::new(ErrorCode::InternalError, format!("Reply task failed: {}", e))
            })??;

        Ok(ChatExchange {
            user_message,
            reply,
            quick_replies,
        })
    }

    /// Discards a conversation. A reply still pending for it is dropped.
    pub async fn close(&self, id: ChatSessionId) -> Result<(), DomainError> {
        let _guard = self.write_lock.lock().await;
        if self.store.remove(id).await? {
            tracing::debug!(chat_id = %id, "Conversation closed");
            Ok(())
        } else {
            Err(not_found(id))
        }
    }
}

/// The assistant's answer to one user message, waiting to be written.
struct PendingReply {
    store: Arc<dyn ConversationStore>,
    write_lock: Arc<Mutex<()>>,
    rules: &'static RuleBook,
    latency: Duration,
    id: ChatSessionId,
    text: String,
}

impl PendingReply {
    async fn deliver(self) -> Result<(ChatMessage, &'static [&'static str]), DomainError> {
        time::sleep(self.latency).await;

        let category = self.rules.classify(&self.text);
        let answer = self.rules.respond(&self.text);

        let _guard = self.write_lock.lock().await;
        let mut conversation = load(self.store.as_ref(), self.id).await?;
        let reply = conversation.record_assistant_reply(answer)?.clone();
        self.store.save(&conversation).await?;

        tracing::info!(chat_id = %self.id, ?category, "Assistant replied");
        Ok((reply, conversation.quick_replies()))
    }
}

async fn load(store: &dyn ConversationStore, id: ChatSessionId) -> Result<Conversation, DomainError> {
    store.find(id).await?.ok_or_else(|| not_found(id))
}

fn not_found(id: ChatSessionId) -> DomainError {
    DomainError::new(
        ErrorCode::ChatSessionNotFound,
        format!("Conversation not found: {}", id),
    )
}
