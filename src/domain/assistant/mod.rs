//! Assistant domain module.
//!
//! The in-app support chat: a keyword rule table that picks a canned reply,
//! and the conversation that records the exchange.

mod conversation;
mod message;
mod rules;

pub use conversation::{Conversation, GREETING, QUICK_REPLIES};
pub use message::{ChatMessage, MessageId, Role};
pub use rules::{classify, respond, ResponseCategory, ResponseRule, RuleBook};
