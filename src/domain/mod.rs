//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (ids, errors, percentages, state machines)
//! - `assistant` - Keyword response engine and chat conversations
//! - `processing` - Staged progress simulation for AI processing
//! - `recording` - Simulated recording sessions
//! - `project` - Dashboard projects and editor guides

pub mod assistant;
pub mod foundation;
pub mod processing;
pub mod project;
pub mod recording;
