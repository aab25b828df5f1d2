//! Honeypot dialogue-strategy engine
//!
//! Features:
//! - Keyword scam classification with per-category breakdown
//! - Pattern extraction of payment handles, routing codes, links and phones
//! - Goal planning over the belief record
//! - Persona-conditioned reply synthesis without immediate repetition
//! - Bounded conversation store with per-conversation locking

pub mod classifier;
pub mod conversation;
pub mod engine;
pub mod extractor;
pub mod planner;
pub mod reply;
pub mod store;

pub use classifier::ScamClassifier;
pub use conversation::{Conversation, Rapport};
pub use engine::ConversationEngine;
pub use extractor::PatternExtractor;
pub use planner::GoalPlanner;
pub use reply::ReplySynthesizer;
pub use store::{ConversationStore, ConversationSummary, StoreConfig};

use thiserror::Error;

/// Agent errors
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Invalid pattern: {0}")]
    Pattern(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<regex::Error> for AgentError {
    fn from(err: regex::Error) -> Self {
        AgentError::Pattern(err.to_string())
    }
}

impl From<honeypot_config::ConfigError> for AgentError {
    fn from(err: honeypot_config::ConfigError) -> Self {
        AgentError::Config(err.to_string())
    }
}
