//! Core types for the scam honeypot agent
//!
//! This crate provides the domain types shared by every other crate:
//! - Belief record and identifier kinds
//! - Scam categories and classification results
//! - Elicitation goals
//! - Persona kinds and profiles
//! - Conversation turns, stages and the response view

pub mod beliefs;
pub mod conversation;
pub mod goal;
pub mod persona;
pub mod scam;

pub use beliefs::{BeliefRecord, IdentifierKind};
pub use conversation::{
    round2, ConversationStage, ConversationView, EngagementMetrics, Turn, TurnRole,
};
pub use goal::Goal;
pub use persona::{PersonaKind, PersonaProfile};
pub use scam::{Classification, ScamCategory};
