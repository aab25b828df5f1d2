//! Conversation types including stages, turns and the response view

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{BeliefRecord, Goal, PersonaKind};

/// Conversation lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStage {
    /// Materialized, no reply issued yet
    #[default]
    New,
    /// At least one in-scope turn has been answered
    Engaging,
}

impl ConversationStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationStage::New => "new",
            ConversationStage::Engaging => "engaging",
        }
    }
}

impl std::fmt::Display for ConversationStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Who spoke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    /// Inbound message from the suspected fraudster
    Scammer,
    /// Reply issued by the honeypot
    Agent,
}

impl TurnRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnRole::Scammer => "scammer",
            TurnRole::Agent => "agent",
        }
    }
}

/// A single turn in the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    pub fn new(role: TurnRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn scammer(content: impl Into<String>) -> Self {
        Self::new(TurnRole::Scammer, content)
    }

    pub fn agent(content: impl Into<String>) -> Self {
        Self::new(TurnRole::Agent, content)
    }
}

/// Engagement bookkeeping returned with every view
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngagementMetrics {
    /// Seconds since the conversation was materialized
    pub duration_secs: u64,
    /// Replies issued so far
    pub agent_turns: usize,
    /// Time spent handling the current message
    pub latency_ms: u64,
}

/// What the engine returns for every inbound message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationView {
    pub conversation_id: String,
    pub scam_detected: bool,
    /// Rounded to 2 decimals
    pub confidence: f64,
    /// Empty when the message was out of scope
    pub reply_text: String,
    pub beliefs: BeliefRecord,
    pub persona: PersonaKind,
    /// Rounded to 2 decimals
    pub trust_level: f64,
    /// Rounded to 2 decimals
    pub suspicion: f64,
    /// Inbound messages seen so far
    pub turn_count: usize,
    pub stage: ConversationStage,
    /// Goal pursued this turn
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal: Option<Goal>,
    pub engagement: EngagementMetrics,
}

/// Round to two decimal places for presentation
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(0.456), 0.46);
        assert_eq!(round2(0.3 + 0.15 + 0.15), 0.6);
        assert_eq!(round2(1.0), 1.0);
    }

    #[test]
    fn test_turn_roles() {
        let turn = Turn::scammer("Your account is blocked");
        assert_eq!(turn.role, TurnRole::Scammer);
        assert_eq!(Turn::agent("Which bank?").role.as_str(), "agent");
    }

    #[test]
    fn test_view_omits_absent_goal() {
        let view = ConversationView {
            conversation_id: "conv_1".to_string(),
            scam_detected: false,
            confidence: 0.0,
            reply_text: String::new(),
            beliefs: BeliefRecord::new(),
            persona: PersonaKind::ConfusedElder,
            trust_level: 0.3,
            suspicion: 0.1,
            turn_count: 1,
            stage: ConversationStage::New,
            goal: None,
            engagement: EngagementMetrics::default(),
        };
        let json = serde_json::to_value(&view).unwrap();

        assert!(json.get("goal").is_none());
        assert_eq!(json["persona"], "confused_elder");
        assert_eq!(json["stage"], "new");
        assert_eq!(json["beliefs"]["bank"], serde_json::Value::Null);
    }
}
