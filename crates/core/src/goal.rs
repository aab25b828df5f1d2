//! Elicitation goals

use serde::{Deserialize, Serialize};

use crate::IdentifierKind;

/// What the agent is trying to get out of the counterpart next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    Bank,
    RoutingCode,
    PaymentHandle,
    PhishingUrl,
    PhoneNumber,
    /// Nothing left to ask for, or breaking a repetition
    Stall,
}

impl Goal {
    /// Identifier goals in elicitation priority order
    pub const PRIORITY: [Goal; 5] = [
        Goal::Bank,
        Goal::RoutingCode,
        Goal::PaymentHandle,
        Goal::PhishingUrl,
        Goal::PhoneNumber,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::Bank => "bank",
            Goal::RoutingCode => "routing_code",
            Goal::PaymentHandle => "payment_handle",
            Goal::PhishingUrl => "phishing_url",
            Goal::PhoneNumber => "phone_number",
            Goal::Stall => "stall",
        }
    }

    /// Belief slot this goal fills, `None` for stall
    pub fn identifier(&self) -> Option<IdentifierKind> {
        match self {
            Goal::Bank => Some(IdentifierKind::Bank),
            Goal::RoutingCode => Some(IdentifierKind::IfscCode),
            Goal::PaymentHandle => Some(IdentifierKind::UpiHandle),
            Goal::PhishingUrl => Some(IdentifierKind::PhishingUrl),
            Goal::PhoneNumber => Some(IdentifierKind::PhoneNumber),
            Goal::Stall => None,
        }
    }
}

impl std::fmt::Display for Goal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_covers_every_identifier_once() {
        let mut kinds: Vec<IdentifierKind> =
            Goal::PRIORITY.iter().filter_map(|g| g.identifier()).collect();
        kinds.sort_by_key(|k| k.as_str());
        kinds.dedup();
        assert_eq!(kinds.len(), IdentifierKind::ALL.len());
        assert!(Goal::Stall.identifier().is_none());
    }
}
