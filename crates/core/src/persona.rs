//! Decoy persona definitions
//!
//! A persona decides how the honeypot sounds and how quickly it warms up:
//! - Tone prefixes placed before every question
//! - Trust gained per engaged turn
//! - Suspicion gained per engaged turn

use serde::{Deserialize, Serialize};

/// Persona kinds the engine can assign to a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonaKind {
    /// Retired, trusting, slow with technology
    ConfusedElder,
    /// Distracted, short on time, mildly wary
    BusyProfessional,
    /// Nervous about getting into trouble
    AnxiousStudent,
}

impl PersonaKind {
    pub const ALL: [PersonaKind; 3] = [
        PersonaKind::ConfusedElder,
        PersonaKind::BusyProfessional,
        PersonaKind::AnxiousStudent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PersonaKind::ConfusedElder => "confused_elder",
            PersonaKind::BusyProfessional => "busy_professional",
            PersonaKind::AnxiousStudent => "anxious_student",
        }
    }
}

impl std::fmt::Display for PersonaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Behavioral parameters for one persona kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaProfile {
    /// Which persona this profile describes
    pub kind: PersonaKind,
    /// Phrases that open every reply
    pub tone_prefixes: Vec<String>,
    /// Trust added per engaged turn
    pub trust_gain: f64,
    /// Suspicion added per engaged turn
    pub suspicion_gain: f64,
}

impl PersonaProfile {
    /// Built-in profile for a persona kind
    pub fn for_kind(kind: PersonaKind) -> Self {
        match kind {
            PersonaKind::ConfusedElder => Self {
                kind,
                tone_prefixes: vec![
                    "Oh dear, beta.".to_string(),
                    "Sorry, my eyes are weak.".to_string(),
                    "I am not good with these phones.".to_string(),
                    "Please be patient with me.".to_string(),
                ],
                trust_gain: 0.15,
                suspicion_gain: 0.02,
            },
            PersonaKind::BusyProfessional => Self {
                kind,
                tone_prefixes: vec![
                    "I'm in a meeting.".to_string(),
                    "Quickly please.".to_string(),
                    "Okay, I have two minutes.".to_string(),
                ],
                trust_gain: 0.08,
                suspicion_gain: 0.06,
            },
            PersonaKind::AnxiousStudent => Self {
                kind,
                tone_prefixes: vec![
                    "Oh no, am I in trouble?".to_string(),
                    "Sorry sorry, I'm panicking a bit.".to_string(),
                    "Please don't block it, that's my scholarship account.".to_string(),
                ],
                trust_gain: 0.12,
                suspicion_gain: 0.04,
            },
        }
    }

    /// Builder: replace tone prefixes
    pub fn with_prefixes(mut self, prefixes: Vec<String>) -> Self {
        self.tone_prefixes = prefixes;
        self
    }

    /// Builder: set trust gain
    pub fn with_trust_gain(mut self, gain: f64) -> Self {
        self.trust_gain = gain.clamp(0.0, 1.0);
        self
    }

    /// Builder: set suspicion gain
    pub fn with_suspicion_gain(mut self, gain: f64) -> Self {
        self.suspicion_gain = gain.clamp(0.0, 1.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_profiles_have_prefixes() {
        for kind in PersonaKind::ALL {
            let profile = PersonaProfile::for_kind(kind);
            assert_eq!(profile.kind, kind);
            assert!(!profile.tone_prefixes.is_empty());
            assert!(profile.trust_gain > 0.0);
            assert!(profile.suspicion_gain > 0.0);
        }
    }

    #[test]
    fn test_builder_clamps_gains() {
        let profile = PersonaProfile::for_kind(PersonaKind::BusyProfessional)
            .with_trust_gain(3.0)
            .with_suspicion_gain(-1.0);
        assert_eq!(profile.trust_gain, 1.0);
        assert_eq!(profile.suspicion_gain, 0.0);
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&PersonaKind::ConfusedElder).unwrap();
        assert_eq!(json, "\"confused_elder\"");
    }
}
