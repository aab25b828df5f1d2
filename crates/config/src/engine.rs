//! Engine configuration

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Conversation engine tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Minimum classifier confidence for a message to be engaged
    #[serde(default = "default_scam_threshold")]
    pub scam_threshold: f64,

    /// Keyword hit count treated as full confidence
    #[serde(default = "default_confidence_normalizer")]
    pub confidence_normalizer: f64,

    /// Trust level of a fresh conversation
    #[serde(default = "default_initial_trust")]
    pub initial_trust: f64,

    /// Suspicion level of a fresh conversation
    #[serde(default = "default_initial_suspicion")]
    pub initial_suspicion: f64,

    /// Upper clamp for trust and suspicion
    #[serde(default = "default_trust_ceiling")]
    pub trust_ceiling: f64,

    /// Seed for persona and template selection (entropy when unset)
    #[serde(default)]
    pub seed: Option<u64>,

    /// Maximum live conversations before least-recently-active eviction
    #[serde(default = "default_max_conversations")]
    pub max_conversations: usize,

    /// Idle time after which a conversation may be dropped (seconds)
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,

    /// Interval between idle sweeps (seconds)
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_seconds: u64,

    /// Optional YAML file overriding the persona table
    #[serde(default)]
    pub personas_path: Option<String>,

    /// Optional YAML file overriding the question templates
    #[serde(default)]
    pub templates_path: Option<String>,
}

fn default_scam_threshold() -> f64 {
    0.6
}
fn default_confidence_normalizer() -> f64 {
    5.0
}
fn default_initial_trust() -> f64 {
    0.3
}
fn default_initial_suspicion() -> f64 {
    0.1
}
fn default_trust_ceiling() -> f64 {
    1.0
}
fn default_max_conversations() -> usize {
    10_000
}
fn default_idle_timeout() -> u64 {
    3600 // 1 hour
}
fn default_cleanup_interval() -> u64 {
    300 // 5 minutes
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scam_threshold: default_scam_threshold(),
            confidence_normalizer: default_confidence_normalizer(),
            initial_trust: default_initial_trust(),
            initial_suspicion: default_initial_suspicion(),
            trust_ceiling: default_trust_ceiling(),
            seed: None,
            max_conversations: default_max_conversations(),
            idle_timeout_seconds: default_idle_timeout(),
            cleanup_interval_seconds: default_cleanup_interval(),
            personas_path: None,
            templates_path: None,
        }
    }
}

impl EngineConfig {
    /// Builder: fix the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder: cap live conversations
    pub fn with_max_conversations(mut self, max: usize) -> Self {
        self.max_conversations = max;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.scam_threshold) {
            return Err(ConfigError::InvalidValue {
                field: "engine.scam_threshold".to_string(),
                message: format!("Must be between 0.0 and 1.0, got {}", self.scam_threshold),
            });
        }

        if self.confidence_normalizer <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "engine.confidence_normalizer".to_string(),
                message: format!("Must be positive, got {}", self.confidence_normalizer),
            });
        }

        if self.trust_ceiling <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "engine.trust_ceiling".to_string(),
                message: format!("Must be positive, got {}", self.trust_ceiling),
            });
        }

        for (field, value) in [
            ("engine.initial_trust", self.initial_trust),
            ("engine.initial_suspicion", self.initial_suspicion),
        ] {
            if value < 0.0 || value > self.trust_ceiling {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    message: format!(
                        "Must be between 0.0 and trust_ceiling ({}), got {}",
                        self.trust_ceiling, value
                    ),
                });
            }
        }

        if self.max_conversations == 0 {
            return Err(ConfigError::InvalidValue {
                field: "engine.max_conversations".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.scam_threshold, 0.6);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_threshold_range() {
        let mut config = EngineConfig::default();
        config.scam_threshold = 1.2;
        assert!(config.validate().is_err());

        config.scam_threshold = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_initial_trust_above_ceiling() {
        let mut config = EngineConfig::default();
        config.trust_ceiling = 0.5;
        config.initial_trust = 0.7;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let config = EngineConfig::default().with_max_conversations(0);
        assert!(config.validate().is_err());
    }
}
