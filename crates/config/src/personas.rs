//! Persona Configuration
//!
//! The persona table assigned to new conversations. Defaults to the
//! built-in profiles; a YAML file can replace it wholesale.

use serde::{Deserialize, Serialize};
use std::path::Path;

use honeypot_core::{PersonaKind, PersonaProfile};

use crate::ConfigError;

/// Persona table loaded from personas.yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonasConfig {
    /// Profiles eligible for assignment
    #[serde(default = "default_profiles")]
    pub personas: Vec<PersonaProfile>,
}

fn default_profiles() -> Vec<PersonaProfile> {
    PersonaKind::ALL
        .iter()
        .map(|kind| PersonaProfile::for_kind(*kind))
        .collect()
}

impl Default for PersonasConfig {
    fn default() -> Self {
        Self {
            personas: default_profiles(),
        }
    }
}

impl PersonasConfig {
    /// Load from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config: Self = crate::read_yaml(path.as_ref())?;
        config.validate()?;
        tracing::debug!(
            path = %path.as_ref().display(),
            count = config.personas.len(),
            "Loaded persona table"
        );
        Ok(config)
    }

    /// Profile for a persona kind
    pub fn get(&self, kind: PersonaKind) -> Option<&PersonaProfile> {
        self.personas.iter().find(|p| p.kind == kind)
    }

    /// Kinds available for assignment, in table order
    pub fn kinds(&self) -> Vec<PersonaKind> {
        self.personas.iter().map(|p| p.kind).collect()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.personas.is_empty() {
            return Err(ConfigError::MissingField("personas".to_string()));
        }

        for (index, profile) in self.personas.iter().enumerate() {
            if profile.tone_prefixes.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: format!("personas[{}].tone_prefixes", index),
                    message: format!("{} needs at least one prefix", profile.kind),
                });
            }
            if profile.tone_prefixes.iter().any(|p| p.trim().is_empty()) {
                return Err(ConfigError::InvalidValue {
                    field: format!("personas[{}].tone_prefixes", index),
                    message: format!("{} has a blank prefix", profile.kind),
                });
            }
            if profile.trust_gain < 0.0 || profile.suspicion_gain < 0.0 {
                return Err(ConfigError::InvalidValue {
                    field: format!("personas[{}]", index),
                    message: format!("{} gains must not be negative", profile.kind),
                });
            }
            if self.personas[..index].iter().any(|p| p.kind == profile.kind) {
                return Err(ConfigError::InvalidValue {
                    field: format!("personas[{}].kind", index),
                    message: format!("{} is defined twice", profile.kind),
                });
            }
        }

        Ok(())
    }
}
