//! Question templates per elicitation goal
//!
//! Every goal maps to a list of questions the synthesizer picks from.
//! The `stall` list doubles as the fallback when a pick would repeat the
//! previous question.

use serde::{Deserialize, Serialize};
use std::path::Path;

use honeypot_core::Goal;

use crate::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionTemplates {
    #[serde(default = "default_bank")]
    pub bank: Vec<String>,

    #[serde(default = "default_routing_code")]
    pub routing_code: Vec<String>,

    #[serde(default = "default_payment_handle")]
    pub payment_handle: Vec<String>,

    #[serde(default = "default_phishing_url")]
    pub phishing_url: Vec<String>,

    #[serde(default = "default_phone_number")]
    pub phone_number: Vec<String>,

    #[serde(default = "default_stall")]
    pub stall: Vec<String>,
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_bank() -> Vec<String> {
    to_strings(&[
        "Which bank is this related to? I have two accounts.",
        "Is this about my savings account? Which bank are you calling from?",
        "Which branch should I visit if this does not work?",
    ])
}

fn default_routing_code() -> Vec<String> {
    to_strings(&[
        "The form is asking for an IFSC code. What should I put?",
        "Can you tell me the branch IFSC so I don't type it wrong?",
    ])
}

fn default_payment_handle() -> Vec<String> {
    to_strings(&[
        "The refund will come to my UPI ID right?",
        "Which UPI ID should I send the verification amount to?",
        "My app is asking for a UPI ID. Can you type it for me?",
    ])
}

fn default_phishing_url() -> Vec<String> {
    to_strings(&[
        "The link didn't open properly. Can you resend it?",
        "Where do I click? Please send the website again.",
    ])
}

fn default_phone_number() -> Vec<String> {
    to_strings(&[
        "Can I call you back? What is your number?",
        "My network is weak. Which number should I call?",
    ])
}

fn default_stall() -> Vec<String> {
    to_strings(&[
        "I'm currently outside. Will this expire soon?",
        "Give me five minutes, I am looking for my reading glasses.",
        "Wait, the app is loading very slowly.",
    ])
}

impl Default for QuestionTemplates {
    fn default() -> Self {
        Self {
            bank: default_bank(),
            routing_code: default_routing_code(),
            payment_handle: default_payment_handle(),
            phishing_url: default_phishing_url(),
            phone_number: default_phone_number(),
            stall: default_stall(),
        }
    }
}

impl QuestionTemplates {
    /// Load from a YAML file; goals missing from the file keep their defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let templates: Self = crate::read_yaml(path.as_ref())?;
        templates.validate()?;
        Ok(templates)
    }

    /// Questions for a goal
    pub fn get(&self, goal: Goal) -> &[String] {
        match goal {
            Goal::Bank => &self.bank,
            Goal::RoutingCode => &self.routing_code,
            Goal::PaymentHandle => &self.payment_handle,
            Goal::PhishingUrl => &self.phishing_url,
            Goal::PhoneNumber => &self.phone_number,
            Goal::Stall => &self.stall,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for goal in Goal::PRIORITY.iter().chain(std::iter::once(&Goal::Stall)) {
            let questions = self.get(*goal);
            if questions.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: format!("templates.{}", goal),
                    message: "At least one question is required".to_string(),
                });
            }
            if let Some(index) = questions.iter().position(|q| q.trim().is_empty()) {
                return Err(ConfigError::InvalidValue {
                    field: format!("templates.{}[{}]", goal, index),
                    message: "Questions must not be blank".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_cover_every_goal() {
        let templates = QuestionTemplates::default();
        assert!(templates.validate().is_ok());
        assert_eq!(
            templates.get(Goal::Bank)[0],
            "Which bank is this related to? I have two accounts."
        );
        assert!(templates
            .get(Goal::Stall)
            .contains(&"I'm currently outside. Will this expire soon?".to_string()));
    }

    #[test]
    fn test_empty_goal_rejected() {
        let mut templates = QuestionTemplates::default();
        templates.phone_number.clear();
        let err = templates.validate().unwrap_err();
        assert!(err.to_string().contains("templates.phone_number"));
    }

    #[test]
    fn test_blank_question_rejected() {
        let mut templates = QuestionTemplates::default();
        templates.bank = vec!["".to_string(), "Which bank?".to_string()];
        let err = templates.validate().unwrap_err();
        assert!(err.to_string().contains("templates.bank[0]"));
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "stall:\n  - \"Hold on, my tea is boiling.\"").unwrap();

        let templates = QuestionTemplates::load(file.path()).unwrap();
        assert_eq!(templates.get(Goal::Stall), ["Hold on, my tea is boiling.".to_string()]);
        assert_eq!(templates.bank, default_bank());
    }
}
