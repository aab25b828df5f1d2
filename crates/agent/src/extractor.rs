//! Identifier extraction from scammer messages
//!
//! Rule-based recognizers, one per identifier kind. Every recognizer takes
//! the first match only and never fails on arbitrary input.

use regex::Regex;

use honeypot_core::{BeliefRecord, IdentifierKind};

use crate::AgentError;

/// Bank tokens in match priority order, with their display names
const BANK_TOKENS: &[(&str, &str)] = &[
    ("sbi", "SBI"),
    ("hdfc", "HDFC"),
    ("icici", "ICICI"),
    ("axis", "Axis"),
    ("kotak", "Kotak"),
    ("pnb", "PNB"),
    ("canara", "Canara"),
    ("bank of baroda", "Bank of Baroda"),
    ("union bank", "Union Bank"),
    ("yes bank", "Yes Bank"),
];

/// Pattern extractor for the belief record
pub struct PatternExtractor {
    upi_pattern: Regex,
    url_pattern: Regex,
    ifsc_pattern: Regex,
    phone_pattern: Regex,
}

impl PatternExtractor {
    pub fn new() -> Result<Self, AgentError> {
        Ok(Self {
            // handle@provider
            upi_pattern: Regex::new(r"[A-Za-z0-9.\-_]{2,}@[A-Za-z]{2,}")?,
            url_pattern: Regex::new(r"https?://\S+")?,
            // 4 letters, a zero, 6 alphanumerics
            ifsc_pattern: Regex::new(r"[A-Z]{4}0[A-Z0-9]{6}")?,
            phone_pattern: Regex::new(r"\b\d{10}\b")?,
        })
    }

    /// Fill unset slots of `beliefs` from `text`
    ///
    /// Returns the kinds newly captured by this call. The bank slot follows
    /// the latest mention and is reported whenever its value changes.
    pub fn extract(&self, text: &str, beliefs: &mut BeliefRecord) -> Vec<IdentifierKind> {
        let mut captured = Vec::new();

        let patterns = [
            (IdentifierKind::UpiHandle, &self.upi_pattern),
            (IdentifierKind::PhishingUrl, &self.url_pattern),
            (IdentifierKind::IfscCode, &self.ifsc_pattern),
            (IdentifierKind::PhoneNumber, &self.phone_pattern),
        ];

        for (kind, pattern) in patterns {
            if beliefs.is_set(kind) {
                continue;
            }
            if let Some(m) = pattern.find(text) {
                if beliefs.capture(kind, m.as_str()) {
                    captured.push(kind);
                }
            }
        }

        if let Some(bank) = Self::detect_bank(text) {
            if beliefs.record_bank(bank) {
                captured.push(IdentifierKind::Bank);
            }
        }

        captured
    }

    /// First bank token (in priority order) contained in the text
    pub fn detect_bank(text: &str) -> Option<&'static str> {
        let lower = text.to_lowercase();
        BANK_TOKENS
            .iter()
            .find(|(token, _)| lower.contains(token))
            .map(|(_, name)| *name)
    }
}
