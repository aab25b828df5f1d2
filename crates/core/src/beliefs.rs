//! Belief record: what the agent has learned about the counterpart so far

use serde::{Deserialize, Serialize};

/// Forensic identifier kinds tracked per conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierKind {
    /// Bank the scam claims to be affiliated with
    Bank,
    /// Payment handle (handle@provider)
    UpiHandle,
    /// Bank routing code
    IfscCode,
    /// Link sent by the counterpart
    PhishingUrl,
    /// 10-digit phone number
    PhoneNumber,
}

impl IdentifierKind {
    /// All identifier kinds, in belief-record field order
    pub const ALL: [IdentifierKind; 5] = [
        IdentifierKind::Bank,
        IdentifierKind::UpiHandle,
        IdentifierKind::IfscCode,
        IdentifierKind::PhishingUrl,
        IdentifierKind::PhoneNumber,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IdentifierKind::Bank => "bank",
            IdentifierKind::UpiHandle => "upi_handle",
            IdentifierKind::IfscCode => "ifsc_code",
            IdentifierKind::PhishingUrl => "phishing_url",
            IdentifierKind::PhoneNumber => "phone_number",
        }
    }
}

impl std::fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-conversation record of captured identifiers
///
/// Identifier slots are first-capture-wins, except `bank` which follows the
/// latest mention. `scam_type` mirrors the latest classification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeliefRecord {
    pub bank: Option<String>,
    pub upi_handle: Option<String>,
    pub ifsc_code: Option<String>,
    pub phishing_url: Option<String>,
    pub phone_number: Option<String>,
    pub scam_type: Option<String>,
}

impl BeliefRecord {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, kind: IdentifierKind) -> &Option<String> {
        match kind {
            IdentifierKind::Bank => &self.bank,
            IdentifierKind::UpiHandle => &self.upi_handle,
            IdentifierKind::IfscCode => &self.ifsc_code,
            IdentifierKind::PhishingUrl => &self.phishing_url,
            IdentifierKind::PhoneNumber => &self.phone_number,
        }
    }

    fn slot_mut(&mut self, kind: IdentifierKind) -> &mut Option<String> {
        match kind {
            IdentifierKind::Bank => &mut self.bank,
            IdentifierKind::UpiHandle => &mut self.upi_handle,
            IdentifierKind::IfscCode => &mut self.ifsc_code,
            IdentifierKind::PhishingUrl => &mut self.phishing_url,
            IdentifierKind::PhoneNumber => &mut self.phone_number,
        }
    }

    /// Captured value for an identifier kind
    pub fn get(&self, kind: IdentifierKind) -> Option<&str> {
        self.slot(kind).as_deref()
    }

    /// Whether an identifier kind has been captured
    pub fn is_set(&self, kind: IdentifierKind) -> bool {
        self.slot(kind).is_some()
    }

    /// Fill a slot if it is still empty. Returns true when the value was stored.
    pub fn capture(&mut self, kind: IdentifierKind, value: impl Into<String>) -> bool {
        let slot = self.slot_mut(kind);
        if slot.is_some() {
            return false;
        }
        *slot = Some(value.into());
        true
    }

    /// Store the bank unconditionally. Returns true when the value changed.
    pub fn record_bank(&mut self, bank: impl Into<String>) -> bool {
        let bank = bank.into();
        if self.bank.as_deref() == Some(bank.as_str()) {
            return false;
        }
        self.bank = Some(bank);
        true
    }

    /// Replace the scam type with the latest classification
    pub fn set_scam_type(&mut self, scam_type: Option<String>) {
        self.scam_type = scam_type;
    }

    /// Number of identifier slots filled (scam type excluded)
    pub fn captured_count(&self) -> usize {
        IdentifierKind::ALL.iter().filter(|k| self.is_set(**k)).count()
    }

    /// Kinds still missing
    pub fn missing(&self) -> Vec<IdentifierKind> {
        IdentifierKind::ALL
            .iter()
            .copied()
            .filter(|k| !self.is_set(*k))
            .collect()
    }
}
