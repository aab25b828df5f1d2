//! Scam categories and classification results

use serde::{Deserialize, Serialize};

/// Scam category, in tie-break order
///
/// When two categories score the same number of keyword hits, the one
/// declared first wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScamCategory {
    /// "Your account is blocked, verify your KYC"
    BankImpersonation,
    /// Refunds, cashback and collect requests over UPI
    PaymentRefund,
    /// Click-this-link lures
    PhishingLink,
    /// Lottery and prize notifications
    LotteryPrize,
    /// Pure pressure tactics
    UrgencyPressure,
}

impl ScamCategory {
    /// All categories in tie-break order
    pub const ALL: [ScamCategory; 5] = [
        ScamCategory::BankImpersonation,
        ScamCategory::PaymentRefund,
        ScamCategory::PhishingLink,
        ScamCategory::LotteryPrize,
        ScamCategory::UrgencyPressure,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScamCategory::BankImpersonation => "bank_impersonation",
            ScamCategory::PaymentRefund => "payment_refund",
            ScamCategory::PhishingLink => "phishing_link",
            ScamCategory::LotteryPrize => "lottery_prize",
            ScamCategory::UrgencyPressure => "urgency_pressure",
        }
    }

    /// Built-in lowercase keyword list for this category
    pub fn default_keywords(&self) -> &'static [&'static str] {
        match self {
            ScamCategory::BankImpersonation => &[
                "account blocked",
                "blocked",
                "verify",
                "account",
                "kyc",
                "suspend",
                "bank",
                "hdfc",
                "sbi",
                "icici",
                "otp",
            ],
            ScamCategory::PaymentRefund => &[
                "upi",
                "refund",
                "pay",
                "cashback",
                "collect request",
                "transfer",
            ],
            ScamCategory::PhishingLink => &["click", "link", "http", "download", "apk"],
            ScamCategory::LotteryPrize => &[
                "lottery",
                "prize",
                "winner",
                "reward",
                "congratulations",
            ],
            ScamCategory::UrgencyPressure => &[
                "urgent",
                "immediately",
                "now",
                "expire",
                "within 24 hours",
            ],
        }
    }
}

impl std::fmt::Display for ScamCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of scoring one message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Total keyword hits over the normalizing constant, in [0, 1]
    pub confidence: f64,
    /// Category with the most hits, `None` when nothing matched
    pub category: Option<ScamCategory>,
    /// Hits per category, in tie-break order
    pub hits: Vec<(ScamCategory, usize)>,
}

impl Classification {
    /// Total keyword hits across categories
    pub fn total_hits(&self) -> usize {
        self.hits.iter().map(|(_, n)| n).sum()
    }

    /// Whether the message meets the engagement threshold
    pub fn is_in_scope(&self, threshold: f64) -> bool {
        self.confidence >= threshold
    }

    /// Category label for the belief record
    pub fn label(&self) -> Option<String> {
        self.category.map(|c| c.as_str().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_are_lowercase() {
        for category in ScamCategory::ALL {
            for keyword in category.default_keywords() {
                assert_eq!(*keyword, keyword.to_lowercase(), "{category}: {keyword}");
            }
        }
    }

    #[test]
    fn test_in_scope_is_inclusive() {
        let classification = Classification {
            confidence: 0.6,
            category: Some(ScamCategory::PaymentRefund),
            hits: vec![(ScamCategory::PaymentRefund, 3)],
        };
        assert!(classification.is_in_scope(0.6));
        assert!(!classification.is_in_scope(0.61));
        assert_eq!(classification.total_hits(), 3);
        assert_eq!(classification.label().as_deref(), Some("payment_refund"));
    }
}
