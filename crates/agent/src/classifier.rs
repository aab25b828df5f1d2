//! Keyword scam classifier
//!
//! Counts case-insensitive keyword hits per category. Confidence is the
//! total hit count over a normalizing constant, clamped to [0, 1]; the
//! category with the most hits wins, earlier categories winning ties.

use honeypot_core::{Classification, ScamCategory};

/// Scam classifier over fixed category keyword lists
#[derive(Debug, Clone)]
pub struct ScamClassifier {
    keywords: Vec<(ScamCategory, Vec<String>)>,
    normalizer: f64,
}

impl ScamClassifier {
    pub fn new(normalizer: f64) -> Self {
        let keywords = ScamCategory::ALL
            .iter()
            .map(|category| {
                let words = category
                    .default_keywords()
                    .iter()
                    .map(|k| k.to_string())
                    .collect();
                (*category, words)
            })
            .collect();

        Self {
            keywords,
            normalizer,
        }
    }

    pub fn normalizer(&self) -> f64 {
        self.normalizer
    }

    pub fn classify(&self, text: &str) -> Classification {
        let lower = text.to_lowercase();

        let hits: Vec<(ScamCategory, usize)> = self
            .keywords
            .iter()
            .map(|(category, words)| {
                let count = words.iter().filter(|w| lower.contains(w.as_str())).count();
                (*category, count)
            })
            .collect();

        let total: usize = hits.iter().map(|(_, n)| n).sum();

        // Strictly greater keeps the earlier category on ties
        let mut best: Option<(ScamCategory, usize)> = None;
        for (category, count) in &hits {
            if *count > best.map_or(0, |(_, n)| n) {
                best = Some((*category, *count));
            }
        }

        let confidence = if self.normalizer > 0.0 {
            (total as f64 / self.normalizer).clamp(0.0, 1.0)
        } else {
            0.0
        };

        Classification {
            confidence,
            category: best.map(|(c, _)| c),
            hits,
        }
    }
}

impl Default for ScamClassifier {
    fn default() -> Self {
        Self::new(5.0)
    }
}
