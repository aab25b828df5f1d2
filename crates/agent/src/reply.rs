//! Persona-flavored reply synthesis
//!
//! A reply is one of the persona's tone prefixes followed by a question
//! for the current goal. If the picked question equals the previous one,
//! a single re-pick is made from the stall list.

use rand::seq::SliceRandom;
use rand::Rng;

use honeypot_config::QuestionTemplates;
use honeypot_core::{Goal, PersonaProfile};

use crate::conversation::Rapport;

pub struct ReplySynthesizer {
    templates: QuestionTemplates,
}

impl ReplySynthesizer {
    pub fn new(templates: QuestionTemplates) -> Self {
        Self { templates }
    }

    pub fn templates(&self) -> &QuestionTemplates {
        &self.templates
    }

    /// Compose a reply for `goal`
    ///
    /// Updates `last_question` to the question emitted and applies the
    /// persona's trust and suspicion deltas to `rapport`.
    pub fn synthesize<R: Rng + ?Sized>(
        &self,
        profile: &PersonaProfile,
        goal: Goal,
        rapport: &mut Rapport,
        last_question: &mut Option<String>,
        rng: &mut R,
    ) -> String {
        let prefix = profile
            .tone_prefixes
            .choose(rng)
            .map(String::as_str)
            .unwrap_or_default();

        let mut question = self.pick(goal, rng);
        if last_question.as_deref() == Some(question) {
            // A second collision is accepted
            question = self.pick(Goal::Stall, rng);
        }

        let reply = if prefix.is_empty() {
            question.to_string()
        } else {
            format!("{} {}", prefix, question)
        };

        *last_question = Some(question.to_string());
        rapport.apply(profile);

        reply
    }

    fn pick<R: Rng + ?Sized>(&self, goal: Goal, rng: &mut R) -> &str {
        self.templates
            .get(goal)
            .choose(rng)
            .map(String::as_str)
            .unwrap_or_default()
    }
}

impl Default for ReplySynthesizer {
    fn default() -> Self {
        Self::new(QuestionTemplates::default())
    }
}
