//! Conversation engine
//!
//! Orchestrates one inbound message end to end:
//! classify → (in scope) extract → plan → synthesize → render the view.
//! The engine never fails on message input; errors only surface at
//! construction.

use rand::seq::SliceRandom;
use std::time::Instant;

use honeypot_config::{EngineConfig, PersonasConfig, QuestionTemplates};
use honeypot_core::{ConversationView, PersonaKind, PersonaProfile};

use crate::conversation::{Conversation, Rapport};
use crate::store::{ConversationStore, StoreConfig};
use crate::{AgentError, GoalPlanner, PatternExtractor, ReplySynthesizer, ScamClassifier};

pub struct ConversationEngine {
    config: EngineConfig,
    personas: PersonasConfig,
    classifier: ScamClassifier,
    extractor: PatternExtractor,
    planner: GoalPlanner,
    synthesizer: ReplySynthesizer,
    store: ConversationStore,
}

impl ConversationEngine {
    pub fn new(
        config: EngineConfig,
        personas: PersonasConfig,
        templates: QuestionTemplates,
    ) -> Result<Self, AgentError> {
        config.validate()?;
        personas.validate()?;
        templates.validate()?;

        let store = ConversationStore::new(StoreConfig::from(&config));

        tracing::debug!(
            threshold = config.scam_threshold,
            personas = personas.personas.len(),
            seeded = config.seed.is_some(),
            "Conversation engine ready"
        );

        Ok(Self {
            classifier: ScamClassifier::new(config.confidence_normalizer),
            extractor: PatternExtractor::new()?,
            planner: GoalPlanner::new(),
            synthesizer: ReplySynthesizer::new(templates),
            store,
            personas,
            config,
        })
    }

    /// Build from engine settings, loading persona and template overrides
    /// from the configured paths
    pub fn from_config(config: EngineConfig) -> Result<Self, AgentError> {
        let personas = match &config.personas_path {
            Some(path) => PersonasConfig::load(path)?,
            None => PersonasConfig::default(),
        };
        let templates = match &config.templates_path {
            Some(path) => QuestionTemplates::load(path)?,
            None => QuestionTemplates::default(),
        };
        Self::new(config, personas, templates)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    fn new_conversation(&self, id: &str) -> Conversation {
        let mut rng = Conversation::rng_for(self.config.seed, id);
        let persona = self
            .personas
            .personas
            .choose(&mut rng)
            .cloned()
            .unwrap_or_else(|| PersonaProfile::for_kind(PersonaKind::ConfusedElder));
        let rapport = Rapport::new(
            self.config.initial_trust,
            self.config.initial_suspicion,
            self.config.trust_ceiling,
        );
        Conversation::new(id, persona, rapport, rng)
    }

    /// Process one inbound message
    pub fn handle_message(&self, conversation_id: &str, text: &str) -> ConversationView {
        let start = Instant::now();

        let (entry, created) = self
            .store
            .get_or_create(conversation_id, || self.new_conversation(conversation_id));

        let mut guard = entry.lock();
        let conv = &mut *guard;

        if created {
            tracing::info!(
                conversation_id = %conversation_id,
                persona = %conv.persona.kind,
                "New conversation"
            );
        }

        conv.push_inbound(text);

        let classification = self.classifier.classify(text);
        conv.beliefs.set_scam_type(classification.label());
        let scam_detected = classification.is_in_scope(self.config.scam_threshold);
        conv.last_detected = scam_detected;
        conv.last_confidence = classification.confidence;

        let mut goal = None;
        let mut reply = String::new();

        if scam_detected {
            let captured = self.extractor.extract(text, &mut conv.beliefs);
            for kind in &captured {
                metrics::counter!("honeypot_identifiers_captured_total", "kind" => kind.as_str())
                    .increment(1);
            }

            let next = self.planner.next_goal(&conv.beliefs);
            reply = self.synthesizer.synthesize(
                &conv.persona,
                next,
                &mut conv.rapport,
                &mut conv.last_question,
                &mut conv.rng,
            );
            conv.push_reply(&reply);
            goal = Some(next);

            tracing::debug!(
                conversation_id = %conversation_id,
                confidence = classification.confidence,
                category = ?classification.category,
                captured = ?captured,
                goal = %next,
                trust = conv.rapport.trust,
                "Engaged turn"
            );
        } else {
            tracing::debug!(
                conversation_id = %conversation_id,
                confidence = classification.confidence,
                "Message below engagement threshold"
            );
        }

        let elapsed = start.elapsed();
        metrics::counter!(
            "honeypot_messages_total",
            "scam_detected" => if scam_detected { "true" } else { "false" }
        )
        .increment(1);
        metrics::histogram!("honeypot_engine_latency_seconds").record(elapsed.as_secs_f64());

        conv.view(
            scam_detected,
            classification.confidence,
            reply,
            goal,
            elapsed.as_millis() as u64,
        )
    }

    /// Current state of a conversation, without mutating it
    pub fn snapshot(&self, conversation_id: &str) -> Option<ConversationView> {
        let entry = self.store.get(conversation_id)?;
        let conv = entry.lock();
        let (detected, confidence) = conv.last_classification();
        Some(conv.view(detected, confidence, String::new(), None, 0))
    }
}
