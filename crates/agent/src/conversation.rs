//! Per-conversation state owned by the engine

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;

use honeypot_core::{
    round2, BeliefRecord, ConversationStage, ConversationView, EngagementMetrics, Goal,
    PersonaKind, PersonaProfile, Turn,
};

/// Trust and suspicion accumulators, clamped to `[0, ceiling]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rapport {
    pub trust: f64,
    pub suspicion: f64,
    ceiling: f64,
}

impl Rapport {
    pub fn new(trust: f64, suspicion: f64, ceiling: f64) -> Self {
        Self {
            trust: trust.clamp(0.0, ceiling),
            suspicion: suspicion.clamp(0.0, ceiling),
            ceiling,
        }
    }

    /// Add one engaged turn's worth of the persona's deltas
    pub fn apply(&mut self, profile: &PersonaProfile) {
        self.trust = (self.trust + profile.trust_gain).clamp(0.0, self.ceiling);
        self.suspicion = (self.suspicion + profile.suspicion_gain).clamp(0.0, self.ceiling);
    }
}

/// Everything the engine knows about one conversation
#[derive(Debug)]
pub struct Conversation {
    id: String,
    pub(crate) persona: PersonaProfile,
    pub(crate) beliefs: BeliefRecord,
    pub(crate) rapport: Rapport,
    pub(crate) stage: ConversationStage,
    /// Inbound messages only
    pub(crate) turns: Vec<Turn>,
    pub(crate) agent_turns: Vec<Turn>,
    pub(crate) last_question: Option<String>,
    pub(crate) rng: StdRng,
    /// Outcome of the latest classification
    pub(crate) last_detected: bool,
    pub(crate) last_confidence: f64,
    started_at: DateTime<Utc>,
    started: Instant,
    last_activity: Instant,
}

impl Conversation {
    pub fn new(id: impl Into<String>, persona: PersonaProfile, rapport: Rapport, rng: StdRng) -> Self {
        let now = Instant::now();
        Self {
            id: id.into(),
            persona,
            beliefs: BeliefRecord::new(),
            rapport,
            stage: ConversationStage::New,
            turns: Vec::new(),
            agent_turns: Vec::new(),
            last_question: None,
            rng,
            last_detected: false,
            last_confidence: 0.0,
            started_at: Utc::now(),
            started: now,
            last_activity: now,
        }
    }

    /// Per-conversation random source
    ///
    /// With a configured seed the stream is a pure function of the seed and
    /// the conversation id, so replays are reproducible.
    pub fn rng_for(seed: Option<u64>, id: &str) -> StdRng {
        match seed {
            Some(seed) => StdRng::seed_from_u64(seed ^ fnv1a(id)),
            None => StdRng::from_entropy(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn persona(&self) -> &PersonaProfile {
        &self.persona
    }

    pub fn persona_kind(&self) -> PersonaKind {
        self.persona.kind
    }

    pub fn beliefs(&self) -> &BeliefRecord {
        &self.beliefs
    }

    pub fn rapport(&self) -> Rapport {
        self.rapport
    }

    pub fn stage(&self) -> ConversationStage {
        self.stage
    }

    pub fn turn_count(&self) -> usize {
        self.turns.len()
    }

    pub fn agent_turns(&self) -> &[Turn] {
        &self.agent_turns
    }

    /// Whether the latest inbound message was in scope, and its confidence
    pub fn last_classification(&self) -> (bool, f64) {
        (self.last_detected, self.last_confidence)
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn last_activity(&self) -> Instant {
        self.last_activity
    }

    pub(crate) fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    pub fn idle_secs(&self) -> u64 {
        self.last_activity.elapsed().as_secs()
    }

    /// Record an inbound message
    pub fn push_inbound(&mut self, text: &str) {
        self.turns.push(Turn::scammer(text));
        self.touch();
    }

    /// Record an issued reply and leave the `new` stage
    pub fn push_reply(&mut self, reply: &str) {
        self.agent_turns.push(Turn::agent(reply));
        self.stage = ConversationStage::Engaging;
    }

    /// Render the current state
    pub fn view(
        &self,
        scam_detected: bool,
        confidence: f64,
        reply_text: String,
        goal: Option<Goal>,
        latency_ms: u64,
    ) -> ConversationView {
        ConversationView {
            conversation_id: self.id.clone(),
            scam_detected,
            confidence: round2(confidence),
            reply_text,
            beliefs: self.beliefs.clone(),
            persona: self.persona.kind,
            trust_level: round2(self.rapport.trust),
            suspicion: round2(self.rapport.suspicion),
            turn_count: self.turns.len(),
            stage: self.stage,
            goal,
            engagement: EngagementMetrics {
                duration_secs: self.started.elapsed().as_secs(),
                agent_turns: self.agent_turns.len(),
                latency_ms,
            },
        }
    }
}

/// 64-bit FNV-1a over the conversation id
fn fnv1a(input: &str) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    input
        .bytes()
        .fold(OFFSET, |hash, b| (hash ^ b as u64).wrapping_mul(PRIME))
}
