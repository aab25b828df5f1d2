//! End-to-end conversation scenarios against the engine

use std::sync::Arc;

use honeypot_agent::ConversationEngine;
use honeypot_config::{EngineConfig, PersonasConfig, QuestionTemplates};
use honeypot_core::{ConversationStage, Goal, PersonaKind, PersonaProfile};

fn engine_with(config: EngineConfig) -> ConversationEngine {
    ConversationEngine::new(config, PersonasConfig::default(), QuestionTemplates::default())
        .expect("default engine config is valid")
}

fn engine() -> ConversationEngine {
    engine_with(EngineConfig::default().with_seed(2024))
}

#[test]
fn blocked_account_message_asks_for_bank() {
    let engine = engine();
    let view = engine.handle_message("conv_1", "Your bank account is blocked. Verify now.");

    assert!(view.scam_detected);
    assert_eq!(view.confidence, 1.0);
    assert_eq!(view.turn_count, 1);
    assert_eq!(view.goal, Some(Goal::Bank));
    assert_eq!(view.beliefs.scam_type.as_deref(), Some("bank_impersonation"));
    assert!(view.beliefs.bank.is_none());
    assert!(view.beliefs.upi_handle.is_none());

    let profile = PersonaProfile::for_kind(view.persona);
    let templates = QuestionTemplates::default();
    let matches = profile.tone_prefixes.iter().any(|prefix| {
        templates
            .bank
            .iter()
            .any(|question| view.reply_text == format!("{} {}", prefix, question))
    });
    assert!(matches, "unexpected reply: {}", view.reply_text);
}

#[test]
fn bank_routing_and_handle_known_asks_for_link() {
    let engine = engine();
    let first = engine.handle_message("conv_2", "Your HDFC account is blocked, verify now");
    assert_eq!(first.beliefs.bank.as_deref(), Some("HDFC"));
    assert_eq!(first.goal, Some(Goal::RoutingCode));

    let second = engine.handle_message(
        "conv_2",
        "Use IFSC HDFC0001234 and pay to refund.desk@upi urgently",
    );

    assert!(second.scam_detected);
    assert_eq!(second.beliefs.ifsc_code.as_deref(), Some("HDFC0001234"));
    assert_eq!(second.beliefs.upi_handle.as_deref(), Some("refund.desk@upi"));
    assert!(second.beliefs.phishing_url.is_none());
    assert_eq!(second.goal, Some(Goal::PhishingUrl));
    assert_eq!(second.turn_count, 2);
}

#[test]
fn everything_in_one_message_moves_to_stall() {
    let engine = engine();
    let view = engine.handle_message(
        "conv_3",
        "pay.me@upi http://scam.example 9876543210 HDFC0001234",
    );

    assert!(view.scam_detected);
    assert_eq!(view.confidence, 0.8);
    assert_eq!(view.beliefs.upi_handle.as_deref(), Some("pay.me@upi"));
    assert_eq!(view.beliefs.phishing_url.as_deref(), Some("http://scam.example"));
    assert_eq!(view.beliefs.phone_number.as_deref(), Some("9876543210"));
    assert_eq!(view.beliefs.ifsc_code.as_deref(), Some("HDFC0001234"));
    assert_eq!(view.beliefs.bank.as_deref(), Some("HDFC"));
    assert_eq!(view.goal, Some(Goal::Stall));
}

#[test]
fn captured_identifiers_are_not_overwritten() {
    let engine = engine();
    engine.handle_message("conv_4", "Pay now to first.desk@upi, urgent refund");
    let view = engine.handle_message("conv_4", "Pay now to second.desk@upi, urgent refund");

    assert_eq!(view.beliefs.upi_handle.as_deref(), Some("first.desk@upi"));
}

#[test]
fn trust_and_suspicion_rise_per_engaged_turn() {
    let engine = engine();
    let text = "Your bank account is blocked. Verify now.";

    let first = engine.handle_message("conv_5", text);
    let second = engine.handle_message("conv_5", text);
    let profile = PersonaProfile::for_kind(first.persona);

    assert!((first.trust_level - (0.3 + profile.trust_gain)).abs() < 0.011);
    assert!((first.suspicion - (0.1 + profile.suspicion_gain)).abs() < 0.011);
    assert!((second.trust_level - (0.3 + 2.0 * profile.trust_gain)).abs() < 0.011);
    assert!((second.suspicion - (0.1 + 2.0 * profile.suspicion_gain)).abs() < 0.011);
}

#[test]
fn out_of_scope_turn_changes_nothing_but_the_log() {
    let engine = engine();
    let engaged = engine.handle_message("conv_6", "Your bank account is blocked. Verify now.");
    let idle = engine.handle_message("conv_6", "who is this?");

    assert!(!idle.scam_detected);
    assert!(idle.reply_text.is_empty());
    assert_eq!(idle.trust_level, engaged.trust_level);
    assert_eq!(idle.suspicion, engaged.suspicion);
    assert_eq!(idle.turn_count, 2);
    assert_eq!(idle.engagement.agent_turns, 1);
    assert_eq!(idle.stage, ConversationStage::Engaging);
}

#[test]
fn questions_never_repeat_back_to_back() {
    let engine = engine();
    let templates = QuestionTemplates::default();
    let known: Vec<&String> = templates.bank.iter().chain(templates.stall.iter()).collect();

    let mut previous: Option<String> = None;
    for _ in 0..30 {
        let view = engine.handle_message("conv_7", "Your account is blocked. Verify now.");
        assert_eq!(view.goal, Some(Goal::Bank));

        let question = known
            .iter()
            .find(|q| view.reply_text.ends_with(q.as_str()))
            .map(|q| q.to_string())
            .expect("reply ends with a known question");

        assert_ne!(previous.as_deref(), Some(question.as_str()));
        previous = Some(question);
    }
}

#[test]
fn ceiling_caps_trust() {
    let engine = engine();
    let mut last = None;
    for _ in 0..20 {
        last = Some(engine.handle_message("conv_8", "Your bank account is blocked. Verify now."));
    }
    let view = last.unwrap();
    assert_eq!(view.trust_level, 1.0);
    assert!(view.suspicion <= 1.0);
}

#[test]
fn conversations_are_isolated() {
    let engine = engine();
    engine.handle_message("conv_a", "pay.me@upi http://scam.example 9876543210 HDFC0001234");
    let other = engine.handle_message("conv_b", "Your bank account is blocked. Verify now.");

    assert!(other.beliefs.upi_handle.is_none());
    assert_eq!(other.goal, Some(Goal::Bank));
    assert_eq!(engine.store().len(), 2);
}

#[test]
fn single_persona_table_assigns_that_persona() {
    let personas = PersonasConfig {
        personas: vec![PersonaProfile::for_kind(PersonaKind::AnxiousStudent)],
    };
    let engine = ConversationEngine::new(
        EngineConfig::default(),
        personas,
        QuestionTemplates::default(),
    )
    .unwrap();

    for id in ["x", "y", "z"] {
        assert_eq!(engine.handle_message(id, "hello").persona, PersonaKind::AnxiousStudent);
    }
}

#[test]
fn capacity_evicts_oldest_conversation() {
    let engine = engine_with(EngineConfig::default().with_seed(1).with_max_conversations(2));
    engine.handle_message("first", "hello");
    std::thread::sleep(std::time::Duration::from_millis(5));
    engine.handle_message("second", "hello");
    std::thread::sleep(std::time::Duration::from_millis(5));
    engine.handle_message("third", "hello");

    assert_eq!(engine.store().len(), 2);
    assert!(engine.snapshot("first").is_none());
    assert!(engine.snapshot("third").is_some());
}

#[test]
fn concurrent_callers_share_one_conversation() {
    let engine = Arc::new(engine());
    let threads: Vec<_> = (0..8)
        .map(|i| {
            let engine = Arc::clone(&engine);
            std::thread::spawn(move || {
                for _ in 0..25 {
                    engine.handle_message("shared", "Your bank account is blocked. Verify now.");
                    engine.handle_message(&format!("own_{}", i), "hello");
                }
            })
        })
        .collect();

    for handle in threads {
        handle.join().unwrap();
    }

    let shared = engine.snapshot("shared").unwrap();
    assert_eq!(shared.turn_count, 200);
    assert_eq!(shared.engagement.agent_turns, 200);
    assert_eq!(engine.store().len(), 9);
}
