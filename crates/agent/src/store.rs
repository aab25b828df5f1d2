//! Bounded conversation store
//!
//! The table lock guards only the id → conversation map. Each conversation
//! sits behind its own mutex, so work on one conversation is serialized
//! while different conversations proceed in parallel. Callers lock the
//! conversation after the table lock has been released, so an entry the
//! table is not the sole owner of is in flight and never removed.

use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use honeypot_config::EngineConfig;
use honeypot_core::{ConversationStage, IdentifierKind, PersonaKind};

use crate::conversation::Conversation;

/// Store limits
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub max_conversations: usize,
    pub idle_timeout: Duration,
    pub cleanup_interval: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_conversations: 10_000,
            idle_timeout: Duration::from_secs(3600),
            cleanup_interval: Duration::from_secs(300),
        }
    }
}

impl From<&EngineConfig> for StoreConfig {
    fn from(config: &EngineConfig) -> Self {
        Self {
            max_conversations: config.max_conversations.max(1),
            idle_timeout: Duration::from_secs(config.idle_timeout_seconds),
            cleanup_interval: Duration::from_secs(config.cleanup_interval_seconds),
        }
    }
}

/// Lightweight listing entry
#[derive(Debug, Clone, Serialize)]
pub struct ConversationSummary {
    pub conversation_id: String,
    pub persona: PersonaKind,
    pub stage: ConversationStage,
    pub turn_count: usize,
    pub identifiers_captured: usize,
    pub missing: Vec<IdentifierKind>,
    pub started_at: DateTime<Utc>,
    pub idle_secs: u64,
}

type Entry = Arc<Mutex<Conversation>>;

/// Held by a caller or locked right now
fn in_use(entry: &Entry) -> bool {
    Arc::strong_count(entry) > 1 || entry.is_locked()
}

/// Conversation table
pub struct ConversationStore {
    conversations: RwLock<HashMap<String, Entry>>,
    config: StoreConfig,
}

impl ConversationStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            conversations: RwLock::new(HashMap::new()),
            config,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Fetch a conversation, materializing it with `create` if unseen
    ///
    /// Returns the entry and whether it was created by this call. Inserting
    /// at capacity first drops idle-expired conversations, then evicts the
    /// least recently active one.
    pub fn get_or_create<F>(&self, id: &str, create: F) -> (Entry, bool)
    where
        F: FnOnce() -> Conversation,
    {
        if let Some(entry) = self.conversations.read().get(id) {
            return (Arc::clone(entry), false);
        }

        let mut conversations = self.conversations.write();

        // Another caller may have inserted while we waited for the write lock
        if let Some(entry) = conversations.get(id) {
            return (Arc::clone(entry), false);
        }

        if conversations.len() >= self.config.max_conversations {
            self.cleanup_expired_internal(&mut conversations);
            if conversations.len() >= self.config.max_conversations {
                self.evict_least_recent(&mut conversations);
            }
        }

        let entry = Arc::new(Mutex::new(create()));
        conversations.insert(id.to_string(), Arc::clone(&entry));
        (entry, true)
    }

    /// Get a conversation by ID
    pub fn get(&self, id: &str) -> Option<Entry> {
        self.conversations.read().get(id).cloned()
    }

    /// Remove a conversation. Returns true if it existed.
    pub fn remove(&self, id: &str) -> bool {
        let removed = self.conversations.write().remove(id).is_some();
        if removed {
            tracing::info!(conversation_id = %id, "Removed conversation");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.conversations.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop conversations idle longer than the timeout. Returns how many were removed.
    pub fn cleanup_expired(&self) -> usize {
        let mut conversations = self.conversations.write();
        self.cleanup_expired_internal(&mut conversations)
    }

    fn cleanup_expired_internal(&self, conversations: &mut HashMap<String, Entry>) -> usize {
        let timeout = self.config.idle_timeout;
        let expired: Vec<String> = conversations
            .iter()
            .filter(|(_, entry)| {
                !in_use(entry)
                    && entry
                        .try_lock()
                        .is_some_and(|conv| conv.last_activity().elapsed() >= timeout)
            })
            .map(|(id, _)| id.clone())
            .collect();

        for id in &expired {
            conversations.remove(id);
            tracing::info!(conversation_id = %id, "Expired conversation");
        }

        if !expired.is_empty() {
            metrics::counter!("honeypot_conversations_evicted_total", "reason" => "idle")
                .increment(expired.len() as u64);
        }

        expired.len()
    }

    fn evict_least_recent(&self, conversations: &mut HashMap<String, Entry>) {
        let oldest = conversations
            .iter()
            .filter(|(_, entry)| !in_use(entry))
            .filter_map(|(id, entry)| entry.try_lock().map(|conv| (id.clone(), conv.last_activity())))
            .min_by_key(|(_, last_activity)| *last_activity)
            .map(|(id, _)| id);

        if let Some(id) = oldest {
            conversations.remove(&id);
            metrics::counter!("honeypot_conversations_evicted_total", "reason" => "capacity")
                .increment(1);
            tracing::info!(
                conversation_id = %id,
                capacity = self.config.max_conversations,
                "Evicted least recently active conversation"
            );
        } else {
            tracing::warn!("Conversation store at capacity and every conversation is in use");
        }
    }

    /// Summaries of all conversations that are not currently locked
    pub fn list(&self) -> Vec<ConversationSummary> {
        let entries: Vec<Entry> = self.conversations.read().values().cloned().collect();
        let mut summaries: Vec<ConversationSummary> = entries
            .iter()
            .filter_map(|entry| {
                entry.try_lock().map(|conv| ConversationSummary {
                    conversation_id: conv.id().to_string(),
                    persona: conv.persona_kind(),
                    stage: conv.stage(),
                    turn_count: conv.turn_count(),
                    identifiers_captured: conv.beliefs().captured_count(),
                    missing: conv.beliefs().missing(),
                    started_at: conv.started_at(),
                    idle_secs: conv.idle_secs(),
                })
            })
            .collect();
        summaries.sort_by(|a, b| a.conversation_id.cmp(&b.conversation_id));
        summaries
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::Rapport;
    use honeypot_core::PersonaProfile;
    use std::thread::sleep;

    fn make(id: &str) -> impl FnOnce() -> Conversation + '_ {
        move || {
            Conversation::new(
                id,
                PersonaProfile::for_kind(PersonaKind::ConfusedElder),
                Rapport::new(0.3, 0.1, 1.0),
                Conversation::rng_for(Some(1), id),
            )
        }
    }

    fn store(max: usize, idle: Duration) -> ConversationStore {
        ConversationStore::new(StoreConfig {
            max_conversations: max,
            idle_timeout: idle,
            cleanup_interval: Duration::from_secs(1),
        })
    }

    #[test]
    fn test_get_or_create_reuses_entry() {
        let store = ConversationStore::default();
        let (first, created) = store.get_or_create("conv_1", make("conv_1"));
        assert!(created);
        first.lock().push_inbound("hello");

        let (second, created) = store.get_or_create("conv_1", make("conv_1"));
        assert!(!created);
        assert_eq!(second.lock().turn_count(), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_get_and_remove() {
        let store = ConversationStore::default();
        store.get_or_create("conv_1", make("conv_1"));

        assert!(store.get("conv_1").is_some());
        assert!(store.get("missing").is_none());
        assert!(store.remove("conv_1"));
        assert!(!store.remove("conv_1"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_capacity_evicts_least_recent() {
        let store = store(2, Duration::from_secs(3600));
        store.get_or_create("a", make("a"));
        sleep(Duration::from_millis(5));
        store.get_or_create("b", make("b"));
        sleep(Duration::from_millis(5));

        // Activity on "a" makes "b" the least recent
        store.get("a").unwrap().lock().push_inbound("still here");
        sleep(Duration::from_millis(5));

        store.get_or_create("c", make("c"));
        assert_eq!(store.len(), 2);
        assert!(store.get("a").is_some());
        assert!(store.get("b").is_none());
        assert!(store.get("c").is_some());
    }

    #[test]
    fn test_cleanup_expired() {
        let store = store(10, Duration::from_millis(20));
        store.get_or_create("old", make("old"));
        sleep(Duration::from_millis(40));
        store.get_or_create("fresh", make("fresh"));

        assert_eq!(store.cleanup_expired(), 1);
        assert!(store.get("old").is_none());
        assert!(store.get("fresh").is_some());
    }

    #[test]
    fn test_busy_conversation_is_not_expired() {
        let store = store(10, Duration::ZERO);
        let (entry, _) = store.get_or_create("busy", make("busy"));
        let _guard = entry.lock();

        assert_eq!(store.cleanup_expired(), 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_held_conversation_survives_capacity_and_cleanup() {
        let store = store(1, Duration::ZERO);
        let (held, _) = store.get_or_create("a", make("a"));

        // Inserting at capacity must not evict a conversation a caller holds
        let (_, created) = store.get_or_create("b", make("b"));
        assert!(created);
        assert!(store.get("a").is_some());

        // The sweep drops the unheld "b" but keeps "a"
        assert_eq!(store.cleanup_expired(), 1);
        assert!(store.get("a").is_some());
        assert!(store.get("b").is_none());

        held.lock().push_inbound("still talking");
        let (again, created) = store.get_or_create("a", make("a"));
        assert!(!created);
        assert_eq!(again.lock().turn_count(), 1);

        drop(held);
        drop(again);
        assert_eq!(store.cleanup_expired(), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn test_list_summaries() {
        let store = ConversationStore::default();
        store.get_or_create("b", make("b"));
        let (a, _) = store.get_or_create("a", make("a"));
        a.lock().push_inbound("first");

        let list = store.list();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].conversation_id, "a");
        assert_eq!(list[0].turn_count, 1);
        assert_eq!(list[1].stage, ConversationStage::New);
        assert_eq!(list[1].missing.len(), 5);
    }

    #[test]
    fn test_config_from_engine_settings() {
        let config = StoreConfig::from(&EngineConfig::default());
        assert_eq!(config.max_conversations, 10_000);
        assert_eq!(config.idle_timeout, Duration::from_secs(3600));
        assert_eq!(config.cleanup_interval, Duration::from_secs(300));
    }
}
