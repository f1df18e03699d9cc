//! Per-client session state: the prediction result slot and chat history.
//!
//! A session is identified by a random id in the `childhealth_session`
//! cookie. Each session owns one result slot (last write wins) and one chat
//! transcript. Nothing is shared between sessions. Both stores are bounded:
//! idle sessions expire and the least recently written session is evicted
//! once capacity is reached.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use childhealth_common::config::ServerConfig;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "childhealth_session";

/// Session id from the cookie jar, minting (and setting) a new one if absent.
pub fn session_id(jar: CookieJar) -> (CookieJar, String) {
    if let Some(id) = jar
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
    {
        return (jar, id);
    }
    let id = Uuid::new_v4().to_string();
    let cookie = Cookie::build((SESSION_COOKIE, id.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    (jar.add(cookie), id)
}

// ── Bounded session map ───────────────────────────────────────────────────────

/// Eviction policy shared by the per-session stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLimits {
    /// Live sessions kept at most; the least recently written one is dropped.
    pub capacity: usize,
    /// A session not written for longer than this is gone.
    pub idle_ttl: Duration,
}

impl SessionLimits {
    pub fn from_config(cfg: &ServerConfig) -> Self {
        Self { capacity: cfg.max_sessions, idle_ttl: Duration::from_secs(cfg.session_idle_secs) }
    }
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self::from_config(&ServerConfig::default())
    }
}

struct Entry<V> {
    value: V,
    touched: Instant,
}

struct SessionMap<V> {
    entries: RwLock<HashMap<String, Entry<V>>>,
    limits: SessionLimits,
}

impl<V: Clone> SessionMap<V> {
    fn new(limits: SessionLimits) -> Self {
        Self { entries: RwLock::new(HashMap::new()), limits }
    }

    fn is_live(&self, entry: &Entry<V>, now: Instant) -> bool {
        now.saturating_duration_since(entry.touched) <= self.limits.idle_ttl
    }

    fn get_at(&self, session: &str, now: Instant) -> Option<V> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(session)
            .filter(|e| self.is_live(e, now))
            .map(|e| e.value.clone())
    }

    /// Apply `f` to the session's value, creating it with `init` if absent.
    /// Idle sessions are swept first; a new session past capacity evicts the
    /// least recently written one.
    fn write_at(&self, session: &str, now: Instant, init: impl FnOnce() -> V, f: impl FnOnce(&mut V)) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);

        let before = entries.len();
        entries.retain(|_, e| self.is_live(e, now));
        if entries.len() < before {
            debug!(expired = before - entries.len(), "idle sessions dropped");
        }

        if !entries.contains_key(session) && entries.len() >= self.limits.capacity.max(1) {
            let oldest = entries
                .iter()
                .min_by_key(|(_, e)| e.touched)
                .map(|(k, _)| k.clone());
            if let Some(key) = oldest {
                debug!("session capacity reached, evicting least recently used");
                entries.remove(&key);
            }
        }

        let entry = entries
            .entry(session.to_string())
            .or_insert_with(|| Entry { value: init(), touched: now });
        entry.touched = now;
        f(&mut entry.value);
    }

    fn remove(&self, session: &str) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.remove(session);
    }

    fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

// ── Result store ──────────────────────────────────────────────────────────────

/// Single-slot, last-write-wins store of serialised prediction payloads.
///
/// The slot holds text, not a typed payload, so whatever was written is read
/// back verbatim and the results view decides whether it is usable.
pub trait ResultStore: Send + Sync {
    fn get(&self, session: &str) -> Option<String>;
    fn set(&self, session: &str, payload: String);
    fn clear(&self, session: &str);
}

pub struct InMemoryResultStore {
    slots: SessionMap<String>,
}

impl InMemoryResultStore {
    pub fn new() -> Self {
        Self::with_limits(SessionLimits::default())
    }

    pub fn with_limits(limits: SessionLimits) -> Self {
        Self { slots: SessionMap::new(limits) }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryResultStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultStore for InMemoryResultStore {
    fn get(&self, session: &str) -> Option<String> {
        self.slots.get_at(session, Instant::now())
    }

    fn set(&self, session: &str, payload: String) {
        self.slots.write_at(session, Instant::now(), String::new, |slot| *slot = payload);
    }

    fn clear(&self, session: &str) {
        self.slots.remove(session);
    }
}

// ── Chat history ──────────────────────────────────────────────────────────────

/// Messages kept per transcript; older ones are dropped first.
pub const MAX_CHAT_MESSAGES: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

pub struct ChatHistoryStore {
    sessions: SessionMap<Vec<ChatMessage>>,
}

impl ChatHistoryStore {
    pub fn new() -> Self {
        Self::with_limits(SessionLimits::default())
    }

    pub fn with_limits(limits: SessionLimits) -> Self {
        Self { sessions: SessionMap::new(limits) }
    }

    pub fn history(&self, session: &str) -> Vec<ChatMessage> {
        self.sessions.get_at(session, Instant::now()).unwrap_or_default()
    }

    /// Record one question and its reply.
    pub fn push_exchange(&self, session: &str, question: &str, reply: String) {
        self.sessions.write_at(session, Instant::now(), Vec::new, |history| {
            history.push(ChatMessage { role: ChatRole::User, content: question.to_string() });
            history.push(ChatMessage { role: ChatRole::Assistant, content: reply });
            if history.len() > MAX_CHAT_MESSAGES {
                let excess = history.len() - MAX_CHAT_MESSAGES;
                history.drain(..excess);
            }
        });
    }

    pub fn clear(&self, session: &str) {
        self.sessions.remove(session);
    }
}

impl Default for ChatHistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_result_slot_overwrites() {
        let store = InMemoryResultStore::new();
        assert_eq!(store.get("s1"), None);
        store.set("s1", "first".into());
        store.set("s1", "second".into());
        assert_eq!(store.get("s1").as_deref(), Some("second"));
        assert_eq!(store.get("s2"), None);
        store.clear("s1");
        assert_eq!(store.get("s1"), None);
    }

    #[test]
    fn test_chat_history_per_session() {
        let chats = ChatHistoryStore::new();
        chats.push_exchange("a", "hello", "hi there".into());
        assert_eq!(chats.history("a").len(), 2);
        assert_eq!(chats.history("a")[0].role, ChatRole::User);
        assert_eq!(chats.history("a")[1].content, "hi there");
        assert!(chats.history("b").is_empty());
        chats.clear("a");
        assert!(chats.history("a").is_empty());
    }

    fn limits(capacity: usize, idle_secs: u64) -> SessionLimits {
        SessionLimits { capacity, idle_ttl: Duration::from_secs(idle_secs) }
    }

    #[test]
    fn test_capacity_evicts_least_recently_written() {
        let map: SessionMap<String> = SessionMap::new(limits(2, 3600));
        let t0 = Instant::now();
        map.write_at("a", t0, String::new, |v| *v = "a".into());
        map.write_at("b", t0 + Duration::from_secs(1), String::new, |v| *v = "b".into());
        // Rewriting "a" makes "b" the oldest.
        map.write_at("a", t0 + Duration::from_secs(2), String::new, |v| *v = "a2".into());
        map.write_at("c", t0 + Duration::from_secs(3), String::new, |v| *v = "c".into());

        let now = t0 + Duration::from_secs(4);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get_at("a", now).as_deref(), Some("a2"));
        assert_eq!(map.get_at("b", now), None);
        assert_eq!(map.get_at("c", now).as_deref(), Some("c"));
    }

    #[test]
    fn test_idle_sessions_expire() {
        let map: SessionMap<String> = SessionMap::new(limits(100, 60));
        let t0 = Instant::now();
        map.write_at("old", t0, String::new, |v| *v = "x".into());
        assert_eq!(map.get_at("old", t0 + Duration::from_secs(60)).as_deref(), Some("x"));
        assert_eq!(map.get_at("old", t0 + Duration::from_secs(61)), None);

        // The next write sweeps it out.
        map.write_at("new", t0 + Duration::from_secs(61), String::new, |v| *v = "y".into());
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_cookieless_clients_stay_bounded() {
        let store = InMemoryResultStore::with_limits(limits(8, 3600));
        for _ in 0..100 {
            let (_, id) = session_id(CookieJar::new());
            store.set(&id, "{}".into());
        }
        assert_eq!(store.len(), 8);
    }

    #[test]
    fn test_transcript_is_capped() {
        let chats = ChatHistoryStore::new();
        for i in 0..MAX_CHAT_MESSAGES {
            chats.push_exchange("a", &format!("q{i}"), format!("r{i}"));
        }
        let history = chats.history("a");
        assert_eq!(history.len(), MAX_CHAT_MESSAGES);
        assert_eq!(history.last().map(|m| m.content.as_str()), Some("r49"));
        assert_eq!(history[0].content, format!("q{}", MAX_CHAT_MESSAGES / 2));
    }

    #[test]
    fn test_session_id_minted_once() {
        let (jar, id) = session_id(CookieJar::new());
        assert!(Uuid::parse_str(&id).is_ok());
        let (_, again) = session_id(jar);
        assert_eq!(again, id);
    }
}
