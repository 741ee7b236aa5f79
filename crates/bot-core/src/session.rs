//! Session Management
//!
//! Per-chat conversation state. Each chat owns at most one active flow;
//! the flow's collected values live in an explicit `FlowState` handed to
//! the flow on every step, never in ambient shared state.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::message::ChatId;

/// State of the flow a chat is currently inside
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FlowState {
    /// Name of the active flow
    pub flow: String,

    /// Zero-based step counter, advanced by the dispatcher
    pub step: u32,

    /// Values collected so far (e.g. "coin_id", "entry")
    pub values: HashMap<String, serde_json::Value>,
}

impl FlowState {
    pub fn new(flow: impl Into<String>) -> Self {
        Self {
            flow: flow.into(),
            step: 0,
            values: HashMap::new(),
        }
    }

    /// Store a collected value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Fetch a collected string value
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(|v| v.as_str())
    }

    /// Fetch a collected numeric value
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.values.get(key).and_then(serde_json::Value::as_f64)
    }
}

/// Transient per-chat session
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatSession {
    /// Owning chat
    pub chat: ChatId,

    /// Active flow state, if any
    pub flow: Option<FlowState>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last activity timestamp
    pub updated_at: DateTime<Utc>,
}

impl ChatSession {
    /// Create a fresh session for a chat
    pub fn new(chat: ChatId) -> Self {
        let now = Utc::now();
        Self {
            chat,
            flow: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Update the activity timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Enter a flow, replacing any active one
    pub fn begin_flow(&mut self, name: impl Into<String>) -> &mut FlowState {
        self.flow = Some(FlowState::new(name));
        self.touch();
        self.flow.as_mut().expect("flow was just set")
    }

    /// Leave the active flow, discarding collected values
    pub fn end_flow(&mut self) {
        self.flow = None;
        self.touch();
    }

    /// Whether a flow is in progress
    pub fn in_flow(&self) -> bool {
        self.flow.is_some()
    }
}

/// Session store trait for persistence
pub trait SessionStore: Send + Sync {
    /// Save a session
    fn save(&self, session: &ChatSession) -> crate::Result<()>;

    /// Load a session by chat
    fn load(&self, chat: &ChatId) -> crate::Result<Option<ChatSession>>;

    /// Delete a session
    fn delete(&self, chat: &ChatId) -> crate::Result<()>;
}

/// In-memory session store (for development/testing)
pub struct MemorySessionStore {
    sessions: std::sync::RwLock<HashMap<ChatId, ChatSession>>,
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: std::sync::RwLock::new(HashMap::new()),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn save(&self, session: &ChatSession) -> crate::Result<()> {
        let mut sessions = self.sessions.write().unwrap();
        sessions.insert(session.chat.clone(), session.clone());
        Ok(())
    }

    fn load(&self, chat: &ChatId) -> crate::Result<Option<ChatSession>> {
        let sessions = self.sessions.read().unwrap();
        Ok(sessions.get(chat).cloned())
    }

    fn delete(&self, chat: &ChatId) -> crate::Result<()> {
        let mut sessions = self.sessions.write().unwrap();
        sessions.remove(chat);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_flow_lifecycle() {
        let mut session = ChatSession::new(ChatId::from_string("c1"));
        assert!(!session.in_flow());

        let state = session.begin_flow("rsi");
        state.set("coin_id", "bitcoin");
        assert!(session.in_flow());
        assert_eq!(
            session.flow.as_ref().unwrap().get_str("coin_id"),
            Some("bitcoin")
        );

        session.end_flow();
        assert!(!session.in_flow());
    }

    #[test]
    fn test_memory_store() {
        let store = MemorySessionStore::new();
        let chat = ChatId::from_string("c1");
        let session = ChatSession::new(chat.clone());

        store.save(&session).unwrap();

        let loaded = store.load(&chat).unwrap();
        assert!(loaded.is_some());
        assert_eq!(loaded.unwrap().chat, chat);

        store.delete(&chat).unwrap();
        assert!(store.load(&chat).unwrap().is_none());
    }

    #[test]
    fn test_flow_state_values() {
        let mut state = FlowState::new("riskreward");
        state.set("entry", 110.0);
        state.set("stop", 95.0);

        assert_eq!(state.get_f64("entry"), Some(110.0));
        assert_eq!(state.get_f64("target"), None);
        assert_eq!(state.get_str("entry"), None);
    }
}
