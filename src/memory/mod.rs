//! Session-scoped conversational memory.
//!
//! Each session keeps a short rolling window of past turns so follow-up
//! questions can be resolved against what was already discussed. Memory
//! lives for the life of the process only; nothing is persisted.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Instant;

use chrono::{DateTime, Utc};

pub const DEFAULT_MAX_TURNS: usize = 5;
pub const DEFAULT_MAX_SESSIONS: usize = 1024;

/// One completed question/answer exchange.
///
/// Created only after the full answer is known; never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Turn {
    pub user_text: String,
    pub assistant_text: String,
    pub context_summary: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Bounded FIFO buffer of the most recent turns of one session.
#[derive(Debug)]
pub struct SessionMemory {
    turns: VecDeque<Turn>,
    max_turns: usize,
}

impl SessionMemory {
    /// Capacity is fixed here and cannot be changed afterwards.
    pub fn new(max_turns: usize) -> Self {
        Self {
            turns: VecDeque::new(),
            max_turns,
        }
    }

    /// Append a turn, evicting the oldest while over capacity.
    ///
    /// Always succeeds; the `turns.len() <= max_turns` invariant holds on
    /// return.
    pub fn add_turn(
        &mut self,
        user_text: impl Into<String>,
        assistant_text: impl Into<String>,
        context_summary: Option<String>,
    ) {
        self.turns.push_back(Turn {
            user_text: user_text.into(),
            assistant_text: assistant_text.into(),
            context_summary,
            created_at: Utc::now(),
        });
        while self.turns.len() > self.max_turns {
            self.turns.pop_front();
        }
    }

    /// Render all turns in chronological order as
    /// `User: <text>\nAssistant: <text>` lines. Empty string when no turns
    /// exist. Read-only.
    pub fn formatted_history(&self) -> String {
        let mut lines = Vec::with_capacity(self.turns.len() * 2);
        for turn in &self.turns {
            lines.push(format!("User: {}", turn.user_text));
            lines.push(format!("Assistant: {}", turn.assistant_text));
        }
        lines.join("\n")
    }

    pub fn turns(&self) -> &VecDeque<Turn> {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

struct SessionSlot {
    memory: Arc<Mutex<SessionMemory>>,
    touched_at: Instant,
}

/// Process-wide registry mapping session ids to their memory.
///
/// Session ids are opaque, caller-supplied and untrusted; the empty string
/// is a valid, distinct session. Entries are created lazily on first
/// reference. The registry itself is capped: once `max_sessions` is reached
/// the least-recently-touched session is dropped to make room.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionSlot>>,
    max_turns: usize,
    max_sessions: usize,
}

impl SessionStore {
    pub fn new(max_turns: usize, max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_turns,
            max_sessions,
        }
    }

    /// Fetch the memory for `session_id`, creating it on first reference.
    ///
    /// The returned handle carries its own lock; callers serialize turn
    /// writes for one session by locking it around the mutation.
    pub fn session(&self, session_id: &str) -> Arc<Mutex<SessionMemory>> {
        let mut sessions = self.sessions.write().expect("session registry poisoned");

        if !sessions.contains_key(session_id) && sessions.len() >= self.max_sessions {
            if let Some(oldest) = sessions
                .iter()
                .min_by_key(|(_, slot)| slot.touched_at)
                .map(|(id, _)| id.clone())
            {
                tracing::warn!(session = %oldest, "session cap reached, evicting oldest session");
                sessions.remove(&oldest);
            }
        }

        let slot = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| SessionSlot {
                memory: Arc::new(Mutex::new(SessionMemory::new(self.max_turns))),
                touched_at: Instant::now(),
            });
        slot.touched_at = Instant::now();
        slot.memory.clone()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.read().expect("session registry poisoned").len()
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.sessions
            .read()
            .expect("session registry poisoned")
            .contains_key(session_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_history_is_empty_string() {
        let memory = SessionMemory::new(5);
        assert_eq!(memory.formatted_history(), "");
    }

    #[test]
    fn single_turn_renders_two_lines() {
        let mut memory = SessionMemory::new(5);
        memory.add_turn("hi", "hello", None);
        assert_eq!(memory.formatted_history(), "User: hi\nAssistant: hello");
    }

    #[test]
    fn capacity_holds_after_every_insert() {
        let mut memory = SessionMemory::new(3);
        for i in 0..10 {
            memory.add_turn(format!("q{}", i), format!("a{}", i), None);
            assert!(memory.len() <= 3);
        }
        // Retained turns are exactly the most recent three, oldest first.
        let users: Vec<&str> = memory.turns().iter().map(|t| t.user_text.as_str()).collect();
        assert_eq!(users, vec!["q7", "q8", "q9"]);
    }

    #[test]
    fn context_summary_is_kept() {
        let mut memory = SessionMemory::new(2);
        memory.add_turn("q", "a", Some("summary".to_string()));
        assert_eq!(
            memory.turns()[0].context_summary.as_deref(),
            Some("summary")
        );
    }

    #[test]
    fn store_creates_lazily_and_reuses() {
        let store = SessionStore::new(5, 16);
        assert!(!store.contains("s1"));

        let first = store.session("s1");
        first.lock().unwrap().add_turn("q", "a", None);

        let again = store.session("s1");
        assert_eq!(again.lock().unwrap().len(), 1);
        assert_eq!(store.session_count(), 1);
    }

    #[test]
    fn sessions_are_independent() {
        let store = SessionStore::new(5, 16);
        store.session("s1").lock().unwrap().add_turn("q1", "a1", None);
        store.session("s2").lock().unwrap().add_turn("q2", "a2", None);
        store.session("s2").lock().unwrap().add_turn("q3", "a3", None);

        assert_eq!(store.session("s1").lock().unwrap().len(), 1);
        assert_eq!(store.session("s2").lock().unwrap().len(), 2);
    }

    #[test]
    fn empty_string_is_a_valid_session_id() {
        let store = SessionStore::new(5, 16);
        store.session("").lock().unwrap().add_turn("q", "a", None);
        assert!(store.contains(""));
        assert_eq!(store.session("").lock().unwrap().len(), 1);
    }

    #[test]
    fn store_evicts_oldest_session_at_cap() {
        let store = SessionStore::new(5, 2);
        store.session("first");
        std::thread::sleep(std::time::Duration::from_millis(5));
        store.session("second");
        std::thread::sleep(std::time::Duration::from_millis(5));
        store.session("third");

        assert_eq!(store.session_count(), 2);
        assert!(!store.contains("first"));
        assert!(store.contains("second"));
        assert!(store.contains("third"));
    }
}
