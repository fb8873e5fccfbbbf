//! # Session Store
//!
//! Bounded map of active sessions keyed by [`SessionId`].
//!
//! ## Design Principles
//!
//! - `BTreeMap` for deterministic ordering
//! - Integer-only timestamps (logical clock, not wall clock)
//! - Least recently touched sessions are evicted in batches when full
//!
//! The store does not create identifiers and does not expire sessions on its
//! own; the caller decides when a session starts and when it is finished.

use crate::SessionId;
use crate::session::Session;
use std::collections::BTreeMap;

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Default maximum number of live sessions.
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

/// Default eviction batch size (number of sessions dropped at once).
pub const DEFAULT_EVICTION_BATCH: usize = 100;

// =============================================================================
// ENTRY
// =============================================================================

#[derive(Debug, Clone)]
struct StoreEntry {
    session: Session,
    /// Logical timestamp of last access (for LRU ordering).
    last_access: u64,
}

// =============================================================================
// STORE
// =============================================================================

/// Session map with least-recently-used eviction.
#[derive(Debug)]
pub struct SessionStore {
    entries: BTreeMap<SessionId, StoreEntry>,
    max_sessions: usize,
    eviction_batch: usize,
    logical_clock: u64,
    created: u64,
    completed: u64,
    evicted: u64,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SESSIONS)
    }
}

impl SessionStore {
    /// Create a store holding at most `max_sessions` sessions.
    #[must_use]
    pub fn new(max_sessions: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            max_sessions: max_sessions.max(1),
            eviction_batch: DEFAULT_EVICTION_BATCH,
            logical_clock: 0,
            created: 0,
            completed: 0,
            evicted: 0,
        }
    }

    fn tick(&mut self) -> u64 {
        self.logical_clock = self.logical_clock.saturating_add(1);
        self.logical_clock
    }

    /// Session for `id`, created empty if absent.
    pub fn get_or_create(&mut self, id: &SessionId) -> &mut Session {
        let timestamp = self.tick();

        if !self.entries.contains_key(id) {
            if self.entries.len() >= self.max_sessions {
                self.evict();
            }
            self.created = self.created.saturating_add(1);
        }

        let entry = self.entries.entry(id.clone()).or_insert_with(|| StoreEntry {
            session: Session::new(),
            last_access: timestamp,
        });
        entry.last_access = timestamp;
        &mut entry.session
    }

    /// Existing session for `id`, touching its access time.
    pub fn get_mut(&mut self, id: &SessionId) -> Option<&mut Session> {
        let timestamp = self.tick();
        self.entries.get_mut(id).map(|entry| {
            entry.last_access = timestamp;
            &mut entry.session
        })
    }

    /// Read-only view without updating the access time.
    #[must_use]
    pub fn peek(&self, id: &SessionId) -> Option<&Session> {
        self.entries.get(id).map(|e| &e.session)
    }

    /// Remove a finished session and count it as completed.
    pub fn complete(&mut self, id: &SessionId) -> Option<Session> {
        let removed = self.remove(id);
        if removed.is_some() {
            self.completed = self.completed.saturating_add(1);
        }
        removed
    }

    /// Remove a session.
    pub fn remove(&mut self, id: &SessionId) -> Option<Session> {
        self.entries.remove(id).map(|e| e.session)
    }

    #[must_use]
    pub fn contains(&self, id: &SessionId) -> bool {
        self.entries.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            active: self.entries.len(),
            max_sessions: self.max_sessions,
            created: self.created,
            completed: self.completed,
            evicted: self.evicted,
        }
    }

    /// Drop the least recently touched sessions.
    fn evict(&mut self) {
        let to_evict = self.eviction_batch.min(self.entries.len());
        if to_evict == 0 {
            return;
        }

        // Timestamps are unique: every access ticks the clock.
        let by_access: BTreeMap<u64, SessionId> = self
            .entries
            .iter()
            .map(|(id, entry)| (entry.last_access, id.clone()))
            .collect();

        for id in by_access.into_values().take(to_evict) {
            self.entries.remove(&id);
            self.evicted = self.evicted.saturating_add(1);
        }
    }
}

// =============================================================================
// STATISTICS
// =============================================================================

/// Counters describing store usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    /// Sessions currently held.
    pub active: usize,
    /// Capacity before eviction kicks in.
    pub max_sessions: usize,
    /// Sessions created since start.
    pub created: u64,
    /// Sessions removed after their summary was emitted.
    pub completed: u64,
    /// Sessions dropped to make room.
    pub evicted: u64,
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Analysis;

    fn id(raw: &str) -> SessionId {
        SessionId::parse(raw).unwrap_or_else(|| panic!("invalid id {raw}"))
    }

    #[test]
    fn get_or_create_is_idempotent() {
        let mut store = SessionStore::new(10);
        let a = id("a");

        assert!(store.get_or_create(&a).record_response(Analysis::default()).is_ok());
        assert!(store.get_or_create(&a).awaiting_ranking());
        assert_eq!(store.len(), 1);
        assert_eq!(store.stats().created, 1);
    }

    #[test]
    fn get_mut_does_not_create() {
        let mut store = SessionStore::new(10);
        assert!(store.get_mut(&id("missing")).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn complete_removes_and_counts() {
        let mut store = SessionStore::new(10);
        let a = id("a");
        store.get_or_create(&a);

        assert!(store.complete(&a).is_some());
        assert!(!store.contains(&a));
        assert!(store.complete(&a).is_none());
        assert_eq!(store.stats().completed, 1);
    }

    #[test]
    fn evicts_least_recently_touched() {
        let mut store = SessionStore::new(3);
        store.eviction_batch = 1;
        let (a, b, c, d) = (id("a"), id("b"), id("c"), id("d"));

        store.get_or_create(&a);
        store.get_or_create(&b);
        store.get_or_create(&c);

        // Touch a and b so c is the oldest
        let _ = store.get_mut(&a);
        let _ = store.get_mut(&b);

        store.get_or_create(&d);

        assert!(store.contains(&a));
        assert!(store.contains(&b));
        assert!(!store.contains(&c));
        assert!(store.contains(&d));
        assert_eq!(store.stats().evicted, 1);
    }

    #[test]
    fn peek_does_not_refresh() {
        let mut store = SessionStore::new(2);
        store.eviction_batch = 1;
        let (a, b, c) = (id("a"), id("b"), id("c"));

        store.get_or_create(&a);
        store.get_or_create(&b);
        assert!(store.peek(&a).is_some());

        store.get_or_create(&c);
        assert!(!store.contains(&a));
        assert!(store.contains(&b));
    }

    #[test]
    fn capacity_floor_is_one() {
        let mut store = SessionStore::new(0);
        store.get_or_create(&id("a"));
        store.get_or_create(&id("b"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.stats().max_sessions, 1);
    }
}
