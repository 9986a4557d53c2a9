//! Queue store: the waiting FIFO plus the set of assigned sessions
//!
//! A live session id is held in exactly one of the two collections. The
//! store itself is not synchronized; the engine keeps it behind the same
//! lock as the agent registry.

use std::collections::{HashMap, VecDeque};

use crate::session::{ChatSession, SessionId};

#[derive(Debug, Default)]
pub struct QueueStore {
    /// Waiting sessions, oldest first
    pending: VecDeque<ChatSession>,

    /// Sessions bound to an agent
    active: HashMap<SessionId, ChatSession>,
}

impl QueueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queued_len(&self) -> usize {
        self.pending.len()
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    /// Queued plus assigned sessions, the figure admission is judged on
    pub fn occupancy(&self) -> usize {
        self.pending.len() + self.active.len()
    }

    pub fn is_queue_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn enqueue(&mut self, session: ChatSession) {
        self.pending.push_back(session);
    }

    pub fn pop_front(&mut self) -> Option<ChatSession> {
        self.pending.pop_front()
    }

    /// Return a session to the head of the queue, keeping FIFO order
    pub fn requeue_front(&mut self, session: ChatSession) {
        self.pending.push_front(session);
    }

    /// Move an assigned session into the active set
    pub fn activate(&mut self, session: ChatSession) {
        self.active.insert(session.id.clone(), session);
    }

    /// Queued session and its zero-based position
    pub fn find_queued(&self, id: &SessionId) -> Option<(usize, &ChatSession)> {
        self.pending.iter().enumerate().find(|(_, s)| &s.id == id)
    }

    pub fn is_queued(&self, id: &SessionId) -> bool {
        self.pending.iter().any(|s| &s.id == id)
    }

    pub fn active(&self, id: &SessionId) -> Option<&ChatSession> {
        self.active.get(id)
    }

    pub fn active_mut(&mut self, id: &SessionId) -> Option<&mut ChatSession> {
        self.active.get_mut(id)
    }

    pub fn active_sessions_mut(&mut self) -> impl Iterator<Item = &mut ChatSession> {
        self.active.values_mut()
    }

    pub fn active_sessions(&self) -> impl Iterator<Item = &ChatSession> {
        self.active.values()
    }

    pub fn remove_active(&mut self, id: &SessionId) -> Option<ChatSession> {
        self.active.remove(id)
    }

    /// Ids of queued sessions in service order
    pub fn queued_ids(&self) -> Vec<SessionId> {
        self.pending.iter().map(|s| s.id.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn session(id: &str) -> ChatSession {
        ChatSession::new(SessionId(id.to_string()), Utc::now())
    }

    #[test]
    fn test_fifo_order_with_requeue_front() {
        let mut store = QueueStore::new();
        store.enqueue(session("a"));
        store.enqueue(session("b"));
        store.enqueue(session("c"));

        let head = store.pop_front().unwrap();
        assert_eq!(head.id.as_str(), "a");
        store.requeue_front(head);

        let ids: Vec<_> = store.queued_ids().into_iter().map(|id| id.0).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_occupancy_counts_both_collections() {
        let mut store = QueueStore::new();
        store.enqueue(session("a"));
        store.enqueue(session("b"));
        let moved = store.pop_front().unwrap();
        store.activate(moved);

        assert_eq!(store.queued_len(), 1);
        assert_eq!(store.active_len(), 1);
        assert_eq!(store.occupancy(), 2);
        assert!(store.active(&SessionId("a".to_string())).is_some());
        assert!(store.is_queued(&SessionId("b".to_string())));
        assert_eq!(store.find_queued(&SessionId("b".to_string())).map(|(pos, _)| pos), Some(0));
    }
}
