//! Chat session model
//!
//! A session moves `Queued → Assigned → Expired` and never back. The queue
//! store exclusively owns every [`ChatSession`]; agents are referenced by
//! [`AgentId`] only.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::agent::AgentId;
use crate::error::{ChatQueueError, Result};

/// Opaque unique session token
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Validate a caller-supplied id; blank ids break the API contract
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Err(ChatQueueError::invalid_input("Session ID cannot be empty"));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A customer chat request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: SessionId,

    pub created_at: DateTime<Utc>,

    pub assigned_at: Option<DateTime<Utc>>,

    pub assigned_agent: Option<AgentId>,

    pub last_poll_at: DateTime<Utc>,

    pub missed_polls: u32,

    /// Cleared when the session expires
    pub is_live: bool,
}

impl ChatSession {
    /// New queued session, stamped with creation and initial poll times
    pub fn new(id: SessionId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            created_at: now,
            assigned_at: None,
            assigned_agent: None,
            last_poll_at: now,
            missed_polls: 0,
            is_live: true,
        }
    }

    pub fn is_assigned(&self) -> bool {
        self.assigned_agent.is_some()
    }

    pub(crate) fn assign(&mut self, agent: AgentId, now: DateTime<Utc>) {
        self.assigned_agent = Some(agent);
        self.assigned_at = Some(now);
    }

    pub(crate) fn record_poll(&mut self, now: DateTime<Utc>) {
        self.last_poll_at = now;
        self.missed_polls = 0;
    }
}

/// Where a session currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Queued,
    Assigned,
    /// Never admitted, already expired, or otherwise gone
    Unknown,
}

/// Snapshot returned by status queries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStatus {
    pub session_id: SessionId,

    pub state: SessionState,

    pub assigned_agent: Option<AgentId>,

    pub created_at: Option<DateTime<Utc>>,

    pub assigned_at: Option<DateTime<Utc>>,

    pub last_poll_at: Option<DateTime<Utc>>,

    /// Zero-based position in the waiting queue while queued
    pub queue_position: Option<usize>,
}

impl SessionStatus {
    pub fn unknown(session_id: SessionId) -> Self {
        Self {
            session_id,
            state: SessionState::Unknown,
            assigned_agent: None,
            created_at: None,
            assigned_at: None,
            last_poll_at: None,
            queue_position: None,
        }
    }

    pub(crate) fn queued(session: &ChatSession, position: usize) -> Self {
        Self {
            session_id: session.id.clone(),
            state: SessionState::Queued,
            assigned_agent: None,
            created_at: Some(session.created_at),
            assigned_at: None,
            last_poll_at: Some(session.last_poll_at),
            queue_position: Some(position),
        }
    }

    pub(crate) fn assigned(session: &ChatSession) -> Self {
        Self {
            session_id: session.id.clone(),
            state: SessionState::Assigned,
            assigned_agent: session.assigned_agent,
            created_at: Some(session.created_at),
            assigned_at: session.assigned_at,
            last_poll_at: Some(session.last_poll_at),
            queue_position: None,
        }
    }

    pub fn is_known(&self) -> bool {
        self.state != SessionState::Unknown
    }
}
