//! # Chat Support API
//!
//! Request-layer facade over [`ChatEngine`]. Each method corresponds to one
//! client endpoint and returns serde view types whose JSON shape is what a
//! chat widget consumes:
//!
//! | Endpoint                   | Method                          | Body                    |
//! |----------------------------|---------------------------------|-------------------------|
//! | `POST /api/chat/start`     | [`ChatSupportApi::start_chat`]  | `{"sessionId": ...}` or `{"error": ...}` |
//! | `GET /api/chat/status/:id` | [`ChatSupportApi::get_status`]  | [`SessionStatusView`]   |
//! | `POST /api/chat/poll/:id`  | [`ChatSupportApi::poll`]        | `{"isActive": bool}`    |
//!
//! No transport is bundled; any HTTP layer can serialize these types.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::agent::AgentId;
use crate::error::{ChatQueueError, Result};
use crate::orchestrator::ChatEngine;
use crate::session::{SessionId, SessionState, SessionStatus};

/// Successful chat start
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartChatResponse {
    pub session_id: SessionId,
}

/// Error body for a refused or failed request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
}

impl From<ChatQueueError> for ErrorResponse {
    fn from(err: ChatQueueError) -> Self {
        Self { error: err.to_string() }
    }
}

/// Session status as shown to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatusView {
    pub session_id: SessionId,
    pub created_at: DateTime<Utc>,
    pub assigned_at: Option<DateTime<Utc>>,
    pub assigned_agent_id: Option<AgentId>,
    pub is_active: bool,

    /// `"Assigned"` or `"In Queue"`
    pub status: String,

    /// Zero-based position while waiting
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue_position: Option<usize>,
}

impl SessionStatusView {
    /// View of a known session, `None` for unknown sessions
    pub fn from_status(status: &SessionStatus) -> Option<Self> {
        let created_at = status.created_at?;
        let label = match status.state {
            SessionState::Assigned => "Assigned",
            SessionState::Queued => "In Queue",
            SessionState::Unknown => return None,
        };

        Some(Self {
            session_id: status.session_id.clone(),
            created_at,
            assigned_at: status.assigned_at,
            assigned_agent_id: status.assigned_agent,
            is_active: true,
            status: label.to_string(),
            queue_position: status.queue_position,
        })
    }
}

/// Poll acknowledgement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollResponse {
    pub is_active: bool,
}

/// Client-facing chat API
#[derive(Debug, Clone)]
pub struct ChatSupportApi {
    engine: Arc<ChatEngine>,
}

impl ChatSupportApi {
    pub fn new(engine: Arc<ChatEngine>) -> Self {
        Self { engine }
    }

    /// Start a chat. Refusals come back as an [`ErrorResponse`] carrying the
    /// refusal message.
    pub fn start_chat(&self) -> std::result::Result<StartChatResponse, ErrorResponse> {
        self.engine
            .create_session()
            .map(|session_id| StartChatResponse { session_id })
            .map_err(ErrorResponse::from)
    }

    /// Status of a session; unknown sessions are [`ChatQueueError::NotFound`]
    pub fn get_status(&self, session_id: &str) -> Result<SessionStatusView> {
        let status = self.engine.get_status(session_id)?;
        SessionStatusView::from_status(&status)
            .ok_or_else(|| ChatQueueError::not_found(format!("Chat session {}", session_id)))
    }

    pub fn poll(&self, session_id: &str) -> Result<PollResponse> {
        let is_active = self.engine.poll(session_id)?;
        Ok(PollResponse { is_active })
    }

    pub fn engine(&self) -> &Arc<ChatEngine> {
        &self.engine
    }
}
