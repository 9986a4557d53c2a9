//! # RVOIP Chat Engine
//!
//! Admission control and agent assignment for a text-chat support desk.
//!
//! Customers start chats, which wait in a single FIFO until an agent of the
//! team on duty has a free slot. The engine decides whether a chat may join
//! the queue at all, routes waiting chats to agents with a bias towards
//! junior staff, brings an overflow team in during office hours, and expires
//! chats whose clients stop polling.
//!
//! ## Architecture
//!
//! ```text
//!  ChatSupportApi ──► ChatEngine ─┬─► admit (queue)
//!                       (Mutex)   ├─► drain (routing)
//!                                 ├─► sweep (monitoring)
//!                                 └─► EngineStats
//!                                       ▲
//!  ChatEngineServer ── drain / sweep / stats loops (tokio)
//! ```
//!
//! - [`agent`]: agents, seniority capacity, teams and the registry
//! - [`clock`]: shift and office-hours time source
//! - [`session`]: chat session model and status snapshots
//! - [`queue`]: FIFO store and admission control
//! - [`routing`]: seniority-biased assignment and queue draining
//! - [`monitoring`]: liveness sweep and statistics
//! - [`orchestrator`]: the [`ChatEngine`] facade
//! - [`api`]: client-facing view types
//! - [`server`]: background scheduler
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use rvoip_chat_engine::prelude::*;
//!
//! let clock = Arc::new(ManualClock::pinned(Shift::First, true));
//! let engine = ChatEngine::with_clock(ChatEngineConfig::default(), clock).unwrap();
//!
//! let id = engine.create_session().unwrap();
//! let status = engine.get_status(id.as_str()).unwrap();
//! assert_eq!(status.state, SessionState::Assigned);
//! ```

// Core modules
pub mod config;
pub mod error;
pub mod logging;

// Chat desk functionality
pub mod agent;
pub mod clock;
pub mod monitoring;
pub mod orchestrator;
pub mod queue;
pub mod routing;
pub mod session;

// External interfaces
pub mod api;
pub mod server;

pub use config::ChatEngineConfig;
pub use error::{ChatQueueError, Refusal, Result};
pub use orchestrator::ChatEngine;

pub use api::ChatSupportApi;

/// Prelude module for convenient imports
///
/// ```
/// use rvoip_chat_engine::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{ChatEngine, ChatEngineConfig, ChatQueueError, Refusal, Result};
    pub use crate::server::{ChatEngineServer, ChatEngineServerBuilder};

    pub use crate::config::{AgentConfig, GeneralConfig, LivenessConfig, RosterConfig, SchedulerConfig, TeamConfig};

    pub use crate::agent::{Agent, AgentId, AgentRegistry, Seniority, Shift, TeamRef};

    pub use crate::clock::{ManualClock, OfficeHours, ShiftClock, SystemClock};

    pub use crate::session::{ChatSession, SessionId, SessionState, SessionStatus};

    pub use crate::routing::DrainOutcome;
    pub use crate::monitoring::{AgentLoad, EngineStats, SweepOutcome};

    pub use crate::api::{ChatSupportApi, ErrorResponse, PollResponse, SessionStatusView, StartChatResponse};

    pub use crate::logging::{setup_logging, LoggingConfig};
}
