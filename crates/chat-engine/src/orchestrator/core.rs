//! Core chat engine implementation
//!
//! [`ChatEngine`] owns the queue store and the agent registry behind one
//! `parking_lot::Mutex`. Every public operation takes the lock exactly once
//! and never awaits while holding it, which makes admission, drain, sweep
//! and poll mutually atomic.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::agent::{Agent, AgentId, AgentRegistry};
use crate::clock::{ShiftClock, SystemClock};
use crate::config::ChatEngineConfig;
use crate::error::Result;
use crate::monitoring::{sweep, EngineStats, SweepOutcome};
use crate::queue::{admit, QueueStore};
use crate::routing::{drain, DrainOutcome};
use crate::session::{SessionId, SessionStatus};

/// Mutable engine state guarded by the engine lock
#[derive(Debug)]
pub struct EngineState {
    pub queue: QueueStore,
    pub agents: AgentRegistry,
}

/// Chat admission and assignment engine
#[derive(Debug)]
pub struct ChatEngine {
    state: Mutex<EngineState>,
    clock: Arc<dyn ShiftClock>,
    config: ChatEngineConfig,
}

impl ChatEngine {
    /// Create an engine on the system clock
    pub fn new(config: ChatEngineConfig) -> Result<Arc<Self>> {
        let clock = Arc::new(SystemClock::new(config.general.office_hours()));
        Self::with_clock(config, clock)
    }

    /// Create an engine with an injected clock
    pub fn with_clock(config: ChatEngineConfig, clock: Arc<dyn ShiftClock>) -> Result<Arc<Self>> {
        config.validate()?;
        let agents = AgentRegistry::from_roster(&config.roster)?;
        Self::from_registry(agents, clock, config)
    }

    /// Create an engine around an already built registry.
    ///
    /// The roster section of `config` is ignored in favour of `agents`; all
    /// other sections are validated. Agent activity is refreshed for the
    /// clock's current shift before the engine is returned.
    pub fn from_registry(
        mut agents: AgentRegistry,
        clock: Arc<dyn ShiftClock>,
        config: ChatEngineConfig,
    ) -> Result<Arc<Self>> {
        config.validate_settings()?;

        let shift = clock.current_shift();
        agents.refresh_shift_activity(shift);
        info!(
            "🚀 Chat engine ready: shift {}, {} agents, office hours {}",
            shift,
            agents.agents().len(),
            if clock.is_office_hours() { "on" } else { "off" }
        );

        Ok(Arc::new(Self {
            state: Mutex::new(EngineState {
                queue: QueueStore::new(),
                agents,
            }),
            clock,
            config,
        }))
    }

    /// Admit a new chat and return its id.
    ///
    /// Refusals surface as [`ChatQueueError::Refused`](crate::ChatQueueError::Refused).
    /// With `drain_on_admission` set, the queue is drained in the same
    /// critical section.
    pub fn create_session(&self) -> Result<SessionId> {
        let id = SessionId::new();
        let mut state = self.state.lock();
        let EngineState { queue, agents } = &mut *state;

        admit(queue, agents, self.clock.as_ref(), id.clone())?;

        if self.config.scheduler.drain_on_admission {
            drain(queue, agents, self.clock.as_ref());
        }

        Ok(id)
    }

    /// Current status of a session
    pub fn get_status(&self, session_id: &str) -> Result<SessionStatus> {
        let id = SessionId::parse(session_id)?;
        let state = self.state.lock();

        if let Some(session) = state.queue.active(&id) {
            return Ok(SessionStatus::assigned(session));
        }

        Ok(match state.queue.find_queued(&id) {
            Some((position, session)) => SessionStatus::queued(session, position),
            None => SessionStatus::unknown(id),
        })
    }

    /// Record a client heartbeat.
    ///
    /// Returns `true` while the session is queued or assigned. Only assigned
    /// sessions have their poll timestamp and missed-poll counter reset;
    /// queued sessions are not swept.
    pub fn poll(&self, session_id: &str) -> Result<bool> {
        let id = SessionId::parse(session_id)?;
        let now = self.clock.now();
        let mut state = self.state.lock();

        if let Some(session) = state.queue.active_mut(&id) {
            session.record_poll(now);
            debug!("💓 Poll from chat {}", id);
            return Ok(true);
        }

        Ok(state.queue.is_queued(&id))
    }

    /// Run one drain pass
    pub fn drain_queue(&self) -> DrainOutcome {
        let mut state = self.state.lock();
        let EngineState { queue, agents } = &mut *state;
        drain(queue, agents, self.clock.as_ref())
    }

    /// Run one liveness sweep
    pub fn sweep(&self) -> SweepOutcome {
        let mut state = self.state.lock();
        let EngineState { queue, agents } = &mut *state;
        sweep(queue, agents, self.clock.as_ref(), &self.config.liveness)
    }

    pub fn stats(&self) -> EngineStats {
        let state = self.state.lock();
        EngineStats::collect(&state.queue, &state.agents, self.clock.as_ref())
    }

    /// Snapshot of every agent in roster order
    pub fn agents(&self) -> Vec<Agent> {
        self.state.lock().agents.agents().to_vec()
    }

    pub fn agent(&self, id: AgentId) -> Option<Agent> {
        self.state.lock().agents.agent(id).cloned()
    }

    /// Ids of waiting sessions in service order
    pub fn queued_sessions(&self) -> Vec<SessionId> {
        self.state.lock().queue.queued_ids()
    }

    pub fn config(&self) -> &ChatEngineConfig {
        &self.config
    }
}
