//! Session liveness sweep
//!
//! Clients must poll at least once per `poll_interval`. A sweep that finds
//! an assigned session silent for longer than
//! `poll_interval × max_missed_polls` counts one missed poll; once the count
//! reaches `max_missed_polls` the session expires, its agent gets one unit
//! of load back, and the session is dropped from the store.
//!
//! Queued sessions are never swept. They hold no agent capacity.

use tracing::{debug, error, info};

use crate::agent::{AgentId, AgentRegistry};
use crate::clock::ShiftClock;
use crate::config::LivenessConfig;
use crate::queue::QueueStore;
use crate::session::{ChatSession, SessionId};

/// Result of one sweep pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepOutcome {
    /// Sessions expired and removed during this pass
    pub expired: Vec<SessionId>,

    /// Sessions that were counted a missed poll but are still live
    pub missed: Vec<SessionId>,

    /// Agents brought on duty by the shift refresh
    pub activated_agents: Vec<AgentId>,

    /// Agents taken off duty by the shift refresh
    pub deactivated_agents: Vec<AgentId>,
}

/// Refresh agent activity for the current shift, then expire silent
/// sessions and release their agents' load.
pub fn sweep(
    store: &mut QueueStore,
    agents: &mut AgentRegistry,
    clock: &dyn ShiftClock,
    liveness: &LivenessConfig,
) -> SweepOutcome {
    let activity = agents.refresh_shift_activity(clock.current_shift());
    let mut outcome = SweepOutcome {
        activated_agents: activity.activated,
        deactivated_agents: activity.deactivated,
        ..Default::default()
    };

    let now = clock.now();
    let stale_after = liveness.stale_after();

    for session in store.active_sessions_mut().filter(|s| s.is_live) {
        if now - session.last_poll_at <= stale_after {
            continue;
        }

        session.missed_polls += 1;
        if session.missed_polls >= liveness.max_missed_polls {
            session.is_live = false;
            outcome.expired.push(session.id.clone());
        } else {
            debug!(
                "⏰ Chat {} missed poll {}/{}",
                session.id, session.missed_polls, liveness.max_missed_polls
            );
            outcome.missed.push(session.id.clone());
        }
    }

    for id in &outcome.expired {
        if let Some(session) = store.remove_active(id) {
            release_agent(agents, &session);
        }
    }

    if !outcome.expired.is_empty() {
        info!(
            "🧹 Sweep expired {} chats, {} still assigned",
            outcome.expired.len(),
            store.active_len()
        );
    }

    outcome
}

fn release_agent(agents: &mut AgentRegistry, session: &ChatSession) {
    let Some(agent_id) = session.assigned_agent else {
        error!("🚨 Expired chat {} has no assigned agent", session.id);
        return;
    };

    match agents.agent_mut(agent_id) {
        Some(agent) if agent.current_load > 0 => {
            agent.current_load -= 1;
            info!(
                "💤 Chat {} expired after missed polls, agent {} load now {}/{}",
                session.id,
                agent.id,
                agent.current_load,
                agent.capacity()
            );
        }
        Some(agent) => {
            error!(
                "🚨 Agent {} already at zero load while releasing chat {}",
                agent.id, session.id
            );
        }
        None => {
            error!("🚨 Chat {} references unknown agent {}", session.id, agent_id);
        }
    }
}
