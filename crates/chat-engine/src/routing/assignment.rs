//! Queue draining: matching waiting chats to agents with spare capacity

use tracing::{debug, error, info, warn};

use crate::agent::{AgentId, AgentRegistry, TeamRef};
use crate::clock::ShiftClock;
use crate::queue::QueueStore;
use crate::session::SessionId;

/// Result of one drain pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrainOutcome {
    /// Sessions bound during this pass, in assignment order
    pub assigned: Vec<(SessionId, AgentId)>,

    /// Overflow agents joined the pool for this pass
    pub overflow_activated: bool,

    /// Sessions still waiting after the pass
    pub remaining: usize,

    /// The pass stopped on an internal invariant violation
    pub aborted: bool,
}

/// Pick the agent for the next chat out of `pool`.
///
/// Only active agents with spare capacity qualify. The lowest routing rank
/// wins (juniors, then mid-level, then team leads, then seniors), then the
/// lowest current load; full ties go to the earliest agent in `pool`.
pub fn select_agent(agents: &AgentRegistry, pool: &[usize]) -> Option<usize> {
    pool.iter()
        .copied()
        .filter(|&slot| agents.agent_at(slot).can_take_chat())
        .min_by_key(|&slot| {
            let agent = agents.agent_at(slot);
            (agent.seniority.routing_rank(), agent.current_load)
        })
}

/// Drain the FIFO against the agents eligible right now.
///
/// The pool is the current team's active, on-shift agents. During office
/// hours, when more chats are waiting than the current team's queue limit,
/// the overflow team's active agents join the pool for this pass only.
///
/// Sessions are served strictly oldest first. If no agent can be selected
/// the popped session goes back to the head of the queue and the pass
/// stops, so FIFO order survives partial drains.
pub fn drain(store: &mut QueueStore, agents: &mut AgentRegistry, clock: &dyn ShiftClock) -> DrainOutcome {
    let mut outcome = DrainOutcome::default();
    if store.is_queue_empty() {
        return outcome;
    }

    let shift = clock.current_shift();
    let team = agents.current_team(shift);
    let mut pool = agents.eligible_agents(team, shift);

    let team_limit = agents.team_queue_limit(team);
    if clock.is_office_hours() && store.queued_len() > team_limit {
        let overflow = agents.eligible_agents(TeamRef::Overflow, shift);
        if !overflow.is_empty() {
            info!(
                "🌊 Queue length {} exceeds team limit {}, activating {} overflow agents",
                store.queued_len(),
                team_limit,
                overflow.len()
            );
            pool.extend(overflow);
            outcome.overflow_activated = true;
        }
    }

    let now = clock.now();
    while !store.is_queue_empty() && pool.iter().any(|&slot| agents.agent_at(slot).has_spare_capacity()) {
        let Some(mut session) = store.pop_front() else {
            break;
        };

        let Some(slot) = select_agent(agents, &pool) else {
            warn!("⚠️ No available agent found for chat {}, requeuing at front", session.id);
            store.requeue_front(session);
            break;
        };

        let agent = agents.agent_at_mut(slot);
        if !agent.has_spare_capacity() {
            error!(
                "🚨 Selected agent {} has no spare capacity ({}/{}), aborting drain pass",
                agent.id,
                agent.current_load,
                agent.capacity()
            );
            store.requeue_front(session);
            outcome.aborted = true;
            break;
        }

        agent.current_load += 1;
        session.assign(agent.id, now);
        info!(
            "✅ Assigned chat {} to agent {} ({}, {}, load {}/{})",
            session.id,
            agent.name,
            agent.id,
            agent.seniority,
            agent.current_load,
            agent.capacity()
        );

        outcome.assigned.push((session.id.clone(), agent.id));
        store.activate(session);
    }

    outcome.remaining = store.queued_len();
    debug!(
        "🔄 Drain pass: {} assigned, {} waiting",
        outcome.assigned.len(),
        outcome.remaining
    );

    outcome
}
