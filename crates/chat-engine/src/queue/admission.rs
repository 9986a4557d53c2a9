//! Admission control
//!
//! Decides whether a new chat may join the shared queue. The decision and
//! the enqueue happen together, inside the engine lock, so concurrent
//! admissions and drains always see a consistent occupancy.
//!
//! 1. Resolve the current team from the shift clock.
//! 2. `occupancy = queued + assigned`.
//! 3. Accept while `occupancy < team_queue_limit(current team)`.
//! 4. Outside office hours, refuse with [`Refusal::QueueFull`].
//! 5. During office hours, accept while `occupancy` is below the overflow
//!    team's own queue limit, else refuse with
//!    [`Refusal::QueueAndOverflowFull`].
//!
//! Accepted chats always join the same FIFO; overflow only widens the pool
//! of agents that later drain it.

use tracing::{info, warn};

use crate::agent::{AgentRegistry, TeamRef};
use crate::clock::ShiftClock;
use crate::error::Refusal;
use crate::queue::QueueStore;
use crate::session::{ChatSession, SessionId};

/// Figures behind an accepted admission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    /// Occupancy before the new session joined
    pub occupancy: usize,

    /// Limit the admission was judged against
    pub limit: usize,

    /// Accepted only because the overflow tier had room
    pub via_overflow: bool,
}

/// Admit `id` into the queue or refuse it.
///
/// On acceptance the session is stamped with the clock's current time for
/// both creation and last poll, then appended to the FIFO. No assignment
/// happens here.
pub fn admit(
    store: &mut QueueStore,
    agents: &AgentRegistry,
    clock: &dyn ShiftClock,
    id: SessionId,
) -> Result<Admission, Refusal> {
    let shift = clock.current_shift();
    let team = agents.current_team(shift);
    let occupancy = store.occupancy();
    let limit = agents.team_queue_limit(team);

    let admission = if occupancy < limit {
        Admission {
            occupancy,
            limit,
            via_overflow: false,
        }
    } else if !clock.is_office_hours() {
        warn!(
            "🚫 Chat refused - queue is full ({}/{}) outside office hours",
            occupancy, limit
        );
        return Err(Refusal::QueueFull);
    } else {
        let overflow_limit = agents.team_queue_limit(TeamRef::Overflow);
        if occupancy >= overflow_limit {
            warn!(
                "🚫 Chat refused - queue and overflow are full ({} >= team {}, overflow {})",
                occupancy, limit, overflow_limit
            );
            return Err(Refusal::QueueAndOverflowFull);
        }
        Admission {
            occupancy,
            limit: overflow_limit,
            via_overflow: true,
        }
    };

    let session = ChatSession::new(id, clock.now());
    info!(
        "📥 Chat {} queued ({}/{}{})",
        session.id,
        occupancy + 1,
        admission.limit,
        if admission.via_overflow { ", overflow tier" } else { "" }
    );
    store.enqueue(session);

    Ok(admission)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{Agent, Seniority, Shift};
    use crate::clock::ManualClock;

    fn single_junior(overflow_juniors: u32) -> AgentRegistry {
        let overflow = (overflow_juniors > 0).then(|| {
            (
                "Overflow".to_string(),
                (0..overflow_juniors)
                    .map(|i| Agent::new(100 + i, format!("Overflow {}", i), Seniority::Junior, Shift::Any))
                    .collect::<Vec<_>>(),
            )
        });
        AgentRegistry::from_teams(
            vec![("Solo".to_string(), vec![Agent::new(1, "Junior", Seniority::Junior, Shift::First)])],
            overflow,
        )
        .unwrap()
    }

    fn fill(store: &mut QueueStore, agents: &AgentRegistry, clock: &ManualClock, n: usize) {
        for _ in 0..n {
            admit(store, agents, clock, SessionId::new()).unwrap();
        }
    }

    #[test]
    fn test_seventh_chat_refused_outside_office_hours() {
        let agents = single_junior(0);
        let clock = ManualClock::pinned(Shift::First, false);
        let mut store = QueueStore::new();

        fill(&mut store, &agents, &clock, 6);
        assert_eq!(store.queued_len(), 6);

        let refused = admit(&mut store, &agents, &clock, SessionId::new()).unwrap_err();
        assert_eq!(refused, Refusal::QueueFull);
        assert_eq!(store.queued_len(), 6);
    }

    #[test]
    fn test_overflow_extends_admission_in_office_hours() {
        // Overflow of three juniors: capacity 12, queue limit 18
        let agents = single_junior(3);
        let clock = ManualClock::pinned(Shift::First, true);
        let mut store = QueueStore::new();

        fill(&mut store, &agents, &clock, 6);
        let admission = admit(&mut store, &agents, &clock, SessionId::new()).unwrap();
        assert!(admission.via_overflow);
        assert_eq!(admission.limit, 18);

        fill(&mut store, &agents, &clock, 11);
        assert_eq!(store.queued_len(), 18);

        let refused = admit(&mut store, &agents, &clock, SessionId::new()).unwrap_err();
        assert_eq!(refused, Refusal::QueueAndOverflowFull);
    }

    #[test]
    fn test_no_overflow_team_refuses_in_office_hours() {
        let agents = single_junior(0);
        let clock = ManualClock::pinned(Shift::First, true);
        let mut store = QueueStore::new();

        fill(&mut store, &agents, &clock, 6);
        let refused = admit(&mut store, &agents, &clock, SessionId::new()).unwrap_err();
        assert_eq!(refused, Refusal::QueueAndOverflowFull);
    }

    #[test]
    fn test_admission_stamps_session_from_clock() {
        let agents = single_junior(0);
        let clock = ManualClock::pinned(Shift::First, false);
        let mut store = QueueStore::new();
        let id = SessionId::new();

        admit(&mut store, &agents, &clock, id.clone()).unwrap();
        let (position, session) = store.find_queued(&id).unwrap();
        assert_eq!(position, 0);
        assert_eq!(session.created_at, clock.now());
        assert_eq!(session.last_poll_at, clock.now());
        assert!(session.assigned_agent.is_none());
    }

    #[test]
    fn test_assigned_sessions_count_towards_occupancy() {
        let agents = single_junior(0);
        let clock = ManualClock::pinned(Shift::First, false);
        let mut store = QueueStore::new();

        fill(&mut store, &agents, &clock, 6);
        for _ in 0..4 {
            let session = store.pop_front().unwrap();
            store.activate(session);
        }
        assert_eq!(store.occupancy(), 6);
        assert_eq!(
            admit(&mut store, &agents, &clock, SessionId::new()).unwrap_err(),
            Refusal::QueueFull
        );
    }
}
