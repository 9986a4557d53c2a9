//! End-to-end admission and routing scenarios on the default roster

use std::sync::Arc;

use rvoip_chat_engine::prelude::*;

fn engine(shift: Shift, office_hours: bool) -> (Arc<ChatEngine>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::pinned(shift, office_hours));
    let mut config = ChatEngineConfig::default();
    config.scheduler.drain_on_admission = false;
    let engine = ChatEngine::with_clock(config, clock.clone()).unwrap();
    (engine, clock)
}

fn load(engine: &ChatEngine, id: u32) -> u32 {
    engine.agent(AgentId(id)).unwrap().current_load
}

#[test]
fn test_team_limit_refuses_outside_office_hours() {
    let (engine, _) = engine(Shift::First, false);

    // Team A: TeamLead 5 + Mid 6 + Mid 6 + Junior 4 = 21, limit 31
    for _ in 0..31 {
        engine.create_session().unwrap();
    }
    let err = engine.create_session().unwrap_err();
    assert_eq!(err.refusal(), Some(Refusal::QueueFull));
    assert_eq!(err.to_string(), "Chat refused - queue is full");

    let outcome = engine.drain_queue();
    assert!(!outcome.overflow_activated);
    assert_eq!(outcome.assigned.len(), 21);
    assert_eq!(outcome.remaining, 10);

    // Junior first, then the mids, team lead last
    assert_eq!(load(&engine, 4), 4);
    assert_eq!(load(&engine, 2), 6);
    assert_eq!(load(&engine, 3), 6);
    assert_eq!(load(&engine, 1), 5);

    // Overflow team untouched
    assert!((11..=16).all(|id| load(&engine, id) == 0));
}

#[test]
fn test_overflow_tier_in_office_hours() {
    let (engine, _) = engine(Shift::First, true);

    // 31 under the team limit, five more under the overflow limit of 36
    for _ in 0..36 {
        engine.create_session().unwrap();
    }
    let err = engine.create_session().unwrap_err();
    assert_eq!(err.refusal(), Some(Refusal::QueueAndOverflowFull));
    assert_eq!(err.to_string(), "Chat refused - queue and overflow are full");

    let outcome = engine.drain_queue();
    assert!(outcome.overflow_activated);
    assert_eq!(outcome.assigned.len(), 36);
    assert_eq!(outcome.remaining, 0);

    // Seven juniors fill up (28), the remaining eight split across the mids
    assert_eq!(load(&engine, 4), 4);
    assert!((11..=16).all(|id| load(&engine, id) == 4));
    assert_eq!(load(&engine, 2), 4);
    assert_eq!(load(&engine, 3), 4);
    assert_eq!(load(&engine, 1), 0);

    let stats = engine.stats();
    assert_eq!(stats.active, 36);
    assert_eq!(stats.total_load(), 36);
}

#[test]
fn test_refused_chat_leaves_state_untouched() {
    let (engine, _) = engine(Shift::Third, false);

    // Team C: two mids, limit 18
    let ids: Vec<_> = (0..18).map(|_| engine.create_session().unwrap()).collect();
    assert!(engine.create_session().is_err());

    assert_eq!(engine.queued_sessions(), ids);
    let stats = engine.stats();
    assert_eq!(stats.current_team, "Team C");
    assert_eq!(stats.queued, 18);
    assert_eq!(stats.active, 0);
}

#[test]
fn test_shift_handover_after_sweep() {
    let (engine, clock) = engine(Shift::First, false);
    engine.create_session().unwrap();
    engine.drain_queue();
    assert_eq!(load(&engine, 4), 1);

    // Team B stays inactive until a sweep refreshes activity
    clock.set_shift(Some(Shift::Second));
    assert_eq!(engine.stats().team_queue_limit, 0);
    assert!(engine.create_session().is_err());

    let outcome = engine.sweep();
    assert_eq!(outcome.activated_agents.len(), 4);
    assert_eq!(outcome.deactivated_agents.len(), 4);
    assert_eq!(engine.stats().team_queue_limit, 33);

    let id = engine.create_session().unwrap();
    engine.drain_queue();
    let status = engine.get_status(id.as_str()).unwrap();
    // Team B junior (agent 7) takes it
    assert_eq!(status.assigned_agent, Some(AgentId(7)));
}

#[test]
fn test_fifo_across_partial_drains() {
    let (engine, _) = engine(Shift::Third, false);

    // Team C capacity 12
    let ids: Vec<_> = (0..15).map(|_| engine.create_session().unwrap()).collect();
    let outcome = engine.drain_queue();

    let assigned: Vec<_> = outcome.assigned.iter().map(|(id, _)| id.clone()).collect();
    assert_eq!(assigned, ids[..12].to_vec());
    assert_eq!(engine.queued_sessions(), ids[12..].to_vec());

    for (position, id) in ids[12..].iter().enumerate() {
        let status = engine.get_status(id.as_str()).unwrap();
        assert_eq!(status.state, SessionState::Queued);
        assert_eq!(status.queue_position, Some(position));
    }
}

#[test]
fn test_status_and_poll_contract() {
    let (engine, _) = engine(Shift::First, false);
    let id = engine.create_session().unwrap();

    assert_eq!(engine.get_status(id.as_str()).unwrap().state, SessionState::Queued);
    assert!(engine.poll(id.as_str()).unwrap());

    engine.drain_queue();
    let status = engine.get_status(id.as_str()).unwrap();
    assert_eq!(status.state, SessionState::Assigned);
    assert_eq!(status.assigned_agent, Some(AgentId(4)));
    assert!(engine.poll(id.as_str()).unwrap());

    assert!(!engine.get_status("unknown").unwrap().is_known());
    assert!(!engine.poll("unknown").unwrap());
    assert!(matches!(engine.poll(""), Err(ChatQueueError::InvalidInput(_))));
}

#[test]
fn test_concurrent_admission_respects_team_limit() {
    let clock = Arc::new(ManualClock::pinned(Shift::First, false));
    let engine = ChatEngine::with_clock(ChatEngineConfig::default(), clock).unwrap();

    let accepted: usize = std::thread::scope(|scope| {
        let workers: Vec<_> = (0..8)
            .map(|worker| {
                let engine = &engine;
                scope.spawn(move || {
                    let mut accepted: usize = 0;
                    for n in 0..20 {
                        match engine.create_session() {
                            Ok(_) => accepted += 1,
                            Err(err) => assert_eq!(err.refusal(), Some(Refusal::QueueFull)),
                        }
                        if (worker + n) % 3 == 0 {
                            engine.drain_queue();
                        }
                        if (worker + n) % 5 == 0 {
                            engine.sweep();
                        }
                    }
                    accepted
                })
            })
            .collect();

        workers.into_iter().map(|w| w.join().unwrap()).sum()
    });

    // Team A limit is 31 and nothing expires on a frozen clock
    assert_eq!(accepted, 31);
    engine.drain_queue();

    let stats = engine.stats();
    assert_eq!(stats.queued + stats.active, 31);
    assert_eq!(stats.active, 21);
    assert_eq!(stats.total_load() as usize, stats.active);
    for agent in &stats.agents {
        assert!(
            agent.current_load <= agent.capacity,
            "agent {} over capacity: {}/{}",
            agent.agent_id,
            agent.current_load,
            agent.capacity
        );
    }
}
