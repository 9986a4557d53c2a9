//! Property tests for load accounting, admission limits and FIFO order

use std::sync::Arc;

use chrono::Duration;
use proptest::prelude::*;
use rvoip_chat_engine::agent::Shift;
use rvoip_chat_engine::clock::ManualClock;
use rvoip_chat_engine::session::SessionId;
use rvoip_chat_engine::{ChatEngine, ChatEngineConfig};

#[derive(Debug, Clone)]
enum Op {
    Create,
    Drain,
    Sweep,
    Advance(i64),
    Poll(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => Just(Op::Create),
        2 => Just(Op::Drain),
        1 => Just(Op::Sweep),
        1 => (1i64..5000).prop_map(Op::Advance),
        2 => any::<usize>().prop_map(Op::Poll),
    ]
}

fn shift() -> impl Strategy<Value = Shift> {
    prop_oneof![Just(Shift::First), Just(Shift::Second), Just(Shift::Third)]
}

fn check_invariants(engine: &ChatEngine) -> Result<(), TestCaseError> {
    let stats = engine.stats();

    for agent in &stats.agents {
        prop_assert!(
            agent.current_load <= agent.capacity,
            "agent {} over capacity: {}/{}",
            agent.agent_id,
            agent.current_load,
            agent.capacity
        );
    }
    prop_assert_eq!(stats.total_load() as usize, stats.active);

    let limit = if stats.office_hours {
        stats.team_queue_limit.max(stats.overflow_queue_limit)
    } else {
        stats.team_queue_limit
    };
    prop_assert!(stats.queued + stats.active <= limit);
    Ok(())
}

proptest! {
    #[test]
    fn prop_loads_stay_consistent(
        shift in shift(),
        office_hours in any::<bool>(),
        drain_on_admission in any::<bool>(),
        ops in prop::collection::vec(op(), 1..120),
    ) {
        let clock = Arc::new(ManualClock::pinned(shift, office_hours));
        let mut config = ChatEngineConfig::default();
        config.scheduler.drain_on_admission = drain_on_admission;
        let engine = ChatEngine::with_clock(config, clock.clone()).unwrap();
        let mut issued: Vec<SessionId> = Vec::new();

        for op in ops {
            match op {
                Op::Create => {
                    if let Ok(id) = engine.create_session() {
                        issued.push(id);
                    }
                }
                Op::Drain => {
                    engine.drain_queue();
                }
                Op::Sweep => {
                    engine.sweep();
                }
                Op::Advance(ms) => clock.advance(Duration::milliseconds(ms)),
                Op::Poll(n) => {
                    if !issued.is_empty() {
                        let id = &issued[n % issued.len()];
                        engine.poll(id.as_str()).unwrap();
                    }
                }
            }
            check_invariants(&engine)?;
        }
    }

    #[test]
    fn prop_drain_serves_oldest_first(shift in shift(), chats in 1usize..40) {
        let clock = Arc::new(ManualClock::pinned(shift, false));
        let mut config = ChatEngineConfig::default();
        config.scheduler.drain_on_admission = false;
        let engine = ChatEngine::with_clock(config, clock).unwrap();

        let ids: Vec<_> = (0..chats).filter_map(|_| engine.create_session().ok()).collect();
        let outcome = engine.drain_queue();
        let assigned: Vec<_> = outcome.assigned.iter().map(|(id, _)| id.clone()).collect();

        prop_assert_eq!(&assigned[..], &ids[..assigned.len()]);
        prop_assert_eq!(engine.queued_sessions(), ids[assigned.len()..].to_vec());
    }
}
