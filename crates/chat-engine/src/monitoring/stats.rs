//! Point-in-time engine statistics

use serde::{Deserialize, Serialize};

use crate::agent::{AgentId, AgentRegistry, Seniority, Shift, TeamRef};
use crate::clock::ShiftClock;
use crate::queue::QueueStore;

/// Load figures for one agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentLoad {
    pub agent_id: AgentId,
    pub name: String,
    pub seniority: Seniority,
    pub shift: Shift,
    pub is_active: bool,
    pub current_load: u32,
    pub capacity: u32,
}

/// Snapshot of queue depth, team limits and agent loads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineStats {
    /// Sessions waiting in the FIFO
    pub queued: usize,

    /// Sessions bound to an agent
    pub active: usize,

    pub current_shift: Shift,

    pub current_team: String,

    pub team_capacity: u32,

    pub team_queue_limit: usize,

    /// Zero when no overflow team is configured
    pub overflow_queue_limit: usize,

    pub office_hours: bool,

    pub agents: Vec<AgentLoad>,
}

impl EngineStats {
    pub fn collect(store: &QueueStore, agents: &AgentRegistry, clock: &dyn ShiftClock) -> Self {
        let shift = clock.current_shift();
        let team = agents.current_team(shift);

        Self {
            queued: store.queued_len(),
            active: store.active_len(),
            current_shift: shift,
            current_team: agents.team(team).map(|t| t.name.clone()).unwrap_or_default(),
            team_capacity: agents.team_capacity(team),
            team_queue_limit: agents.team_queue_limit(team),
            overflow_queue_limit: agents.team_queue_limit(TeamRef::Overflow),
            office_hours: clock.is_office_hours(),
            agents: agents
                .agents()
                .iter()
                .map(|a| AgentLoad {
                    agent_id: a.id,
                    name: a.name.clone(),
                    seniority: a.seniority,
                    shift: a.shift,
                    is_active: a.is_active,
                    current_load: a.current_load,
                    capacity: a.capacity(),
                })
                .collect(),
        }
    }

    /// Agents on duty with at least one free slot
    pub fn available_agents(&self) -> usize {
        self.agents
            .iter()
            .filter(|a| a.is_active && a.current_load < a.capacity)
            .count()
    }

    /// Chats currently assigned across all agents
    pub fn total_load(&self) -> u32 {
        self.agents.iter().map(|a| a.current_load).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::ChatEngineConfig;

    #[test]
    fn test_stats_for_default_roster() {
        let mut agents = AgentRegistry::from_roster(&ChatEngineConfig::default().roster).unwrap();
        agents.refresh_shift_activity(Shift::Second);
        let clock = ManualClock::pinned(Shift::Second, true);

        let stats = EngineStats::collect(&QueueStore::new(), &agents, &clock);

        assert_eq!(stats.current_team, "Team B");
        assert_eq!(stats.team_capacity, 22);
        assert_eq!(stats.team_queue_limit, 33);
        assert_eq!(stats.overflow_queue_limit, 36);
        assert!(stats.office_hours);
        assert_eq!(stats.agents.len(), 16);
        // Team B plus the six overflow juniors
        assert_eq!(stats.available_agents(), 10);
        assert_eq!(stats.total_load(), 0);
    }
}
