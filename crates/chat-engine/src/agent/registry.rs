//! # Agent Registry
//!
//! The registry owns the agent table for the whole engine. Agents live in a
//! single index-addressable `Vec`; teams refer to their members by index and
//! sessions refer to agents by [`AgentId`] only, so the mutable routing state
//! (`is_active`, `current_load`) has exactly one owner.
//!
//! Team figures are never cached. Agent activity and load change with every
//! drain and sweep, so [`AgentRegistry::team_capacity`] and
//! [`AgentRegistry::team_queue_limit`] recompute from the live table on each
//! call.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::agent::{Agent, AgentId, Shift};
use crate::config::{RosterConfig, TeamConfig};
use crate::error::{ChatQueueError, Result};

/// Team queue limit is this many times the team's active capacity
pub const QUEUE_LIMIT_MULTIPLIER_NUM: u32 = 3;
pub const QUEUE_LIMIT_MULTIPLIER_DEN: u32 = 2;

/// A named group of agents
#[derive(Debug, Clone)]
pub struct Team {
    pub name: String,

    /// Indices into the registry's agent table, in roster order
    members: Vec<usize>,

    pub is_overflow: bool,
}

/// Which team a query refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamRef {
    /// Ordinary shift team by position in the roster
    Shift(usize),
    Overflow,
}

/// Shift changes applied by [`AgentRegistry::refresh_shift_activity`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityChange {
    pub activated: Vec<AgentId>,
    pub deactivated: Vec<AgentId>,
}

/// Authoritative agent table plus team membership
#[derive(Debug, Clone)]
pub struct AgentRegistry {
    agents: Vec<Agent>,
    index: HashMap<AgentId, usize>,
    teams: Vec<Team>,
    overflow: Option<Team>,
}

impl AgentRegistry {
    /// Build the registry from a roster
    pub fn from_roster(roster: &RosterConfig) -> Result<Self> {
        let build = |team: &TeamConfig| {
            let agents: Vec<Agent> = team
                .agents
                .iter()
                .map(|a| Agent::new(a.id, a.name.clone(), a.seniority, a.shift))
                .collect();
            (team.name.clone(), agents)
        };

        let registry = Self::from_teams(
            roster.teams.iter().map(build).collect(),
            roster.overflow.as_ref().map(build),
        )?;

        info!(
            "👥 Agent registry loaded: {} teams, {} agents, overflow: {}",
            registry.teams.len(),
            registry.agents.len(),
            registry.overflow.as_ref().map(|t| t.name.as_str()).unwrap_or("none")
        );

        Ok(registry)
    }

    /// Build the registry from already constructed teams of agents
    pub fn from_teams(teams: Vec<(String, Vec<Agent>)>, overflow: Option<(String, Vec<Agent>)>) -> Result<Self> {
        if teams.is_empty() {
            return Err(ChatQueueError::configuration("roster must contain at least one team"));
        }

        let mut registry = Self {
            agents: Vec::new(),
            index: HashMap::new(),
            teams: Vec::with_capacity(teams.len()),
            overflow: None,
        };

        for (name, agents) in teams {
            let built = registry.add_team(&name, agents.into_iter(), false)?;
            registry.teams.push(built);
        }

        if let Some((name, agents)) = overflow {
            let built = registry.add_team(&name, agents.into_iter(), true)?;
            registry.overflow = Some(built);
        }

        Ok(registry)
    }

    fn add_team(
        &mut self,
        name: &str,
        agents: impl Iterator<Item = Agent>,
        is_overflow: bool,
    ) -> Result<Team> {
        let mut members = Vec::new();
        for agent in agents {
            if self.index.contains_key(&agent.id) {
                return Err(ChatQueueError::configuration(format!(
                    "duplicate agent id {} in team '{}'",
                    agent.id, name
                )));
            }
            let slot = self.agents.len();
            self.index.insert(agent.id, slot);
            self.agents.push(agent);
            members.push(slot);
        }

        Ok(Team {
            name: name.to_string(),
            members,
            is_overflow,
        })
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.index.get(&id).map(|&slot| &self.agents[slot])
    }

    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        match self.index.get(&id) {
            Some(&slot) => self.agents.get_mut(slot),
            None => None,
        }
    }

    pub(crate) fn agent_at(&self, slot: usize) -> &Agent {
        &self.agents[slot]
    }

    pub(crate) fn agent_at_mut(&mut self, slot: usize) -> &mut Agent {
        &mut self.agents[slot]
    }

    pub fn team(&self, team: TeamRef) -> Option<&Team> {
        match team {
            TeamRef::Shift(position) => self.teams.get(position),
            TeamRef::Overflow => self.overflow.as_ref(),
        }
    }

    /// Team on duty for `shift`: the first team with a member on that shift,
    /// falling back to the first team.
    pub fn current_team(&self, shift: Shift) -> TeamRef {
        let position = self
            .teams
            .iter()
            .position(|team| team.members.iter().any(|&slot| self.agents[slot].shift == shift))
            .unwrap_or(0);
        TeamRef::Shift(position)
    }

    /// Sum of capacities of the team's active agents (0 for a missing team)
    pub fn team_capacity(&self, team: TeamRef) -> u32 {
        self.team(team)
            .map(|t| {
                t.members
                    .iter()
                    .map(|&slot| &self.agents[slot])
                    .filter(|agent| agent.is_active)
                    .map(Agent::capacity)
                    .sum()
            })
            .unwrap_or(0)
    }

    /// `floor(1.5 × team_capacity)`
    pub fn team_queue_limit(&self, team: TeamRef) -> usize {
        let capacity = self.team_capacity(team);
        (capacity * QUEUE_LIMIT_MULTIPLIER_NUM / QUEUE_LIMIT_MULTIPLIER_DEN) as usize
    }

    /// Indices of the team's agents that may take chats during `shift`.
    ///
    /// Members of ordinary teams must be active and on the shift; overflow
    /// members only need to be active.
    pub fn eligible_agents(&self, team: TeamRef, shift: Shift) -> Vec<usize> {
        let Some(t) = self.team(team) else {
            return Vec::new();
        };

        t.members
            .iter()
            .copied()
            .filter(|&slot| {
                let agent = &self.agents[slot];
                agent.is_active && (t.is_overflow || agent.shift == shift)
            })
            .collect()
    }

    /// Recompute every agent's `is_active` flag for `shift`
    pub fn refresh_shift_activity(&mut self, shift: Shift) -> ActivityChange {
        let mut change = ActivityChange::default();

        for agent in &mut self.agents {
            let on_duty = agent.shift.covers(shift);
            if on_duty != agent.is_active {
                agent.is_active = on_duty;
                if on_duty {
                    change.activated.push(agent.id);
                } else {
                    change.deactivated.push(agent.id);
                }
            }
        }

        if !change.activated.is_empty() || !change.deactivated.is_empty() {
            debug!(
                "🔄 Shift {} activity: {} agents on, {} agents off",
                shift,
                change.activated.len(),
                change.deactivated.len()
            );
        }

        change
    }
}
