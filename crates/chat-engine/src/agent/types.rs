//! Core types for agent management

use serde::{Deserialize, Serialize};
use std::fmt;

/// Chat slots an agent with an efficiency of 1.0 could hold
pub const BASE_SLOTS: u32 = 10;

/// Agent seniority tier
///
/// Seniority drives both how many concurrent chats an agent may hold and the
/// order in which agents are offered new chats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Seniority {
    Junior,
    MidLevel,
    Senior,
    TeamLead,
}

impl Seniority {
    /// Efficiency multiplier in percent of [`BASE_SLOTS`]
    pub fn efficiency_percent(self) -> u32 {
        match self {
            Seniority::Junior => 40,
            Seniority::MidLevel => 60,
            Seniority::Senior => 80,
            Seniority::TeamLead => 50,
        }
    }

    /// Maximum concurrent chats: `floor(BASE_SLOTS × efficiency)`
    pub fn capacity(self) -> u32 {
        // Integer percent keeps the floor exact
        BASE_SLOTS * self.efficiency_percent() / 100
    }

    /// Routing preference; lower ranks are offered chats first.
    ///
    /// Team leads sit between mid-level and senior agents so that senior
    /// capacity is the last to be consumed.
    pub fn routing_rank(self) -> u8 {
        match self {
            Seniority::Junior => 0,
            Seniority::MidLevel => 1,
            Seniority::TeamLead => 2,
            Seniority::Senior => 3,
        }
    }
}

impl fmt::Display for Seniority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seniority::Junior => write!(f, "junior"),
            Seniority::MidLevel => write!(f, "mid-level"),
            Seniority::Senior => write!(f, "senior"),
            Seniority::TeamLead => write!(f, "team-lead"),
        }
    }
}

impl std::str::FromStr for Seniority {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "junior" | "Junior" | "JUNIOR" => Ok(Seniority::Junior),
            "mid" | "midlevel" | "mid-level" | "MidLevel" | "MIDLEVEL" => Ok(Seniority::MidLevel),
            "senior" | "Senior" | "SENIOR" => Ok(Seniority::Senior),
            "teamlead" | "team-lead" | "TeamLead" | "TEAMLEAD" => Ok(Seniority::TeamLead),
            _ => Err(format!("Unknown seniority: {}", s)),
        }
    }
}

/// Work shift an agent belongs to
///
/// Serialized as its number: `0` is the always-eligible overflow pool,
/// `1`–`3` are the three daily shifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Shift {
    /// Wildcard shift used by the overflow pool
    Any,
    /// 08:00–16:00 UTC
    First,
    /// 16:00–24:00 UTC
    Second,
    /// 00:00–08:00 UTC
    Third,
}

impl Shift {
    pub fn number(self) -> u8 {
        match self {
            Shift::Any => 0,
            Shift::First => 1,
            Shift::Second => 2,
            Shift::Third => 3,
        }
    }

    /// Whether an agent on this shift is on duty while `current` is running
    pub fn covers(self, current: Shift) -> bool {
        self == Shift::Any || self == current
    }
}

impl TryFrom<u8> for Shift {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(Shift::Any),
            1 => Ok(Shift::First),
            2 => Ok(Shift::Second),
            3 => Ok(Shift::Third),
            other => Err(format!("Unknown shift: {}", other)),
        }
    }
}

impl From<Shift> for u8 {
    fn from(shift: Shift) -> Self {
        shift.number()
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shift::Any => write!(f, "any"),
            other => write!(f, "{}", other.number()),
        }
    }
}

/// Agent identifier type for strongly-typed agent references
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(pub u32);

impl From<u32> for AgentId {
    fn from(id: u32) -> Self {
        AgentId(id)
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A support agent and its live routing state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,

    /// Human-readable agent name
    pub name: String,

    pub seniority: Seniority,

    pub shift: Shift,

    /// Whether the agent is currently on duty. Recomputed by the liveness
    /// sweep as shifts change.
    pub is_active: bool,

    /// Chats presently assigned to the agent
    pub current_load: u32,
}

impl Agent {
    pub fn new(id: u32, name: impl Into<String>, seniority: Seniority, shift: Shift) -> Self {
        Self {
            id: AgentId(id),
            name: name.into(),
            seniority,
            shift,
            is_active: true,
            current_load: 0,
        }
    }

    /// Maximum concurrent chats, derived from seniority
    pub fn capacity(&self) -> u32 {
        self.seniority.capacity()
    }

    pub fn has_spare_capacity(&self) -> bool {
        self.current_load < self.capacity()
    }

    /// Eligible to receive a new chat right now
    pub fn can_take_chat(&self) -> bool {
        self.is_active && self.has_spare_capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_by_seniority() {
        assert_eq!(Seniority::Junior.capacity(), 4);
        assert_eq!(Seniority::MidLevel.capacity(), 6);
        assert_eq!(Seniority::Senior.capacity(), 8);
        assert_eq!(Seniority::TeamLead.capacity(), 5);
    }

    #[test]
    fn test_routing_rank_order() {
        let mut tiers = vec![
            Seniority::Senior,
            Seniority::TeamLead,
            Seniority::Junior,
            Seniority::MidLevel,
        ];
        tiers.sort_by_key(|s| s.routing_rank());
        assert_eq!(
            tiers,
            vec![Seniority::Junior, Seniority::MidLevel, Seniority::TeamLead, Seniority::Senior]
        );
    }

    #[test]
    fn test_shift_serde_as_number() {
        let json = serde_json::to_string(&Shift::Second).unwrap();
        assert_eq!(json, "2");
        let shift: Shift = serde_json::from_str("0").unwrap();
        assert_eq!(shift, Shift::Any);
        assert!(serde_json::from_str::<Shift>("4").is_err());
    }

    #[test]
    fn test_shift_covers() {
        assert!(Shift::Any.covers(Shift::Third));
        assert!(Shift::First.covers(Shift::First));
        assert!(!Shift::First.covers(Shift::Second));
    }

    #[test]
    fn test_agent_capacity_checks() {
        let mut agent = Agent::new(1, "Junior A", Seniority::Junior, Shift::First);
        assert!(agent.can_take_chat());

        agent.current_load = 4;
        assert!(!agent.has_spare_capacity());

        agent.current_load = 0;
        agent.is_active = false;
        assert!(!agent.can_take_chat());
    }

    #[test]
    fn test_seniority_from_str() {
        assert_eq!("mid".parse::<Seniority>().unwrap(), Seniority::MidLevel);
        assert_eq!("TeamLead".parse::<Seniority>().unwrap(), Seniority::TeamLead);
        assert!("intern".parse::<Seniority>().is_err());
    }
}
