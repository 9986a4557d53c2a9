//! # Chat Engine Configuration
//!
//! Configuration for the chat admission and assignment engine. Every section
//! has production defaults, so an empty configuration file yields a working
//! engine with the standard three-shift roster plus an overflow pool.
//!
//! ## Loading
//!
//! [`ChatEngineConfig::load`] layers an optional TOML/JSON/YAML file and
//! `CHAT_ENGINE__<SECTION>__<KEY>` environment variables on top of the
//! defaults, then validates the result:
//!
//! ```toml
//! [liveness]
//! poll_interval_ms = 1000
//! max_missed_polls = 3
//!
//! [scheduler]
//! drain_interval_ms = 5000
//! sweep_interval_ms = 10000
//!
//! [[roster.teams]]
//! name = "Team A"
//! agents = [
//!     { id = 1, name = "TeamLead A", seniority = "TeamLead", shift = 1 },
//!     { id = 2, name = "Junior A", seniority = "Junior", shift = 1 },
//! ]
//! ```
//!
//! ```rust
//! use rvoip_chat_engine::ChatEngineConfig;
//!
//! let config = ChatEngineConfig::default();
//! assert!(config.validate().is_ok());
//! assert_eq!(config.liveness.max_missed_polls, 3);
//! ```

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::agent::{Seniority, Shift};
use crate::clock::OfficeHours;
use crate::error::{ChatQueueError, Result};

/// Main configuration for the chat engine
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatEngineConfig {
    pub general: GeneralConfig,

    /// Client heartbeat expectations
    pub liveness: LivenessConfig,

    /// Periodic drain/sweep cadence
    pub scheduler: SchedulerConfig,

    /// Teams and agents, immutable for the process lifetime
    pub roster: RosterConfig,
}

/// General engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Local time at which office hours begin (inclusive)
    pub office_hours_start: NaiveTime,

    /// Local time at which office hours end (inclusive)
    pub office_hours_end: NaiveTime,
}

/// Session liveness settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LivenessConfig {
    /// Interval at which clients are expected to poll
    pub poll_interval_ms: u64,

    /// Missed-poll count at which an assigned session expires
    pub max_missed_polls: u32,
}

/// Background scheduling settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub drain_interval_ms: u64,

    pub sweep_interval_ms: u64,

    /// Stats reporting interval in seconds (0 disables the reporter)
    pub stats_interval_secs: u64,

    /// Run a drain pass right after every successful admission
    pub drain_on_admission: bool,
}

/// Static team/agent roster
///
/// A roster given in a file replaces the default roster as a whole; leaving
/// out `overflow` there means no overflow pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterConfig {
    /// Shift teams, in resolution order
    #[serde(default)]
    pub teams: Vec<TeamConfig>,

    /// Optional overflow pool activated during office hours
    #[serde(default)]
    pub overflow: Option<TeamConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamConfig {
    pub name: String,

    #[serde(default)]
    pub agents: Vec<AgentConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    pub id: u32,

    pub name: String,

    pub seniority: Seniority,

    pub shift: Shift,
}

impl ChatEngineConfig {
    /// Load configuration from an optional file plus `CHAT_ENGINE__*`
    /// environment overrides, then validate it.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                return Err(ChatQueueError::configuration(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(config::File::from(path));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("CHAT_ENGINE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.validate_settings()?;
        self.roster.validate()
    }

    /// Validate everything except the roster, for engines built around an
    /// already constructed registry
    pub fn validate_settings(&self) -> Result<()> {
        if self.general.office_hours_start > self.general.office_hours_end {
            return Err(ChatQueueError::configuration(
                "office_hours_start must not be after office_hours_end",
            ));
        }

        if self.liveness.poll_interval_ms == 0 {
            return Err(ChatQueueError::configuration("poll_interval_ms must be greater than 0"));
        }

        if self.liveness.max_missed_polls == 0 {
            return Err(ChatQueueError::configuration("max_missed_polls must be greater than 0"));
        }

        if self.scheduler.drain_interval_ms == 0 {
            return Err(ChatQueueError::configuration("drain_interval_ms must be greater than 0"));
        }

        if self.scheduler.sweep_interval_ms == 0 {
            return Err(ChatQueueError::configuration("sweep_interval_ms must be greater than 0"));
        }

        Ok(())
    }
}

impl GeneralConfig {
    pub fn office_hours(&self) -> OfficeHours {
        OfficeHours::new(self.office_hours_start, self.office_hours_end)
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        let hours = OfficeHours::default();
        Self {
            office_hours_start: hours.start,
            office_hours_end: hours.end,
        }
    }
}

impl LivenessConfig {
    /// Time without a poll after which each sweep counts a missed poll
    pub fn stale_after(&self) -> chrono::Duration {
        let millis = self.poll_interval_ms.saturating_mul(u64::from(self.max_missed_polls));
        chrono::Duration::milliseconds(i64::try_from(millis).unwrap_or(i64::MAX))
    }
}

impl Default for LivenessConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            max_missed_polls: 3,
        }
    }
}

impl SchedulerConfig {
    pub fn drain_interval(&self) -> Duration {
        Duration::from_millis(self.drain_interval_ms)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }

    pub fn stats_interval(&self) -> Option<Duration> {
        (self.stats_interval_secs > 0).then(|| Duration::from_secs(self.stats_interval_secs))
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            drain_interval_ms: 5000,
            sweep_interval_ms: 10_000,
            stats_interval_secs: 60,
            drain_on_admission: true,
        }
    }
}

impl RosterConfig {
    fn validate(&self) -> Result<()> {
        if self.teams.is_empty() {
            return Err(ChatQueueError::configuration("roster must contain at least one team"));
        }

        if let Some(overflow) = &self.overflow {
            if let Some(agent) = overflow.agents.iter().find(|a| a.shift != Shift::Any) {
                return Err(ChatQueueError::configuration(format!(
                    "overflow agent {} must be on shift 0, found shift {}",
                    agent.id, agent.shift
                )));
            }
        }

        let mut seen = HashSet::new();
        for team in self.teams.iter().chain(self.overflow.iter()) {
            if team.name.trim().is_empty() {
                return Err(ChatQueueError::configuration("team name cannot be empty"));
            }
            for agent in &team.agents {
                if !seen.insert(agent.id) {
                    return Err(ChatQueueError::configuration(format!(
                        "duplicate agent id {} in team '{}'",
                        agent.id, team.name
                    )));
                }
            }
        }

        Ok(())
    }
}

impl Default for RosterConfig {
    fn default() -> Self {
        use Seniority::*;

        let agent = |id, name: &str, seniority, shift| AgentConfig {
            id,
            name: name.to_string(),
            seniority,
            shift,
        };

        Self {
            teams: vec![
                TeamConfig {
                    name: "Team A".to_string(),
                    agents: vec![
                        agent(1, "TeamLead A", TeamLead, Shift::First),
                        agent(2, "Mid A1", MidLevel, Shift::First),
                        agent(3, "Mid A2", MidLevel, Shift::First),
                        agent(4, "Junior A", Junior, Shift::First),
                    ],
                },
                TeamConfig {
                    name: "Team B".to_string(),
                    agents: vec![
                        agent(5, "Senior B", Senior, Shift::Second),
                        agent(6, "Mid B", MidLevel, Shift::Second),
                        agent(7, "Junior B1", Junior, Shift::Second),
                        agent(8, "Junior B2", Junior, Shift::Second),
                    ],
                },
                TeamConfig {
                    name: "Team C".to_string(),
                    agents: vec![
                        agent(9, "Mid C1", MidLevel, Shift::Third),
                        agent(10, "Mid C2", MidLevel, Shift::Third),
                    ],
                },
            ],
            overflow: Some(TeamConfig {
                name: "Overflow Team".to_string(),
                agents: (11..=16)
                    .map(|id| agent(id, &format!("Overflow {}", id), Junior, Shift::Any))
                    .collect(),
            }),
        }
    }
}
