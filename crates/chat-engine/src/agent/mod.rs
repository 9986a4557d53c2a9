//! # Agent & Team Registry
//!
//! Agents, their seniority-derived chat capacity, and shift/team membership.
//!
//! - [`types`]: [`Agent`], [`AgentId`], [`Seniority`], [`Shift`]
//! - [`registry`]: [`AgentRegistry`], the single owner of agent state, with
//!   on-demand team capacity and queue-limit queries
//!
//! ## Capacity
//!
//! | Seniority | Efficiency | Concurrent chats |
//! |-----------|------------|------------------|
//! | Junior    | 0.4        | 4                |
//! | MidLevel  | 0.6        | 6                |
//! | Senior    | 0.8        | 8                |
//! | TeamLead  | 0.5        | 5                |
//!
//! A team's queue limit is `floor(1.5 × Σ capacity)` over its active agents.

pub mod registry;
pub mod types;

pub use registry::{ActivityChange, AgentRegistry, Team, TeamRef};
pub use types::{Agent, AgentId, Seniority, Shift, BASE_SLOTS};
