//! # Assignment Engine
//!
//! Matches queued chats to agents. Routing is seniority-biased: the
//! cheapest agents absorb load first so senior capacity is preserved.
//!
//! ```text
//! ┌──────────────┐   pop head   ┌────────────────────────────┐
//! │  FIFO queue  │ ───────────► │ select_agent                │
//! └──────────────┘              │  active ∧ load < capacity   │
//!        ▲                      │  min (rank, load)           │
//!        │ requeue front        └──────────────┬─────────────┘
//!        └──── no agent ◄──────────────────────┤
//!                                              ▼ agent found
//!                                  load += 1, session → active set
//! ```
//!
//! Routing rank: Junior < MidLevel < TeamLead < Senior.

pub mod assignment;

pub use assignment::{drain, select_agent, DrainOutcome};
