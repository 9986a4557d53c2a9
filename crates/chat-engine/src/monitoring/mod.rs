//! # Session Liveness Monitor
//!
//! Periodic housekeeping for the engine:
//!
//! - [`liveness`]: [`sweep`], which refreshes shift activity and expires
//!   assigned sessions whose clients stopped polling
//! - [`stats`]: [`EngineStats`], a serializable snapshot for logging and
//!   supervision

pub mod liveness;
pub mod stats;

pub use liveness::{sweep, SweepOutcome};
pub use stats::{AgentLoad, EngineStats};
