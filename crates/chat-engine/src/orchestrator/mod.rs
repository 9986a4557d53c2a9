//! # Chat Engine Orchestration
//!
//! [`ChatEngine`] ties the registry, queue store, admission control, routing
//! and liveness monitoring together behind a single lock. It is the only
//! type callers need for the `create_session` / `get_status` / `poll`
//! contract; the periodic drain and sweep passes are driven by
//! [`ChatEngineServer`](crate::server::ChatEngineServer).
//!
//! ```rust
//! use std::sync::Arc;
//! use rvoip_chat_engine::prelude::*;
//!
//! let clock = Arc::new(ManualClock::pinned(Shift::First, false));
//! let engine = ChatEngine::with_clock(ChatEngineConfig::default(), clock).unwrap();
//!
//! let id = engine.create_session().unwrap();
//! assert!(engine.poll(id.as_str()).unwrap());
//! ```

pub mod core;

pub use self::core::{ChatEngine, EngineState};
