//! # Chat Engine Server
//!
//! Runs the periodic background passes around a [`ChatEngine`]:
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │            ChatEngineServer              │
//! ├──────────────┬─────────────┬─────────────┤
//! │  drain loop  │ sweep loop  │ stats loop  │
//! │  (5s)        │ (10s)       │ (60s, opt.) │
//! ├──────────────┴─────────────┴─────────────┤
//! │        ChatEngine (single lock)          │
//! └──────────────────────────────────────────┘
//! ```
//!
//! Each loop is its own tokio task driving a `tokio::time::interval` with
//! [`MissedTickBehavior::Skip`]. A loop awaits its pass before the next tick,
//! so a slow pass never overlaps itself; passes of different loops are
//! serialized by the engine lock.
//!
//! ```rust
//! use rvoip_chat_engine::prelude::*;
//!
//! # async fn example() -> rvoip_chat_engine::Result<()> {
//! let mut server = ChatEngineServerBuilder::new()
//!     .with_config(ChatEngineConfig::default())
//!     .build()?;
//!
//! server.start()?;
//! let started = server.api().start_chat();
//! println!("{:?}", started);
//! server.stop().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::api::ChatSupportApi;
use crate::clock::ShiftClock;
use crate::config::ChatEngineConfig;
use crate::error::{ChatQueueError, Result};
use crate::orchestrator::ChatEngine;

/// Chat engine plus its background scheduler
pub struct ChatEngineServer {
    engine: Arc<ChatEngine>,

    api: ChatSupportApi,

    drain_handle: Option<JoinHandle<()>>,

    sweep_handle: Option<JoinHandle<()>>,

    stats_handle: Option<JoinHandle<()>>,
}

impl ChatEngineServer {
    /// Create a server on the system clock
    pub fn new(config: ChatEngineConfig) -> Result<Self> {
        Ok(Self::from_engine(ChatEngine::new(config)?))
    }

    /// Wrap an existing engine
    pub fn from_engine(engine: Arc<ChatEngine>) -> Self {
        let api = ChatSupportApi::new(engine.clone());
        Self {
            engine,
            api,
            drain_handle: None,
            sweep_handle: None,
            stats_handle: None,
        }
    }

    /// Spawn the drain, sweep and (if enabled) stats loops.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self) -> Result<()> {
        if self.is_running() {
            return Err(ChatQueueError::internal("Chat engine server already started"));
        }

        let scheduler = self.engine.config().scheduler.clone();

        let engine = self.engine.clone();
        self.drain_handle = Some(tokio::spawn(Self::drain_loop(engine, scheduler.drain_interval())));

        let engine = self.engine.clone();
        self.sweep_handle = Some(tokio::spawn(Self::sweep_loop(engine, scheduler.sweep_interval())));

        if let Some(period) = scheduler.stats_interval() {
            let engine = self.engine.clone();
            self.stats_handle = Some(tokio::spawn(Self::stats_loop(engine, period)));
        }

        info!(
            "✅ Chat engine server started (drain every {:?}, sweep every {:?})",
            scheduler.drain_interval(),
            scheduler.sweep_interval()
        );
        Ok(())
    }

    /// Abort the background loops and wait for them to finish
    pub async fn stop(&mut self) -> Result<()> {
        info!("🛑 Stopping chat engine server...");

        for handle in [
            self.drain_handle.take(),
            self.sweep_handle.take(),
            self.stats_handle.take(),
        ]
        .into_iter()
        .flatten()
        {
            handle.abort();
            let _ = handle.await;
        }

        info!("✅ Chat engine server stopped");
        Ok(())
    }

    /// Start if needed, then run until Ctrl-C
    pub async fn run(&mut self) -> Result<()> {
        if !self.is_running() {
            self.start()?;
        }

        info!("💬 Chat engine server is running, press Ctrl+C to stop");
        tokio::signal::ctrl_c()
            .await
            .map_err(|e| ChatQueueError::internal(format!("Failed to listen for Ctrl+C: {}", e)))?;

        self.stop().await
    }

    pub fn is_running(&self) -> bool {
        self.drain_handle.is_some() || self.sweep_handle.is_some()
    }

    pub fn engine(&self) -> &Arc<ChatEngine> {
        &self.engine
    }

    pub fn api(&self) -> &ChatSupportApi {
        &self.api
    }

    async fn drain_loop(engine: Arc<ChatEngine>, period: Duration) {
        info!("🔄 Starting queue drain loop");

        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            let outcome = engine.drain_queue();
            if outcome.aborted {
                warn!("⚠️ Drain pass aborted with {} chats waiting", outcome.remaining);
            } else if !outcome.assigned.is_empty() {
                debug!(
                    "📤 Drain tick assigned {} chats, {} waiting",
                    outcome.assigned.len(),
                    outcome.remaining
                );
            }
        }
    }

    async fn sweep_loop(engine: Arc<ChatEngine>, period: Duration) {
        info!("👀 Starting session liveness sweep loop");

        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            let outcome = engine.sweep();
            if !outcome.activated_agents.is_empty() || !outcome.deactivated_agents.is_empty() {
                info!(
                    "🔁 Shift change: {} agents on duty, {} off duty",
                    outcome.activated_agents.len(),
                    outcome.deactivated_agents.len()
                );
            }
        }
    }

    async fn stats_loop(engine: Arc<ChatEngine>, period: Duration) {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            let stats = engine.stats();
            info!("📊 === Chat Support Status Update ===");
            info!(
                "📥 Queued: {}, Active: {}, Shift: {}, Team: {}",
                stats.queued, stats.active, stats.current_shift, stats.current_team
            );
            info!(
                "📋 Team capacity {} (limit {}), overflow limit {}, office hours: {}",
                stats.team_capacity, stats.team_queue_limit, stats.overflow_queue_limit, stats.office_hours
            );
            info!(
                "👥 Agents available: {}, total load: {}",
                stats.available_agents(),
                stats.total_load()
            );
        }
    }
}

/// Builder for [`ChatEngineServer`]
#[derive(Default)]
pub struct ChatEngineServerBuilder {
    config: Option<ChatEngineConfig>,
    clock: Option<Arc<dyn ShiftClock>>,
}

impl ChatEngineServerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: ChatEngineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use a custom clock instead of the system clock
    pub fn with_clock(mut self, clock: Arc<dyn ShiftClock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> Result<ChatEngineServer> {
        let config = self
            .config
            .ok_or_else(|| ChatQueueError::configuration("Configuration not provided"))?;

        let engine = match self.clock {
            Some(clock) => ChatEngine::with_clock(config, clock)?,
            None => ChatEngine::new(config)?,
        };

        Ok(ChatEngineServer::from_engine(engine))
    }
}
