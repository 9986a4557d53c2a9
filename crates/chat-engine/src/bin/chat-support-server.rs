//! Chat Support Server
//!
//! Runs the chat engine with its background drain, sweep and stats loops.
//! Optionally simulates a burst of customer chats, with or without clients
//! that keep polling, so the admission and expiry behavior can be watched in
//! the logs.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::time::sleep;
use tracing::{info, warn};

use rvoip_chat_engine::logging::parse_log_level;
use rvoip_chat_engine::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about = "Chat support admission and assignment server", long_about = None)]
struct Args {
    /// Configuration file (TOML, JSON or YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json: bool,

    /// Start this many simulated chats at startup
    #[arg(short, long, default_value = "0")]
    simulate: usize,

    /// Keep simulated clients polling until their chat expires
    #[arg(short, long)]
    poll: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut logging = LoggingConfig::new(parse_log_level(&args.log_level)?, "chat-support-server");
    if args.json {
        logging = logging.with_json();
    }
    setup_logging(&logging)?;

    let config = ChatEngineConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    let poll_interval = Duration::from_millis(config.liveness.poll_interval_ms);

    let mut server = ChatEngineServerBuilder::new().with_config(config).build()?;
    server.start()?;

    if args.simulate > 0 {
        simulate_clients(server.api(), args.simulate, args.poll.then_some(poll_interval));
        println!("{}", serde_json::to_string_pretty(&server.engine().stats())?);
    }

    server.run().await?;
    Ok(())
}

/// Start `count` chats; with `poll_every` set, each accepted chat gets a
/// client task that polls until the engine reports it inactive.
fn simulate_clients(api: &ChatSupportApi, count: usize, poll_every: Option<Duration>) {
    let mut accepted = 0;

    for n in 1..=count {
        match api.start_chat() {
            Ok(started) => {
                accepted += 1;
                info!("🧪 Simulated chat {} started as {}", n, started.session_id);

                if let Some(period) = poll_every {
                    let api = api.clone();
                    tokio::spawn(async move {
                        loop {
                            sleep(period).await;
                            match api.poll(started.session_id.as_str()) {
                                Ok(PollResponse { is_active: true }) => {}
                                Ok(_) => {
                                    info!("🧪 Simulated chat {} is no longer active", started.session_id);
                                    break;
                                }
                                Err(e) => {
                                    warn!("🧪 Poll failed for {}: {}", started.session_id, e);
                                    break;
                                }
                            }
                        }
                    });
                }
            }
            Err(refused) => warn!("🧪 Simulated chat {} refused: {}", n, refused.error),
        }
    }

    info!("🧪 Simulation: {} of {} chats accepted", accepted, count);
}
