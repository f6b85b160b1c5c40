//! LS9 automation
//!
//! Watches a Yamaha LS9-32 over MIDI NRPN and sends back the switch and
//! level changes that keep the patch consistent.

pub mod automation;
pub mod bridge;
pub mod config;
pub mod directory;
pub mod error;
pub mod midi;
pub mod mixer;
pub mod nrpn;
pub mod pipeline;
pub mod sink;
pub mod sniffer;

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins over `level` when set.
pub fn init_logging(level: &str) -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .try_init()?;

    Ok(())
}
