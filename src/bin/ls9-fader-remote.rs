//! Remote fader client
//!
//! Forwards control changes from a USB MIDI keyboard to the fader bridge of
//! an `ls9-automation --bridge` server.

use anyhow::Result;
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use ls9_automation::bridge::client::RemoteClient;
use ls9_automation::init_logging;
use ls9_automation::midi::{discovery, InboundPacket, PortSelector, CC_STATUS};
use ls9_automation::mixer::{open_input, INBOUND_CHANNEL_SIZE};

/// MIDI keyboard to WebSocket fader client
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Set log level to debug
    #[arg(short, long)]
    verbose: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Keyboard MIDI port index or name substring
    #[arg(short, long, default_value = "0")]
    port: String,

    /// Bridge server as HOSTNAME:PORT
    #[arg(long, default_value = "localhost:8001")]
    ip: String,

    /// List available MIDI ports
    #[arg(long)]
    list_ports: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let level = if args.verbose { "debug" } else { args.log_level.as_str() };
    init_logging(level)?;

    if args.list_ports {
        discovery::list_ports_formatted();
        return Ok(());
    }

    info!("MIDI USB keyboard to websocket client");

    let (tx, mut rx) = mpsc::channel::<InboundPacket>(INBOUND_CHANNEL_SIZE);
    let (_input_conn, port_name) =
        open_input("LS9-Fader-Remote", &PortSelector::parse(&args.port), tx)?;

    let mut client = RemoteClient::new(&args.ip);
    info!("Forwarding {} to {}", port_name, client.url());
    info!("Press Ctrl+C to exit");

    loop {
        tokio::select! {
            inbound = rx.recv() => {
                let Some(inbound) = inbound else { break };
                let packet = inbound.packet;
                if packet.status != CC_STATUS {
                    continue;
                }
                debug!("CC message {}", packet);
                if let Err(e) = client.send(packet.param, packet.data).await {
                    error!("Failed to reach {}: {}", client.url(), e);
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    client.close().await;
    info!("Exiting...");
    Ok(())
}
