//! LS9 automation server
//!
//! Listens to the console, runs the automation rules and optionally serves
//! the remote fader bridge.

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use ls9_automation::automation::AutomationEngine;
use ls9_automation::bridge::{self, FaderBridge};
use ls9_automation::config::AppConfig;
use ls9_automation::directory::ControllerDirectory;
use ls9_automation::init_logging;
use ls9_automation::midi::{discovery, InboundPacket, PortSelector};
use ls9_automation::mixer::{open_input, MidiOutputSink, INBOUND_CHANNEL_SIZE};
use ls9_automation::pipeline::Pipeline;
use ls9_automation::sink::OutputSink;
use ls9_automation::sniffer::{run_console_echo, ConsoleEcho, EchoMode};

/// LS9 automation - keeps duplicate channels, wireless roles and routing in sync
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Set log level to debug
    #[arg(short, long)]
    verbose: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// MIDI port index or name substring (overrides both config ports)
    #[arg(short, long)]
    port: Option<String>,

    /// Path to configuration file (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<String>,

    /// Echo console traffic instead of running the automation
    #[arg(long, value_enum)]
    console: Option<EchoMode>,

    /// List available MIDI ports
    #[arg(long)]
    list_ports: bool,

    /// Also run the remote fader bridge server
    #[arg(long)]
    bridge: bool,
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

    let mut config = AppConfig::load_or_default(args.config.as_deref()).await?;
    match &args.config {
        Some(path) => info!("Configuration file: {}", path),
        None => info!("No configuration file, using defaults"),
    }
    if let Some(port) = &args.port {
        config.midi.input_port = port.clone();
        config.midi.output_port = port.clone();
    }

    let directory = Arc::new(
        ControllerDirectory::new().context("Controller directory is inconsistent")?,
    );

    if let Some(mode) = args.console {
        let echo = ConsoleEcho::new(
            mode,
            config.protocol,
            config.assembler.timeout_ticks,
            directory,
        );
        let selector = PortSelector::parse(&config.midi.input_port);
        return run_console_echo(&selector, echo, config.assembler.poll_interval()).await;
    }

    info!("Starting LS9 automation...");
    run_app(config, directory, args.bridge).await?;

    info!("LS9 automation shutdown complete");
    Ok(())
}

async fn run_app(config: AppConfig, directory: Arc<ControllerDirectory>, with_bridge: bool) -> Result<()> {
    let sink: Arc<dyn OutputSink> = Arc::new(MidiOutputSink::open(
        "LS9-Automation-Output",
        &PortSelector::parse(&config.midi.output_port),
    )?);

    let (tx, rx) = mpsc::channel::<InboundPacket>(INBOUND_CHANNEL_SIZE);
    let (_input_conn, input_name) = open_input(
        "LS9-Automation-Input",
        &PortSelector::parse(&config.midi.input_port),
        tx,
    )?;
    info!("Listening to {}, sending to {}", input_name, sink.name());

    let engine = AutomationEngine::new(directory, config.levels, &config.routing);
    let pipeline = Pipeline::new(
        config.protocol,
        config.assembler.timeout_ticks,
        engine,
        sink.clone(),
    );
    let mut pipeline_task = tokio::spawn(pipeline.run(rx, config.assembler.poll_interval()));

    if with_bridge {
        let listener = bridge::bind(&config.bridge.listen).await?;
        let fader_bridge = Arc::new(FaderBridge::new(&config.bridge, config.protocol, sink));
        tokio::spawn(bridge::serve(listener, fader_bridge));
    }

    info!("Press Ctrl+C to exit");

    tokio::select! {
        _ = shutdown_signal() => {}
        result = &mut pipeline_task => {
            if let Err(e) = result {
                error!("Pipeline task failed: {}", e);
            }
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
