//! Console echo tool
//!
//! Prints console traffic without running any automation. `cc` mode shows
//! every control-change packet, `nrpn` mode reassembles groups and shows the
//! decoded controller with its directory name.

use anyhow::Result;
use clap::ValueEnum;
use colored::*;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};

use crate::directory::ControllerDirectory;
use crate::midi::{CcPacket, InboundPacket, PortSelector};
use crate::mixer::{open_input, INBOUND_CHANNEL_SIZE};
use crate::nrpn::{FrameAssembler, NrpnProtocol};

/// What the echo tool prints
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EchoMode {
    /// Raw control-change packets
    Cc,
    /// Decoded NRPN groups
    Nrpn,
}

/// Formatter state for one echo session
pub struct ConsoleEcho {
    mode: EchoMode,
    protocol: NrpnProtocol,
    assembler: FrameAssembler,
    directory: Arc<ControllerDirectory>,
    start_time: Instant,
}

impl ConsoleEcho {
    pub fn new(
        mode: EchoMode,
        protocol: NrpnProtocol,
        timeout_ticks: u32,
        directory: Arc<ControllerDirectory>,
    ) -> Self {
        Self {
            mode,
            protocol,
            assembler: FrameAssembler::new(protocol.status, timeout_ticks),
            directory,
            start_time: Instant::now(),
        }
    }

    /// Line to print for one inbound packet, if any
    pub fn on_packet(&mut self, packet: CcPacket) -> Option<String> {
        match self.mode {
            EchoMode::Cc if packet.status != self.protocol.status => None,
            EchoMode::Cc => Some(format!(
                "[{}ms] {} {}",
                format!("{:08}", self.elapsed_ms()).dimmed(),
                "CC".bright_yellow(),
                format!(
                    "{:02X}\t{:02X}\t{:02X}",
                    packet.status, packet.param, packet.data
                )
            )),
            EchoMode::Nrpn => {
                let group = self.assembler.push(packet)?;
                let line = match self.protocol.decode(&group) {
                    Ok(event) => format!(
                        "[{}ms] {} 0x{:04X} {:<18} value 0x{:04X}",
                        format!("{:08}", self.elapsed_ms()).dimmed(),
                        "NRPN".bright_green(),
                        event.address,
                        self.directory.describe(event.address).white(),
                        event.value
                    ),
                    Err(e) => format!("{} {}", "ERR".red(), e),
                };
                Some(line)
            }
        }
    }

    /// Line to print when the idle timer drops a partial group, if any
    pub fn on_tick(&mut self) -> Option<String> {
        if self.mode != EchoMode::Nrpn {
            return None;
        }
        self.assembler
            .tick()
            .err()
            .map(|e| format!("{} {}", "TIMEOUT".yellow(), e))
    }

    fn elapsed_ms(&self) -> u64 {
        self.start_time.elapsed().as_millis() as u64
    }
}

/// Echo the console input until Ctrl+C
pub async fn run_console_echo(
    selector: &PortSelector,
    mut echo: ConsoleEcho,
    poll: Duration,
) -> Result<()> {
    let (tx, mut rx) = mpsc::channel::<InboundPacket>(INBOUND_CHANNEL_SIZE);
    let (_conn, port_name) = open_input("LS9-Automation-Echo", selector, tx)?;

    println!("{}", "=== LS9 Console Echo ===".bold().cyan());
    println!("Listening on {} in {:?} mode", port_name.white(), echo.mode);
    println!("Press Ctrl+C to exit\n");

    let mut ticker = interval(poll);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            Some(inbound) = rx.recv() => {
                if let Some(line) = echo.on_packet(inbound.packet) {
                    println!("{}", line);
                }
            }
            _ = ticker.tick() => {
                if let Some(line) = echo.on_tick() {
                    println!("{}", line);
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    println!("\n{}", "Echo stopped".yellow());
    Ok(())
}
