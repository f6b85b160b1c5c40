//! Pipeline actor
//!
//! Single consumer of the console input. Owns the frame assembler and the
//! automation engine, so group completion, idle timeouts and engine state
//! changes are all serialized on one task.
//!
//! ```text
//! midir callback --try_send--> mpsc --> Pipeline::run
//!                                         |- assembler.push / tick
//!                                         |- protocol.decode
//!                                         |- engine.process
//!                                         '- send_nrpn --> OutputSink
//! ```

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::automation::AutomationEngine;
use crate::midi::{CcPacket, InboundPacket};
use crate::nrpn::{FrameAssembler, NrpnMessage, NrpnProtocol};
use crate::sink::{send_nrpn, OutputSink};

pub struct Pipeline {
    protocol: NrpnProtocol,
    assembler: FrameAssembler,
    engine: AutomationEngine,
    sink: Arc<dyn OutputSink>,
    events_processed: u64,
}

impl Pipeline {
    pub fn new(
        protocol: NrpnProtocol,
        timeout_ticks: u32,
        engine: AutomationEngine,
        sink: Arc<dyn OutputSink>,
    ) -> Self {
        Self {
            protocol,
            assembler: FrameAssembler::new(protocol.status, timeout_ticks),
            engine,
            sink,
            events_processed: 0,
        }
    }

    /// Feed one packet; returns the event it completed, if any
    pub fn handle_packet(&mut self, packet: CcPacket) -> Option<NrpnMessage> {
        let group = self.assembler.push(packet)?;

        let event = match self.protocol.decode(&group) {
            Ok(event) => event,
            Err(e) => {
                warn!("{}", e);
                return None;
            }
        };

        self.events_processed += 1;
        debug!("MIXER IN: {}", event);

        for command in self.engine.process(event) {
            if let Err(e) = send_nrpn(self.sink.as_ref(), &self.protocol, command) {
                error!("Failed to send {} to {}: {}", command, self.sink.name(), e);
            }
        }

        Some(event)
    }

    /// One poll of the idle timer
    pub fn handle_tick(&mut self) {
        if let Err(e) = self.assembler.tick() {
            warn!("{}", e);
        }
    }

    pub fn engine(&self) -> &AutomationEngine {
        &self.engine
    }

    /// Run until the input channel closes
    pub async fn run(mut self, mut rx: mpsc::Receiver<InboundPacket>, poll: Duration) {
        info!("Pipeline started, idle poll every {:?}", poll);

        let mut ticker = interval(poll);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                inbound = rx.recv() => match inbound {
                    Some(inbound) => {
                        debug!(
                            "MIDI IN [{} us]: {}",
                            inbound.timestamp_us, inbound.packet
                        );
                        self.handle_packet(inbound.packet);
                    }
                    None => break,
                },
                _ = ticker.tick() => self.handle_tick(),
            }
        }

        info!(
            "Pipeline stopped after {} events",
            self.events_processed
        );
    }
}
