//! LS9 hardware ports
//!
//! Opens the `midir` input and output connections to the console. The input
//! callback only forwards packets into a channel; all processing happens on
//! the consumer side.

use anyhow::{Context, Result};
use midir::{MidiInput, MidiInputConnection, MidiOutput, MidiOutputConnection};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::TransportError;
use crate::midi::{find_input_port, find_output_port, format_hex, CcPacket, InboundPacket, PortSelector};
use crate::sink::OutputSink;

/// Capacity of the inbound packet channel
pub const INBOUND_CHANNEL_SIZE: usize = 1000;

/// Output connection shared by the pipeline and the fader bridge
pub struct MidiOutputSink {
    port_name: String,
    conn: Mutex<MidiOutputConnection>,
}

impl MidiOutputSink {
    /// Open the output port picked by `selector`
    pub fn open(client_name: &str, selector: &PortSelector) -> Result<Self> {
        let midi_out = MidiOutput::new(client_name).context("Failed to create MIDI output")?;
        debug!("Found {} MIDI output ports", midi_out.port_count());

        let (port, port_name) = find_output_port(&midi_out, selector)
            .ok_or_else(|| anyhow::anyhow!("Output port {} not found", selector))?;

        info!("Connecting to output port: {}", port_name);
        let conn = midi_out
            .connect(&port, client_name)
            .map_err(|e| anyhow::anyhow!("Failed to connect to output port '{}': {}", port_name, e))?;

        Ok(Self {
            port_name,
            conn: Mutex::new(conn),
        })
    }
}

impl OutputSink for MidiOutputSink {
    fn name(&self) -> &str {
        &self.port_name
    }

    fn send(&self, packet: &CcPacket) -> Result<(), TransportError> {
        let bytes = packet.to_bytes();
        self.conn.lock().send(&bytes)?;
        debug!("Sent raw: {}", format_hex(&bytes));
        Ok(())
    }
}

/// Open the input port picked by `selector` and forward every 3-byte packet
/// into `tx`.
///
/// The connection closes when the returned handle is dropped.
pub fn open_input(
    client_name: &str,
    selector: &PortSelector,
    tx: mpsc::Sender<InboundPacket>,
) -> Result<(MidiInputConnection<()>, String)> {
    let mut midi_in = MidiInput::new(client_name).context("Failed to create MIDI input")?;
    // Keep clock and active sensing out of the channel
    midi_in.ignore(midir::Ignore::TimeAndActiveSense);
    debug!("Found {} MIDI input ports", midi_in.port_count());

    let (port, port_name) = find_input_port(&midi_in, selector)
        .ok_or_else(|| anyhow::anyhow!("Input port {} not found", selector))?;

    info!("Connecting to input port: {}", port_name);
    let conn = midi_in
        .connect(
            &port,
            client_name,
            move |timestamp_us, data, _| match CcPacket::from_bytes(data) {
                Some(packet) => {
                    let inbound = InboundPacket {
                        packet,
                        timestamp_us,
                    };
                    if tx.try_send(inbound).is_err() {
                        warn!("Inbound channel full or closed, dropped {}", packet);
                    }
                }
                None => debug!("Ignoring non 3-byte MIDI: {}", format_hex(data)),
            },
            (),
        )
        .map_err(|e| anyhow::anyhow!("Failed to connect to input port '{}': {}", port_name, e))?;

    Ok((conn, port_name))
}
