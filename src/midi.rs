//! MIDI utilities and packet types
//!
//! The LS9 speaks NRPN over plain 3-byte control-change packets. This module
//! holds the packet type, 7-bit field helpers, hex formatting and `midir`
//! port discovery.

use anyhow::Result;
use midir::{MidiInput, MidiInputPort, MidiOutput, MidiOutputPort};
use std::fmt;
use tracing::debug;

/// Status byte of a control-change message on MIDI channel 1
pub const CC_STATUS: u8 = 0xB0;

/// Largest value a 14-bit NRPN field can hold
pub const MAX_14BIT: u16 = 0x3FFF;

/// One control-change packet: status, parameter id, data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CcPacket {
    pub status: u8,
    pub param: u8,
    pub data: u8,
}

impl CcPacket {
    pub fn new(status: u8, param: u8, data: u8) -> Self {
        Self {
            status,
            param,
            data,
        }
    }

    /// Parse raw transport bytes. Anything that is not exactly three bytes
    /// long is not a control-change packet.
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        match *data {
            [status, param, value] => Some(Self::new(status, param, value)),
            _ => None,
        }
    }

    /// Wire bytes with the data byte masked to 7 bits
    pub fn to_bytes(&self) -> [u8; 3] {
        [self.status, self.param & 0x7F, self.data & 0x7F]
    }
}

impl fmt::Display for CcPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X} {:02X} {:02X}", self.status, self.param, self.data)
    }
}

/// A packet as delivered by the hardware input callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InboundPacket {
    pub packet: CcPacket,
    /// Driver timestamp in microseconds
    pub timestamp_us: u64,
}

/// Join two 7-bit halves into a 14-bit value
pub fn combine_7bit(msb: u8, lsb: u8) -> u16 {
    (((msb & 0x7F) as u16) << 7) | (lsb & 0x7F) as u16
}

/// Split a 14-bit value into (msb, lsb) 7-bit halves
pub fn split_7bit(value: u16) -> (u8, u8) {
    (((value >> 7) & 0x7F) as u8, (value & 0x7F) as u8)
}

/// Format MIDI bytes as hex string for debugging
pub fn format_hex(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format a packet group as `[B0 62 3A] [B0 63 0B] ...`
pub fn format_packets(packets: &[CcPacket]) -> String {
    packets
        .iter()
        .map(|p| format!("[{}]", p))
        .collect::<Vec<_>>()
        .join(" ")
}

/// How a MIDI port is picked from the system list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortSelector {
    /// Position in the port list
    Index(usize),
    /// Case-insensitive substring of the port name
    Name(String),
}

impl PortSelector {
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        match text.parse::<usize>() {
            Ok(index) => PortSelector::Index(index),
            Err(_) => PortSelector::Name(text.to_string()),
        }
    }

    fn matches(&self, index: usize, name: &str) -> bool {
        match self {
            PortSelector::Index(i) => *i == index,
            PortSelector::Name(pattern) => name.to_lowercase().contains(&pattern.to_lowercase()),
        }
    }
}

impl fmt::Display for PortSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortSelector::Index(i) => write!(f, "#{}", i),
            PortSelector::Name(name) => write!(f, "'{}'", name),
        }
    }
}

/// Find an input port by index or substring match
pub fn find_input_port(
    midi_in: &MidiInput,
    selector: &PortSelector,
) -> Option<(MidiInputPort, String)> {
    for (index, port) in midi_in.ports().into_iter().enumerate() {
        if let Ok(name) = midi_in.port_name(&port) {
            if selector.matches(index, &name) {
                debug!("Found input port '{}' for selector {}", name, selector);
                return Some((port, name));
            }
        }
    }
    None
}

/// Find an output port by index or substring match
pub fn find_output_port(
    midi_out: &MidiOutput,
    selector: &PortSelector,
) -> Option<(MidiOutputPort, String)> {
    for (index, port) in midi_out.ports().into_iter().enumerate() {
        if let Ok(name) = midi_out.port_name(&port) {
            if selector.matches(index, &name) {
                debug!("Found output port '{}' for selector {}", name, selector);
                return Some((port, name));
            }
        }
    }
    None
}

/// Port discovery utilities
pub mod discovery {
    use super::*;
    use colored::*;

    /// Information about a MIDI port
    #[derive(Debug, Clone)]
    pub struct PortInfo {
        pub index: usize,
        pub name: String,
    }

    /// Discover input ports
    pub fn discover_input_ports() -> Result<Vec<PortInfo>> {
        let midi_in = MidiInput::new("LS9-Automation-Discovery")?;
        Ok(midi_in
            .ports()
            .iter()
            .enumerate()
            .filter_map(|(index, port)| {
                midi_in
                    .port_name(port)
                    .ok()
                    .map(|name| PortInfo { index, name })
            })
            .collect())
    }

    /// Discover output ports
    pub fn discover_output_ports() -> Result<Vec<PortInfo>> {
        let midi_out = MidiOutput::new("LS9-Automation-Discovery")?;
        Ok(midi_out
            .ports()
            .iter()
            .enumerate()
            .filter_map(|(index, port)| {
                midi_out
                    .port_name(port)
                    .ok()
                    .map(|name| PortInfo { index, name })
            })
            .collect())
    }

    /// List all ports in a formatted way
    pub fn list_ports_formatted() {
        println!("\n{}", "=== Available MIDI Ports ===".bold().cyan());

        for (title, ports) in [
            ("Input Ports:", discover_input_ports()),
            ("Output Ports:", discover_output_ports()),
        ] {
            println!("\n{}", title.bold());
            match ports {
                Ok(ports) if ports.is_empty() => {
                    println!("  {}", "No ports found".dimmed());
                }
                Ok(ports) => {
                    for port in ports {
                        println!("  {} {}", format!("[{}]", port.index).green(), port.name);
                    }
                }
                Err(e) => println!("  {} {}", "Port scan failed:".red(), e),
            }
        }

        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packet_from_bytes() {
        assert_eq!(
            CcPacket::from_bytes(&[0xB0, 0x62, 0x3A]),
            Some(CcPacket::new(0xB0, 0x62, 0x3A))
        );
        assert_eq!(CcPacket::from_bytes(&[0xC0, 0x05]), None);
        assert_eq!(CcPacket::from_bytes(&[0xF0, 0x43, 0x10, 0xF7]), None);
    }

    #[test]
    fn test_7bit_helpers() {
        assert_eq!(combine_7bit(0x3A, 0x0B), 0x1D0B);
        assert_eq!(split_7bit(0x1D0B), (0x3A, 0x0B));
        assert_eq!(split_7bit(0x3FFF), (0x7F, 0x7F));
        // High bits are masked
        assert_eq!(combine_7bit(0xFF, 0xFF), 0x3FFF);
    }

    #[test]
    fn test_format_packets() {
        let packets = [CcPacket::new(0xB0, 0x62, 0x3A), CcPacket::new(0xB0, 0x63, 0x0B)];
        assert_eq!(format_packets(&packets), "[B0 62 3A] [B0 63 0B]");
        assert_eq!(format_hex(&[0xB0, 0x06, 0x7F]), "B0 06 7F");
    }

    #[test]
    fn test_port_selector_parse() {
        assert_eq!(PortSelector::parse("2"), PortSelector::Index(2));
        assert_eq!(
            PortSelector::parse(" LS9 "),
            PortSelector::Name("LS9".to_string())
        );
        assert!(PortSelector::parse("ls9").matches(4, "Yamaha LS9-32 Port1"));
        assert!(!PortSelector::parse("1").matches(0, "Yamaha LS9-32 Port1"));
    }
}
