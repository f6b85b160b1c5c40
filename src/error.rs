//! Error types for the NRPN pipeline
//!
//! Protocol and directory errors are recovered locally. Only transport
//! errors are surfaced to the operator (as log lines).

use thiserror::Error;

use crate::directory::ControlClass;
use crate::midi::{format_packets, CcPacket};

/// Failures while framing or reassembling NRPN groups
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// A complete 4-packet group carried the wrong parameter markers
    #[error("invalid NRPN sequence, MIDI message dump: {}", format_packets(.packets))]
    InvalidSequence { packets: [CcPacket; 4] },

    /// A partial group did not complete within the idle window
    #[error(
        "NRPN input buffer timed out after {ticks} idle ticks, dropped: {}",
        format_packets(.pending)
    )]
    BufferTimeout { pending: Vec<CcPacket>, ticks: u32 },
}

/// Failures while sending to the console or to the remote bridge
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("output '{0}' is not connected")]
    NotConnected(String),

    #[error("failed to send MIDI packet: {0}")]
    Send(#[from] midir::SendError),

    #[error("websocket error: {0}")]
    WebSocket(Box<tokio_tungstenite::tungstenite::Error>),
}

impl From<tokio_tungstenite::tungstenite::Error> for TransportError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        TransportError::WebSocket(Box::new(e))
    }
}

/// Construction-time violations of the directory bijection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    #[error("{class} directory lists '{name}' twice")]
    DuplicateName { class: ControlClass, name: &'static str },

    #[error("{class} directory maps 0x{address:04X} to both '{first}' and '{second}'")]
    DuplicateAddress {
        class: ControlClass,
        address: u16,
        first: &'static str,
        second: &'static str,
    },

    #[error("{class} directory address 0x{address:04X} for '{name}' exceeds 14 bits")]
    AddressOutOfRange {
        class: ControlClass,
        name: &'static str,
        address: u16,
    },
}

/// Rejected records on the remote fader bridge
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("malformed fader record '{0}' (expected \"<cc>,<value>\")")]
    MalformedRecord(String),

    #[error("CC {0} is not mapped to a console control")]
    UnknownControl(u8),

    #[error("CC value {0} out of range (0-127)")]
    ValueOutOfRange(u16),

    #[error(transparent)]
    Transport(#[from] TransportError),
}
