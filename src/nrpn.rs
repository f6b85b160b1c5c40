//! NRPN frame codec
//!
//! One logical parameter change travels as four control-change packets:
//!
//! ```text
//! packet  status  param id      data
//!      1  0xB0    0x62          address bits 13..7
//!      2  0xB0    0x63          address bits 6..0
//!      3  0xB0    0x06          value bits 13..7
//!      4  0xB0    0x26          value bits 6..0
//! ```
//!
//! The status byte and the four parameter ids are configurable; the defaults
//! are what the LS9 transmits on MIDI channel 1.

pub mod assembler;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ProtocolError;
use crate::midi::{combine_7bit, split_7bit, CcPacket, CC_STATUS, MAX_14BIT};

pub use assembler::FrameAssembler;

/// A decoded (or to-be-encoded) NRPN parameter change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NrpnMessage {
    /// 14-bit controller address
    pub address: u16,
    /// 14-bit value
    pub value: u16,
}

impl NrpnMessage {
    pub fn new(address: u16, value: u16) -> Self {
        Self { address, value }
    }
}

impl fmt::Display for NrpnMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04X} = 0x{:04X}", self.address, self.value)
    }
}

/// Fixed framing constants of the NRPN sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct NrpnProtocol {
    /// Status byte every packet of a group carries
    #[serde(default = "default_status")]
    pub status: u8,
    /// Parameter ids of packets 1-4, in order
    #[serde(default = "default_markers")]
    pub markers: [u8; 4],
}

impl Default for NrpnProtocol {
    fn default() -> Self {
        Self {
            status: default_status(),
            markers: default_markers(),
        }
    }
}

impl NrpnProtocol {
    /// Validate the marker sequence and join the four 7-bit fields
    pub fn decode(&self, group: &[CcPacket; 4]) -> Result<NrpnMessage, ProtocolError> {
        let markers_match = group
            .iter()
            .zip(self.markers.iter())
            .all(|(packet, marker)| packet.param == *marker);

        if !markers_match {
            return Err(ProtocolError::InvalidSequence { packets: *group });
        }

        Ok(NrpnMessage {
            address: combine_7bit(group[0].data, group[1].data),
            value: combine_7bit(group[2].data, group[3].data),
        })
    }

    /// Split address and value into the four outbound packets
    pub fn encode(&self, message: NrpnMessage) -> [CcPacket; 4] {
        let (address_msb, address_lsb) = split_7bit(message.address & MAX_14BIT);
        let (value_msb, value_lsb) = split_7bit(message.value & MAX_14BIT);
        let [m0, m1, m2, m3] = self.markers;

        [
            CcPacket::new(self.status, m0, address_msb),
            CcPacket::new(self.status, m1, address_lsb),
            CcPacket::new(self.status, m2, value_msb),
            CcPacket::new(self.status, m3, value_lsb),
        ]
    }
}

fn default_status() -> u8 { CC_STATUS }
fn default_markers() -> [u8; 4] { [0x62, 0x63, 0x06, 0x26] }
