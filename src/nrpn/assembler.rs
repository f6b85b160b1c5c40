//! Frame assembler
//!
//! Collects inbound control-change packets into groups of four. A group that
//! stalls part way (a dropped packet, a cable pulled mid-message) is thrown
//! away once the buffer has sat idle for `timeout_ticks` polls, so the next
//! complete group lines up again.

use crate::error::ProtocolError;
use crate::midi::CcPacket;

/// Packets per NRPN group
pub const GROUP_LEN: usize = 4;

/// Buffers packets until a complete group is available
#[derive(Debug, Clone)]
pub struct FrameAssembler {
    /// Only packets with this status byte are buffered
    status: u8,
    /// Idle polls tolerated before the buffer is discarded
    timeout_ticks: u32,
    pending: Vec<CcPacket>,
    idle_ticks: u32,
}

impl FrameAssembler {
    pub fn new(status: u8, timeout_ticks: u32) -> Self {
        Self {
            status,
            timeout_ticks,
            pending: Vec::with_capacity(GROUP_LEN),
            idle_ticks: 0,
        }
    }

    /// Buffer one packet. Returns the group once the fourth packet arrives.
    ///
    /// Packets with a foreign status byte (clock, active sensing, notes) are
    /// ignored and leave the buffer untouched.
    pub fn push(&mut self, packet: CcPacket) -> Option<[CcPacket; GROUP_LEN]> {
        if packet.status != self.status {
            return None;
        }

        self.pending.push(packet);
        if self.pending.len() < GROUP_LEN {
            return None;
        }

        self.idle_ticks = 0;
        let group = std::mem::replace(&mut self.pending, Vec::with_capacity(GROUP_LEN));
        <[CcPacket; GROUP_LEN]>::try_from(group).ok()
    }

    /// Advance the idle counter by one poll.
    ///
    /// An empty buffer never times out. Once the counter passes the
    /// threshold the partial group is discarded and returned in the error.
    pub fn tick(&mut self) -> Result<(), ProtocolError> {
        if self.pending.is_empty() {
            return Ok(());
        }

        self.idle_ticks += 1;
        if self.idle_ticks <= self.timeout_ticks {
            return Ok(());
        }

        let ticks = self.idle_ticks;
        let pending = std::mem::take(&mut self.pending);
        self.idle_ticks = 0;
        Err(ProtocolError::BufferTimeout { pending, ticks })
    }

    pub fn pending(&self) -> &[CcPacket] {
        &self.pending
    }

    pub fn idle_ticks(&self) -> u32 {
        self.idle_ticks
    }

    pub fn reset(&mut self) {
        self.pending.clear();
        self.idle_ticks = 0;
    }
}
