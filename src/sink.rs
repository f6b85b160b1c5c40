//! Output sinks
//!
//! Everything that transmits packets to the console goes through
//! [`OutputSink`], so the pipeline and the fader bridge can share one port
//! and tests can record what would have been sent.

use tracing::debug;

use crate::error::TransportError;
use crate::midi::CcPacket;
use crate::nrpn::{NrpnMessage, NrpnProtocol};

/// Destination for outbound control-change packets
///
/// Methods take `&self` so one sink can be shared as `Arc<dyn OutputSink>`;
/// implementations use interior mutability for the connection.
pub trait OutputSink: Send + Sync {
    /// Port or sink name for logs
    fn name(&self) -> &str;

    /// Transmit one packet
    fn send(&self, packet: &CcPacket) -> Result<(), TransportError>;
}

/// Encode `message` and transmit its four packets in order
pub fn send_nrpn(
    sink: &dyn OutputSink,
    protocol: &NrpnProtocol,
    message: NrpnMessage,
) -> Result<(), TransportError> {
    for packet in protocol.encode(message) {
        sink.send(&packet)?;
    }
    debug!("Sent {} to {}", message, sink.name());
    Ok(())
}

#[cfg(test)]
pub use recording::RecordingSink;

#[cfg(test)]
mod recording {
    use super::*;
    use parking_lot::Mutex;

    /// Sink that keeps every packet for assertions
    #[derive(Default)]
    pub struct RecordingSink {
        packets: Mutex<Vec<CcPacket>>,
        fail: bool,
    }

    impl RecordingSink {
        pub fn new() -> Self {
            Self::default()
        }

        /// A sink whose every send fails as if the port were gone
        pub fn disconnected() -> Self {
            Self {
                packets: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        pub fn packets(&self) -> Vec<CcPacket> {
            self.packets.lock().clone()
        }

        /// Sent packets decoded back into messages
        pub fn messages(&self, protocol: &NrpnProtocol) -> Vec<NrpnMessage> {
            self.packets()
                .chunks_exact(4)
                .filter_map(|chunk| <[CcPacket; 4]>::try_from(chunk).ok())
                .filter_map(|group| protocol.decode(&group).ok())
                .collect()
        }
    }

    impl OutputSink for RecordingSink {
        fn name(&self) -> &str {
            "recording"
        }

        fn send(&self, packet: &CcPacket) -> Result<(), TransportError> {
            if self.fail {
                return Err(TransportError::NotConnected("recording".to_string()));
            }
            self.packets.lock().push(*packet);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_nrpn_emits_group_in_order() {
        let sink = RecordingSink::new();
        let protocol = NrpnProtocol::default();
        let message = NrpnMessage::new(0x2D0B, 0x0000);

        send_nrpn(&sink, &protocol, message).unwrap();

        assert_eq!(sink.packets(), protocol.encode(message).to_vec());
        assert_eq!(sink.messages(&protocol), vec![message]);
    }

    #[test]
    fn test_send_nrpn_stops_on_first_failure() {
        let sink = RecordingSink::disconnected();
        let result = send_nrpn(&sink, &NrpnProtocol::default(), NrpnMessage::new(1, 2));
        assert!(matches!(result, Err(TransportError::NotConnected(_))));
        assert!(sink.packets().is_empty());
    }
}
