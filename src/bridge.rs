//! Remote fader bridge
//!
//! Lets a performer mix their own in-ear matrix from a USB keyboard on a
//! small networked box. The box forwards each keyboard control change as a
//! text record `"<cc>,<value>"` over a WebSocket; the server looks the CC up
//! in the configured table, rescales the 7-bit value to the console's 14-bit
//! range and sends it through the shared output sink.

use anyhow::{Context, Result};
use futures_util::{Stream, StreamExt};
use std::collections::HashMap;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

use crate::config::{BridgeConfig, BridgeControl};
use crate::error::{BridgeError, TransportError};
use crate::nrpn::{NrpnMessage, NrpnProtocol};
use crate::sink::{send_nrpn, OutputSink};

/// Largest value a keyboard control change carries
const CC_MAX: u16 = 127;

/// Pause after a failed accept so a full fd table does not spin the loop
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Translates keyboard records into console commands
pub struct FaderBridge {
    full_scale: u16,
    controls: HashMap<u8, BridgeControl>,
    protocol: NrpnProtocol,
    sink: Arc<dyn OutputSink>,
}

impl FaderBridge {
    pub fn new(config: &BridgeConfig, protocol: NrpnProtocol, sink: Arc<dyn OutputSink>) -> Self {
        let controls = config
            .controls
            .iter()
            .map(|control| (control.cc, control.clone()))
            .collect();

        Self {
            full_scale: config.full_scale,
            controls,
            protocol,
            sink,
        }
    }

    /// Split a `"<cc>,<value>"` record
    pub fn parse_record(text: &str) -> Result<(u8, u16), BridgeError> {
        let malformed = || BridgeError::MalformedRecord(text.to_string());

        let (cc, value) = text.trim().split_once(',').ok_or_else(malformed)?;
        let cc: u8 = cc.trim().parse().map_err(|_| malformed())?;
        let value: u16 = value.trim().parse().map_err(|_| malformed())?;

        if value > CC_MAX {
            return Err(BridgeError::ValueOutOfRange(value));
        }
        Ok((cc, value))
    }

    /// Rescale a 7-bit value onto `0..=full_scale`
    pub fn scale(&self, value: u16) -> u16 {
        (u32::from(value.min(CC_MAX)) * u32::from(self.full_scale) / u32::from(CC_MAX)) as u16
    }

    /// Handle one text record and send the resulting command
    pub fn handle_text(&self, text: &str) -> Result<NrpnMessage, BridgeError> {
        let (cc, value) = Self::parse_record(text)?;
        let control = self
            .controls
            .get(&cc)
            .ok_or(BridgeError::UnknownControl(cc))?;

        let message = NrpnMessage::new(control.address, self.scale(value));
        info!(
            "MIDI OUT: {} @ 0x{:04X} (CC {} = {})",
            control.label, message.value, cc, value
        );
        send_nrpn(self.sink.as_ref(), &self.protocol, message)?;

        Ok(message)
    }
}

/// Bind the bridge listener
pub async fn bind(listen: &str) -> Result<TcpListener> {
    let listener = TcpListener::bind(listen)
        .await
        .with_context(|| format!("Failed to bind fader bridge on {}", listen))?;
    info!("Fader bridge listening on ws://{}", listener.local_addr()?);
    Ok(listener)
}

/// Accept bridge clients forever; each connection gets its own task
pub async fn serve(listener: TcpListener, bridge: Arc<FaderBridge>) {
    let incoming = futures_util::stream::unfold(listener, |listener| async move {
        let accepted = listener.accept().await;
        Some((accepted, listener))
    });
    serve_incoming(incoming, bridge).await;
}

async fn serve_incoming<S>(incoming: S, bridge: Arc<FaderBridge>)
where
    S: Stream<Item = io::Result<(TcpStream, SocketAddr)>>,
{
    tokio::pin!(incoming);

    while let Some(accepted) = incoming.next().await {
        let (stream, peer) = match accepted {
            Ok(connection) => connection,
            Err(e) => {
                error!("Fader bridge accept failed: {}", e);
                tokio::time::sleep(ACCEPT_BACKOFF).await;
                continue;
            }
        };

        let bridge = bridge.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer, bridge).await {
                warn!("Fader bridge client {} dropped: {}", peer, e);
            }
        });
    }
}

async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    bridge: Arc<FaderBridge>,
) -> Result<(), TransportError> {
    let mut ws = accept_async(stream).await?;
    info!("Fader bridge client connected: {}", peer);

    while let Some(message) = ws.next().await {
        match message? {
            Message::Text(text) => {
                debug!("Bridge record from {}: {}", peer, text);
                if let Err(e) = bridge.handle_text(&text) {
                    error!("{}", e);
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    info!("Fader bridge client disconnected: {}", peer);
    Ok(())
}

/// Keyboard side of the bridge
pub mod client {
    use super::*;
    use futures_util::SinkExt;
    use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

    /// Build the wire record for one control change
    pub fn format_record(cc: u8, value: u8) -> String {
        format!("{},{}", cc, value)
    }

    /// WebSocket client that reconnects lazily
    pub struct RemoteClient {
        url: String,
        socket: Option<WebSocketStream<MaybeTlsStream<TcpStream>>>,
    }

    impl RemoteClient {
        /// `host` is `hostname:port`
        pub fn new(host: &str) -> Self {
            Self {
                url: format!("ws://{}", host),
                socket: None,
            }
        }

        pub fn url(&self) -> &str {
            &self.url
        }

        /// Send one record, connecting first if the socket is down.
        ///
        /// A failed send drops the socket so the next record reconnects.
        pub async fn send(&mut self, cc: u8, value: u8) -> Result<(), TransportError> {
            if self.socket.is_none() {
                let (socket, _) = connect_async(self.url.as_str()).await?;
                info!("Connected to {}", self.url);
                self.socket = Some(socket);
            }

            let record = format_record(cc, value);
            if let Some(socket) = self.socket.as_mut() {
                if let Err(e) = socket.send(Message::Text(record.clone())).await {
                    self.socket = None;
                    return Err(e.into());
                }
            }
            info!("Websocket send \"{}\"", record);
            Ok(())
        }

        pub async fn close(&mut self) {
            if let Some(mut socket) = self.socket.take() {
                if let Err(e) = socket.close(None).await {
                    debug!("Failed to close websocket: {}", e);
                }
            }
        }
    }
}
