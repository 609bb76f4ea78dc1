//! # Engine.IO Link
//!
//! Runs the transport side of the control channel:
//!
//! - Answers the Engine.IO `open` handshake with a namespace connect
//! - Answers heartbeat pings
//! - Extracts Socket.IO events for dispatch
//! - Drains the outbound queue into the frame sink, holding back events
//!   until the peer has acknowledged the namespace connect
//!
//! There is no reconnection: once the peer closes, the link reports `None`
//! and outbound packets are dropped by the [`ChannelSender`].

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::frame_trait::{FrameSink, FrameSource};
use super::{ChannelSender, OutboundQueue};
use crate::error::Result;
use crate::protocol::decoder::decode_packet;
use crate::protocol::encoder::encode_packet;
use crate::protocol::packet::{EnginePacket, SocketEvent, SocketPacket};

/// Inbound half of the link
pub struct EngineLink<S> {
    source: S,
    sender: ChannelSender,
    session_id: Option<String>,
    connected: watch::Sender<bool>,
}

impl<S: FrameSource> EngineLink<S> {
    /// Creates a link reading from `source`; protocol replies go to `sender`.
    pub fn new(source: S, sender: ChannelSender) -> Self {
        Self {
            source,
            sender,
            session_id: None,
            connected: watch::Sender::new(false),
        }
    }

    /// Watch handle on the namespace connect state, for [`pump_outbound`]
    pub fn connection_state(&self) -> watch::Receiver<bool> {
        self.connected.subscribe()
    }

    fn set_connected(&self, connected: bool) {
        self.connected.send_replace(connected);
    }

    /// Engine.IO session id from the handshake, once received
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// True once the peer acknowledged the namespace connect
    pub fn is_connected(&self) -> bool {
        *self.connected.borrow()
    }

    /// Waits for the next inbound Socket.IO event.
    ///
    /// Transport-level packets are handled internally. Undecodable frames
    /// are logged and skipped.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(event))` - Next event, in arrival order
    /// * `Ok(None)` - Peer closed the connection or refused the namespace
    ///
    /// # Errors
    ///
    /// Returns `Transport` error if reading from the source fails.
    pub async fn next_event(&mut self) -> Result<Option<SocketEvent>> {
        loop {
            let Some(text) = self.source.next_text().await? else {
                self.set_connected(false);
                return Ok(None);
            };

            let packet = match decode_packet(&text) {
                Ok(packet) => packet,
                Err(e) => {
                    warn!("Skipping undecodable frame {:?}: {}", text, e);
                    continue;
                }
            };

            match packet {
                EnginePacket::Open(handshake) => {
                    self.session_id = handshake
                        .get("sid")
                        .and_then(|sid| sid.as_str())
                        .map(str::to_string);
                    info!("Engine.IO handshake complete (sid: {:?})", self.session_id);
                    self.sender.send_packet(EnginePacket::connect());
                }
                EnginePacket::Ping(probe) => {
                    debug!("Heartbeat ping");
                    self.sender.send_packet(EnginePacket::Pong(probe));
                }
                EnginePacket::Pong(_) | EnginePacket::Noop | EnginePacket::Upgrade => {}
                EnginePacket::Close => {
                    info!("Peer closed the transport");
                    self.set_connected(false);
                    return Ok(None);
                }
                EnginePacket::Message(SocketPacket::Connect(_)) => {
                    info!("Connected to peer");
                    self.set_connected(true);
                }
                EnginePacket::Message(SocketPacket::Disconnect) => {
                    warn!("Peer disconnected the controller");
                    self.set_connected(false);
                    return Ok(None);
                }
                EnginePacket::Message(SocketPacket::ConnectError(reason)) => {
                    warn!("Peer refused the connection: {}", reason);
                    self.set_connected(false);
                    return Ok(None);
                }
                EnginePacket::Message(SocketPacket::Event(event)) => {
                    debug!("Inbound event '{}'", event.name);
                    return Ok(Some(event));
                }
            }
        }
    }
}

/// Writes queued packets to the sink until every sender is dropped.
///
/// Event packets are dropped while `connected` is false; a Socket.IO peer
/// closes clients that send events on a namespace it has not accepted.
/// Handshake and heartbeat packets always go out.
///
/// # Returns
///
/// Number of frames written.
///
/// # Errors
///
/// Returns error on the first failed write; the remaining queue is left
/// undrained.
pub async fn pump_outbound<K: FrameSink>(
    sink: &mut K,
    queue: &mut OutboundQueue,
    connected: watch::Receiver<bool>,
) -> Result<u64> {
    let mut written = 0;

    while let Some(packet) = queue.recv().await {
        if let EnginePacket::Message(SocketPacket::Event(event)) = &packet {
            if !*connected.borrow() {
                debug!("Not connected yet, dropping '{}'", event.name);
                continue;
            }
        }

        let frame = encode_packet(&packet)?;
        sink.send_text(frame).await?;
        written += 1;
    }

    debug!("Outbound queue closed after {} frames", written);
    sink.close().await?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::frame_trait::mocks::ScriptedSource;
    use crate::channel::frame_trait::MockFrameSink;
    use crate::channel::outbound;
    use crate::error::ControllerError;
    use serde_json::json;

    const HANDSHAKE: &str = r#"0{"sid":"s1","upgrades":[],"pingInterval":25000,"pingTimeout":20000}"#;

    #[tokio::test]
    async fn test_handshake_sends_namespace_connect() {
        let (sender, mut queue) = outbound();
        let mut link = EngineLink::new(ScriptedSource::new(&[HANDSHAKE, "40"]), sender);

        assert_eq!(link.next_event().await.unwrap(), None);
        assert_eq!(link.session_id(), Some("s1"));
        assert_eq!(queue.try_recv().unwrap(), EnginePacket::connect());
    }

    #[tokio::test]
    async fn test_connect_ack_marks_connected() {
        let (sender, _queue) = outbound();
        let mut link = EngineLink::new(
            ScriptedSource::new(&[HANDSHAKE, r#"40{"sid":"n1"}"#, r#"42["gameOver"]"#]),
            sender,
        );

        let event = link.next_event().await.unwrap();
        assert_eq!(event, Some(SocketEvent::new("gameOver", None)));
        assert!(link.is_connected());
    }

    #[tokio::test]
    async fn test_connection_state_follows_ack_and_close() {
        let (sender, _queue) = outbound();
        let mut link = EngineLink::new(
            ScriptedSource::new(&[HANDSHAKE, "40", r#"42["gameOver"]"#, "1"]),
            sender,
        );
        let state = link.connection_state();
        assert!(!*state.borrow());

        link.next_event().await.unwrap();
        assert!(*state.borrow());

        assert_eq!(link.next_event().await.unwrap(), None);
        assert!(!*state.borrow());
    }

    #[tokio::test]
    async fn test_ping_answered_with_pong() {
        let (sender, mut queue) = outbound();
        let mut link = EngineLink::new(ScriptedSource::new(&["2", "2probe"]), sender);

        assert_eq!(link.next_event().await.unwrap(), None);
        assert_eq!(queue.try_recv().unwrap(), EnginePacket::Pong(None));
        assert_eq!(
            queue.try_recv().unwrap(),
            EnginePacket::Pong(Some("probe".to_string()))
        );
    }

    #[tokio::test]
    async fn test_events_in_arrival_order() {
        let (sender, _queue) = outbound();
        let mut link = EngineLink::new(
            ScriptedSource::new(&[
                r#"42["controllerPairError",{"message":"bad id"}]"#,
                r#"42["controllerPairSuccess",{"playerNumber":2}]"#,
            ]),
            sender,
        );

        let first = link.next_event().await.unwrap().unwrap();
        let second = link.next_event().await.unwrap().unwrap();
        assert_eq!(first.name, "controllerPairError");
        assert_eq!(first.payload, Some(json!({"message": "bad id"})));
        assert_eq!(second.name, "controllerPairSuccess");
    }

    #[tokio::test]
    async fn test_malformed_frame_skipped() {
        let (sender, _queue) = outbound();
        let mut link = EngineLink::new(
            ScriptedSource::new(&["", "9", r#"42["gameOver""#, r#"42["restartGame"]"#]),
            sender,
        );

        let event = link.next_event().await.unwrap();
        assert_eq!(event, Some(SocketEvent::new("restartGame", None)));
    }

    #[tokio::test]
    async fn test_close_ends_link() {
        let (sender, _queue) = outbound();
        let mut link = EngineLink::new(ScriptedSource::new(&["1", r#"42["gameOver"]"#]), sender);
        assert_eq!(link.next_event().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_connect_error_ends_link() {
        let (sender, _queue) = outbound();
        let mut link = EngineLink::new(
            ScriptedSource::new(&[r#"44{"message":"Invalid namespace"}"#]),
            sender,
        );
        assert_eq!(link.next_event().await.unwrap(), None);
        assert!(!link.is_connected());
    }

    #[tokio::test]
    async fn test_source_error_propagates() {
        let (sender, _queue) = outbound();
        let mut source = ScriptedSource::new(&[]);
        source.push_error("connection reset");
        let mut link = EngineLink::new(source, sender);

        assert!(matches!(
            link.next_event().await,
            Err(ControllerError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn test_pump_writes_encoded_frames_then_closes() {
        let (sender, mut queue) = outbound();
        sender.send("restartGame", None);
        sender.send("newActiveInput", Some(json!({"inputType": "keydown"})));
        drop(sender);

        let mut sink = MockFrameSink::new();
        let mut seq = mockall::Sequence::new();
        sink.expect_send_text()
            .withf(|text| text == r#"42["restartGame"]"#)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        sink.expect_send_text()
            .withf(|text| text == r#"42["newActiveInput",{"inputType":"keydown"}]"#)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        sink.expect_close().times(1).returning(|| Ok(()));

        let written = pump_outbound(&mut sink, &mut queue, watch::channel(true).1).await.unwrap();
        assert_eq!(written, 2);
    }

    #[tokio::test]
    async fn test_pump_drops_events_before_namespace_connect() {
        let (sender, mut queue) = outbound();
        sender.send("deviceOrientationChanged", Some(json!({"x": 1.0, "y": 0.0})));
        sender.send_packet(EnginePacket::connect());
        sender.send_packet(EnginePacket::Pong(None));
        drop(sender);

        let mut sink = MockFrameSink::new();
        let mut seq = mockall::Sequence::new();
        sink.expect_send_text()
            .withf(|text| text == "40")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        sink.expect_send_text()
            .withf(|text| text == "3")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        sink.expect_close().times(1).returning(|| Ok(()));

        let (_state, connected) = watch::channel(false);
        let written = pump_outbound(&mut sink, &mut queue, connected).await.unwrap();
        assert_eq!(written, 2);
    }

    #[tokio::test]
    async fn test_pump_sends_events_once_connected() {
        let (sender, mut queue) = outbound();
        let (state, connected) = watch::channel(false);

        let mut sink = MockFrameSink::new();
        let mut seq = mockall::Sequence::new();
        sink.expect_send_text()
            .withf(|text| text == "40")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        sink.expect_send_text()
            .withf(|text| text == r#"42["deviceOrientationChanged",{"x":2.0,"y":0.0}]"#)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        sink.expect_close().times(1).returning(|| Ok(()));

        let pump = tokio::spawn(async move {
            pump_outbound(&mut sink, &mut queue, connected).await
        });

        sender.send("deviceOrientationChanged", Some(json!({"x": 1.0, "y": 0.0})));
        sender.send_packet(EnginePacket::connect());
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;

        state.send_replace(true);
        sender.send("deviceOrientationChanged", Some(json!({"x": 2.0, "y": 0.0})));
        drop(sender);

        assert_eq!(pump.await.unwrap().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_pump_stops_on_write_error() {
        let (sender, mut queue) = outbound();
        sender.send("gameOver", None);
        drop(sender);

        let mut sink = MockFrameSink::new();
        sink.expect_send_text()
            .times(1)
            .returning(|_| Err(ControllerError::Transport("broken pipe".to_string())));
        sink.expect_close().times(0);

        assert!(pump_outbound(&mut sink, &mut queue, watch::channel(true).1).await.is_err());
    }
}
