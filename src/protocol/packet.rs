//! # Engine.IO / Socket.IO Packet Types
//!
//! Core packet definitions for the v4 text protocol.
//!
//! Frame structure: `engine type(1 char)` + `data`. Engine `message` frames
//! carry a Socket.IO packet: `socket type(1 char)` + `[/namespace,]` +
//! `[ack id]` + `[JSON]`.

use serde_json::Value;

/// Engine.IO protocol revision sent in the handshake query
pub const ENGINE_IO_VERSION: u8 = 4;

/// Engine.IO packet type characters
pub const ENGINE_OPEN: char = '0';
pub const ENGINE_CLOSE: char = '1';
pub const ENGINE_PING: char = '2';
pub const ENGINE_PONG: char = '3';
pub const ENGINE_MESSAGE: char = '4';
pub const ENGINE_UPGRADE: char = '5';
pub const ENGINE_NOOP: char = '6';

/// Socket.IO packet type characters
pub const SOCKET_CONNECT: char = '0';
pub const SOCKET_DISCONNECT: char = '1';
pub const SOCKET_EVENT: char = '2';
pub const SOCKET_ACK: char = '3';
pub const SOCKET_CONNECT_ERROR: char = '4';
pub const SOCKET_BINARY_EVENT: char = '5';
pub const SOCKET_BINARY_ACK: char = '6';

/// Default Socket.IO namespace
pub const DEFAULT_NAMESPACE: &str = "/";

/// Engine.IO transport-level packet
#[derive(Debug, Clone, PartialEq)]
pub enum EnginePacket {
    /// Handshake sent by the server (`sid`, `pingInterval`, ...)
    Open(Value),
    /// Transport close
    Close,
    /// Heartbeat probe; the optional text is echoed in the pong
    Ping(Option<String>),
    /// Heartbeat reply
    Pong(Option<String>),
    /// Socket.IO payload
    Message(SocketPacket),
    /// Transport upgrade (unused on a native WebSocket)
    Upgrade,
    /// No operation
    Noop,
}

/// Socket.IO packet carried inside an Engine.IO message
#[derive(Debug, Clone, PartialEq)]
pub enum SocketPacket {
    /// Namespace connect request (client) or acknowledgement (server)
    Connect(Option<Value>),
    /// Namespace disconnect
    Disconnect,
    /// Named event with optional payload
    Event(SocketEvent),
    /// Namespace connection refused
    ConnectError(Value),
}

/// A named Socket.IO event
#[derive(Debug, Clone, PartialEq)]
pub struct SocketEvent {
    pub name: String,
    pub payload: Option<Value>,
}

impl SocketEvent {
    /// Creates a new event.
    #[must_use]
    pub fn new(name: impl Into<String>, payload: Option<Value>) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }
}

impl EnginePacket {
    /// Wraps an event into a complete engine packet.
    ///
    /// # Examples
    ///
    /// ```
    /// use tilt_pad::protocol::packet::{EnginePacket, SocketEvent, SocketPacket};
    ///
    /// let packet = EnginePacket::event("gameOver", None);
    /// assert_eq!(
    ///     packet,
    ///     EnginePacket::Message(SocketPacket::Event(SocketEvent::new("gameOver", None)))
    /// );
    /// ```
    #[must_use]
    pub fn event(name: impl Into<String>, payload: Option<Value>) -> Self {
        EnginePacket::Message(SocketPacket::Event(SocketEvent::new(name, payload)))
    }

    /// Namespace connect for the default namespace
    #[must_use]
    pub fn connect() -> Self {
        EnginePacket::Message(SocketPacket::Connect(None))
    }
}
