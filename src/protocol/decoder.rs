//! # Packet Decoder
//!
//! Decodes WebSocket text frames into Engine.IO / Socket.IO packets.

use serde_json::Value;

use super::packet::*;
use crate::error::{ControllerError, Result};

/// Decode a text frame into an engine packet
///
/// # Arguments
///
/// * `frame` - Complete text frame received from the WebSocket
///
/// # Returns
///
/// * `Result<EnginePacket>` - Decoded packet, or error if invalid
///
/// # Errors
///
/// Returns error if:
/// - Frame is empty
/// - Packet type is unknown
/// - JSON body is malformed
/// - Socket packet is an ack or binary packet (unsupported)
pub fn decode_packet(frame: &str) -> Result<EnginePacket> {
    let mut chars = frame.chars();
    let kind = chars
        .next()
        .ok_or_else(|| ControllerError::Protocol("Empty frame".to_string()))?;
    let data = chars.as_str();

    let probe = || if data.is_empty() { None } else { Some(data.to_string()) };

    match kind {
        ENGINE_OPEN => Ok(EnginePacket::Open(serde_json::from_str(data)?)),
        ENGINE_CLOSE => Ok(EnginePacket::Close),
        ENGINE_PING => Ok(EnginePacket::Ping(probe())),
        ENGINE_PONG => Ok(EnginePacket::Pong(probe())),
        ENGINE_MESSAGE => Ok(EnginePacket::Message(decode_socket_packet(data)?)),
        ENGINE_UPGRADE => Ok(EnginePacket::Upgrade),
        ENGINE_NOOP => Ok(EnginePacket::Noop),
        other => Err(ControllerError::Protocol(format!(
            "Unknown engine packet type: {:?}",
            other
        ))),
    }
}

/// Decode a Socket.IO packet body
///
/// The namespace prefix and ack id are accepted and discarded.
pub fn decode_socket_packet(body: &str) -> Result<SocketPacket> {
    let mut chars = body.chars();
    let kind = chars
        .next()
        .ok_or_else(|| ControllerError::Protocol("Empty socket packet".to_string()))?;
    let rest = skip_ack_id(skip_namespace(chars.as_str()));

    match kind {
        SOCKET_CONNECT => {
            if rest.is_empty() {
                Ok(SocketPacket::Connect(None))
            } else {
                Ok(SocketPacket::Connect(Some(serde_json::from_str(rest)?)))
            }
        }
        SOCKET_DISCONNECT => Ok(SocketPacket::Disconnect),
        SOCKET_EVENT => Ok(SocketPacket::Event(decode_event(rest)?)),
        SOCKET_CONNECT_ERROR => {
            if rest.is_empty() {
                Ok(SocketPacket::ConnectError(Value::Null))
            } else {
                Ok(SocketPacket::ConnectError(serde_json::from_str(rest)?))
            }
        }
        SOCKET_ACK | SOCKET_BINARY_EVENT | SOCKET_BINARY_ACK => Err(ControllerError::Protocol(
            format!("Unsupported socket packet type: {:?}", kind),
        )),
        other => Err(ControllerError::Protocol(format!(
            "Unknown socket packet type: {:?}",
            other
        ))),
    }
}

/// Decode the `[name, payload?, ...]` array of an event packet
///
/// Extra arguments beyond the first payload are ignored.
fn decode_event(data: &str) -> Result<SocketEvent> {
    let args: Vec<Value> = serde_json::from_str(data)?;
    let mut args = args.into_iter();

    let name = match args.next() {
        Some(Value::String(name)) => name,
        Some(other) => {
            return Err(ControllerError::Protocol(format!(
                "Event name must be a string, got: {}",
                other
            )))
        }
        None => return Err(ControllerError::Protocol("Event without a name".to_string())),
    };

    Ok(SocketEvent::new(name, args.next()))
}

/// Strips a `/namespace,` prefix
fn skip_namespace(data: &str) -> &str {
    if data.starts_with('/') {
        match data.find(',') {
            Some(idx) => &data[idx + 1..],
            None => "",
        }
    } else {
        data
    }
}

/// Strips a numeric ack id
fn skip_ack_id(data: &str) -> &str {
    data.trim_start_matches(|c: char| c.is_ascii_digit())
}
