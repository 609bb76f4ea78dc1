//! # Packet Encoder
//!
//! Encodes Engine.IO / Socket.IO packets into WebSocket text frames.

use serde_json::Value;

use super::packet::*;
use crate::error::Result;

/// Encode an engine packet into a text frame
///
/// # Arguments
///
/// * `packet` - Engine packet to encode
///
/// # Returns
///
/// * `Result<String>` - Text frame ready for the WebSocket
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tilt_pad::protocol::encoder::encode_packet;
/// use tilt_pad::protocol::packet::EnginePacket;
///
/// let frame = encode_packet(&EnginePacket::event("newActiveInput", Some(json!({"inputType": "keydown"}))))?;
/// assert_eq!(frame, r#"42["newActiveInput",{"inputType":"keydown"}]"#);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn encode_packet(packet: &EnginePacket) -> Result<String> {
    let mut frame = String::new();

    match packet {
        EnginePacket::Open(handshake) => {
            frame.push(ENGINE_OPEN);
            frame.push_str(&serde_json::to_string(handshake)?);
        }
        EnginePacket::Close => frame.push(ENGINE_CLOSE),
        EnginePacket::Ping(probe) => {
            frame.push(ENGINE_PING);
            if let Some(probe) = probe {
                frame.push_str(probe);
            }
        }
        EnginePacket::Pong(probe) => {
            frame.push(ENGINE_PONG);
            if let Some(probe) = probe {
                frame.push_str(probe);
            }
        }
        EnginePacket::Message(socket) => {
            frame.push(ENGINE_MESSAGE);
            frame.push_str(&encode_socket_packet(socket)?);
        }
        EnginePacket::Upgrade => frame.push(ENGINE_UPGRADE),
        EnginePacket::Noop => frame.push(ENGINE_NOOP),
    }

    Ok(frame)
}

/// Encode a Socket.IO packet for the default namespace
///
/// Events are encoded as a JSON array `[name, payload?]`; events without a
/// payload carry only their name.
pub fn encode_socket_packet(packet: &SocketPacket) -> Result<String> {
    let mut body = String::new();

    match packet {
        SocketPacket::Connect(auth) => {
            body.push(SOCKET_CONNECT);
            if let Some(auth) = auth {
                body.push_str(&serde_json::to_string(auth)?);
            }
        }
        SocketPacket::Disconnect => body.push(SOCKET_DISCONNECT),
        SocketPacket::Event(event) => {
            body.push(SOCKET_EVENT);
            let mut args = vec![Value::String(event.name.clone())];
            if let Some(payload) = &event.payload {
                args.push(payload.clone());
            }
            body.push_str(&serde_json::to_string(&args)?);
        }
        SocketPacket::ConnectError(reason) => {
            body.push(SOCKET_CONNECT_ERROR);
            body.push_str(&serde_json::to_string(reason)?);
        }
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_connect() {
        assert_eq!(encode_packet(&EnginePacket::connect()).unwrap(), "40");
    }

    #[test]
    fn test_encode_pong_echoes_probe() {
        assert_eq!(encode_packet(&EnginePacket::Pong(None)).unwrap(), "3");
        assert_eq!(
            encode_packet(&EnginePacket::Pong(Some("probe".to_string()))).unwrap(),
            "3probe"
        );
    }

    #[test]
    fn test_encode_event_without_payload() {
        let frame = encode_packet(&EnginePacket::event("restartGame", None)).unwrap();
        assert_eq!(frame, r#"42["restartGame"]"#);
    }

    #[test]
    fn test_encode_identity_string_payload() {
        let frame = encode_packet(&EnginePacket::event(
            "setAssociatedClientId",
            Some(json!("player-7")),
        ))
        .unwrap();
        assert_eq!(frame, r#"42["setAssociatedClientId","player-7"]"#);
    }

    #[test]
    fn test_encode_empty_identity_is_forwarded() {
        let frame = encode_packet(&EnginePacket::event("setAssociatedClientId", Some(json!(""))))
            .unwrap();
        assert_eq!(frame, r#"42["setAssociatedClientId",""]"#);
    }

    #[test]
    fn test_encode_control_signal() {
        let frame = encode_packet(&EnginePacket::event(
            "deviceOrientationChanged",
            Some(json!({"x": -0.5, "y": 0.0})),
        ))
        .unwrap();
        assert_eq!(frame, r#"42["deviceOrientationChanged",{"x":-0.5,"y":0.0}]"#);
    }

    #[test]
    fn test_encode_transport_packets() {
        assert_eq!(encode_packet(&EnginePacket::Close).unwrap(), "1");
        assert_eq!(encode_packet(&EnginePacket::Ping(None)).unwrap(), "2");
        assert_eq!(encode_packet(&EnginePacket::Upgrade).unwrap(), "5");
        assert_eq!(encode_packet(&EnginePacket::Noop).unwrap(), "6");
        assert_eq!(
            encode_packet(&EnginePacket::Message(SocketPacket::Disconnect)).unwrap(),
            "41"
        );
    }
}
