//! # Control Channel Module
//!
//! The single long-lived bidirectional connection to the game peer.
//!
//! This module handles:
//! - Fire-and-forget outbound events via a cloneable [`ChannelSender`]
//! - Inbound handler registration and in-order dispatch via [`ControlChannel`]
//! - Frame sink/source abstractions over the WebSocket
//! - The Engine.IO link (handshake, heartbeat, event extraction)
//!
//! ## Usage
//!
//! ```
//! use serde_json::json;
//! use tilt_pad::channel::{outbound, ControlChannel};
//! use tilt_pad::protocol::packet::SocketEvent;
//!
//! let (sender, _queue) = outbound();
//! let mut channel: ControlChannel<u32> = ControlChannel::new(sender);
//! channel.on("gameOver", |count, _payload| {
//!     *count += 1;
//!     Ok(())
//! });
//!
//! let mut count = 0;
//! channel.dispatch(&mut count, &SocketEvent::new("gameOver", None));
//! assert_eq!(count, 1);
//! ```

pub mod frame_trait;
pub mod link;
pub mod websocket;

use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::Result;
use crate::protocol::packet::{EnginePacket, SocketEvent};

/// Receiving end of the outbound packet queue, drained by the link writer
pub type OutboundQueue = mpsc::UnboundedReceiver<EnginePacket>;

/// Inbound event handler, invoked with the handler context and the payload
type Handler<C> = Box<dyn FnMut(&mut C, Option<&Value>) -> Result<()> + Send>;

/// Creates a connected sender / queue pair.
#[must_use]
pub fn outbound() -> (ChannelSender, OutboundQueue) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ChannelSender { tx }, rx)
}

/// Cloneable, fire-and-forget handle for outbound packets.
///
/// Sending never blocks and never fails: packets sent after the link has
/// gone away are dropped with a debug log.
#[derive(Debug, Clone)]
pub struct ChannelSender {
    tx: mpsc::UnboundedSender<EnginePacket>,
}

impl ChannelSender {
    /// Queues an event with an optional JSON payload.
    pub fn send(&self, event: &str, payload: Option<Value>) {
        self.send_packet(EnginePacket::event(event, payload));
    }

    /// Queues a raw engine packet (heartbeats, namespace connect).
    pub fn send_packet(&self, packet: EnginePacket) {
        if let Err(mpsc::error::SendError(packet)) = self.tx.send(packet) {
            debug!("Channel closed, dropping packet: {:?}", packet);
        }
    }

    /// Returns true once the outbound queue has been dropped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Handler registry for inbound events.
///
/// `C` is the state the handlers mutate. The channel does not own it; the
/// caller passes it to [`ControlChannel::dispatch`] so the state and the
/// registry can live side by side without shared ownership.
pub struct ControlChannel<C> {
    sender: ChannelSender,
    handlers: HashMap<String, Vec<Handler<C>>>,
}

impl<C> std::fmt::Debug for ControlChannel<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut events: Vec<_> = self.handlers.keys().collect();
        events.sort();
        f.debug_struct("ControlChannel")
            .field("events", &events)
            .finish_non_exhaustive()
    }
}

impl<C> ControlChannel<C> {
    /// Creates a channel publishing onto `sender`.
    #[must_use]
    pub fn new(sender: ChannelSender) -> Self {
        Self {
            sender,
            handlers: HashMap::new(),
        }
    }

    /// Returns the outbound handle for injection into components.
    #[must_use]
    pub fn sender(&self) -> &ChannelSender {
        &self.sender
    }

    /// Queues an outbound event.
    pub fn send(&self, event: &str, payload: Option<Value>) {
        self.sender.send(event, payload);
    }

    /// Registers a handler for `event`.
    ///
    /// Handlers for the same event run in registration order.
    pub fn on<F>(&mut self, event: &str, handler: F)
    where
        F: FnMut(&mut C, Option<&Value>) -> Result<()> + Send + 'static,
    {
        self.handlers
            .entry(event.to_string())
            .or_default()
            .push(Box::new(handler));
    }

    /// Invokes every handler registered for the event exactly once.
    ///
    /// Handler errors are logged and do not stop the remaining handlers.
    ///
    /// # Returns
    ///
    /// Number of handlers invoked.
    pub fn dispatch(&mut self, ctx: &mut C, event: &SocketEvent) -> usize {
        let Some(handlers) = self.handlers.get_mut(&event.name) else {
            debug!("No handler for inbound event '{}'", event.name);
            return 0;
        };

        for handler in handlers.iter_mut() {
            if let Err(e) = handler(ctx, event.payload.as_ref()) {
                warn!("Handler for '{}' failed: {}", event.name, e);
            }
        }

        handlers.len()
    }
}

/// Drains every queued event from an outbound queue.
#[cfg(test)]
pub(crate) fn drain_events(queue: &mut OutboundQueue) -> Vec<SocketEvent> {
    use crate::protocol::packet::SocketPacket;

    let mut events = Vec::new();
    while let Ok(packet) = queue.try_recv() {
        if let EnginePacket::Message(SocketPacket::Event(event)) = packet {
            events.push(event);
        }
    }
    events
}
