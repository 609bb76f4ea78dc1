//! # WebSocket Transport
//!
//! Opens the WebSocket to the peer endpoint and exposes its halves as
//! [`FrameSink`] / [`FrameSource`].

use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info};

use super::frame_trait::{FrameSink, FrameSource};
use crate::error::{ControllerError, Result};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Write half of the peer WebSocket
pub struct WsSink {
    sink: SplitSink<WsStream, Message>,
}

/// Read half of the peer WebSocket
pub struct WsSource {
    stream: SplitStream<WsStream>,
}

impl std::fmt::Debug for WsSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WsSink").finish_non_exhaustive()
    }
}

impl std::fmt::Debug for WsSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WsSource").finish_non_exhaustive()
    }
}

/// Open a WebSocket to the peer endpoint
///
/// # Arguments
///
/// * `url` - Full endpoint URL including the Engine.IO query
///   (see [`ServerConfig::endpoint_url`](crate::config::ServerConfig::endpoint_url))
///
/// # Errors
///
/// Returns `Transport` error if the TCP/TLS connection or the WebSocket
/// upgrade fails.
///
/// # Examples
///
/// ```no_run
/// use tilt_pad::channel::websocket::connect;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let (_sink, _source) =
///         connect("ws://localhost:52300/socket.io/?EIO=4&transport=websocket&type=controller").await?;
///     Ok(())
/// }
/// ```
pub async fn connect(url: &str) -> Result<(WsSink, WsSource)> {
    debug!("Connecting to {}", url);

    let (stream, response) = connect_async(url)
        .await
        .map_err(|e| ControllerError::Transport(format!("Failed to connect to {}: {}", url, e)))?;

    info!("WebSocket open ({})", response.status());

    let (sink, stream) = stream.split();
    Ok((WsSink { sink }, WsSource { stream }))
}

#[async_trait]
impl FrameSink for WsSink {
    async fn send_text(&mut self, text: String) -> Result<()> {
        self.sink
            .send(Message::Text(text))
            .await
            .map_err(|e| ControllerError::Transport(format!("Failed to write frame: {}", e)))
    }

    async fn close(&mut self) -> Result<()> {
        self.sink
            .close()
            .await
            .map_err(|e| ControllerError::Transport(format!("Failed to close socket: {}", e)))
    }
}

#[async_trait]
impl FrameSource for WsSource {
    async fn next_text(&mut self) -> Result<Option<String>> {
        loop {
            match self.stream.next().await {
                None => return Ok(None),
                Some(Err(e)) => {
                    return Err(ControllerError::Transport(format!("Failed to read frame: {}", e)))
                }
                Some(Ok(Message::Text(text))) => return Ok(Some(text)),
                Some(Ok(Message::Close(frame))) => {
                    debug!("WebSocket close frame: {:?}", frame);
                    return Ok(None);
                }
                Some(Ok(other)) => {
                    debug!("Ignoring non-text frame ({} bytes)", other.len());
                }
            }
        }
    }
}
