//! Trait abstraction for text frame I/O to enable testing

use async_trait::async_trait;

use crate::error::Result;

/// Trait for writing text frames to the peer
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FrameSink: Send {
    /// Write one text frame
    async fn send_text(&mut self, text: String) -> Result<()>;

    /// Close the connection
    async fn close(&mut self) -> Result<()>;
}

/// Trait for reading text frames from the peer
#[async_trait]
pub trait FrameSource: Send {
    /// Read the next text frame; `None` once the peer has closed
    async fn next_text(&mut self) -> Result<Option<String>>;
}

#[cfg(test)]
pub mod mocks {
    use super::*;
    use crate::error::ControllerError;
    use std::collections::VecDeque;

    /// Frame source replaying a fixed script, then reporting close
    pub struct ScriptedSource {
        frames: VecDeque<Result<Option<String>>>,
    }

    impl ScriptedSource {
        pub fn new(frames: &[&str]) -> Self {
            Self {
                frames: frames.iter().map(|f| Ok(Some(f.to_string()))).collect(),
            }
        }

        pub fn push_error(&mut self, msg: &str) {
            self.frames
                .push_back(Err(ControllerError::Transport(msg.to_string())));
        }
    }

    #[async_trait]
    impl FrameSource for ScriptedSource {
        async fn next_text(&mut self) -> Result<Option<String>> {
            self.frames.pop_front().unwrap_or(Ok(None))
        }
    }
}
