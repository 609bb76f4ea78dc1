//! # Tilt Feed Module
//!
//! Reads device orientation samples from a newline-delimited JSON stream
//! (a file or FIFO written by the platform sensor service).
//!
//! Each line is an object such as `{"beta": 12.5, "gamma": -3.0}`. Either
//! axis may be missing or `null` when the hardware does not provide it and
//! then reads as 0.

use serde::Deserialize;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Split};
use tracing::{debug, warn};

use super::orientation::OrientationSample;
use crate::error::Result;

/// Wire form of a sample line; absent axes deserialize as `None`
#[derive(Debug, Deserialize)]
struct RawSample {
    beta: Option<f64>,
    gamma: Option<f64>,
}

/// Parse one feed line into a sample
///
/// # Errors
///
/// Returns `Json` error if the line is not a JSON object.
///
/// # Examples
///
/// ```
/// use tilt_pad::input::tilt::parse_sample;
///
/// let sample = parse_sample(r#"{"beta": 40.0}"#)?;
/// assert_eq!(sample.beta, 40.0);
/// assert_eq!(sample.gamma, 0.0);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn parse_sample(line: &str) -> Result<OrientationSample> {
    let raw: RawSample = serde_json::from_str(line)?;
    Ok(OrientationSample::from_axes(raw.beta, raw.gamma))
}

/// Orientation sample stream
pub struct TiltFeed<R> {
    lines: Split<BufReader<R>>,
    line_number: u64,
}

impl<R> std::fmt::Debug for TiltFeed<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TiltFeed")
            .field("line_number", &self.line_number)
            .finish_non_exhaustive()
    }
}

impl TiltFeed<File> {
    /// Open a feed file or FIFO
    ///
    /// # Errors
    ///
    /// Returns `Io` error if the path cannot be opened.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref()).await?;
        debug!("Opened orientation feed {}", path.as_ref().display());
        Ok(Self::new(file))
    }
}

impl<R: AsyncRead + Unpin> TiltFeed<R> {
    /// Wrap any async reader
    pub fn new(reader: R) -> Self {
        Self {
            lines: BufReader::new(reader).split(b'\n'),
            line_number: 0,
        }
    }

    /// Wait for the next valid sample
    ///
    /// Blank lines are skipped. Lines that are not UTF-8 or not a JSON
    /// sample are logged and skipped.
    ///
    /// # Returns
    ///
    /// `Ok(None)` at end of stream.
    ///
    /// # Errors
    ///
    /// Returns `Io` error if reading fails.
    pub async fn next_sample(&mut self) -> Result<Option<OrientationSample>> {
        while let Some(bytes) = self.lines.next_segment().await? {
            self.line_number += 1;

            let line = match std::str::from_utf8(&bytes) {
                Ok(line) => line.trim(),
                Err(e) => {
                    warn!("Skipping orientation line {}: {}", self.line_number, e);
                    continue;
                }
            };
            if line.is_empty() {
                continue;
            }

            match parse_sample(line) {
                Ok(sample) => return Ok(Some(sample)),
                Err(e) => warn!("Skipping orientation line {}: {}", self.line_number, e),
            }
        }

        Ok(None)
    }
}
