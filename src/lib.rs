//! # Tilt Pad Library
//!
//! Turn a device into a game controller: tilt and arrow-key input is streamed
//! to a game host over a persistent Socket.IO channel, after pairing the
//! controller with a game client by identity.

pub mod app;
pub mod channel;
pub mod config;
pub mod console;
pub mod error;
pub mod input;
pub mod logging;
pub mod protocol;
pub mod session;
