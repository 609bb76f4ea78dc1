//! # Wire Protocol Module
//!
//! The controller/peer wire contract carried over Engine.IO v4 / Socket.IO.
//!
//! This module handles:
//! - Event names and payload shapes exchanged with the game peer
//! - Engine.IO and Socket.IO packet model
//! - Text packet encoding and decoding

pub mod events;
pub mod packet;
pub mod encoder;
pub mod decoder;
