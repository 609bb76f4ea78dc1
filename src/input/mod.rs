//! # Input Module
//!
//! Local input capture and translation into control signals.
//!
//! This module handles:
//! - Arrow-key accumulation into a clamped scalar ([`keydown`])
//! - Device tilt mapping with per-player inversion ([`orientation`])
//! - Press/release deduplication for discrete inputs ([`active`])
//! - Keyboard capture via evdev ([`keyboard`])
//! - Orientation sample feed ([`tilt`])

pub mod active;
pub mod keyboard;
pub mod keydown;
pub mod orientation;
pub mod tilt;
