//! Driver for Kinéis KIM satellite modules
//!
//! This crate provides the I/O side of the KIM protocol on top of the
//! `kimlink-hal` transport traits and `embedded-hal` pins/delays:
//!
//! - Exchange engine (send a command, classify the reply lines)
//! - KIM driver (power sequencing, wakeup, liveness check, dialect detection)
//! - `embedded-io` transport adapter with per-byte read timeout

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod error;
pub mod modem;
pub mod serial;

#[cfg(test)]
mod mock;

pub use error::ModemError;
pub use modem::{Exchange, Kim, PING_VERB, TX_VERB};
pub use serial::{IoSerial, DEFAULT_READ_TIMEOUT_MS};
