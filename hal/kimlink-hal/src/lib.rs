//! Kimlink Hardware Abstraction Layer
//!
//! This crate defines the transport traits the KIM driver talks through.
//! Chip-specific code (a hardware UART, a bit-banged software UART, or a
//! test double) implements them, and the protocol logic above stays
//! board-agnostic.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application                            │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  kimlink-drivers (exchange engine)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  kimlink-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ hardware UART │       │ software UART │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::UartTx`], [`uart::UartRx`] - Serial communication
//! - [`uart::UartLifecycle`] - (Re)initialising and releasing the port
//!
//! GPIO and delays come from `embedded-hal` directly.

#![no_std]
#![deny(unsafe_code)]

pub mod uart;

// Re-export key traits at crate root for convenience
pub use uart::{
    DataBits, Parity, StopBits, Uart, UartConfig, UartError, UartLifecycle, UartRx, UartTx,
    LINE_END,
};
