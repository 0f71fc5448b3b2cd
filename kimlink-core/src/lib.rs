//! Board-agnostic core for the KIM satellite module driver
//!
//! This crate contains what sits between the wire protocol and a concrete
//! driver:
//!
//! - Modem configuration (timings, dialect, error-marker rule)
//! - The static table of supported host boards and their pinout
//! - The [`traits::AtModem`] trait applications program against

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod traits;
