//! KIM AT command protocol
//!
//! This crate defines the text protocol spoken by Kinéis KIM1/KIM2
//! satellite modules over their UART. It is pure data handling: building
//! command lines and classifying response lines. I/O lives in
//! `kimlink-drivers`.
//!
//! # Protocol Overview
//!
//! Commands are single ASCII lines:
//! ```text
//! AT+<VERB>=?\r\n        query (KIM2)
//! AT+<VERB>=?\r          query (KIM1)
//! AT+<VERB>=<VALUE>\r\n  set
//! ```
//!
//! Responses are `\n`-terminated lines. A line starting with `+` is a
//! marker (status or error); anything else is noise. Commands in the
//! delayed family (`AT+TX`) get one precursor marker before the real
//! result.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod command;
pub mod hex;
pub mod outcome;
pub mod response;

pub use command::{
    encode_query, encode_raw, encode_set, Command, CommandKind, Dialect, EncodeError,
    ResponseMode, COMMAND_CAPACITY, DELAYED_VERBS, MAX_COMMAND_LEN,
};
pub use hex::{encode_upper, to_hex_string, HexError};
pub use outcome::Outcome;
pub use response::{
    classify, ErrorMarker, LineClass, ResponseLine, ResponseParser, MAX_LINE_LEN,
    RESPONSE_CAPACITY,
};
