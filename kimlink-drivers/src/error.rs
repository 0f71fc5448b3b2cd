//! Driver error type

use kimlink_hal::UartError;
use kimlink_protocol::{EncodeError, HexError};

/// Errors surfaced by the KIM driver
///
/// Protocol-level failures (error marker, no answer) are not errors here:
/// they come back as [`kimlink_protocol::Outcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModemError {
    /// Command could not be encoded
    Encode(EncodeError),
    /// Transport read/write failure
    Transport(UartError),
    /// Power or wakeup line could not be driven
    Pin,
}

impl From<EncodeError> for ModemError {
    fn from(e: EncodeError) -> Self {
        ModemError::Encode(e)
    }
}

impl From<UartError> for ModemError {
    fn from(e: UartError) -> Self {
        ModemError::Transport(e)
    }
}

impl From<HexError> for ModemError {
    fn from(_: HexError) -> Self {
        ModemError::Encode(EncodeError::EncodingTooLarge)
    }
}
