//! Response line handling
//!
//! The module answers with `\n`-terminated lines. Only lines starting with
//! `+` carry meaning:
//! - `+ER...` marks an error
//! - any other `+` line is a status/success marker
//! - everything else (echo, blank lines, boot banners) is noise
//!
//! [`ResponseParser`] turns a sequence of such lines into an [`Outcome`]
//! within a fixed read budget.

use crate::command::ResponseMode;
use crate::outcome::Outcome;

/// Response buffer size, including the logical end marker
pub const RESPONSE_CAPACITY: usize = 20;

/// Maximum number of data bytes kept from one line
pub const MAX_LINE_LEN: usize = RESPONSE_CAPACITY - 1;

/// First byte of every meaningful response line
pub const MARKER: u8 = b'+';

/// Total line-read slots of one exchange
pub const READ_SLOTS: u8 = 10;

/// Slot an immediate exchange starts reading at
///
/// Immediate commands only get the last five slots; delayed commands get
/// all ten to cover the precursor line.
pub const IMMEDIATE_FIRST_SLOT: u8 = 5;

/// Rule used to recognise an error marker line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorMarker {
    /// Byte 1 is `E` and byte 2 is `R` (`+ERROR`, `+ER...`)
    #[default]
    Standard,
    /// Byte 1 is not `E` and byte 2 is `R`
    ///
    /// Bit-compatible with the first Arduino driver for KIM modules. Under
    /// this rule a literal `+ERROR` line counts as success.
    Legacy,
}

impl ErrorMarker {
    /// Check whether a `+`-prefixed line is an error under this rule
    pub fn matches(self, line: &[u8]) -> bool {
        let second = line.get(1).copied();
        let third = line.get(2).copied();
        match self {
            ErrorMarker::Standard => second == Some(b'E') && third == Some(b'R'),
            ErrorMarker::Legacy => second != Some(b'E') && third == Some(b'R'),
        }
    }
}

/// Classification of a single response line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineClass {
    /// Not a marker line
    Noise,
    /// Marker line reporting success or status
    Status,
    /// Marker line reporting an error
    Error,
}

/// Classify one received line
pub fn classify(line: &[u8], marker: ErrorMarker) -> LineClass {
    match line.first() {
        Some(&MARKER) if marker.matches(line) => LineClass::Error,
        Some(&MARKER) => LineClass::Status,
        _ => LineClass::Noise,
    }
}

/// The most recently received line
///
/// Overwritten by every read attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseLine {
    buf: [u8; RESPONSE_CAPACITY],
    len: usize,
}

impl Default for ResponseLine {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseLine {
    pub const fn new() -> Self {
        Self {
            buf: [0; RESPONSE_CAPACITY],
            len: 0,
        }
    }

    pub fn clear(&mut self) {
        self.len = 0;
        self.buf[0] = 0;
    }

    /// Replace the line with what `read` stores
    ///
    /// `read` gets a slot of [`MAX_LINE_LEN`] bytes and returns how many
    /// it filled. On error the line is left empty.
    pub fn fill<E>(
        &mut self,
        read: impl FnOnce(&mut [u8]) -> Result<usize, E>,
    ) -> Result<&[u8], E> {
        self.clear();
        let len = read(&mut self.buf[..MAX_LINE_LEN])?;
        self.len = len.min(MAX_LINE_LEN);
        self.buf[self.len] = 0;
        Ok(self.as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// The line as text, without trailing `\r`
    pub fn as_str(&self) -> Option<&str> {
        let bytes = self.as_bytes();
        let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
        core::str::from_utf8(bytes).ok()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check if the line starts with the `+` marker
    pub fn is_marker(&self) -> bool {
        self.as_bytes().first() == Some(&MARKER)
    }
}

/// State machine resolving one exchange from its response lines
#[derive(Debug, Clone)]
pub struct ResponseParser {
    marker: ErrorMarker,
    awaiting_precursor: bool,
    attempts_left: u8,
}

impl ResponseParser {
    /// Create a parser for a command answered in `mode`
    pub fn new(mode: ResponseMode, marker: ErrorMarker) -> Self {
        Self {
            marker,
            awaiting_precursor: mode == ResponseMode::Delayed,
            attempts_left: Self::budget(mode),
        }
    }

    /// Number of line reads an exchange in `mode` may use
    pub const fn budget(mode: ResponseMode) -> u8 {
        match mode {
            ResponseMode::Delayed => READ_SLOTS,
            ResponseMode::Immediate => READ_SLOTS - IMMEDIATE_FIRST_SLOT,
        }
    }

    pub fn attempts_left(&self) -> u8 {
        self.attempts_left
    }

    /// Check if the precursor line of a delayed command is still expected
    pub fn awaiting_precursor(&self) -> bool {
        self.awaiting_precursor
    }

    /// Feed one line read from the module
    ///
    /// Returns `Some(outcome)` once the exchange is resolved, including
    /// `Some(Outcome::Timeout)` when this line used up the last attempt.
    /// Returns `None` when another line should be read.
    pub fn feed_line(&mut self, line: &[u8]) -> Option<Outcome> {
        self.attempts_left = self.attempts_left.saturating_sub(1);

        match classify(line, self.marker) {
            LineClass::Error => return Some(Outcome::Error),
            LineClass::Status if self.awaiting_precursor => self.awaiting_precursor = false,
            LineClass::Status => return Some(Outcome::Ok),
            LineClass::Noise => {}
        }

        if self.attempts_left == 0 {
            Some(Outcome::Timeout)
        } else {
            None
        }
    }
}
