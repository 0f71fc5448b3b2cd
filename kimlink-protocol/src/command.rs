//! Command encoding
//!
//! Builds the bounded command line sent to the module:
//! - Query: `AT+<VERB>` followed by the dialect's query terminator
//! - Set: `AT+<VERB>=<VALUE>\r\n`
//! - Raw: caller bytes with the last three slot bytes forced to `\r`, `\n`
//!   and the end marker
//!
//! The buffer holds [`COMMAND_CAPACITY`] bytes including the logical end
//! marker, which is never transmitted. Anything longer is rejected with
//! [`EncodeError::EncodingTooLarge`].

use heapless::Vec;

/// Command buffer size, including the logical end marker
pub const COMMAND_CAPACITY: usize = 70;

/// Maximum number of bytes actually transmitted for one command
pub const MAX_COMMAND_LEN: usize = COMMAND_CAPACITY - 1;

/// Every command starts with this prefix
pub const AT_PREFIX: &[u8] = b"AT+";

/// Verbs whose result is preceded by one unsolicited status line
pub const DELAYED_VERBS: &[&[u8]] = &[b"TX"];

/// Bytes at the end of a raw slot that are overwritten with the terminator
const RAW_TAIL_LEN: usize = 3;

/// Line ending for set and raw commands
const LINE_END: &[u8] = b"\r\n";

/// Errors that can occur while encoding a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    /// Command would not fit in the command buffer
    EncodingTooLarge,
    /// Raw slot cannot hold the three terminator bytes
    RawTooShort,
}

/// Command-terminator convention of the connected module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Dialect {
    /// KIM2 modules: queries end with `=?\r\n`
    #[default]
    Kim2,
    /// KIM1 modules: queries end with `=?\r`
    Kim1,
}

impl Dialect {
    /// Bytes appended to a query verb
    pub const fn query_terminator(self) -> &'static [u8] {
        match self {
            Dialect::Kim2 => b"=?\r\n",
            Dialect::Kim1 => b"=?\r",
        }
    }

    /// The other dialect
    pub const fn toggled(self) -> Self {
        match self {
            Dialect::Kim2 => Dialect::Kim1,
            Dialect::Kim1 => Dialect::Kim2,
        }
    }

    pub const fn is_kim2(self) -> bool {
        matches!(self, Dialect::Kim2)
    }
}

/// Shape of an encoded command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandKind {
    /// `AT+<VERB>=?`
    Query,
    /// `AT+<VERB>=<VALUE>`
    Set,
    /// Caller-supplied bytes
    Raw,
}

/// How the module answers a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResponseMode {
    /// The first marker line is the result
    #[default]
    Immediate,
    /// One precursor marker line comes before the result
    Delayed,
}

impl ResponseMode {
    /// Look up the response mode of a verb in [`DELAYED_VERBS`]
    pub fn for_verb(verb: &[u8]) -> Self {
        if DELAYED_VERBS.iter().any(|delayed| *delayed == verb) {
            ResponseMode::Delayed
        } else {
            ResponseMode::Immediate
        }
    }
}

/// A fully-formed command, ready to transmit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    bytes: Vec<u8, MAX_COMMAND_LEN>,
    kind: CommandKind,
    mode: ResponseMode,
}

impl Command {
    fn new(kind: CommandKind) -> Self {
        Self {
            bytes: Vec::new(),
            kind,
            mode: ResponseMode::Immediate,
        }
    }

    fn push(&mut self, bytes: &[u8]) -> Result<(), EncodeError> {
        self.bytes
            .extend_from_slice(bytes)
            .map_err(|_| EncodeError::EncodingTooLarge)
    }

    /// Override the response mode picked from the verb table
    pub fn with_response_mode(mut self, mode: ResponseMode) -> Self {
        self.mode = mode;
        self
    }

    /// Bytes to put on the wire
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    pub fn response_mode(&self) -> ResponseMode {
        self.mode
    }

    pub fn is_delayed(&self) -> bool {
        self.mode == ResponseMode::Delayed
    }

    /// The verb between `AT+` and the first `=`, `\r` or `\n`
    ///
    /// Returns `None` when the command does not start with `AT+`, which
    /// can only happen for raw commands.
    pub fn verb(&self) -> Option<&[u8]> {
        let rest = self.bytes.strip_prefix(AT_PREFIX)?;
        let end = rest
            .iter()
            .position(|&b| matches!(b, b'=' | b'\r' | b'\n'))
            .unwrap_or(rest.len());
        Some(&rest[..end])
    }
}

/// Build `AT+<VERB>` plus the query terminator of `dialect`
pub fn encode_query(verb: &[u8], dialect: Dialect) -> Result<Command, EncodeError> {
    let mut command = Command::new(CommandKind::Query);
    command.push(AT_PREFIX)?;
    command.push(verb)?;
    command.push(dialect.query_terminator())?;
    command.mode = ResponseMode::for_verb(verb);
    Ok(command)
}

/// Build `AT+<VERB>=<VALUE>\r\n`
pub fn encode_set(verb: &[u8], value: &[u8]) -> Result<Command, EncodeError> {
    let mut command = Command::new(CommandKind::Set);
    command.push(AT_PREFIX)?;
    command.push(verb)?;
    command.push(b"=")?;
    command.push(value)?;
    command.push(LINE_END)?;
    command.mode = ResponseMode::for_verb(verb);
    Ok(command)
}

/// Build a command from a caller-owned slot
///
/// The slot's last three bytes are reserved for the terminator: they are
/// replaced by `\r`, `\n` and the end marker whatever they held, and
/// everything before them is copied verbatim without inspection. A slot
/// whose content does not already end in its last three bytes therefore
/// loses data, and a malformed body is sent as-is.
///
/// The response mode is looked up from the verb when the body has an
/// `AT+<VERB>` prefix.
pub fn encode_raw(slot: &[u8]) -> Result<Command, EncodeError> {
    if slot.len() < RAW_TAIL_LEN {
        return Err(EncodeError::RawTooShort);
    }
    if slot.len() > COMMAND_CAPACITY {
        return Err(EncodeError::EncodingTooLarge);
    }

    let mut command = Command::new(CommandKind::Raw);
    command.push(&slot[..slot.len() - RAW_TAIL_LEN])?;
    command.push(LINE_END)?;
    command.mode = command
        .verb()
        .map(ResponseMode::for_verb)
        .unwrap_or_default();
    Ok(command)
}
