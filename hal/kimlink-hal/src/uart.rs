//! UART serial communication abstractions
//!
//! Provides blocking traits for the line-oriented serial link to the
//! module. Every read is bounded by a timeout owned by the implementation;
//! callers never wait forever.

/// Line terminator used by the module's responses
pub const LINE_END: u8 = b'\n';

/// Error from UART operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartError {
    /// Framing error
    Framing,
    /// Noise error
    Noise,
    /// Overrun error
    Overrun,
    /// Parity error
    Parity,
    /// Port used while not open
    Closed,
    /// Other error
    Other,
}

/// UART transmitter
pub trait UartTx {
    /// Write data to the UART
    ///
    /// Blocks until all data has been written or an error occurs.
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), UartError>;

    /// Flush any buffered outbound data
    fn flush(&mut self) -> Result<(), UartError>;
}

/// UART receiver
pub trait UartRx {
    /// Check whether at least one received byte is waiting
    fn available(&mut self) -> Result<bool, UartError>;

    /// Read a single byte
    ///
    /// Returns `Ok(None)` when nothing arrived within the read timeout.
    fn read_byte(&mut self) -> Result<Option<u8>, UartError>;

    /// Read one line into `buf`
    ///
    /// Stops at [`LINE_END`] (consumed, not stored), when `buf` is full,
    /// or when a byte read times out. Returns the number of bytes stored.
    fn read_line(&mut self, buf: &mut [u8]) -> Result<usize, UartError> {
        let mut len = 0;
        while len < buf.len() {
            match self.read_byte()? {
                Some(LINE_END) | None => break,
                Some(byte) => {
                    buf[len] = byte;
                    len += 1;
                }
            }
        }
        Ok(len)
    }

    /// Drop every byte already sitting in the receive buffer
    fn discard_input(&mut self) -> Result<(), UartError> {
        while self.available()? {
            if self.read_byte()?.is_none() {
                break;
            }
        }
        Ok(())
    }
}

/// Port (re)initialisation and release
///
/// Software UARTs must be rebuilt after the module is powered, so the
/// driver opens the port on power-on and closes it on power-off.
pub trait UartLifecycle {
    /// Initialise the port with the given settings
    fn open(&mut self, config: &UartConfig) -> Result<(), UartError>;

    /// Release the port
    fn close(&mut self);
}

/// Combined UART interface
pub trait Uart: UartTx + UartRx + UartLifecycle {}

// Blanket implementation
impl<T: UartTx + UartRx + UartLifecycle> Uart for T {}

/// UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits (typically 8)
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl UartConfig {
    /// Baud rate the KIM modules ship with
    pub const KIM_BAUDRATE: u32 = 9600;

    /// 8N1 at the given baud rate
    pub const fn with_baudrate(baudrate: u32) -> Self {
        Self {
            baudrate,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

impl Default for UartConfig {
    fn default() -> Self {
        Self::with_baudrate(Self::KIM_BAUDRATE)
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Seven,
    Eight,
    Nine,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Receiver replaying a fixed byte script, then timing out
    struct ScriptRx {
        data: &'static [u8],
        pos: usize,
    }

    impl ScriptRx {
        fn new(data: &'static [u8]) -> Self {
            Self { data, pos: 0 }
        }
    }

    impl UartRx for ScriptRx {
        fn available(&mut self) -> Result<bool, UartError> {
            Ok(self.pos < self.data.len())
        }

        fn read_byte(&mut self) -> Result<Option<u8>, UartError> {
            let byte = self.data.get(self.pos).copied();
            if byte.is_some() {
                self.pos += 1;
            }
            Ok(byte)
        }
    }

    #[test]
    fn test_read_line_stops_at_newline() {
        let mut rx = ScriptRx::new(b"+OK\r\n+ID=1\r\n");
        let mut buf = [0u8; 19];

        let len = rx.read_line(&mut buf).unwrap();
        assert_eq!(&buf[..len], b"+OK\r");

        let len = rx.read_line(&mut buf).unwrap();
        assert_eq!(&buf[..len], b"+ID=1\r");
    }

    #[test]
    fn test_read_line_stops_when_full() {
        let mut rx = ScriptRx::new(b"ABCDEFGH\n");
        let mut buf = [0u8; 4];

        assert_eq!(rx.read_line(&mut buf).unwrap(), 4);
        assert_eq!(&buf, b"ABCD");
        // The rest of the line is still pending
        assert_eq!(rx.read_line(&mut buf).unwrap(), 4);
        assert_eq!(&buf, b"EFGH");
    }

    #[test]
    fn test_read_line_timeout_returns_partial() {
        let mut rx = ScriptRx::new(b"+O");
        let mut buf = [0u8; 19];

        assert_eq!(rx.read_line(&mut buf).unwrap(), 2);
        assert_eq!(rx.read_line(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_discard_input_drains_everything() {
        let mut rx = ScriptRx::new(b"stale\r\nnoise");
        rx.discard_input().unwrap();
        assert!(!rx.available().unwrap());
    }

    #[test]
    fn test_default_config_is_kim_8n1() {
        let config = UartConfig::default();
        assert_eq!(config.baudrate, 9600);
        assert_eq!(config.data_bits, DataBits::Eight);
        assert_eq!(config.parity, Parity::None);
        assert_eq!(config.stop_bits, StopBits::One);
    }
}
