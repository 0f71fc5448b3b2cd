//! `embedded-io` transport adapter
//!
//! Wraps any blocking byte stream implementing `embedded_io::{Read, Write,
//! ReadReady}` (a HAL UART, a USB CDC bridge, a software UART) and adds the
//! per-byte read timeout the exchange engine relies on. The timeout is
//! enforced by polling `read_ready` in 1 ms steps.

use embedded_hal::delay::DelayNs;
use embedded_io::{Error as _, ErrorKind, Read, ReadReady, Write};
use kimlink_hal::{UartConfig, UartError, UartLifecycle, UartRx, UartTx};

/// Per-byte read timeout (Arduino `Stream` default)
pub const DEFAULT_READ_TIMEOUT_MS: u32 = 1000;

/// Map an `embedded-io` error onto the UART error set
fn map_error<E: embedded_io::Error>(e: E) -> UartError {
    match e.kind() {
        ErrorKind::InvalidData => UartError::Framing,
        ErrorKind::OutOfMemory => UartError::Overrun,
        ErrorKind::NotConnected | ErrorKind::BrokenPipe => UartError::Closed,
        _ => UartError::Other,
    }
}

/// Transport over an `embedded-io` stream
pub struct IoSerial<T, D> {
    io: T,
    delay: D,
    timeout_ms: u32,
    config: Option<UartConfig>,
}

impl<T, D> IoSerial<T, D>
where
    T: Read + Write + ReadReady,
    D: DelayNs,
{
    /// Wrap a stream; the port starts closed
    pub fn new(io: T, delay: D) -> Self {
        Self {
            io,
            delay,
            timeout_ms: DEFAULT_READ_TIMEOUT_MS,
            config: None,
        }
    }

    /// Set the per-byte read timeout
    pub fn with_timeout(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    pub fn is_open(&self) -> bool {
        self.config.is_some()
    }

    /// Settings the port was opened with
    pub fn config(&self) -> Option<&UartConfig> {
        self.config.as_ref()
    }

    /// Unwrap the stream and delay
    pub fn into_inner(self) -> (T, D) {
        (self.io, self.delay)
    }

    fn ensure_open(&self) -> Result<(), UartError> {
        if self.is_open() {
            Ok(())
        } else {
            Err(UartError::Closed)
        }
    }
}

impl<T, D> UartTx for IoSerial<T, D>
where
    T: Read + Write + ReadReady,
    D: DelayNs,
{
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), UartError> {
        self.ensure_open()?;
        self.io.write_all(data).map_err(map_error)
    }

    fn flush(&mut self) -> Result<(), UartError> {
        self.ensure_open()?;
        self.io.flush().map_err(map_error)
    }
}

impl<T, D> UartRx for IoSerial<T, D>
where
    T: Read + Write + ReadReady,
    D: DelayNs,
{
    fn available(&mut self) -> Result<bool, UartError> {
        self.ensure_open()?;
        self.io.read_ready().map_err(map_error)
    }

    fn read_byte(&mut self) -> Result<Option<u8>, UartError> {
        self.ensure_open()?;

        let mut waited_ms = 0;
        loop {
            if self.io.read_ready().map_err(map_error)? {
                let mut byte = [0u8; 1];
                if self.io.read(&mut byte).map_err(map_error)? == 1 {
                    return Ok(Some(byte[0]));
                }
            }
            if waited_ms >= self.timeout_ms {
                return Ok(None);
            }
            self.delay.delay_ms(1);
            waited_ms += 1;
        }
    }
}

impl<T, D> UartLifecycle for IoSerial<T, D>
where
    T: Read + Write + ReadReady,
    D: DelayNs,
{
    fn open(&mut self, config: &UartConfig) -> Result<(), UartError> {
        // The stream is already configured by its owner; only track state
        self.config = Some(*config);
        Ok(())
    }

    fn close(&mut self) {
        self.config = None;
    }
}
