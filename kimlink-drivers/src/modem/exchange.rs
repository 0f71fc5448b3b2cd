//! Command/response exchange engine
//!
//! One exchange:
//! 1. Flush pending output and drop unread input
//! 2. Write the command
//! 3. Read lines until the [`ResponseParser`] resolves the exchange
//!
//! Immediate commands get 5 line reads, delayed commands 10. Each read is
//! bounded by the transport's own timeout. Nothing is retried here.

use kimlink_hal::{UartError, UartRx, UartTx};
use kimlink_protocol::{Command, ErrorMarker, Outcome, ResponseLine, ResponseParser};

/// Exchange state: the last received line and the last outcome
#[derive(Debug, Clone)]
pub struct Exchange {
    response: ResponseLine,
    state: Outcome,
    marker: ErrorMarker,
}

impl Default for Exchange {
    fn default() -> Self {
        Self::new(ErrorMarker::default())
    }
}

impl Exchange {
    pub fn new(marker: ErrorMarker) -> Self {
        Self {
            response: ResponseLine::new(),
            state: Outcome::Unknown,
            marker,
        }
    }

    /// Outcome of the most recent exchange
    pub fn state(&self) -> Outcome {
        self.state
    }

    /// Line read by the last read attempt
    pub fn response(&self) -> &ResponseLine {
        &self.response
    }

    pub fn marker(&self) -> ErrorMarker {
        self.marker
    }

    /// Send `command` and classify the reply
    ///
    /// The result becomes the new [`state`](Self::state). A transport
    /// failure aborts the exchange, is returned as-is, and leaves the state
    /// at [`Outcome::Timeout`] since no answer was obtained.
    pub fn run<S>(&mut self, serial: &mut S, command: &Command) -> Result<Outcome, UartError>
    where
        S: UartTx + UartRx,
    {
        let result = self.transact(serial, command);
        self.state = match result {
            Ok(outcome) => outcome,
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("transport failure during exchange: {}", _e);
                Outcome::Timeout
            }
        };
        result
    }

    fn transact<S>(&mut self, serial: &mut S, command: &Command) -> Result<Outcome, UartError>
    where
        S: UartTx + UartRx,
    {
        // Resynchronise with the module before every command
        serial.flush()?;
        serial.discard_input()?;

        let mut parser = ResponseParser::new(command.response_mode(), self.marker);
        self.response.clear();

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "tx {=[u8]:a} ({}, {})",
            command.as_bytes(),
            command.kind(),
            command.response_mode()
        );

        serial.write_blocking(command.as_bytes())?;

        loop {
            let line = self.response.fill(|slot| serial.read_line(slot))?;

            #[cfg(feature = "defmt")]
            defmt::trace!(
                "rx {=[u8]:a} -> {}",
                line,
                kimlink_protocol::classify(line, self.marker)
            );

            if let Some(outcome) = parser.feed_line(line) {
                #[cfg(feature = "defmt")]
                defmt::debug!("exchange resolved: {}", outcome);
                return Ok(outcome);
            }
        }
    }
}
