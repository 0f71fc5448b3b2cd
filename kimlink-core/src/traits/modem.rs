//! AT modem trait
//!
//! This trait abstracts over the module driver so application code (uplink
//! schedulers, configuration tools) can run against a real KIM or a test
//! double.

use kimlink_protocol::{Dialect, Outcome};

/// A module controlled through AT commands
///
/// One command is outstanding at a time; every send blocks until the
/// exchange resolves.
pub trait AtModem {
    /// Error for transport or pin failures
    type Error;

    /// Switch the module on or off
    fn power(&mut self, on: bool) -> Result<(), Self::Error>;

    /// Wake the module and check that it answers
    ///
    /// May switch the dialect when the module does not understand the
    /// current one.
    fn check(&mut self) -> Result<bool, Self::Error>;

    /// Send `AT+<VERB>=?`
    fn send_query(&mut self, verb: &[u8]) -> Result<Outcome, Self::Error>;

    /// Send `AT+<VERB>=<VALUE>`
    fn send_set(&mut self, verb: &[u8], value: &[u8]) -> Result<Outcome, Self::Error>;

    /// Send a caller-built command slot
    fn send_raw(&mut self, slot: &[u8]) -> Result<Outcome, Self::Error>;

    /// Outcome of the last exchange
    fn state(&self) -> Outcome;

    /// Last line received from the module
    fn response(&self) -> &[u8];

    /// Dialect currently used for queries
    fn dialect(&self) -> Dialect;

    /// Check if the module is a KIM2
    fn is_kim2(&self) -> bool {
        self.dialect().is_kim2()
    }
}
