//! KIM1/KIM2 satellite module
//!
//! The module is wired with:
//! - a UART at 9600 baud (8N1)
//! - a power-enable line (ON_OFF)
//! - a user wakeup line (USER_INT), pulsed to wake the module from sleep
//!
//! KIM1 and KIM2 modules differ in how queries are terminated (`=?\r`
//! versus `=?\r\n`). The driver starts with the configured dialect and
//! [`Kim::check`] switches to the other one when the module does not
//! answer a ping at all.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use heapless::String;
use kimlink_core::config::ModemConfig;
use kimlink_core::traits::AtModem;
use kimlink_hal::Uart;
use kimlink_protocol::{
    encode_query, encode_raw, encode_set, to_hex_string, Command, Dialect, Outcome,
    MAX_COMMAND_LEN,
};

use super::exchange::Exchange;
use crate::error::ModemError;

/// Verb used by the liveness check
pub const PING_VERB: &[u8] = b"PING";

/// Verb queuing an uplink message (delayed response)
pub const TX_VERB: &[u8] = b"TX";

/// KIM module driver
///
/// Owns the transport and both control pins. One command is in flight at a
/// time; share a driver between tasks only behind a mutex.
pub struct Kim<S, PWR, WU, D> {
    serial: S,
    power_pin: PWR,
    wakeup_pin: WU,
    delay: D,
    config: ModemConfig,
    dialect: Dialect,
    exchange: Exchange,
    powered: bool,
}

impl<S, PWR, WU, D> Kim<S, PWR, WU, D>
where
    S: Uart,
    PWR: OutputPin,
    WU: OutputPin,
    D: DelayNs,
{
    /// Create a driver and drive both control lines low
    ///
    /// The module stays off until [`power`](Self::power) is called.
    pub fn new(
        serial: S,
        mut power_pin: PWR,
        mut wakeup_pin: WU,
        delay: D,
        config: ModemConfig,
    ) -> Result<Self, ModemError> {
        wakeup_pin.set_low().map_err(|_| ModemError::Pin)?;
        power_pin.set_low().map_err(|_| ModemError::Pin)?;

        Ok(Self {
            serial,
            power_pin,
            wakeup_pin,
            delay,
            dialect: config.initial_dialect,
            exchange: Exchange::new(config.error_marker),
            config,
            powered: false,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &ModemConfig {
        &self.config
    }

    /// Outcome of the last command
    pub fn state(&self) -> Outcome {
        self.exchange.state()
    }

    /// Dialect used for queries
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn is_kim2(&self) -> bool {
        self.dialect.is_kim2()
    }

    pub fn is_powered(&self) -> bool {
        self.powered
    }

    /// Last line received from the module
    pub fn response(&self) -> &[u8] {
        self.exchange.response().as_bytes()
    }

    /// Last line received, as text without the trailing `\r`
    pub fn response_str(&self) -> Option<&str> {
        self.exchange.response().as_str()
    }

    /// Pulse the wakeup line high for `wakeup_pulse_ms`
    pub fn wakeup_pulse(&mut self) -> Result<(), ModemError> {
        self.wakeup_pin.set_high().map_err(|_| ModemError::Pin)?;
        self.delay.delay_ms(self.config.wakeup_pulse_ms);
        self.wakeup_pin.set_low().map_err(|_| ModemError::Pin)?;
        Ok(())
    }

    /// Switch the module on or off
    ///
    /// On: enable power, (re)open the UART, drop anything buffered in either
    /// direction, then let the module settle.
    ///
    /// Off: drain the UART while it is still open, cut power, close the
    /// UART. The port is closed even if draining or the power line fails;
    /// the failure is reported afterwards.
    pub fn power(&mut self, on: bool) -> Result<(), ModemError> {
        if on {
            self.power_pin.set_high().map_err(|_| ModemError::Pin)?;
            self.powered = true;
            self.serial.open(&self.config.uart_config())?;
            self.drain()?;
            self.delay.delay_ms(self.config.power_settle_ms);

            #[cfg(feature = "defmt")]
            defmt::info!("KIM powered on ({} baud)", self.config.baudrate);
        } else {
            let drained = self.drain();
            let cut = self.power_pin.set_low().map_err(|_| ModemError::Pin);
            self.powered = false;
            self.serial.close();

            #[cfg(feature = "defmt")]
            defmt::info!("KIM powered off");

            cut?;
            drained?;
        }
        Ok(())
    }

    fn drain(&mut self) -> Result<(), ModemError> {
        self.serial.flush()?;
        self.serial.discard_input()?;
        Ok(())
    }

    /// Wake the module and check that it answers a ping
    ///
    /// If the ping draws no marker line at all, the module probably speaks
    /// the other dialect: switch and ping once more. An `Ok` or `Error`
    /// answer keeps the dialect.
    pub fn check(&mut self) -> Result<bool, ModemError> {
        self.wakeup_pulse()?;
        self.send_query(PING_VERB)?;

        if !self.exchange.response().is_marker() {
            self.dialect = self.dialect.toggled();

            #[cfg(feature = "defmt")]
            defmt::info!("no answer to ping, switching to {}", self.dialect);

            self.send_query(PING_VERB)?;
        }

        Ok(self.state().is_ok())
    }

    /// Send a pre-built command
    pub fn send(&mut self, command: &Command) -> Result<Outcome, ModemError> {
        Ok(self.exchange.run(&mut self.serial, command)?)
    }

    /// Send `AT+<VERB>` with the current dialect's query terminator
    pub fn send_query(&mut self, verb: &[u8]) -> Result<Outcome, ModemError> {
        let command = encode_query(verb, self.dialect)?;
        self.send(&command)
    }

    /// Send `AT+<VERB>=<VALUE>\r\n`
    pub fn send_set(&mut self, verb: &[u8], value: &[u8]) -> Result<Outcome, ModemError> {
        let command = encode_set(verb, value)?;
        self.send(&command)
    }

    /// Send a caller-built slot; see [`encode_raw`] for the tail rules
    pub fn send_raw(&mut self, slot: &[u8]) -> Result<Outcome, ModemError> {
        let command = encode_raw(slot)?;
        self.send(&command)
    }

    /// Send binary data as an uppercase hex value: `AT+<VERB>=<HEX>\r\n`
    ///
    /// With [`TX_VERB`] this queues an uplink message and waits for the
    /// delayed result.
    pub fn send_hex(&mut self, verb: &[u8], data: &[u8]) -> Result<Outcome, ModemError> {
        let hex: String<MAX_COMMAND_LEN> = to_hex_string(data)?;
        self.send_set(verb, hex.as_bytes())
    }

    /// Power the module down if needed and hand back the peripherals
    pub fn release(mut self) -> (S, PWR, WU, D) {
        if self.powered {
            // Peripherals are returned even if power-off fails
            let _result = self.power(false);

            #[cfg(feature = "defmt")]
            if let Err(e) = _result {
                defmt::warn!("power-off on release failed: {}", e);
            }
        }
        (self.serial, self.power_pin, self.wakeup_pin, self.delay)
    }
}

impl<S, PWR, WU, D> AtModem for Kim<S, PWR, WU, D>
where
    S: Uart,
    PWR: OutputPin,
    WU: OutputPin,
    D: DelayNs,
{
    type Error = ModemError;

    fn power(&mut self, on: bool) -> Result<(), Self::Error> {
        Kim::power(self, on)
    }

    fn check(&mut self) -> Result<bool, Self::Error> {
        Kim::check(self)
    }

    fn send_query(&mut self, verb: &[u8]) -> Result<Outcome, Self::Error> {
        Kim::send_query(self, verb)
    }

    fn send_set(&mut self, verb: &[u8], value: &[u8]) -> Result<Outcome, Self::Error> {
        Kim::send_set(self, verb, value)
    }

    fn send_raw(&mut self, slot: &[u8]) -> Result<Outcome, Self::Error> {
        Kim::send_raw(self, slot)
    }

    fn state(&self) -> Outcome {
        Kim::state(self)
    }

    fn response(&self) -> &[u8] {
        Kim::response(self)
    }

    fn dialect(&self) -> Dialect {
        Kim::dialect(self)
    }
}
