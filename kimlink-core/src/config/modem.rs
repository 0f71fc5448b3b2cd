//! Modem runtime configuration

use kimlink_hal::UartConfig;
use kimlink_protocol::{Dialect, ErrorMarker};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Upper bound of a postcard-encoded [`ModemConfig`]
pub const MODEM_CONFIG_MAX_SIZE: usize = 32;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Stored bytes are not a valid configuration
    Corrupt,
    /// Output buffer too small
    BufferTooSmall,
    /// Value out of range
    InvalidValue,
}

/// Driver settings for one KIM module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ModemConfig {
    /// UART baud rate
    pub baudrate: u32,
    /// Length of the high pulse on the wakeup line
    pub wakeup_pulse_ms: u32,
    /// Wait after power-on before the first command
    pub power_settle_ms: u32,
    /// Rule for recognising error lines
    pub error_marker: ErrorMarker,
    /// Dialect assumed until a liveness check says otherwise
    pub initial_dialect: Dialect,
}

impl Default for ModemConfig {
    fn default() -> Self {
        Self {
            baudrate: UartConfig::KIM_BAUDRATE,
            wakeup_pulse_ms: 50,
            power_settle_ms: 10,
            error_marker: ErrorMarker::Standard,
            initial_dialect: Dialect::Kim2,
        }
    }
}

impl ModemConfig {
    /// Serial settings for the module (8N1)
    pub fn uart_config(&self) -> UartConfig {
        UartConfig::with_baudrate(self.baudrate)
    }

    /// Check values a driver cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.baudrate == 0 || self.wakeup_pulse_ms == 0 {
            return Err(ConfigError::InvalidValue);
        }
        Ok(())
    }

    /// Serialize into `buf` (postcard), returning the used part
    #[cfg(feature = "serde")]
    pub fn to_slice<'b>(&self, buf: &'b mut [u8]) -> Result<&'b mut [u8], ConfigError> {
        postcard::to_slice(self, buf).map_err(|_| ConfigError::BufferTooSmall)
    }

    /// Deserialize from postcard bytes and validate
    #[cfg(feature = "serde")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Corrupt)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kimlink_hal::{DataBits, Parity, StopBits};

    #[test]
    fn test_defaults_match_module() {
        let config = ModemConfig::default();
        assert_eq!(config.baudrate, 9600);
        assert_eq!(config.wakeup_pulse_ms, 50);
        assert_eq!(config.power_settle_ms, 10);
        assert_eq!(config.error_marker, ErrorMarker::Standard);
        assert_eq!(config.initial_dialect, Dialect::Kim2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_uart_config() {
        let config = ModemConfig {
            baudrate: 19200,
            ..Default::default()
        };
        let uart = config.uart_config();
        assert_eq!(uart.baudrate, 19200);
        assert_eq!(uart.data_bits, DataBits::Eight);
        assert_eq!(uart.parity, Parity::None);
        assert_eq!(uart.stop_bits, StopBits::One);
    }

    #[test]
    fn test_validate_rejects_zero() {
        let config = ModemConfig {
            baudrate: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidValue));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_persisted_config_survives_flash() {
        let config = ModemConfig {
            initial_dialect: Dialect::Kim1,
            error_marker: ErrorMarker::Legacy,
            ..Default::default()
        };
        let mut buf = [0u8; MODEM_CONFIG_MAX_SIZE];
        let used = config.to_slice(&mut buf).unwrap().len();

        assert_eq!(ModemConfig::from_bytes(&buf[..used]), Ok(config));
        assert_eq!(ModemConfig::from_bytes(&[0xFF]), Err(ConfigError::Corrupt));
    }
}
