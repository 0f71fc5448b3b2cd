//! Exchange outcome
//!
//! The result of one command/response exchange, also kept by the driver
//! as the module's last known state.

/// Classification of a completed exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// The module answered with a status marker
    Ok,
    /// The module answered with an error marker
    Error,
    /// No marker arrived within the attempt budget
    Timeout,
    /// No exchange has happened yet
    #[default]
    Unknown,
}

impl Outcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok)
    }

    /// Check if the exchange completed (successfully or not)
    pub fn is_final(&self) -> bool {
        !matches!(self, Outcome::Unknown)
    }
}
