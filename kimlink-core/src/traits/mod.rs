//! Hardware abstraction traits
//!
//! These traits define the interface between the application logic
//! and driver implementations.

pub mod modem;

pub use modem::AtModem;
