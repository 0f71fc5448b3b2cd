//! Configuration types
//!
//! Modem settings can be stored as postcard binary data (`serde` feature);
//! the board table is compiled in.

pub mod board;
pub mod modem;

pub use board::*;
pub use modem::*;
