//! KIM module driver
//!
//! - [`Exchange`]: one command/response round trip over a transport
//! - [`Kim`]: the module itself (power, wakeup, dialect, commands)

pub mod exchange;
pub mod kim;

pub use exchange::Exchange;
pub use kim::{Kim, PING_VERB, TX_VERB};
