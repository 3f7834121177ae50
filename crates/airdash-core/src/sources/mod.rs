//! Sample source implementations.
//!
//! Sensor transports (I2C and friends) live outside this crate; these two
//! sources cover demo runs and replaying a recorded log.

pub mod replay;
pub mod simulated;

pub use replay::ReplaySource;
pub use simulated::{SimulatedConfig, SimulatedSource};
