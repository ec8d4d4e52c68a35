//! Unified error type for magmouse.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.

/// Top-level error type used across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Sensor
    /// An I²C transaction with the sensor failed.
    I2c,

    /// The device at the sensor address did not identify as an HMC5883L.
    SensorNotFound,

    // Storage
    /// Non-volatile read/write/erase failed.
    Storage,

    /// A settings save is already in progress.
    StorageBusy,
}

pub type Result<T> = core::result::Result<T, Error>;
