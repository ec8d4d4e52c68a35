//! Host-testable core of the magmouse firmware.
//!
//! Everything here is plain `no_std` logic behind small traits: the
//! scheduler, button edge detection, sensor pacing, the menu, the
//! report multiplexer and the HID wire format. The firmware binary
//! (`main.rs`, `embedded` feature) binds these traits to the nRF52840.
//!
//! Usage: `cargo test --lib --tests`

#![cfg_attr(not(test), no_std)]

// Must come first so the logging macros are visible everywhere.
#[macro_use]
mod fmt;

pub mod board;
pub mod buttons;
pub mod config;
pub mod error;
pub mod hid;
pub mod menu;
pub mod mode;
pub mod mouse;
pub mod report;
pub mod scheduler;
pub mod sensor;
pub mod settings;
pub mod tick;
pub mod usb;

pub use error::{Error, Result};
pub use scheduler::Scheduler;

#[cfg(test)]
mod tests {
    use super::config::*;

    #[test]
    fn sensor_pacing_outruns_output_rate() {
        // A new read cycle may start every ~6.8 ms; the sensor produces a
        // sample every ~13.3 ms at 75 Hz.
        let pacing_us = TICK_PERIOD_US * u64::from(SENSOR_PROBE_INTERVAL_TICKS);
        assert!(pacing_us < 1_000_000 / 75);
    }

    #[test]
    fn watchdog_covers_many_ticks() {
        let timeout_us = u64::from(WATCHDOG_TIMEOUT_MS) * 1000;
        assert!(timeout_us > 1000 * TICK_PERIOD_US);
    }

    #[test]
    fn menu_text_fits_banner() {
        assert!("\nmagmouse menu\n> sensor reading".len() <= MENU_TEXT_CAPACITY);
    }
}
