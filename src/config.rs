//! Application-wide constants and compile-time configuration.
//!
//! All hardware pin assignments, timing parameters, and protocol
//! constants live here so they can be tuned in one place.

// Timing

/// Period of one scheduler tick (µs). Matches an 8-bit timer at 12 MHz
/// with a /64 prescaler overflowing every 1.365 ms.
pub const TICK_PERIOD_US: u64 = 1365;

/// Ticks between the start of two sensor read cycles.
/// 5 × 1.365 ms ≈ 6.8 ms ≈ 146 Hz, twice the sensor's 75 Hz output rate.
pub const SENSOR_PROBE_INTERVAL_TICKS: u8 = 5;

/// Hardware watchdog timeout (ms).
pub const WATCHDOG_TIMEOUT_MS: u32 = 2000;

// Sensor

/// 7-bit I²C address of the HMC5883L magnetometer.
pub const SENSOR_I2C_ADDRESS: u8 = 0x1E;

// USB

/// USB VID/PID - use the "pid.codes" open-source test VID.
/// Replace with your own allocated VID/PID for production.
pub const USB_VID: u16 = 0x1209;
pub const USB_PID: u16 = 0x0002;

/// USB device strings.
pub const USB_MANUFACTURER: &str = "magmouse";
pub const USB_PRODUCT: &str = "Magnetometer USB Mouse";
pub const USB_SERIAL_NUMBER: &str = "000001";

/// USB HID polling interval (ms).
pub const USB_HID_POLL_MS: u8 = 10;

// GPIO pin assignments (nRF52840-DK defaults)
//
// These are logical names; the actual `embassy_nrf::peripherals::*`
// are selected in `main.rs`.  Adjust for your custom PCB.
//
//   Button 1       → P0.11
//   Button 2       → P0.12
//   Button 3       → P0.24
//   Switch         → P0.25
//   I²C SDA        → P0.26
//   I²C SCL        → P0.27
//   Red LED        → P0.13
//   Yellow LED     → P0.14
//   Green LED      → P0.15

// Menu

/// Capacity of the typed-text queue (characters).
pub const MENU_TEXT_CAPACITY: usize = 64;

// Settings storage

/// Flash page index holding the persisted calibration (4 KB per page on
/// nRF52840). Excluded from the FLASH region in `memory.x`.
pub const SETTINGS_FLASH_PAGE: u32 = 255;
