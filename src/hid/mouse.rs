//! Absolute pointer report (report ID 2).
//!
//! Layout (5 bytes after the report ID):
//! ```text
//! Byte 0-1: X position, little-endian, 0..=32767
//! Byte 2-3: Y position, little-endian, 0..=32767
//! Byte 4:   Button bitfield
//!           Bit 0 = Button 1, Bit 1 = Button 2, Bit 2 = Button 3,
//!           Bit 3-7 = padding (always 0)
//! ```
//!
//! The X/Y main item carries the Null State flag, so any value outside
//! the logical range means "no position" to the host.

use super::MOUSE_REPORT_ID;

/// Mouse report size in bytes, including the report ID.
pub const MOUSE_REPORT_SIZE: usize = 6;

/// Largest valid coordinate.
pub const MAX_COORDINATE: u16 = 0x7FFF;

/// Out-of-range coordinate reported when there is no valid position.
pub const NULL_COORDINATE: u16 = 0xFFFF;

/// Mask of the three button bits.
pub const BUTTON_MASK: u8 = 0x07;

/// Absolute pointer report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MouseReport {
    /// Absolute X position, or [`NULL_COORDINATE`].
    pub x: u16,
    /// Absolute Y position, or [`NULL_COORDINATE`].
    pub y: u16,
    /// Button bitfield (low 3 bits).
    pub buttons: u8,
}

impl MouseReport {
    /// No position, no buttons.
    pub const fn null() -> Self {
        Self {
            x: NULL_COORDINATE,
            y: NULL_COORDINATE,
            buttons: 0,
        }
    }

    /// Serialise into a byte slice for USB HID transmission.
    /// Returns the number of bytes written (always 6), or 0 if `buf` is
    /// too small.
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < MOUSE_REPORT_SIZE {
            return 0;
        }
        buf[0] = MOUSE_REPORT_ID;
        buf[1..3].copy_from_slice(&self.x.to_le_bytes());
        buf[3..5].copy_from_slice(&self.y.to_le_bytes());
        buf[5] = self.buttons & BUTTON_MASK;
        MOUSE_REPORT_SIZE
    }

    /// Returns `true` when neither axis carries a position.
    pub fn is_null(&self) -> bool {
        self.x > MAX_COORDINATE && self.y > MAX_COORDINATE
    }
}

impl Default for MouseReport {
    fn default() -> Self {
        Self::null()
    }
}
