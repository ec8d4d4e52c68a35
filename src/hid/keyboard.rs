//! Keyboard report (report ID 1) and the character encoder used by the
//! menu to "type" text at the host.
//!
//! Layout (2 bytes after the report ID):
//! ```text
//! Byte 0: Modifier keys (bitfield)
//!         Bit 0 = Left Ctrl,  Bit 1 = Left Shift,
//!         Bit 2 = Left Alt,   Bit 3 = Left GUI,
//!         Bit 4 = Right Ctrl, Bit 5 = Right Shift,
//!         Bit 6 = Right Alt,  Bit 7 = Right GUI
//! Byte 1: One key code (USB HID usage 0..=101), no rollover
//! ```

use core::fmt;

use heapless::Deque;

use super::KEYBOARD_REPORT_ID;

/// Keyboard report size in bytes, including the report ID.
pub const KEYBOARD_REPORT_SIZE: usize = 3;

/// Left Shift modifier bit.
pub const MOD_LEFT_SHIFT: u8 = 1 << 1;

/// Highest usage code the report descriptor admits (Keyboard Application).
pub const MAX_KEYCODE: u8 = 0x65;

const KEY_A: u8 = 0x04;
const KEY_1: u8 = 0x1E;
const KEY_0: u8 = 0x27;
const KEY_ENTER: u8 = 0x28;
const KEY_TAB: u8 = 0x2B;
const KEY_SPACE: u8 = 0x2C;
const KEY_MINUS: u8 = 0x2D;
const KEY_EQUAL: u8 = 0x2E;
const KEY_SEMICOLON: u8 = 0x33;
const KEY_COMMA: u8 = 0x36;
const KEY_DOT: u8 = 0x37;
const KEY_SLASH: u8 = 0x38;

/// Single-key keyboard report.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyboardReport {
    /// Modifier key bitfield.
    pub modifier: u8,
    /// Pressed key usage code, 0 when no key is pressed.
    pub keycode: u8,
}

impl KeyboardReport {
    /// All keys released.
    pub const fn released() -> Self {
        Self {
            modifier: 0,
            keycode: 0,
        }
    }

    /// Encode a character as the key press that types it on a US layout.
    ///
    /// Returns `None` for characters that have no single-key encoding.
    pub fn from_char(c: char) -> Option<Self> {
        let (modifier, keycode) = match c {
            'a'..='z' => (0, KEY_A + (c as u8 - b'a')),
            'A'..='Z' => (MOD_LEFT_SHIFT, KEY_A + (c as u8 - b'A')),
            '0' => (0, KEY_0),
            '1'..='9' => (0, KEY_1 + (c as u8 - b'1')),
            '\n' => (0, KEY_ENTER),
            '\t' => (0, KEY_TAB),
            ' ' => (0, KEY_SPACE),
            '-' => (0, KEY_MINUS),
            '_' => (MOD_LEFT_SHIFT, KEY_MINUS),
            '=' => (0, KEY_EQUAL),
            '+' => (MOD_LEFT_SHIFT, KEY_EQUAL),
            ';' => (0, KEY_SEMICOLON),
            ':' => (MOD_LEFT_SHIFT, KEY_SEMICOLON),
            ',' => (0, KEY_COMMA),
            '<' => (MOD_LEFT_SHIFT, KEY_COMMA),
            '.' => (0, KEY_DOT),
            '>' => (MOD_LEFT_SHIFT, KEY_DOT),
            '/' => (0, KEY_SLASH),
            '?' => (MOD_LEFT_SHIFT, KEY_SLASH),
            '!' => (MOD_LEFT_SHIFT, KEY_1),
            _ => return None,
        };
        Some(Self { modifier, keycode })
    }

    /// Serialise into a byte slice for USB HID transmission.
    /// Returns the number of bytes written (always 3), or 0 if `buf` is
    /// too small.
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < KEYBOARD_REPORT_SIZE {
            return 0;
        }
        buf[0] = KEYBOARD_REPORT_ID;
        buf[1] = self.modifier;
        buf[2] = self.keycode;
        KEYBOARD_REPORT_SIZE
    }

    /// Returns `true` if no key and no modifier is pressed.
    pub fn is_released(&self) -> bool {
        self.modifier == 0 && self.keycode == 0
    }
}

/// Queue of characters waiting to be typed.
///
/// Each character is sent as a key-down report followed by a key-up
/// report, so the same letter twice in a row still registers twice.
pub struct TextOutput<const N: usize> {
    queue: Deque<KeyboardReport, N>,
    release_pending: bool,
}

impl<const N: usize> TextOutput<N> {
    pub const fn new() -> Self {
        Self {
            queue: Deque::new(),
            release_pending: false,
        }
    }

    /// Is there still a report to send?
    pub fn has_pending(&self) -> bool {
        self.release_pending || !self.queue.is_empty()
    }

    /// Produce the next report to send.
    ///
    /// Returns the released report when nothing is pending.
    pub fn next_report(&mut self) -> KeyboardReport {
        if self.release_pending {
            self.release_pending = false;
            return KeyboardReport::released();
        }
        match self.queue.pop_front() {
            Some(report) => {
                self.release_pending = true;
                report
            }
            None => KeyboardReport::released(),
        }
    }

    /// Drop everything not yet typed.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.release_pending = false;
    }
}

impl<const N: usize> Default for TextOutput<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> fmt::Write for TextOutput<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            // Characters the layout cannot type are skipped silently.
            if let Some(report) = KeyboardReport::from_char(c) {
                self.queue.push_back(report).map_err(|_| fmt::Error)?;
            }
        }
        Ok(())
    }
}
