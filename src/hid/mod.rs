//! HID report types, the combined report descriptor, and the GET_REPORT
//! answer used by the USB setup callback.

pub mod keyboard;
pub mod mouse;

#[cfg(test)]
mod tests;

pub use keyboard::KeyboardReport;
pub use mouse::MouseReport;

/// Report ID of the keyboard collection.
pub const KEYBOARD_REPORT_ID: u8 = 1;

/// Report ID of the absolute pointer collection.
pub const MOUSE_REPORT_ID: u8 = 2;

/// Largest serialised report, including the report ID.
pub const MAX_REPORT_SIZE: usize = mouse::MOUSE_REPORT_SIZE;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReportKind {
    Keyboard,
    Mouse,
}

/// One outbound interrupt-IN report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HidReport {
    Keyboard(KeyboardReport),
    Mouse(MouseReport),
}

impl HidReport {
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        match self {
            HidReport::Keyboard(k) => k.serialize(buf),
            HidReport::Mouse(m) => m.serialize(buf),
        }
    }

    pub fn kind(&self) -> ReportKind {
        match self {
            HidReport::Keyboard(_) => ReportKind::Keyboard,
            HidReport::Mouse(_) => ReportKind::Mouse,
        }
    }
}

/// Most recently sent report of each kind.
///
/// This is what the host gets back from a GET_REPORT control request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LastReports {
    pub keyboard: KeyboardReport,
    pub mouse: MouseReport,
}

impl LastReports {
    pub const fn new() -> Self {
        Self {
            keyboard: KeyboardReport::released(),
            mouse: MouseReport::null(),
        }
    }

    /// Remember `report` as the latest of its kind.
    pub fn record(&mut self, report: &HidReport) {
        match report {
            HidReport::Keyboard(k) => self.keyboard = *k,
            HidReport::Mouse(m) => self.mouse = *m,
        }
    }
}

/// Answer a HID GET_REPORT request for `report_id`.
///
/// Writes the report into `buf` and returns its length. Unknown report
/// IDs, and buffers too small to hold the report, get a zero-length
/// answer.
pub fn answer_get_report(report_id: u8, reports: &LastReports, buf: &mut [u8]) -> usize {
    match report_id {
        KEYBOARD_REPORT_ID => reports.keyboard.serialize(buf),
        MOUSE_REPORT_ID => reports.mouse.serialize(buf),
        _ => {
            debug!("GET_REPORT for unknown report id {}", report_id);
            0
        }
    }
}

/// USB HID report descriptor: a single-key keyboard (ID 1) followed by a
/// 3-button absolute pointer (ID 2).
///
/// Redundant global items are omitted, so the byte layout must not be
/// "normalised".
pub const REPORT_DESCRIPTOR: &[u8] = &[
    // Keyboard
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x06, // Usage (Keyboard)
    0xA1, 0x01, // Collection (Application)
    0x85, 0x01, //   Report ID (1)
    //
    //   - Modifier keys (8 bits) -
    0x05, 0x07, //   Usage Page (Keyboard/Keypad)
    0x19, 0xE0, //   Usage Minimum (Left Control)
    0x29, 0xE7, //   Usage Maximum (Right GUI)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x01, //   Logical Maximum (1)
    0x75, 0x01, //   Report Size (1)
    0x95, 0x08, //   Report Count (8)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    //   - Key code (1 byte) -
    0x19, 0x00, //   Usage Minimum (Reserved)
    0x29, 0x65, //   Usage Maximum (Keyboard Application)
    0x25, 0x65, //   Logical Maximum (101)
    0x75, 0x08, //   Report Size (8)
    0x95, 0x01, //   Report Count (1)
    0x81, 0x00, //   Input (Data, Array, Absolute)
    0xC0, // End Collection
    //
    // Absolute pointer
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x02, // Usage (Mouse)
    0xA1, 0x01, // Collection (Application)
    0x85, 0x02, //   Report ID (2)
    0x09, 0x01, //   Usage (Pointer)
    0xA1, 0x00, //   Collection (Physical)
    //
    //     - X, Y position -
    0x09, 0x30, //     Usage (X)
    0x09, 0x31, //     Usage (Y)
    0x26, 0xFF, 0x7F, // Logical Maximum (32767)
    0x75, 0x10, //     Report Size (16)
    0x95, 0x02, //     Report Count (2)
    0x81, 0x42, //     Input (Data, Variable, Absolute, Null State)
    0xC0, //   End Collection (Physical)
    //
    //   - Buttons (3 bits + 5 padding) -
    0x05, 0x09, //   Usage Page (Buttons)
    0x19, 0x01, //   Usage Minimum (Button 1)
    0x29, 0x03, //   Usage Maximum (Button 3)
    0x25, 0x01, //   Logical Maximum (1)
    0x75, 0x01, //   Report Size (1)
    0x95, 0x03, //   Report Count (3)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    0x95, 0x05, //   Report Count (5)
    0x81, 0x03, //   Input (Constant, Variable, Absolute)
    0xC0, // End Collection (Application)
];
