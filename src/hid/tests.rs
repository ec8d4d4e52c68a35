//! Unit tests for HID report serialisation and the GET_REPORT answer.
//!
//! These tests run on the host (not embedded).

use core::fmt::Write;

use super::keyboard::{KeyboardReport, TextOutput, MOD_LEFT_SHIFT};
use super::mouse::{MouseReport, NULL_COORDINATE};
use super::*;

// ═══════════════════════════════════════════════════════════════════════════
// Keyboard Report Tests
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn keyboard_report_released() {
    let report = KeyboardReport::released();
    assert!(report.is_released());
    assert_eq!(report, KeyboardReport::default());
}

#[test]
fn keyboard_report_serialize_prefixes_report_id() {
    let report = KeyboardReport {
        modifier: MOD_LEFT_SHIFT,
        keycode: 0x04,
    };
    let mut buf = [0u8; 8];
    let written = report.serialize(&mut buf);
    assert_eq!(written, 3);
    assert_eq!(&buf[..3], &[0x01, 0x02, 0x04]);
}

#[test]
fn keyboard_report_serialize_buffer_too_small() {
    let mut buf = [0u8; 2];
    assert_eq!(KeyboardReport::released().serialize(&mut buf), 0);
}

#[test]
fn keyboard_from_char_letters_and_shift() {
    assert_eq!(
        KeyboardReport::from_char('a'),
        Some(KeyboardReport { modifier: 0, keycode: 0x04 })
    );
    assert_eq!(
        KeyboardReport::from_char('z'),
        Some(KeyboardReport { modifier: 0, keycode: 0x1D })
    );
    assert_eq!(
        KeyboardReport::from_char('Q'),
        Some(KeyboardReport { modifier: MOD_LEFT_SHIFT, keycode: 0x14 })
    );
}

#[test]
fn keyboard_from_char_digits() {
    assert_eq!(KeyboardReport::from_char('1').map(|r| r.keycode), Some(0x1E));
    assert_eq!(KeyboardReport::from_char('9').map(|r| r.keycode), Some(0x26));
    assert_eq!(KeyboardReport::from_char('0').map(|r| r.keycode), Some(0x27));
}

#[test]
fn keyboard_from_char_punctuation() {
    assert_eq!(KeyboardReport::from_char('\n').map(|r| r.keycode), Some(0x28));
    assert_eq!(KeyboardReport::from_char(' ').map(|r| r.keycode), Some(0x2C));
    assert_eq!(
        KeyboardReport::from_char(':'),
        Some(KeyboardReport { modifier: MOD_LEFT_SHIFT, keycode: 0x33 })
    );
    assert_eq!(
        KeyboardReport::from_char('-'),
        Some(KeyboardReport { modifier: 0, keycode: 0x2D })
    );
}

#[test]
fn keyboard_from_char_unmappable() {
    assert!(KeyboardReport::from_char('é').is_none());
    assert!(KeyboardReport::from_char('\u{7}').is_none());
}

#[test]
fn keyboard_keycodes_stay_within_descriptor_range() {
    for c in (0u8..=127).map(char::from) {
        if let Some(report) = KeyboardReport::from_char(c) {
            assert!(report.keycode <= keyboard::MAX_KEYCODE, "{:?}", c);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Text Output Tests
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn text_output_interleaves_key_up() {
    let mut out: TextOutput<8> = TextOutput::new();
    write!(out, "aa").unwrap();

    assert!(out.has_pending());
    assert_eq!(out.next_report().keycode, 0x04);
    assert!(out.next_report().is_released());
    assert_eq!(out.next_report().keycode, 0x04);
    assert!(out.has_pending());
    assert!(out.next_report().is_released());
    assert!(!out.has_pending());
}

#[test]
fn text_output_skips_unmappable_chars() {
    let mut out: TextOutput<8> = TextOutput::new();
    write!(out, "é!").unwrap();
    let first = out.next_report();
    assert_eq!(first.modifier, MOD_LEFT_SHIFT);
    assert_eq!(first.keycode, 0x1E);
}

#[test]
fn text_output_overflow_keeps_queued_text() {
    let mut out: TextOutput<2> = TextOutput::new();
    assert!(write!(out, "abc").is_err());
    assert_eq!(out.next_report().keycode, 0x04);
    out.next_report();
    assert_eq!(out.next_report().keycode, 0x05);
    out.next_report();
    assert!(!out.has_pending());
}

#[test]
fn text_output_clear_drops_pending_release() {
    let mut out: TextOutput<4> = TextOutput::new();
    write!(out, "x").unwrap();
    out.next_report();
    assert!(out.has_pending());
    out.clear();
    assert!(!out.has_pending());
    assert!(out.next_report().is_released());
}

// ═══════════════════════════════════════════════════════════════════════════
// Mouse Report Tests
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn mouse_report_null_by_default() {
    let report = MouseReport::default();
    assert!(report.is_null());
    assert_eq!(report.x, NULL_COORDINATE);
    assert_eq!(report.buttons, 0);
}

#[test]
fn mouse_report_serialize_little_endian() {
    let report = MouseReport {
        x: 0x1234,
        y: 0x7FFF,
        buttons: 0x05,
    };
    let mut buf = [0u8; 6];
    assert_eq!(report.serialize(&mut buf), 6);
    assert_eq!(buf, [0x02, 0x34, 0x12, 0xFF, 0x7F, 0x05]);
}

#[test]
fn mouse_report_serialize_masks_padding_bits() {
    let report = MouseReport {
        x: 0,
        y: 0,
        buttons: 0xFF,
    };
    let mut buf = [0u8; 6];
    report.serialize(&mut buf);
    assert_eq!(buf[5], 0x07);
}

#[test]
fn mouse_report_serialize_buffer_too_small() {
    let mut buf = [0u8; 5];
    assert_eq!(MouseReport::null().serialize(&mut buf), 0);
}

// ═══════════════════════════════════════════════════════════════════════════
// GET_REPORT / Descriptor Tests
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn get_report_selects_by_id() {
    let mut reports = LastReports::new();
    reports.record(&HidReport::Keyboard(KeyboardReport {
        modifier: 0,
        keycode: 0x05,
    }));
    reports.record(&HidReport::Mouse(MouseReport {
        x: 10,
        y: 20,
        buttons: 1,
    }));

    let mut buf = [0u8; MAX_REPORT_SIZE];
    assert_eq!(answer_get_report(1, &reports, &mut buf), 3);
    assert_eq!(&buf[..3], &[1, 0, 0x05]);

    assert_eq!(answer_get_report(2, &reports, &mut buf), 6);
    assert_eq!(buf, [2, 10, 0, 20, 0, 1]);
}

#[test]
fn get_report_unknown_id_is_zero_length() {
    let reports = LastReports::new();
    let mut buf = [0xAAu8; MAX_REPORT_SIZE];
    assert_eq!(answer_get_report(0, &reports, &mut buf), 0);
    assert_eq!(answer_get_report(3, &reports, &mut buf), 0);
    assert_eq!(buf, [0xAA; MAX_REPORT_SIZE]);
}

#[test]
fn initial_last_reports_are_idle() {
    let reports = LastReports::new();
    assert!(reports.keyboard.is_released());
    assert!(reports.mouse.is_null());
}

#[test]
fn hid_report_kind() {
    assert_eq!(
        HidReport::Keyboard(KeyboardReport::released()).kind(),
        ReportKind::Keyboard
    );
    assert_eq!(HidReport::Mouse(MouseReport::null()).kind(), ReportKind::Mouse);
}

#[test]
fn report_descriptor_layout() {
    assert_eq!(REPORT_DESCRIPTOR.len(), 82);
    // Report IDs as declared.
    assert_eq!(&REPORT_DESCRIPTOR[6..8], &[0x85, KEYBOARD_REPORT_ID]);
    assert!(REPORT_DESCRIPTOR
        .windows(2)
        .any(|w| w == [0x85, MOUSE_REPORT_ID]));
    // X/Y carry the Null State flag.
    assert!(REPORT_DESCRIPTOR.windows(2).any(|w| w == [0x81, 0x42]));
    assert_eq!(*REPORT_DESCRIPTOR.last().unwrap(), 0xC0);
}
