//! Report multiplexer: at most one report per transmit opportunity.
//!
//! Priority, first match wins:
//!
//! 1. a pending keyboard character from the menu
//! 2. in mouse mode, a mouse report the mouse engine says is ready
//!
//! Otherwise nothing is sent and the endpoint stays ready.

use crate::hid::{HidReport, ReportKind};
use crate::menu::MenuEngine;
use crate::mode::Mode;
use crate::mouse::MouseEngine;
use crate::sensor::SensorEngine;
use crate::usb::UsbEngine;

/// Send the highest-priority pending report, if any.
///
/// The caller has checked [`UsbEngine::transmit_ready`]. A new sensor
/// sample is only consumed on the mouse branch, so it stays pending while
/// keyboard output takes precedence.
pub fn send_next_report<U, K, M, S>(
    usb: &mut U,
    mode: Mode,
    menu: &mut K,
    mouse: &mut M,
    sensor: &mut S,
    buttons: u8,
) -> Option<ReportKind>
where
    U: UsbEngine,
    K: MenuEngine,
    M: MouseEngine,
    S: SensorEngine,
{
    if menu.has_pending_character() {
        let report = HidReport::Keyboard(menu.next_keyboard_report());
        usb.transmit(&report);
        return Some(ReportKind::Keyboard);
    }

    if mode == Mode::Mouse && mouse.prepare_next_report(sensor.take_new_sample(), buttons) {
        let report = HidReport::Mouse(mouse.current_report());
        usb.transmit(&report);
        return Some(ReportKind::Mouse);
    }

    None
}
