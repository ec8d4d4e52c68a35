//! Absolute pointer emulation (switch held).

use core::cell::Cell;

use crate::hid::mouse::BUTTON_MASK;
use crate::hid::MouseReport;
use crate::sensor::MagSample;
use crate::settings::Calibration;

/// Contract the report multiplexer relies on.
pub trait MouseEngine {
    /// Fold in the latest inputs. Returns `true` if a new report is ready.
    fn prepare_next_report(&mut self, sample: Option<MagSample>, buttons: u8) -> bool;

    fn current_report(&self) -> MouseReport;
}

/// Maps magnetometer samples through the shared calibration.
pub struct AbsoluteMouse<'a> {
    calibration: &'a Cell<Calibration>,
    report: MouseReport,
}

impl<'a> AbsoluteMouse<'a> {
    pub fn new(calibration: &'a Cell<Calibration>) -> Self {
        Self {
            calibration,
            report: MouseReport::null(),
        }
    }
}

impl MouseEngine for AbsoluteMouse<'_> {
    fn prepare_next_report(&mut self, sample: Option<MagSample>, buttons: u8) -> bool {
        let buttons = buttons & BUTTON_MASK;
        let mut ready = false;

        if let Some(sample) = sample {
            let (x, y) = self.calibration.get().map(sample);
            self.report.x = x;
            self.report.y = y;
            ready = true;
        }
        if buttons != self.report.buttons {
            self.report.buttons = buttons;
            ready = true;
        }
        ready
    }

    fn current_report(&self) -> MouseReport {
        self.report
    }
}

/// Mouse emulation compiled out.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoMouse;

impl MouseEngine for NoMouse {
    fn prepare_next_report(&mut self, _sample: Option<MagSample>, _buttons: u8) -> bool {
        false
    }

    fn current_report(&self) -> MouseReport {
        MouseReport::null()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hid::mouse::MAX_COORDINATE;

    #[test]
    fn nothing_new_means_not_ready() {
        let cal = Cell::new(Calibration::DEFAULT);
        let mut mouse = AbsoluteMouse::new(&cal);
        assert!(!mouse.prepare_next_report(None, 0));
        assert!(mouse.current_report().is_null());
    }

    #[test]
    fn sample_moves_pointer() {
        let cal = Cell::new(Calibration::DEFAULT);
        let mut mouse = AbsoluteMouse::new(&cal);
        assert!(mouse.prepare_next_report(Some(MagSample { x: 600, y: -600, z: 9 }), 0));
        let report = mouse.current_report();
        assert_eq!((report.x, report.y), (MAX_COORDINATE, 0));
    }

    #[test]
    fn button_change_alone_is_ready() {
        let cal = Cell::new(Calibration::DEFAULT);
        let mut mouse = AbsoluteMouse::new(&cal);
        assert!(mouse.prepare_next_report(None, 0b010));
        assert_eq!(mouse.current_report().buttons, 0b010);
        assert!(!mouse.prepare_next_report(None, 0b010));
        assert!(mouse.prepare_next_report(None, 0));
    }

    #[test]
    fn calibration_updates_are_picked_up() {
        let cal = Cell::new(Calibration::DEFAULT);
        let mut mouse = AbsoluteMouse::new(&cal);
        let sample = MagSample { x: 100, y: 100, z: 0 };
        mouse.prepare_next_report(Some(sample), 0);
        let before = mouse.current_report();

        cal.set(Calibration {
            x_min: 0,
            x_max: 100,
            y_min: 0,
            y_max: 100,
        });
        mouse.prepare_next_report(Some(sample), 0);
        assert_ne!(mouse.current_report(), before);
        assert_eq!(mouse.current_report().x, MAX_COORDINATE);
    }

    #[test]
    fn no_mouse_never_reports() {
        let mut mouse = NoMouse;
        assert!(!mouse.prepare_next_report(Some(MagSample::default()), 0b111));
    }
}
