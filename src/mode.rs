//! Mode selection from the switch, and the work tied to switch edges.

use crate::buttons::{Button, ButtonSet};
use crate::menu::{MenuEngine, MenuInput};
use crate::sensor::{SensorEngine, SensorPoll};

/// Operating mode, recomputed every iteration from the switch level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Switch held: magnetometer drives the absolute pointer.
    Mouse,
    /// Switch released: the menu types at the host.
    KeyboardMenu,
}

impl Mode {
    pub fn of(buttons: &ButtonSet) -> Self {
        if buttons.is_down(Button::Switch) {
            Mode::Mouse
        } else {
            Mode::KeyboardMenu
        }
    }
}

/// Start or stop continuous reading on switch edges.
///
/// Leaving mouse mode also sends the menu back to its root.
pub fn handle_switch_edges<S, K>(
    buttons: &ButtonSet,
    poll: &mut SensorPoll,
    sensor: &mut S,
    menu: &mut K,
) where
    S: SensorEngine,
    K: MenuEngine,
{
    if buttons.on_key_up(Button::Switch) {
        info!("mode: keyboard menu");
        poll.stop(sensor);
        menu.reset_to_root();
    } else if buttons.on_key_down(Button::Switch) {
        info!("mode: mouse");
        poll.start(sensor);
    }
}

/// Menu input for this iteration: action button press edges plus the
/// sensor snapshot.
pub fn menu_input<S: SensorEngine>(buttons: &ButtonSet, sensor: &S, link_ok: bool) -> MenuInput {
    MenuInput {
        next: buttons.on_key_down(Button::Button1),
        prev: buttons.on_key_down(Button::Button2),
        confirm: buttons.on_key_down(Button::Button3),
        sample: sensor.latest_sample(),
        link_ok,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buttons::RawLevels;
    use crate::hid::KeyboardReport;
    use crate::sensor::{MagSample, ReadStatus};

    #[derive(Default)]
    struct CountingSensor {
        starts: usize,
        stops: usize,
    }

    impl SensorEngine for CountingSensor {
        fn start_continuous_reading(&mut self) {
            self.starts += 1;
        }
        fn stop_continuous_reading(&mut self) {
            self.stops += 1;
        }
        fn read_data_step(&mut self) -> ReadStatus {
            ReadStatus::Done
        }
        fn last_transaction_ok(&self) -> bool {
            true
        }
        fn latest_sample(&self) -> Option<MagSample> {
            Some(MagSample { x: 1, y: 2, z: 3 })
        }
        fn take_new_sample(&mut self) -> Option<MagSample> {
            None
        }
    }

    #[derive(Default)]
    struct CountingMenu {
        resets: usize,
    }

    impl MenuEngine for CountingMenu {
        fn step(&mut self, _input: &MenuInput) {}
        fn has_pending_character(&self) -> bool {
            false
        }
        fn next_keyboard_report(&mut self) -> KeyboardReport {
            KeyboardReport::released()
        }
        fn reset_to_root(&mut self) {
            self.resets += 1;
        }
    }

    #[test]
    fn mode_follows_switch_level() {
        let held = ButtonSet::new(RawLevels::pressed(&[Button::Switch]));
        assert_eq!(Mode::of(&held), Mode::Mouse);
        let released = ButtonSet::new(RawLevels::IDLE);
        assert_eq!(Mode::of(&released), Mode::KeyboardMenu);
    }

    #[test]
    fn press_starts_release_stops_and_resets() {
        let mut buttons = ButtonSet::new(RawLevels::IDLE);
        let mut poll = SensorPoll::new();
        let mut sensor = CountingSensor::default();
        let mut menu = CountingMenu::default();

        buttons.update(RawLevels::pressed(&[Button::Switch]));
        handle_switch_edges(&buttons, &mut poll, &mut sensor, &mut menu);
        assert_eq!((sensor.starts, sensor.stops, menu.resets), (1, 0, 0));
        assert!(poll.continuous_reading());

        buttons.update(RawLevels::pressed(&[Button::Switch]));
        handle_switch_edges(&buttons, &mut poll, &mut sensor, &mut menu);
        assert_eq!((sensor.starts, sensor.stops, menu.resets), (1, 0, 0));

        buttons.update(RawLevels::IDLE);
        handle_switch_edges(&buttons, &mut poll, &mut sensor, &mut menu);
        assert_eq!((sensor.starts, sensor.stops, menu.resets), (1, 1, 1));
        assert!(!poll.continuous_reading());
    }

    #[test]
    fn menu_input_uses_press_edges_only() {
        let mut buttons = ButtonSet::new(RawLevels::IDLE);
        let sensor = CountingSensor::default();

        buttons.update(RawLevels::pressed(&[Button::Button1, Button::Button3]));
        let input = menu_input(&buttons, &sensor, false);
        assert!(input.next && input.confirm && !input.prev);
        assert!(!input.link_ok);
        assert_eq!(input.sample, Some(MagSample { x: 1, y: 2, z: 3 }));

        buttons.update(RawLevels::pressed(&[Button::Button1, Button::Button3]));
        let input = menu_input(&buttons, &sensor, true);
        assert!(!input.next && !input.confirm);
    }
}
