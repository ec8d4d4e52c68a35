//! Configuration menu typed at the host through the keyboard report
//! (switch released).
//!
//! The menu never draws anything: every navigation step types a line of
//! text into whatever window has focus on the host.
//!
//! ## Buttons
//!
//! - Button 1: next item
//! - Button 2: previous item
//! - Button 3: confirm

pub mod input_logic;

use core::cell::Cell;
use core::fmt::Write;

use crate::config::MENU_TEXT_CAPACITY;
use crate::error::Error;
use crate::hid::keyboard::TextOutput;
use crate::hid::KeyboardReport;
use crate::sensor::MagSample;
use crate::settings::{ByteStore, Calibration, SettingsWriter};

/// Per-iteration input for the menu: press edges plus the sensor snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MenuInput {
    pub next: bool,
    pub prev: bool,
    pub confirm: bool,
    pub sample: Option<MagSample>,
    pub link_ok: bool,
}

/// Contract the scheduler relies on.
pub trait MenuEngine {
    /// Advance the UI by one non-blocking step.
    fn step(&mut self, input: &MenuInput);

    fn has_pending_character(&self) -> bool;

    /// Next keyboard report to send; only meaningful while
    /// [`has_pending_character`](Self::has_pending_character) is true.
    fn next_keyboard_report(&mut self) -> KeyboardReport;

    /// Return to the first item and re-announce the menu.
    fn reset_to_root(&mut self);
}

/// Root menu entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuItem {
    Reading,
    Link,
    SetMin,
    SetMax,
    Save,
}

impl MenuItem {
    pub const ALL: [MenuItem; 5] = [
        MenuItem::Reading,
        MenuItem::Link,
        MenuItem::SetMin,
        MenuItem::SetMax,
        MenuItem::Save,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuItem::Reading => "sensor reading",
            MenuItem::Link => "i2c status",
            MenuItem::SetMin => "set min corner",
            MenuItem::SetMax => "set max corner",
            MenuItem::Save => "save settings",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum MenuState {
    /// Banner not typed yet.
    Root,
    Browsing,
}

pub struct Menu<'a, B> {
    output: TextOutput<MENU_TEXT_CAPACITY>,
    state: MenuState,
    selected: usize,
    calibration: &'a Cell<Calibration>,
    writer: SettingsWriter<B>,
    saving: bool,
}

impl<'a, B: ByteStore> Menu<'a, B> {
    pub fn new(calibration: &'a Cell<Calibration>, writer: SettingsWriter<B>) -> Self {
        Self {
            output: TextOutput::new(),
            state: MenuState::Root,
            selected: 0,
            calibration,
            writer,
            saving: false,
        }
    }

    pub fn selected(&self) -> MenuItem {
        MenuItem::ALL[self.selected]
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    fn show_selected(&mut self) {
        let _ = write!(self.output, "\n> {}", self.selected().label());
    }

    fn confirm(&mut self, input: &MenuInput) {
        let item = self.selected();
        debug!("menu: confirm {}", item);
        match item {
            MenuItem::Reading => match input.sample {
                Some(s) => {
                    let _ = write!(self.output, ": x={} y={} z={}", s.x, s.y, s.z);
                }
                None => {
                    let _ = self.output.write_str(": no data");
                }
            },
            MenuItem::Link => {
                let status = if input.link_ok { ": ok" } else { ": error" };
                let _ = self.output.write_str(status);
            }
            MenuItem::SetMin | MenuItem::SetMax => {
                let Some(sample) = input.sample else {
                    let _ = self.output.write_str(": no data");
                    return;
                };
                let mut cal = self.calibration.get();
                if item == MenuItem::SetMin {
                    cal.set_min_corner(sample);
                } else {
                    cal.set_max_corner(sample);
                }
                self.calibration.set(cal);
                let _ = write!(self.output, ": x={} y={}", sample.x, sample.y);
            }
            MenuItem::Save => match self.writer.start_save(&self.calibration.get()) {
                Ok(()) => {
                    self.saving = true;
                    let _ = self.output.write_str(": saving");
                }
                Err(Error::StorageBusy) => {
                    let _ = self.output.write_str(": busy");
                }
                Err(_) => {
                    let _ = self.output.write_str(": failed");
                }
            },
        }
    }

    fn finish_save(&mut self) {
        if !self.saving || self.writer.is_busy() {
            return;
        }
        self.saving = false;
        let outcome = match self.writer.last_result() {
            Ok(()) => " done",
            Err(_) => " failed",
        };
        let _ = self.output.write_str(outcome);
    }
}

impl<B: ByteStore> MenuEngine for Menu<'_, B> {
    fn step(&mut self, input: &MenuInput) {
        self.writer.step();
        self.finish_save();

        // Input is taken only once the previous line has been typed.
        if self.output.has_pending() {
            return;
        }

        match self.state {
            MenuState::Root => {
                let _ = self.output.write_str("\nmagmouse menu");
                self.show_selected();
                self.state = MenuState::Browsing;
            }
            MenuState::Browsing => {
                let count = MenuItem::ALL.len();
                if input.confirm {
                    self.confirm(input);
                } else if input.next {
                    self.selected = input_logic::select_next(self.selected, count);
                    self.show_selected();
                } else if input.prev {
                    self.selected = input_logic::select_prev(self.selected, count);
                    self.show_selected();
                }
            }
        }
    }

    fn has_pending_character(&self) -> bool {
        self.output.has_pending()
    }

    fn next_keyboard_report(&mut self) -> KeyboardReport {
        self.output.next_report()
    }

    fn reset_to_root(&mut self) {
        self.output.clear();
        self.selected = 0;
        self.state = MenuState::Root;
    }
}

/// Menu compiled out.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoMenu;

impl MenuEngine for NoMenu {
    fn step(&mut self, _input: &MenuInput) {}

    fn has_pending_character(&self) -> bool {
        false
    }

    fn next_keyboard_report(&mut self) -> KeyboardReport {
        KeyboardReport::released()
    }

    fn reset_to_root(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::tests::MemStore;
    use crate::settings::{self, IMAGE_SIZE};

    /// Decode everything the menu types back into text.
    fn drain<M: MenuEngine>(menu: &mut M) -> heapless::String<256> {
        let mut text = heapless::String::new();
        while menu.has_pending_character() {
            let report = menu.next_keyboard_report();
            if report.is_released() {
                continue;
            }
            let c = (0u8..=127)
                .map(char::from)
                .find(|c| KeyboardReport::from_char(*c) == Some(report))
                .unwrap();
            text.push(c).unwrap();
        }
        text
    }

    fn press(next: bool, prev: bool, confirm: bool) -> MenuInput {
        MenuInput {
            next,
            prev,
            confirm,
            sample: Some(MagSample { x: -42, y: 17, z: 5 }),
            link_ok: true,
        }
    }

    fn idle() -> MenuInput {
        press(false, false, false)
    }

    #[test]
    fn first_step_types_banner() {
        let cal = Cell::new(Calibration::DEFAULT);
        let mut menu = Menu::new(&cal, SettingsWriter::new(MemStore::blank()));
        assert!(!menu.has_pending_character());
        menu.step(&idle());
        assert_eq!(drain(&mut menu).as_str(), "\nmagmouse menu\n> sensor reading");
    }

    #[test]
    fn navigation_wraps() {
        let cal = Cell::new(Calibration::DEFAULT);
        let mut menu = Menu::new(&cal, SettingsWriter::new(MemStore::blank()));
        menu.step(&idle());
        drain(&mut menu);

        menu.step(&press(false, true, false));
        assert_eq!(menu.selected(), MenuItem::Save);
        assert_eq!(drain(&mut menu).as_str(), "\n> save settings");

        menu.step(&press(true, false, false));
        assert_eq!(menu.selected(), MenuItem::Reading);
    }

    #[test]
    fn input_ignored_while_typing() {
        let cal = Cell::new(Calibration::DEFAULT);
        let mut menu = Menu::new(&cal, SettingsWriter::new(MemStore::blank()));
        menu.step(&idle());
        menu.step(&press(true, false, false));
        assert_eq!(menu.selected(), MenuItem::Reading);
    }

    #[test]
    fn confirm_reading_and_link() {
        let cal = Cell::new(Calibration::DEFAULT);
        let mut menu = Menu::new(&cal, SettingsWriter::new(MemStore::blank()));
        menu.step(&idle());
        drain(&mut menu);

        menu.step(&press(false, false, true));
        assert_eq!(drain(&mut menu).as_str(), ": x=-42 y=17 z=5");

        menu.step(&press(true, false, false));
        drain(&mut menu);
        let mut broken = press(false, false, true);
        broken.link_ok = false;
        menu.step(&broken);
        assert_eq!(drain(&mut menu).as_str(), ": error");
    }

    #[test]
    fn reading_without_sample() {
        let cal = Cell::new(Calibration::DEFAULT);
        let mut menu = Menu::new(&cal, SettingsWriter::new(MemStore::blank()));
        menu.step(&idle());
        drain(&mut menu);
        let mut input = press(false, false, true);
        input.sample = None;
        menu.step(&input);
        assert_eq!(drain(&mut menu).as_str(), ": no data");
    }

    #[test]
    fn capture_corners_and_save() {
        let cal = Cell::new(Calibration::DEFAULT);
        let mut menu = Menu::new(&cal, SettingsWriter::new(MemStore::blank()));
        menu.step(&idle());
        drain(&mut menu);

        // SetMin is the third item.
        for _ in 0..2 {
            menu.step(&press(true, false, false));
            drain(&mut menu);
        }
        assert_eq!(menu.selected(), MenuItem::SetMin);
        menu.step(&press(false, false, true));
        assert_eq!(drain(&mut menu).as_str(), ": x=-42 y=17");
        assert_eq!(cal.get().x_min, -42);
        assert_eq!(cal.get().y_min, 17);

        // Save.
        for _ in 0..2 {
            menu.step(&press(true, false, false));
            drain(&mut menu);
        }
        assert_eq!(menu.selected(), MenuItem::Save);
        menu.step(&press(false, false, true));
        assert!(menu.is_saving());
        assert_eq!(drain(&mut menu).as_str(), ": saving");

        for _ in 0..IMAGE_SIZE {
            menu.step(&idle());
        }
        assert!(!menu.is_saving());
        assert_eq!(drain(&mut menu).as_str(), " done");
        assert_eq!(settings::load(menu.writer.store_mut()), cal.get());
    }

    #[test]
    fn reset_returns_to_root_mid_navigation() {
        let cal = Cell::new(Calibration::DEFAULT);
        let mut menu = Menu::new(&cal, SettingsWriter::new(MemStore::blank()));
        menu.step(&idle());
        drain(&mut menu);
        menu.step(&press(true, false, false));
        assert_eq!(menu.selected(), MenuItem::Link);

        menu.reset_to_root();
        assert!(!menu.has_pending_character());
        assert_eq!(menu.selected(), MenuItem::Reading);
        menu.step(&idle());
        assert_eq!(drain(&mut menu).as_str(), "\nmagmouse menu\n> sensor reading");
    }

    #[test]
    fn selection_helpers_wrap() {
        assert_eq!(input_logic::select_prev(0, 5), 4);
        assert_eq!(input_logic::select_prev(3, 5), 2);
        assert_eq!(input_logic::select_next(4, 5), 0);
        assert_eq!(input_logic::select_next(0, 5), 1);
        assert_eq!(input_logic::select_prev(0, 0), 0);
        assert_eq!(input_logic::select_next(0, 0), 0);
    }
}
