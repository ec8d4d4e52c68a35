//! nRF52840 bindings for the board-level traits.

use embassy_nrf::gpio::{Input, Output};
use embassy_nrf::wdt::WatchdogHandle;
use embassy_time::Instant;
use magmouse::board::{Indicator, Indicators, Watchdog};
use magmouse::buttons::{Button, ButtonPins, RawLevels};
use magmouse::config::TICK_PERIOD_US;
use magmouse::tick::{PeriodicTick, TickSource};

/// Button inputs, pulled up; pressed reads low.
pub struct Buttons {
    pub button1: Input<'static>,
    pub button2: Input<'static>,
    pub button3: Input<'static>,
    pub switch: Input<'static>,
}

/// Status LEDs (active low on the DK).
pub struct Leds {
    pub red: Output<'static>,
    pub yellow: Output<'static>,
    pub green: Output<'static>,
}

impl Indicators for Leds {
    fn set_indicator(&mut self, indicator: Indicator, on: bool) {
        let led = match indicator {
            Indicator::LinkError => &mut self.red,
            Indicator::Busy => &mut self.yellow,
            Indicator::Ready => &mut self.green,
        };
        if on {
            led.set_low();
        } else {
            led.set_high();
        }
    }
}

pub struct Nrf52Board {
    buttons: Buttons,
    leds: Leds,
    watchdog: WatchdogHandle,
    tick: PeriodicTick,
}

impl Nrf52Board {
    pub fn new(buttons: Buttons, leds: Leds, watchdog: WatchdogHandle) -> Self {
        Self {
            buttons,
            leds,
            watchdog,
            tick: PeriodicTick::new(Instant::now().as_micros(), TICK_PERIOD_US),
        }
    }
}

impl TickSource for Nrf52Board {
    fn poll_tick(&mut self) -> bool {
        self.tick.poll_at(Instant::now().as_micros())
    }
}

impl Watchdog for Nrf52Board {
    fn service(&mut self) {
        self.watchdog.pet();
    }
}

impl ButtonPins for Nrf52Board {
    fn read_levels(&mut self) -> RawLevels {
        let pins = [
            (&self.buttons.button1, Button::Button1),
            (&self.buttons.button2, Button::Button2),
            (&self.buttons.button3, Button::Button3),
            (&self.buttons.switch, Button::Switch),
        ];
        let levels = pins
            .iter()
            .filter(|(pin, _)| pin.is_high())
            .fold(0u8, |acc, (_, button)| acc | *button as u8);
        RawLevels(levels)
    }
}

impl Indicators for Nrf52Board {
    fn set_indicator(&mut self, indicator: Indicator, on: bool) {
        self.leds.set_indicator(indicator, on);
    }
}
