//! Board-level collaborators the scheduler drives directly.

use crate::buttons::ButtonPins;
use crate::tick::TickSource;

/// Hardware watchdog handle.
pub trait Watchdog {
    /// Restart the watchdog countdown. Called once per loop iteration.
    fn service(&mut self);
}

/// Status LEDs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Indicator {
    /// Red: last sensor bus transaction failed.
    LinkError,
    /// Yellow: on from power-up.
    Busy,
    /// Green: initialization finished.
    Ready,
}

pub trait Indicators {
    fn set_indicator(&mut self, indicator: Indicator, on: bool);
}

/// Everything on the board the scheduler needs besides the engines.
pub trait Board: TickSource + Watchdog + ButtonPins + Indicators {}

impl<T: TickSource + Watchdog + ButtonPins + Indicators> Board for T {}
