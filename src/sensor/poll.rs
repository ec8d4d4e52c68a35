//! Sensor poll pacing.
//!
//! Two states:
//!
//! ```text
//!   Idle ──(switch down: start, countdown = 0)──▶ Polling
//!   Polling ──(switch up: stop)──▶ Idle
//! ```
//!
//! While polling, the countdown only decreases on a tick. Once it is zero
//! the read step is invoked every iteration until it reports `Done` or
//! `Error`, at which point the countdown is reloaded. A slow read can
//! therefore span several iterations, while new read cycles start at most
//! once per reload interval.

use super::{ReadStatus, SensorEngine};
use crate::config::SENSOR_PROBE_INTERVAL_TICKS;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorPollState {
    Idle,
    Polling,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorPoll {
    continuous_reading: bool,
    probe_countdown: u8,
    interval: u8,
}

impl SensorPoll {
    pub const fn new() -> Self {
        Self::with_interval(SENSOR_PROBE_INTERVAL_TICKS)
    }

    pub const fn with_interval(interval: u8) -> Self {
        Self {
            continuous_reading: false,
            probe_countdown: 0,
            interval,
        }
    }

    pub fn state(&self) -> SensorPollState {
        if self.continuous_reading {
            SensorPollState::Polling
        } else {
            SensorPollState::Idle
        }
    }

    pub fn continuous_reading(&self) -> bool {
        self.continuous_reading
    }

    pub fn probe_countdown(&self) -> u8 {
        self.probe_countdown
    }

    /// Switch pressed: begin continuous reading.
    pub fn start<S: SensorEngine>(&mut self, sensor: &mut S) {
        sensor.start_continuous_reading();
        self.continuous_reading = true;
        self.probe_countdown = 0;
        debug!("sensor poll: start");
    }

    /// Switch released: end continuous reading.
    pub fn stop<S: SensorEngine>(&mut self, sensor: &mut S) {
        sensor.stop_continuous_reading();
        self.continuous_reading = false;
        debug!("sensor poll: stop");
    }

    /// Run once per loop iteration.
    ///
    /// Returns the read step outcome when a step was invoked.
    pub fn step<S: SensorEngine>(&mut self, tick: bool, sensor: &mut S) -> Option<ReadStatus> {
        if !self.continuous_reading {
            return None;
        }
        if tick && self.probe_countdown > 0 {
            self.probe_countdown -= 1;
        }
        if self.probe_countdown != 0 {
            return None;
        }

        let status = sensor.read_data_step();
        match status {
            ReadStatus::Done | ReadStatus::Error => self.probe_countdown = self.interval,
            ReadStatus::InProgress => {}
        }
        Some(status)
    }
}

impl Default for SensorPoll {
    fn default() -> Self {
        Self::new()
    }
}
