//! Magnetometer access.
//!
//! The scheduler only sees [`SensorEngine`]: a sensor whose reads are
//! split into short, non-blocking steps.

pub mod hmc5883l;
pub mod poll;

pub use poll::{SensorPoll, SensorPollState};

/// Outcome of one read step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadStatus {
    /// The read cycle needs more steps.
    InProgress,
    /// The read cycle finished (with or without new data).
    Done,
    /// A bus transaction failed; the cycle was abandoned.
    Error,
}

/// One magnetometer measurement, raw sensor counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MagSample {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

/// Contract the scheduler relies on.
pub trait SensorEngine {
    fn start_continuous_reading(&mut self);
    fn stop_continuous_reading(&mut self);

    /// Advance the current read cycle by one bounded step.
    fn read_data_step(&mut self) -> ReadStatus;

    /// Did the most recent bus transaction succeed?
    fn last_transaction_ok(&self) -> bool;

    /// Most recent sample, whether or not it was already consumed.
    fn latest_sample(&self) -> Option<MagSample>;

    /// Sample that arrived since the last call, if any.
    fn take_new_sample(&mut self) -> Option<MagSample>;
}
