//! Scheduler time base.
//!
//! The loop never measures time by counting iterations; it only counts
//! ticks. A tick is reported once per timer period, on exactly one loop
//! iteration.

/// Source of the "timer overflowed" event.
pub trait TickSource {
    /// Read and clear the overflow indication.
    ///
    /// Call exactly once per loop iteration: calling twice can drop a tick.
    fn poll_tick(&mut self) -> bool;
}

/// Overflow flag emulated on top of a free-running microsecond clock.
///
/// Behaves like a single hardware flag bit: if several periods elapse
/// between two polls, they collapse into one tick and the phase is
/// re-anchored on the poll that observed them.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PeriodicTick {
    period_us: u64,
    next_us: u64,
}

impl PeriodicTick {
    /// Start ticking one `period_us` after `now_us`.
    pub const fn new(now_us: u64, period_us: u64) -> Self {
        Self {
            period_us,
            next_us: now_us + period_us,
        }
    }

    /// Report whether a period boundary has passed since the last tick.
    pub fn poll_at(&mut self, now_us: u64) -> bool {
        if now_us < self.next_us {
            return false;
        }
        self.next_us += self.period_us;
        if self.next_us <= now_us {
            // Missed boundaries are not queued.
            self.next_us = now_us + self.period_us;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_once_per_period() {
        let mut tick = PeriodicTick::new(0, 1365);
        assert!(!tick.poll_at(0));
        assert!(!tick.poll_at(1364));
        assert!(tick.poll_at(1365));
        assert!(!tick.poll_at(1365));
        assert!(!tick.poll_at(2729));
        assert!(tick.poll_at(2730));
    }

    #[test]
    fn phase_is_kept_when_polled_late_within_a_period() {
        let mut tick = PeriodicTick::new(0, 1000);
        assert!(tick.poll_at(1400));
        // Next boundary is still 2000, not 2400.
        assert!(tick.poll_at(2000));
    }

    #[test]
    fn missed_periods_collapse_into_one_tick() {
        let mut tick = PeriodicTick::new(0, 1000);
        assert!(tick.poll_at(10_500));
        assert!(!tick.poll_at(10_600));
        assert!(!tick.poll_at(11_499));
        assert!(tick.poll_at(11_500));
    }

    #[test]
    fn tick_count_tracks_elapsed_time_not_poll_count() {
        let mut tick = PeriodicTick::new(0, 1365);
        let mut ticks = 0;
        // Uneven iteration times, as when USB work varies.
        let mut now = 0;
        for i in 0..10_000u64 {
            now += 50 + (i % 7) * 30;
            if tick.poll_at(now) {
                ticks += 1;
            }
        }
        assert_eq!(ticks, now / 1365);
    }
}
