//! USB device as seen by the scheduler.
//!
//! The nRF52840 implementation lives in `hid_device.rs` and is compiled
//! into the firmware binary only. It presents one HID interface with two
//! report IDs:
//!
//! - Report 1: keyboard (menu text)
//! - Report 2: absolute pointer

use core::sync::atomic::{AtomicBool, Ordering};

use crate::hid::HidReport;

/// Contract the scheduler relies on.
pub trait UsbEngine {
    /// Drive the device state machine. Must run every iteration.
    fn poll(&mut self);

    /// Can [`transmit`](Self::transmit) accept a report right now?
    fn transmit_ready(&self) -> bool;

    /// Queue one report on the interrupt IN endpoint.
    ///
    /// Only call after `transmit_ready` returned `true` in the same
    /// iteration.
    fn transmit(&mut self, report: &HidReport);
}

/// Readiness of the interrupt IN endpoint, shared between the loop and the
/// USB device future.
///
/// Ready means configured, not suspended, and no report between
/// [`claim`](Self::claim) and [`release`](Self::release). A queued report
/// counts as in flight until its endpoint write has returned.
pub struct EndpointGate {
    configured: AtomicBool,
    suspended: AtomicBool,
    in_flight: AtomicBool,
}

impl EndpointGate {
    pub const fn new() -> Self {
        Self {
            configured: AtomicBool::new(false),
            suspended: AtomicBool::new(false),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn set_configured(&self, configured: bool) {
        self.configured.store(configured, Ordering::Release);
        if !configured {
            self.in_flight.store(false, Ordering::Release);
        }
    }

    pub fn set_suspended(&self, suspended: bool) {
        self.suspended.store(suspended, Ordering::Release);
    }

    pub fn is_ready(&self) -> bool {
        self.configured.load(Ordering::Acquire)
            && !self.suspended.load(Ordering::Acquire)
            && !self.in_flight.load(Ordering::Acquire)
    }

    /// Mark a report as in flight. Returns `false` if the endpoint was not
    /// ready, in which case nothing changes.
    pub fn claim(&self) -> bool {
        if !self.configured.load(Ordering::Acquire) || self.suspended.load(Ordering::Acquire) {
            return false;
        }
        !self.in_flight.swap(true, Ordering::AcqRel)
    }

    /// The in-flight report has left (or failed to leave) the endpoint.
    pub fn release(&self) {
        self.in_flight.store(false, Ordering::Release);
    }
}

impl Default for EndpointGate {
    fn default() -> Self {
        Self::new()
    }
}
