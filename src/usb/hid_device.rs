//! USB HID device - keyboard (report 1) + absolute pointer (report 2).
//!
//! Initialises the Embassy USB stack on the nRF52840 USBD peripheral with
//! a single HID interface. The device future is not spawned on an
//! executor: the scheduler drives it by polling it once per iteration.

use core::cell::Cell;
use core::future::Future;
use core::pin::Pin;

use defmt::{debug, info, warn};
use embassy_futures::join::join;
use embassy_futures::poll_once;
use embassy_nrf::usb::vbus_detect::HardwareVbusDetect;
use embassy_nrf::usb::Driver;
use embassy_nrf::{self, bind_interrupts, peripherals};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::Channel;
use embassy_usb::class::hid::{Config as HidConfig, HidWriter, ReportId, RequestHandler, State};
use embassy_usb::{Builder, Config, Handler, UsbDevice};
use magmouse::config;
use magmouse::hid::{answer_get_report, HidReport, LastReports, MAX_REPORT_SIZE, REPORT_DESCRIPTOR};
use magmouse::usb::{EndpointGate, UsbEngine};
use static_cell::StaticCell;

bind_interrupts!(struct Irqs {
    USBD => embassy_nrf::usb::InterruptHandler<peripherals::USBD>;
    CLOCK_POWER => embassy_nrf::usb::vbus_detect::InterruptHandler;
});

pub type UsbDriver = Driver<'static, peripherals::USBD, HardwareVbusDetect>;
pub type ReportWriter = HidWriter<'static, UsbDriver, 8>;

static HID_STATE: StaticCell<State> = StaticCell::new();
static USB_CONFIG_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_BOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_MSOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_CTRL_BUF: StaticCell<[u8; 128]> = StaticCell::new();
static DEVICE_HANDLER: StaticCell<DeviceHandler> = StaticCell::new();
static REQUEST_HANDLER: StaticCell<ReportRequests> = StaticCell::new();

/// Report waiting for the IN endpoint. One slot: the scheduler only
/// queues while it is empty.
static OUTBOX: Channel<CriticalSectionRawMutex, HidReport, 1> = Channel::new();

/// Answer source for GET_REPORT, updated on every transmit.
static LAST_REPORTS: Mutex<CriticalSectionRawMutex, Cell<LastReports>> =
    Mutex::new(Cell::new(LastReports::new()));

/// IN endpoint readiness as the scheduler sees it.
static ENDPOINT: EndpointGate = EndpointGate::new();

struct DeviceHandler;

impl Handler for DeviceHandler {
    fn configured(&mut self, configured: bool) {
        if configured {
            info!("USB configured");
        } else {
            // Nothing queued before a bus reset is worth sending after it.
            while OUTBOX.try_receive().is_ok() {}
            info!("USB deconfigured");
        }
        ENDPOINT.set_configured(configured);
    }

    fn suspended(&mut self, suspended: bool) {
        ENDPOINT.set_suspended(suspended);
        debug!("USB suspended: {}", suspended);
    }
}

struct ReportRequests;

impl RequestHandler for ReportRequests {
    fn get_report(&mut self, id: ReportId, buf: &mut [u8]) -> Option<usize> {
        let written = match id {
            ReportId::In(id) => LAST_REPORTS.lock(|last| answer_get_report(id, &last.get(), buf)),
            // Unknown requests get a zero-length answer.
            _ => 0,
        };
        Some(written)
    }
}

/// Build result containing the USB device runner and the HID writer.
pub struct UsbHidDevice {
    pub device: UsbDevice<'static, UsbDriver>,
    pub writer: ReportWriter,
}

/// Initialise the USB stack and create the HID device.
///
/// Must be called exactly once.  All static buffers are consumed here.
pub fn init(usbd: peripherals::USBD) -> UsbHidDevice {
    let driver = Driver::new(usbd, Irqs, HardwareVbusDetect::new(Irqs));

    let mut usb_config = Config::new(config::USB_VID, config::USB_PID);
    usb_config.manufacturer = Some(config::USB_MANUFACTURER);
    usb_config.product = Some(config::USB_PRODUCT);
    usb_config.serial_number = Some(config::USB_SERIAL_NUMBER);
    usb_config.max_power = 100; // mA
    usb_config.max_packet_size_0 = 64;

    let mut builder = Builder::new(
        driver,
        usb_config,
        USB_CONFIG_DESC.init([0u8; 256]),
        USB_BOS_DESC.init([0u8; 256]),
        USB_MSOS_DESC.init([0u8; 256]),
        USB_CTRL_BUF.init([0u8; 128]),
    );
    builder.handler(DEVICE_HANDLER.init(DeviceHandler));

    let hid_config = HidConfig {
        report_descriptor: REPORT_DESCRIPTOR,
        request_handler: Some(REQUEST_HANDLER.init(ReportRequests)),
        poll_ms: config::USB_HID_POLL_MS,
        max_packet_size: 8,
    };
    let writer = HidWriter::new(&mut builder, HID_STATE.init(State::new()), hid_config);

    let device = builder.build();
    info!("USB HID device initialised (keyboard + absolute pointer)");

    UsbHidDevice { device, writer }
}

/// Device state machine plus the report pump, as one future.
pub async fn drive(mut device: UsbDevice<'static, UsbDriver>, mut writer: ReportWriter) {
    join(device.run(), pump(&mut writer)).await;
}

/// Move queued reports onto the interrupt IN endpoint.
async fn pump(writer: &mut ReportWriter) {
    let mut buf = [0u8; MAX_REPORT_SIZE];
    loop {
        let report = OUTBOX.receive().await;
        let n = report.serialize(&mut buf);
        if writer.write(&buf[..n]).await.is_err() {
            warn!("USB HID write failed");
        }
        ENDPOINT.release();
    }
}

/// [`UsbEngine`] over the pinned [`drive`] future.
pub struct UsbLink<'a, F: Future> {
    engine: Pin<&'a mut F>,
}

impl<'a, F: Future> UsbLink<'a, F> {
    pub fn new(engine: Pin<&'a mut F>) -> Self {
        Self { engine }
    }
}

impl<F: Future> UsbEngine for UsbLink<'_, F> {
    fn poll(&mut self) {
        // `drive` never completes.
        let _ = poll_once(self.engine.as_mut());
    }

    fn transmit_ready(&self) -> bool {
        ENDPOINT.is_ready()
    }

    fn transmit(&mut self, report: &HidReport) {
        if !ENDPOINT.claim() {
            warn!("USB endpoint busy, report dropped");
            return;
        }
        if OUTBOX.try_send(*report).is_err() {
            ENDPOINT.release();
            warn!("USB outbox full, report dropped");
            return;
        }
        LAST_REPORTS.lock(|last| {
            let mut reports = last.get();
            reports.record(report);
            last.set(reports);
        });
    }
}
