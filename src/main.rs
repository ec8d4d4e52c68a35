//! magmouse firmware for the nRF52840.
//!
//! One cooperative loop, no executor: the USB device future is polled from
//! the loop like every other collaborator, and the hardware watchdog
//! resets the chip if an iteration ever stalls.

#![no_std]
#![no_main]

mod hw;
mod storage;
#[path = "usb/hid_device.rs"]
mod usb_device;

use core::cell::Cell;
use core::pin::pin;

use defmt::{error, info};
use embassy_nrf::config::{Config as NrfConfig, HfclkSource};
use embassy_nrf::gpio::{Input, Level, Output, OutputDrive, Pull};
use embassy_nrf::nvmc::Nvmc;
use embassy_nrf::twim::{self, Twim};
use embassy_nrf::wdt::{self, Watchdog};
use embassy_nrf::{bind_interrupts, peripherals};
use magmouse::board::{Indicator, Indicators};
use magmouse::config::WATCHDOG_TIMEOUT_MS;
use magmouse::sensor::hmc5883l::Hmc5883l;
use magmouse::settings::{self, Calibration};
use magmouse::Scheduler;
use static_cell::StaticCell;
use storage::FlashStore;
use {defmt_rtt as _, panic_probe as _};

bind_interrupts!(struct Irqs {
    TWISPI0 => twim::InterruptHandler<peripherals::TWISPI0>;
});

/// Watchdog counter runs from the 32.768 kHz LFCLK.
const WDT_TICKS_PER_SECOND: u32 = 32_768;

static CALIBRATION: StaticCell<Cell<Calibration>> = StaticCell::new();

#[cfg(feature = "keyboard")]
type AppMenu = magmouse::menu::Menu<'static, FlashStore<'static>>;
#[cfg(not(feature = "keyboard"))]
type AppMenu = magmouse::menu::NoMenu;

#[cfg(feature = "mouse")]
type AppMouse = magmouse::mouse::AbsoluteMouse<'static>;
#[cfg(not(feature = "mouse"))]
type AppMouse = magmouse::mouse::NoMouse;

#[cfg(feature = "keyboard")]
fn build_menu(calibration: &'static Cell<Calibration>, flash: FlashStore<'static>) -> AppMenu {
    magmouse::menu::Menu::new(calibration, settings::SettingsWriter::new(flash))
}

#[cfg(not(feature = "keyboard"))]
fn build_menu(_calibration: &'static Cell<Calibration>, _flash: FlashStore<'static>) -> AppMenu {
    magmouse::menu::NoMenu
}

#[cfg(feature = "mouse")]
fn build_mouse(calibration: &'static Cell<Calibration>) -> AppMouse {
    magmouse::mouse::AbsoluteMouse::new(calibration)
}

#[cfg(not(feature = "mouse"))]
fn build_mouse(_calibration: &'static Cell<Calibration>) -> AppMouse {
    magmouse::mouse::NoMouse
}

#[cortex_m_rt::entry]
fn main() -> ! {
    info!("magmouse starting...");

    // USB needs the external crystal.
    let mut nrf_config = NrfConfig::default();
    nrf_config.hfclk_source = HfclkSource::ExternalXtal;
    let p = embassy_nrf::init(nrf_config);

    // ── LEDs ──────────────────────────────────────────────────────────
    let mut leds = hw::Leds {
        red: Output::new(p.P0_13, Level::High, OutputDrive::Standard),
        yellow: Output::new(p.P0_14, Level::High, OutputDrive::Standard),
        green: Output::new(p.P0_15, Level::High, OutputDrive::Standard),
    };
    leds.set_indicator(Indicator::Busy, true);

    // ── Watchdog ──────────────────────────────────────────────────────
    let mut wdt_config = wdt::Config::default();
    wdt_config.timeout_ticks = WDT_TICKS_PER_SECOND * WATCHDOG_TIMEOUT_MS / 1000;
    wdt_config.action_during_sleep = wdt::SleepConfig::RUN;
    wdt_config.action_during_debug_halt = wdt::HaltConfig::PAUSE;
    let (_wdt, [watchdog]) = match Watchdog::try_new(p.WDT, wdt_config) {
        Ok(wdt) => wdt,
        Err(_) => defmt::panic!("watchdog already running with a different config"),
    };
    info!("Watchdog armed: {} ms", WATCHDOG_TIMEOUT_MS);

    // ── Sensor ────────────────────────────────────────────────────────
    let mut i2c_config = twim::Config::default();
    i2c_config.frequency = twim::Frequency::K400;
    let i2c = Twim::new(p.TWISPI0, Irqs, p.P0_26, p.P0_27, i2c_config);
    let mut sensor = Hmc5883l::new(i2c);
    if let Err(e) = sensor.configure() {
        // Keep going: the red LED shows the link state and the menu
        // still works without a sensor.
        error!("Sensor init failed: {}", e);
    }

    // ── Settings ──────────────────────────────────────────────────────
    let mut flash = FlashStore::new(Nvmc::new(p.NVMC));
    let calibration: &'static Cell<Calibration> =
        CALIBRATION.init(Cell::new(settings::load(&mut flash)));

    // ── Buttons ───────────────────────────────────────────────────────
    let buttons = hw::Buttons {
        button1: Input::new(p.P0_11, Pull::Up),
        button2: Input::new(p.P0_12, Pull::Up),
        button3: Input::new(p.P0_24, Pull::Up),
        switch: Input::new(p.P0_25, Pull::Up),
    };

    // ── USB ───────────────────────────────────────────────────────────
    let usb = usb_device::init(p.USBD);
    let engine = pin!(usb_device::drive(usb.device, usb.writer));

    let board = hw::Nrf52Board::new(buttons, leds, watchdog);
    let mut scheduler = Scheduler::new(
        board,
        usb_device::UsbLink::new(engine),
        sensor,
        build_menu(calibration, flash),
        build_mouse(calibration),
    );

    info!("All subsystems initialised - entering main loop");
    scheduler.run()
}
