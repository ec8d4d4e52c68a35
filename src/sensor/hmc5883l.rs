//! Honeywell HMC5883L 3-axis magnetometer over I²C.
//!
//! Configured for 75 Hz output. Each `read_data_step` call performs at
//! most one short bus transaction:
//!
//! ```text
//!   Status ──(RDY clear)──▶ Done
//!   Status ──(RDY set)────▶ Data (InProgress)
//!   Data   ──(6 bytes)────▶ Status (Done, new sample)
//!   any    ──(bus error)──▶ Status (Error)
//! ```

use embedded_hal::i2c::I2c;

use super::{MagSample, ReadStatus, SensorEngine};
use crate::config::SENSOR_I2C_ADDRESS;
use crate::error::{Error, Result};

// ============================================================================
// Registers
// ============================================================================
const REG_CONFIG_A: u8 = 0x00;
const REG_CONFIG_B: u8 = 0x01;
const REG_MODE: u8 = 0x02;
const REG_DATA_X_MSB: u8 = 0x03;
const REG_STATUS: u8 = 0x09;
const REG_ID_A: u8 = 0x0A;

// ============================================================================
// Values
// ============================================================================
/// 1 sample averaged, 75 Hz output, normal measurement.
const CONFIG_A_75HZ: u8 = 0b0_00_110_00;
/// Gain 1090 LSB/Gauss (±1.3 Ga).
const CONFIG_B_DEFAULT_GAIN: u8 = 0x20;
const MODE_CONTINUOUS: u8 = 0x00;
const MODE_IDLE: u8 = 0x03;
const STATUS_RDY: u8 = 0x01;
const IDENTIFICATION: [u8; 3] = *b"H43";

/// Value an axis reads when the ADC saturates.
pub const OVERFLOW: i16 = -4096;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum Phase {
    Status,
    Data,
}

pub struct Hmc5883l<I2C> {
    i2c: I2C,
    address: u8,
    phase: Phase,
    last_ok: bool,
    latest: Option<MagSample>,
    fresh: bool,
}

impl<I2C: I2c> Hmc5883l<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, SENSOR_I2C_ADDRESS)
    }

    pub fn with_address(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            phase: Phase::Status,
            last_ok: true,
            latest: None,
            fresh: false,
        }
    }

    /// Verify the chip identity and load the measurement configuration.
    ///
    /// Leaves the sensor idle; continuous mode starts with the switch.
    pub fn configure(&mut self) -> Result<()> {
        let mut id = [0u8; 3];
        self.read_regs(REG_ID_A, &mut id)?;
        if id != IDENTIFICATION {
            error!("HMC5883L: unexpected id {:x}", id);
            return Err(Error::SensorNotFound);
        }

        self.write_reg(REG_CONFIG_A, CONFIG_A_75HZ)?;
        self.write_reg(REG_CONFIG_B, CONFIG_B_DEFAULT_GAIN)?;
        self.write_reg(REG_MODE, MODE_IDLE)?;
        info!("HMC5883L configured: 75 Hz, idle");
        Ok(())
    }

    pub fn release(self) -> I2C {
        self.i2c
    }

    fn write_reg(&mut self, reg: u8, value: u8) -> Result<()> {
        let result = self.i2c.write(self.address, &[reg, value]);
        self.track(result)
    }

    fn read_regs(&mut self, start: u8, buf: &mut [u8]) -> Result<()> {
        let result = self.i2c.write_read(self.address, &[start], buf);
        self.track(result)
    }

    fn track<E>(&mut self, result: core::result::Result<(), E>) -> Result<()> {
        let ok = result.is_ok();
        if ok != self.last_ok {
            if ok {
                info!("HMC5883L: bus recovered");
            } else {
                warn!("HMC5883L: bus error");
            }
        }
        self.last_ok = ok;
        result.map_err(|_| Error::I2c)
    }

    fn set_mode(&mut self, mode: u8) {
        // A failed mode write shows up through last_transaction_ok.
        let _ = self.write_reg(REG_MODE, mode);
    }
}

impl<I2C: I2c> SensorEngine for Hmc5883l<I2C> {
    fn start_continuous_reading(&mut self) {
        self.phase = Phase::Status;
        self.fresh = false;
        self.set_mode(MODE_CONTINUOUS);
    }

    fn stop_continuous_reading(&mut self) {
        // An unsent sample belongs to the session that just ended.
        self.phase = Phase::Status;
        self.fresh = false;
        self.set_mode(MODE_IDLE);
    }

    fn read_data_step(&mut self) -> ReadStatus {
        match self.phase {
            Phase::Status => {
                let mut status = [0u8; 1];
                if self.read_regs(REG_STATUS, &mut status).is_err() {
                    return ReadStatus::Error;
                }
                if status[0] & STATUS_RDY == 0 {
                    return ReadStatus::Done;
                }
                self.phase = Phase::Data;
                ReadStatus::InProgress
            }
            Phase::Data => {
                self.phase = Phase::Status;
                let mut raw = [0u8; 6];
                if self.read_regs(REG_DATA_X_MSB, &mut raw).is_err() {
                    return ReadStatus::Error;
                }
                // Register order is X, Z, Y.
                let sample = MagSample {
                    x: i16::from_be_bytes([raw[0], raw[1]]),
                    z: i16::from_be_bytes([raw[2], raw[3]]),
                    y: i16::from_be_bytes([raw[4], raw[5]]),
                };
                trace!("HMC5883L sample {} {} {}", sample.x, sample.y, sample.z);
                self.latest = Some(sample);
                self.fresh = true;
                ReadStatus::Done
            }
        }
    }

    fn last_transaction_ok(&self) -> bool {
        self.last_ok
    }

    fn latest_sample(&self) -> Option<MagSample> {
        self.latest
    }

    fn take_new_sample(&mut self) -> Option<MagSample> {
        if core::mem::take(&mut self.fresh) {
            self.latest
        } else {
            None
        }
    }
}
