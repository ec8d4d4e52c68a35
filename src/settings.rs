//! Persisted calibration and the non-blocking byte programmer that saves it.
//!
//! Storage layout (12 bytes):
//! ```text
//! [0]     magic 0xA5
//! [1]     layout version
//! [2..10] x_min, x_max, y_min, y_max (i16, little-endian)
//! [10]    checksum (wrapping sum of bytes 0..10)
//! [11]    padding
//! ```

use crate::error::{Error, Result};
use crate::sensor::hmc5883l::OVERFLOW;
use crate::sensor::MagSample;
use crate::hid::mouse::{MAX_COORDINATE, NULL_COORDINATE};

const MAGIC: u8 = 0xA5;
const VERSION: u8 = 1;

/// Size of the stored settings image.
pub const IMAGE_SIZE: usize = 12;

/// Sensor range mapped onto the full screen, per axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calibration {
    pub x_min: i16,
    pub x_max: i16,
    pub y_min: i16,
    pub y_max: i16,
}

impl Calibration {
    /// Roughly the earth's field at the default gain.
    pub const DEFAULT: Calibration = Calibration {
        x_min: -600,
        x_max: 600,
        y_min: -600,
        y_max: 600,
    };

    /// Map a sample onto absolute pointer coordinates.
    pub fn map(&self, sample: MagSample) -> (u16, u16) {
        (
            scale_axis(sample.x, self.x_min, self.x_max),
            scale_axis(sample.y, self.y_min, self.y_max),
        )
    }

    pub fn set_min_corner(&mut self, sample: MagSample) {
        self.x_min = sample.x;
        self.y_min = sample.y;
    }

    pub fn set_max_corner(&mut self, sample: MagSample) {
        self.x_max = sample.x;
        self.y_max = sample.y;
    }

    pub fn encode(&self) -> [u8; IMAGE_SIZE] {
        let mut image = [0u8; IMAGE_SIZE];
        image[0] = MAGIC;
        image[1] = VERSION;
        image[2..4].copy_from_slice(&self.x_min.to_le_bytes());
        image[4..6].copy_from_slice(&self.x_max.to_le_bytes());
        image[6..8].copy_from_slice(&self.y_min.to_le_bytes());
        image[8..10].copy_from_slice(&self.y_max.to_le_bytes());
        image[10] = checksum(&image[..10]);
        image
    }

    pub fn decode(image: &[u8]) -> Option<Self> {
        if image.len() < IMAGE_SIZE || image[0] != MAGIC || image[1] != VERSION {
            return None;
        }
        if image[10] != checksum(&image[..10]) {
            return None;
        }
        let word = |i: usize| i16::from_le_bytes([image[i], image[i + 1]]);
        Some(Self {
            x_min: word(2),
            x_max: word(4),
            y_min: word(6),
            y_max: word(8),
        })
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
}

fn scale_axis(value: i16, min: i16, max: i16) -> u16 {
    if value == OVERFLOW || max <= min {
        return NULL_COORDINATE;
    }
    let span = i32::from(max) - i32::from(min);
    let offset = i32::from(value.clamp(min, max)) - i32::from(min);
    (offset * i32::from(MAX_COORDINATE) / span) as u16
}

/// EEPROM-like byte-addressed non-volatile memory.
pub trait ByteStore {
    fn read_byte(&mut self, addr: usize) -> Result<u8>;
    fn write_byte(&mut self, addr: usize, value: u8) -> Result<()>;

    /// Prepare the region for a new image. EEPROMs need nothing here.
    fn erase(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Read the stored calibration, falling back to defaults.
pub fn load<B: ByteStore>(store: &mut B) -> Calibration {
    let mut image = [0u8; IMAGE_SIZE];
    for (addr, byte) in image.iter_mut().enumerate() {
        match store.read_byte(addr) {
            Ok(b) => *byte = b,
            Err(_) => {
                warn!("settings: read failed, using defaults");
                return Calibration::DEFAULT;
            }
        }
    }
    match Calibration::decode(&image) {
        Some(cal) => {
            info!("settings: calibration loaded");
            cal
        }
        None => {
            info!("settings: no valid image, using defaults");
            Calibration::DEFAULT
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WriterState {
    Idle,
    Writing { next: usize },
}

/// Programs a settings image one byte per `step()`.
pub struct SettingsWriter<B> {
    store: B,
    image: [u8; IMAGE_SIZE],
    state: WriterState,
    last_result: Result<()>,
}

impl<B: ByteStore> SettingsWriter<B> {
    pub fn new(store: B) -> Self {
        Self {
            store,
            image: [0; IMAGE_SIZE],
            state: WriterState::Idle,
            last_result: Ok(()),
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.state, WriterState::Writing { .. })
    }

    /// Outcome of the most recent save.
    pub fn last_result(&self) -> Result<()> {
        self.last_result
    }

    pub fn store_mut(&mut self) -> &mut B {
        &mut self.store
    }

    /// Snapshot `calibration` and begin programming it.
    pub fn start_save(&mut self, calibration: &Calibration) -> Result<()> {
        if self.is_busy() {
            return Err(Error::StorageBusy);
        }
        if let Err(e) = self.store.erase() {
            self.last_result = Err(e);
            return Err(e);
        }
        self.image = calibration.encode();
        self.state = WriterState::Writing { next: 0 };
        self.last_result = Ok(());
        debug!("settings: save started");
        Ok(())
    }

    /// Program the next byte. Does nothing when idle.
    pub fn step(&mut self) {
        let WriterState::Writing { next } = self.state else {
            return;
        };
        if let Err(e) = self.store.write_byte(next, self.image[next]) {
            error!("settings: write failed at {}", next);
            self.last_result = Err(e);
            self.state = WriterState::Idle;
            return;
        }
        let next = next + 1;
        self.state = if next == IMAGE_SIZE {
            info!("settings: saved");
            WriterState::Idle
        } else {
            WriterState::Writing { next }
        };
    }
}
