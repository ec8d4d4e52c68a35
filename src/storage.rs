//! Calibration storage in the last internal flash page.
//!
//! The settings writer hands over one byte per step; the NVMC programs
//! whole 32-bit words, so bytes collect in a word buffer that is flushed
//! when the word is full or the image ends. The page is erased when a
//! save starts.

use defmt::{debug, error};
use embassy_nrf::nvmc::{Nvmc, PAGE_SIZE};
use embedded_storage::nor_flash::{NorFlash, ReadNorFlash};
use magmouse::config::SETTINGS_FLASH_PAGE;
use magmouse::settings::{ByteStore, IMAGE_SIZE};
use magmouse::{Error, Result};

/// Start address of the settings page.
const SETTINGS_START: u32 = SETTINGS_FLASH_PAGE * PAGE_SIZE as u32;

/// NVMC write granularity.
const WORD_SIZE: usize = 4;

pub struct FlashStore<'d> {
    flash: Nvmc<'d>,
    word: [u8; WORD_SIZE],
}

impl<'d> FlashStore<'d> {
    pub fn new(flash: Nvmc<'d>) -> Self {
        Self {
            flash,
            word: [0xFF; WORD_SIZE],
        }
    }
}

impl ByteStore for FlashStore<'_> {
    fn read_byte(&mut self, addr: usize) -> Result<u8> {
        if addr >= PAGE_SIZE {
            return Err(Error::Storage);
        }
        let mut byte = [0u8; 1];
        self.flash
            .read(SETTINGS_START + addr as u32, &mut byte)
            .map_err(|_| Error::Storage)?;
        Ok(byte[0])
    }

    fn write_byte(&mut self, addr: usize, value: u8) -> Result<()> {
        if addr >= PAGE_SIZE {
            return Err(Error::Storage);
        }
        let lane = addr % WORD_SIZE;
        if lane == 0 {
            self.word = [0xFF; WORD_SIZE];
        }
        self.word[lane] = value;

        if lane == WORD_SIZE - 1 || addr + 1 == IMAGE_SIZE {
            let offset = SETTINGS_START + (addr - lane) as u32;
            let word = self.word;
            self.flash.write(offset, &word).map_err(|_| {
                error!("flash: write failed at {=u32:#x}", offset);
                Error::Storage
            })?;
        }
        Ok(())
    }

    fn erase(&mut self) -> Result<()> {
        debug!("flash: erasing settings page");
        self.flash
            .erase(SETTINGS_START, SETTINGS_START + PAGE_SIZE as u32)
            .map_err(|_| Error::Storage)
    }
}
