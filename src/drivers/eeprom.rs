//! External credential EEPROM driver (24C02-class, I2C).
//!
//! Single-byte transfers with a one-byte word address — the credential is
//! five bytes at a fixed offset, so page operations buy nothing.  The
//! write-cycle settle time is NOT handled here; the vault paces transfers
//! through its delay port.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: i2c_master_write_to_device / i2c_master_read_from_device on
//! bus 0. On host/test: a plain in-memory array.

use crate::error::StorageError;
#[cfg(target_os = "espidf")]
use crate::pins;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

/// Capacity of the 24C02 part in bytes.
pub const EEPROM_SIZE: usize = 256;

#[cfg(target_os = "espidf")]
const I2C_TIMEOUT_TICKS: u32 = 100;

pub struct EepromDriver {
    #[cfg(not(target_os = "espidf"))]
    mem: [u8; EEPROM_SIZE],
}

impl EepromDriver {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            mem: [0xFF; EEPROM_SIZE],
        }
    }

    #[cfg(target_os = "espidf")]
    pub fn read_byte(&mut self, addr: u16) -> Result<u8, StorageError> {
        if addr as usize >= EEPROM_SIZE {
            return Err(StorageError::AddressOutOfRange);
        }
        let word_addr = [addr as u8];
        let mut value = [0u8; 1];
        // SAFETY: I2C master driver was installed in hw_init; buffers
        // outlive the call.
        let ret = unsafe {
            i2c_master_write_read_device(
                0,
                pins::EEPROM_I2C_ADDR,
                word_addr.as_ptr(),
                1,
                value.as_mut_ptr(),
                1,
                I2C_TIMEOUT_TICKS,
            )
        };
        if ret != ESP_OK {
            return Err(StorageError::I2cFailed);
        }
        Ok(value[0])
    }

    #[cfg(target_os = "espidf")]
    pub fn write_byte(&mut self, addr: u16, value: u8) -> Result<(), StorageError> {
        if addr as usize >= EEPROM_SIZE {
            return Err(StorageError::AddressOutOfRange);
        }
        let frame = [addr as u8, value];
        // SAFETY: I2C master driver was installed in hw_init; `frame` is
        // copied out before the call returns.
        let ret = unsafe {
            i2c_master_write_to_device(
                0,
                pins::EEPROM_I2C_ADDR,
                frame.as_ptr(),
                frame.len(),
                I2C_TIMEOUT_TICKS,
            )
        };
        if ret != ESP_OK {
            return Err(StorageError::I2cFailed);
        }
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn read_byte(&mut self, addr: u16) -> Result<u8, StorageError> {
        self.mem
            .get(addr as usize)
            .copied()
            .ok_or(StorageError::AddressOutOfRange)
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn write_byte(&mut self, addr: u16, value: u8) -> Result<(), StorageError> {
        *self
            .mem
            .get_mut(addr as usize)
            .ok_or(StorageError::AddressOutOfRange)? = value;
        Ok(())
    }
}
