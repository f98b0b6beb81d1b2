//! Credential store adapter — implements [`EepromPort`] and [`DelayPort`]
//! over the I2C EEPROM driver.
//!
//! The delay half exists because 24C-class parts need their write-cycle
//! time (typically 5–10 ms) honoured between byte transfers; the vault
//! paces every transfer through [`DelayPort::delay_ms`].

use crate::app::ports::{DelayPort, EepromPort};
use crate::drivers::eeprom::EepromDriver;
use crate::error::StorageError;

pub struct EepromAdapter {
    driver: EepromDriver,
}

impl EepromAdapter {
    pub fn new(driver: EepromDriver) -> Self {
        Self { driver }
    }
}

impl EepromPort for EepromAdapter {
    fn read_byte(&mut self, addr: u16) -> Result<u8, StorageError> {
        self.driver.read_byte(addr)
    }

    fn write_byte(&mut self, addr: u16, value: u8) -> Result<(), StorageError> {
        self.driver.write_byte(addr, value)
    }
}

impl DelayPort for EepromAdapter {
    #[cfg(target_os = "espidf")]
    fn delay_ms(&mut self, ms: u32) {
        esp_idf_hal::delay::FreeRtos::delay_ms(ms);
    }

    #[cfg(not(target_os = "espidf"))]
    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
    }
}
