//! Serial link adapter — implements [`LinkPort`] over the HMI UART driver.
//!
//! Receives block until a byte arrives, in watchdog-fed poll slices: the
//! protocol may legitimately wait forever for an unresponsive peer, and the
//! TWDT must see the task alive the whole time.

use crate::app::ports::LinkPort;
use crate::drivers::uart_link::UartLinkDriver;
use crate::drivers::watchdog::Watchdog;
use crate::error::LinkError;

pub struct SerialLinkAdapter {
    driver: UartLinkDriver,
    watchdog: Watchdog,
}

impl SerialLinkAdapter {
    pub fn new(driver: UartLinkDriver, watchdog: Watchdog) -> Self {
        Self { driver, watchdog }
    }
}

impl LinkPort for SerialLinkAdapter {
    fn send(&mut self, byte: u8) -> Result<(), LinkError> {
        self.driver.write_byte(byte)
    }

    fn recv(&mut self) -> Result<u8, LinkError> {
        loop {
            self.watchdog.feed();
            if let Some(byte) = self.driver.poll_byte()? {
                return Ok(byte);
            }
        }
    }
}
