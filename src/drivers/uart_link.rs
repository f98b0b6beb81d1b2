//! HMI link UART driver.
//!
//! Raw byte transmit/receive on the UART wired to the human-interface ECU.
//! Receives block indefinitely — the wire protocol's only recovery strategy
//! is to keep reading — but the poll loop runs in short slices so the task
//! watchdog can be fed while blocked.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: uart_read_bytes / uart_write_bytes on the installed driver.
//! On host/test: no peer exists; receives report the link closed so a
//! simulation run terminates instead of hanging.

use crate::error::LinkError;
#[cfg(target_os = "espidf")]
use crate::pins;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

/// Poll slice for blocking receives, in FreeRTOS ticks (default 100 Hz
/// tick rate → 20 ms per slice).
#[cfg(target_os = "espidf")]
const RX_POLL_TICKS: u32 = 2;

pub struct UartLinkDriver;

impl UartLinkDriver {
    pub fn new() -> Self {
        Self
    }

    #[cfg(target_os = "espidf")]
    pub fn write_byte(&mut self, byte: u8) -> Result<(), LinkError> {
        let buf = [byte];
        // SAFETY: the UART driver was installed in hw_init before any link
        // traffic; uart_write_bytes copies out of `buf` before returning.
        let written = unsafe {
            uart_write_bytes(
                pins::LINK_UART_NUM as i32,
                buf.as_ptr().cast(),
                1,
            )
        };
        if written == 1 {
            Ok(())
        } else {
            Err(LinkError::Io)
        }
    }

    /// Poll for one received byte.  Returns `Ok(None)` when the poll slice
    /// elapsed with nothing on the wire.
    #[cfg(target_os = "espidf")]
    pub fn poll_byte(&mut self) -> Result<Option<u8>, LinkError> {
        let mut buf = [0u8; 1];
        // SAFETY: the UART driver was installed in hw_init; `buf` outlives
        // the call.
        let read = unsafe {
            uart_read_bytes(
                pins::LINK_UART_NUM as i32,
                buf.as_mut_ptr().cast(),
                1,
                RX_POLL_TICKS,
            )
        };
        match read {
            1 => Ok(Some(buf[0])),
            0 => Ok(None),
            _ => Err(LinkError::Io),
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn write_byte(&mut self, byte: u8) -> Result<(), LinkError> {
        log::trace!("uart(sim): tx 0x{:02X}", byte);
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn poll_byte(&mut self) -> Result<Option<u8>, LinkError> {
        Err(LinkError::Closed)
    }
}
