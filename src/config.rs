//! System configuration parameters
//!
//! All tunable parameters for the DoorSentry control ECU.
//! Values can be overridden via NVS (non-volatile storage).

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Tick timing ---
    /// Period of the sequencing tick in milliseconds.
    pub tick_period_ms: u32,

    // --- Door motor sequence (durations in ticks) ---
    /// Clockwise drive time to unlock the door.
    pub unlock_ticks: u32,
    /// Coast time while the door is held open.
    pub hold_open_ticks: u32,
    /// Counter-clockwise drive time to relock the door.
    pub relock_ticks: u32,
    /// Motor PWM duty cycle while driving (0-100%).
    pub motor_duty_percent: u8,

    // --- Alarm ---
    /// Buzzer on-time for the alarm sequence.
    pub alarm_ticks: u32,

    // --- Credential EEPROM ---
    /// First EEPROM address of the stored credential.
    pub eeprom_base_addr: u16,
    /// Settle delay after each EEPROM byte transfer (write-cycle time).
    pub eeprom_settle_ms: u32,

    // --- HMI link ---
    /// UART baud rate of the link to the HMI ECU.
    pub link_baud: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Tick timing: 1 s per tick
            tick_period_ms: 1000,

            // Motor sequence: 15 s unlock, 3 s open, 15 s relock
            unlock_ticks: 15,
            hold_open_ticks: 3,
            relock_ticks: 15,
            motor_duty_percent: 100,

            // Alarm: 60 s
            alarm_ticks: 60,

            // Credential EEPROM
            eeprom_base_addr: 0x70,
            eeprom_settle_ms: 10,

            // HMI link
            link_baud: 9600,
        }
    }
}
