//! GPIO / peripheral pin assignments for the DoorSentry control board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Lock motor driver (DRV8871 H-bridge)
// ---------------------------------------------------------------------------

/// LEDC PWM channel for motor speed control.
pub const MOTOR_PWM_GPIO: i32 = 1;
/// Motor PWM carrier frequency (above audible range).
pub const MOTOR_PWM_FREQ_HZ: u32 = 25_000;
/// Digital output: HIGH = clockwise (unlock), LOW = counter-clockwise (relock).
pub const MOTOR_DIR_GPIO: i32 = 2;

// ---------------------------------------------------------------------------
// Alarm buzzer (transistor low-side driver, active HIGH)
// ---------------------------------------------------------------------------

/// Digital output: energises the alarm buzzer.
pub const BUZZER_GPIO: i32 = 3;

// ---------------------------------------------------------------------------
// HMI link (UART1 to the human-interface ECU)
// ---------------------------------------------------------------------------

pub const LINK_UART_TX_GPIO: i32 = 17;
pub const LINK_UART_RX_GPIO: i32 = 18;
/// UART port number used for the HMI link (UART0 is the log console).
pub const LINK_UART_NUM: u32 = 1;

// ---------------------------------------------------------------------------
// External EEPROM (24C-series, I2C)
// ---------------------------------------------------------------------------

pub const EEPROM_I2C_SDA_GPIO: i32 = 8;
pub const EEPROM_I2C_SCL_GPIO: i32 = 9;
/// 7-bit I2C device address of the credential EEPROM.
pub const EEPROM_I2C_ADDR: u8 = 0x50;
