//! Alarm buzzer driver (transistor low-side switch, active HIGH).
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the real GPIO via hw_init helpers.
//! On host/test: tracks state in-memory only.

use crate::drivers::hw_init;
use crate::pins;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuzzerState {
    Off,
    On,
}

pub struct BuzzerDriver {
    state: BuzzerState,
}

impl BuzzerDriver {
    pub fn new() -> Self {
        Self {
            state: BuzzerState::Off,
        }
    }

    pub fn on(&mut self) {
        hw_init::gpio_write(pins::BUZZER_GPIO, true);
        self.state = BuzzerState::On;
    }

    pub fn off(&mut self) {
        hw_init::gpio_write(pins::BUZZER_GPIO, false);
        self.state = BuzzerState::Off;
    }

    pub fn state(&self) -> BuzzerState {
        self.state
    }

    pub fn is_on(&self) -> bool {
        matches!(self.state, BuzzerState::On)
    }
}
