//! Hardware adapter — bridges real actuators to the domain port traits.
//!
//! Owns the motor and buzzer drivers, exposing them through
//! [`ActuatorPort`].  This is the only module besides the drivers that
//! touches actuator hardware.  On non-espidf targets, the underlying
//! drivers use cfg-gated simulation stubs.

use crate::app::ports::ActuatorPort;
use crate::drivers::buzzer::BuzzerDriver;
use crate::drivers::motor::{Direction, MotorDriver};

/// Concrete adapter that combines all actuators behind the port trait.
pub struct HardwareAdapter {
    motor: MotorDriver,
    buzzer: BuzzerDriver,
}

impl HardwareAdapter {
    pub fn new(motor: MotorDriver, buzzer: BuzzerDriver) -> Self {
        Self { motor, buzzer }
    }
}

impl ActuatorPort for HardwareAdapter {
    fn drive_motor(&mut self, duty: u8, clockwise: bool) {
        let dir = if clockwise {
            Direction::Clockwise
        } else {
            Direction::CounterClockwise
        };
        self.motor.drive(duty, dir);
    }

    fn stop_motor(&mut self) {
        self.motor.stop();
    }

    fn buzzer_on(&mut self) {
        self.buzzer.on();
    }

    fn buzzer_off(&mut self) {
        self.buzzer.off();
    }

    fn all_off(&mut self) {
        self.motor.stop();
        self.buzzer.off();
    }
}
