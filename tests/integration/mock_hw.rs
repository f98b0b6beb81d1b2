//! Mock hardware adapters for integration tests.
//!
//! Records every port call so tests can assert on the full command history
//! without touching real UART/I2C/PWM peripherals.

use std::collections::VecDeque;

use doorsentry::app::events::AppEvent;
use doorsentry::app::ports::{
    ActuatorPort, DelayPort, EepromPort, EventSink, LinkPort, TickTimerPort,
};
use doorsentry::error::{LinkError, StorageError, TimerError};

// ── Scripted HMI link ─────────────────────────────────────────

/// Plays back a scripted byte sequence as the HMI peer; records everything
/// the control ECU transmits.  When the script runs out the link reports
/// `Closed`, ending the dispatcher loop.
pub struct ScriptedLink {
    rx: VecDeque<u8>,
    pub tx: Vec<u8>,
}

#[allow(dead_code)]
impl ScriptedLink {
    pub fn new(script: &[u8]) -> Self {
        Self {
            rx: script.iter().copied().collect(),
            tx: Vec::new(),
        }
    }

    /// Bytes the control ECU sent, in order.
    pub fn sent(&self) -> &[u8] {
        &self.tx
    }
}

impl LinkPort for ScriptedLink {
    fn send(&mut self, byte: u8) -> Result<(), LinkError> {
        self.tx.push(byte);
        Ok(())
    }

    fn recv(&mut self) -> Result<u8, LinkError> {
        self.rx.pop_front().ok_or(LinkError::Closed)
    }
}

// ── In-memory credential EEPROM ───────────────────────────────

pub struct MockEeprom {
    pub mem: [u8; 256],
    pub writes: Vec<(u16, u8)>,
    pub settle_calls: u32,
}

#[allow(dead_code)]
impl MockEeprom {
    pub fn new() -> Self {
        Self {
            mem: [0xFF; 256],
            writes: Vec::new(),
            settle_calls: 0,
        }
    }

    pub fn credential_at(&self, base: u16) -> [u8; 5] {
        let mut out = [0u8; 5];
        out.copy_from_slice(&self.mem[base as usize..base as usize + 5]);
        out
    }
}

impl EepromPort for MockEeprom {
    fn read_byte(&mut self, addr: u16) -> Result<u8, StorageError> {
        self.mem
            .get(addr as usize)
            .copied()
            .ok_or(StorageError::AddressOutOfRange)
    }

    fn write_byte(&mut self, addr: u16, value: u8) -> Result<(), StorageError> {
        *self
            .mem
            .get_mut(addr as usize)
            .ok_or(StorageError::AddressOutOfRange)? = value;
        self.writes.push((addr, value));
        Ok(())
    }
}

impl DelayPort for MockEeprom {
    fn delay_ms(&mut self, _ms: u32) {
        self.settle_calls += 1;
    }
}

// ── Synthetic tick timer ──────────────────────────────────────

/// Tick source where one `wait_for_tick` equals one elapsed period.
pub struct MockTickTimer {
    pub ticks: u32,
    pub armed: bool,
    pub arm_calls: u32,
    pub reset_calls: u32,
    pub wait_calls: u32,
}

#[allow(dead_code)]
impl MockTickTimer {
    pub fn new() -> Self {
        Self {
            ticks: 0,
            armed: false,
            arm_calls: 0,
            reset_calls: 0,
            wait_calls: 0,
        }
    }
}

impl TickTimerPort for MockTickTimer {
    fn arm(&mut self, _period_ms: u32) -> Result<(), TimerError> {
        self.armed = true;
        self.arm_calls += 1;
        Ok(())
    }

    fn disarm(&mut self) {
        self.armed = false;
    }

    fn ticks(&self) -> u32 {
        self.ticks
    }

    fn reset_ticks(&mut self) {
        self.ticks = 0;
        self.reset_calls += 1;
    }

    fn wait_for_tick(&mut self) {
        assert!(self.armed, "wait on a disarmed tick source blocks forever");
        self.ticks += 1;
        self.wait_calls += 1;
    }
}

// ── Recording actuators ───────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActuatorCall {
    Motor { duty: u8, clockwise: bool },
    StopMotor,
    BuzzerOn,
    BuzzerOff,
    AllOff,
}

pub struct MockActuators {
    pub calls: Vec<ActuatorCall>,
}

#[allow(dead_code)]
impl MockActuators {
    pub fn new() -> Self {
        Self { calls: Vec::new() }
    }
}

impl ActuatorPort for MockActuators {
    fn drive_motor(&mut self, duty: u8, clockwise: bool) {
        self.calls.push(ActuatorCall::Motor { duty, clockwise });
    }

    fn stop_motor(&mut self) {
        self.calls.push(ActuatorCall::StopMotor);
    }

    fn buzzer_on(&mut self) {
        self.calls.push(ActuatorCall::BuzzerOn);
    }

    fn buzzer_off(&mut self) {
        self.calls.push(ActuatorCall::BuzzerOff);
    }

    fn all_off(&mut self) {
        self.calls.push(ActuatorCall::AllOff);
    }
}

// ── Recording event sink ──────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
