//! Fuzz target: the dispatcher state machine.
//!
//! Drives arbitrary byte streams from a simulated HMI peer through the full
//! dispatcher and asserts that it never panics and always ends in a valid
//! state once the stream runs dry.
//!
//! cargo fuzz run fuzz_dispatcher

#![no_main]

use std::collections::VecDeque;

use libfuzzer_sys::fuzz_target;

use doorsentry::app::events::AppEvent;
use doorsentry::app::ports::{
    ActuatorPort, DelayPort, EepromPort, EventSink, LinkPort, TickTimerPort,
};
use doorsentry::app::service::LockService;
use doorsentry::config::SystemConfig;
use doorsentry::error::{LinkError, StorageError, TimerError};

struct ScriptLink {
    rx: VecDeque<u8>,
}

impl LinkPort for ScriptLink {
    fn send(&mut self, _byte: u8) -> Result<(), LinkError> {
        Ok(())
    }

    fn recv(&mut self) -> Result<u8, LinkError> {
        self.rx.pop_front().ok_or(LinkError::Closed)
    }
}

struct MemStore {
    mem: [u8; 256],
}

impl EepromPort for MemStore {
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
        Ok(())
    }
}

impl DelayPort for MemStore {
    fn delay_ms(&mut self, _ms: u32) {}
}

struct NullHw;

impl ActuatorPort for NullHw {
    fn drive_motor(&mut self, _duty: u8, _clockwise: bool) {}
    fn stop_motor(&mut self) {}
    fn buzzer_on(&mut self) {}
    fn buzzer_off(&mut self) {}
    fn all_off(&mut self) {}
}

struct FakeTimer {
    ticks: u32,
}

impl TickTimerPort for FakeTimer {
    fn arm(&mut self, _period_ms: u32) -> Result<(), TimerError> {
        Ok(())
    }
    fn disarm(&mut self) {}
    fn ticks(&self) -> u32 {
        self.ticks
    }
    fn reset_ticks(&mut self) {
        self.ticks = 0;
    }
    fn wait_for_tick(&mut self) {
        self.ticks += 1;
    }
}

struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let mut service = LockService::new(SystemConfig::default());
    let mut link = ScriptLink {
        rx: data.iter().copied().collect(),
    };
    let mut store = MemStore { mem: [0xFF; 256] };
    let mut timer = FakeTimer { ticks: 0 };
    let mut hw = NullHw;
    let mut sink = NullSink;

    // Every script ends with the link reporting Closed; nothing may panic
    // on the way there.
    let err = service
        .run(&mut link, &mut hw, &mut timer, &mut store, &mut sink)
        .unwrap_err();
    assert!(matches!(
        err,
        doorsentry::error::Error::Link(LinkError::Closed)
    ));
});
