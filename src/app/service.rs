//! Lock service — the command dispatcher state machine.
//!
//! [`LockService`] owns the protocol state, the credential vault, and the
//! actuator phase sequences.  It exposes a clean, hardware-agnostic API.
//! All I/O flows through port traits injected at call sites, making the
//! entire service testable with mock adapters.
//!
//! ```text
//!   LinkPort ──▶ ┌────────────────────────────┐ ──▶ EventSink
//!                │        LockService          │
//!  EepromPort ◀──│  dispatcher · vault · seq   │──▶ ActuatorPort
//!                └────────────────────────────┘ ──▶ TickTimerPort
//! ```
//!
//! ## State machine
//!
//! ```text
//!  AwaitPeer ──▶ Provisioning ──▶ Idle ──▶ Verifying ─────┐
//!                                  │  ──▶ Reprovisioning ─┤
//!                                  │  ──▶ Unlocking ──────┤
//!                                  │  ──▶ Alarming ───────┤
//!                                  ▲                      │
//!                                  └──────────────────────┘
//! ```
//!
//! `AwaitPeer` and `Provisioning` are traversed exactly once at startup;
//! the remaining states cycle for the lifetime of the appliance.  Every
//! transition is driven by one received command byte; an unexpected byte in
//! a state that expects a specific one is handled by blocking re-reads,
//! never by an error ("block, never crash").

use log::{debug, info};

use crate::config::SystemConfig;
use crate::diagnostics::ProtocolStats;
use crate::error::Result;
use crate::sequencer::TickSequencer;
use crate::vault::{CredentialVault, CREDENTIAL_LEN};

use super::events::AppEvent;
use super::ports::{ActuatorPort, DelayPort, EepromPort, EventSink, LinkPort, TickTimerPort};
use super::wire::Code;

// ───────────────────────────────────────────────────────────────
// State identity
// ───────────────────────────────────────────────────────────────

/// Dispatcher states.  `Reprovisioning` re-runs the provisioning exchange
/// but is kept distinct so observers can tell a password change from the
/// one-time boot provisioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    /// Waiting for the HMI ECU's ready code.
    AwaitPeer,
    /// Initial credential provisioning exchange.
    Provisioning,
    /// Waiting for the next idle command byte.
    Idle,
    /// Running a 5-byte verification exchange.
    Verifying,
    /// Re-running the provisioning exchange (password change).
    Reprovisioning,
    /// Driving the motor unlock/relock sequence.
    Unlocking,
    /// Driving the buzzer alarm sequence.
    Alarming,
}

// ───────────────────────────────────────────────────────────────
// Sequence phases
// ───────────────────────────────────────────────────────────────

/// Phases of the motor sequence, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorPhase {
    /// Motor clockwise — the bolt retracts.
    Unlocking,
    /// Motor coasting — the door is open.
    HoldingOpen,
    /// Motor counter-clockwise — the bolt extends.
    Relocking,
    /// Sequence complete, motor stopped, timer released.
    Stopped,
}

/// Phases of the alarm sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmPhase {
    Sounding,
    Silent,
}

// ───────────────────────────────────────────────────────────────
// LockService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrating all domain logic.
pub struct LockService {
    state: LockState,
    vault: CredentialVault,
    config: SystemConfig,
    stats: ProtocolStats,
}

impl LockService {
    /// Construct the service from configuration.  The dispatcher starts in
    /// [`LockState::AwaitPeer`].
    pub fn new(config: SystemConfig) -> Self {
        Self {
            state: LockState::AwaitPeer,
            vault: CredentialVault::from_config(&config),
            config,
            stats: ProtocolStats::new(),
        }
    }

    /// Current dispatcher state.
    pub fn state(&self) -> LockState {
        self.state
    }

    /// Accumulated protocol diagnostics.
    pub fn stats(&self) -> &ProtocolStats {
        &self.stats
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Run the dispatcher until the link fails.
    ///
    /// On hardware the link blocks forever and this never returns; simulated
    /// links end the loop by reporting
    /// [`LinkError::Closed`](crate::error::LinkError::Closed).
    pub fn run(
        &mut self,
        link: &mut impl LinkPort,
        hw: &mut impl ActuatorPort,
        timer: &mut impl TickTimerPort,
        store: &mut (impl EepromPort + DelayPort),
        sink: &mut impl EventSink,
    ) -> Result<()> {
        sink.emit(&AppEvent::Started(self.state));
        loop {
            self.step(link, hw, timer, store, sink)?;
        }
    }

    /// Execute exactly one dispatcher state and return the state entered.
    pub fn step(
        &mut self,
        link: &mut impl LinkPort,
        hw: &mut impl ActuatorPort,
        timer: &mut impl TickTimerPort,
        store: &mut (impl EepromPort + DelayPort),
        sink: &mut impl EventSink,
    ) -> Result<LockState> {
        let next = match self.state {
            LockState::AwaitPeer => {
                self.await_peer(link, sink)?;
                LockState::Provisioning
            }
            LockState::Provisioning | LockState::Reprovisioning => {
                self.provision_exchange(link, store, sink)?;
                LockState::Idle
            }
            LockState::Idle => self.dispatch(link, sink)?,
            LockState::Verifying => {
                self.verify_exchange(link, store, sink)?;
                LockState::Idle
            }
            LockState::Unlocking => {
                self.run_motor_sequence(hw, timer, sink)?;
                LockState::Idle
            }
            LockState::Alarming => {
                self.run_alarm_sequence(hw, timer, sink)?;
                LockState::Idle
            }
        };
        self.transition(next, sink);
        Ok(self.state)
    }

    // ── State handlers ────────────────────────────────────────

    /// Announce readiness, then block until the peer announces theirs.
    fn await_peer(&mut self, link: &mut impl LinkPort, sink: &mut impl EventSink) -> Result<()> {
        link.send(Code::CtrlReady as u8)?;
        Self::await_code(link, Code::HmiReady)?;
        sink.emit(&AppEvent::PeerReady);
        info!("HMI handshake complete");
        Ok(())
    }

    /// One full 5-byte provisioning exchange.
    ///
    /// Blocks until the store-password code arrives, then for each position:
    /// ack readiness, receive the byte, persist it (with settle delay).
    /// Finishes with the stored acknowledgment.
    fn provision_exchange(
        &mut self,
        link: &mut impl LinkPort,
        store: &mut (impl EepromPort + DelayPort),
        sink: &mut impl EventSink,
    ) -> Result<()> {
        Self::await_code(link, Code::StorePassword)?;

        for index in 0..CREDENTIAL_LEN {
            link.send(Code::CtrlReady as u8)?;
            let byte = link.recv()?;
            self.vault.write_position(store, index, byte)?;
        }

        link.send(Code::PasswordStored as u8)?;
        self.stats.record_provision();
        sink.emit(&AppEvent::CredentialStored);
        Ok(())
    }

    /// One full 5-byte verification exchange.
    ///
    /// Each received candidate byte is compared against the stored byte at
    /// the same position and answered with a match/mismatch ack before the
    /// next position is requested.
    fn verify_exchange(
        &mut self,
        link: &mut impl LinkPort,
        store: &mut (impl EepromPort + DelayPort),
        sink: &mut impl EventSink,
    ) -> Result<()> {
        Self::await_code(link, Code::CheckPassword)?;

        let mut positions = [false; CREDENTIAL_LEN];
        for (index, slot) in positions.iter_mut().enumerate() {
            link.send(Code::CtrlReady as u8)?;
            let byte = link.recv()?;
            let ok = self.vault.check_position(store, index, byte)?;
            let ack = if ok { Code::Match } else { Code::Mismatch };
            link.send(ack as u8)?;
            *slot = ok;
        }

        let matched = positions.iter().all(|&ok| ok);
        self.stats.record_verify(matched);
        sink.emit(&AppEvent::VerifyCompleted { positions, matched });
        Ok(())
    }

    /// Read one idle command byte and pick the next state.
    ///
    /// Bytes outside the idle vocabulary are ignored: logged, counted, and
    /// the dispatcher re-reads.  The wrong-attempt policy lives on the HMI
    /// side — it decides when a string of failed verifications becomes a
    /// `RaiseAlarm`.
    fn dispatch(&mut self, link: &mut impl LinkPort, sink: &mut impl EventSink) -> Result<LockState> {
        let byte = link.recv()?;
        let next = match Code::from_u8(byte) {
            Some(Code::SubmitPassword) => LockState::Verifying,
            Some(Code::UnlockDoor) => LockState::Unlocking,
            Some(Code::RaiseAlarm) => LockState::Alarming,
            Some(Code::ChangePassword) => LockState::Reprovisioning,
            _ => {
                debug!("idle: ignoring byte 0x{:02X}", byte);
                self.stats.record_unknown(byte);
                sink.emit(&AppEvent::UnknownCommand(byte));
                LockState::Idle
            }
        };
        Ok(next)
    }

    // ── Actuator sequences ────────────────────────────────────

    /// Motor sequence: clockwise to unlock, coast while open, counter-
    /// clockwise to relock.  The timer is armed on entry and released on
    /// exit; it is never left running across dispatcher states.
    fn run_motor_sequence(
        &mut self,
        hw: &mut impl ActuatorPort,
        timer: &mut impl TickTimerPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        let duty = self.config.motor_duty_percent;
        let mut seq = TickSequencer::new(timer, self.config.tick_period_ms);

        seq.start_periodic()?;
        seq.reset_ticks();
        hw.drive_motor(duty, true);
        sink.emit(&AppEvent::MotorPhase(MotorPhase::Unlocking));
        seq.wait_until(self.config.unlock_ticks);

        hw.stop_motor();
        seq.reset_ticks();
        sink.emit(&AppEvent::MotorPhase(MotorPhase::HoldingOpen));
        seq.wait_until(self.config.hold_open_ticks);

        hw.drive_motor(duty, false);
        seq.reset_ticks();
        sink.emit(&AppEvent::MotorPhase(MotorPhase::Relocking));
        seq.wait_until(self.config.relock_ticks);

        hw.stop_motor();
        seq.stop_periodic();
        sink.emit(&AppEvent::MotorPhase(MotorPhase::Stopped));

        self.stats.record_unlock();
        Ok(())
    }

    /// Alarm sequence: buzzer on for the configured duration.
    fn run_alarm_sequence(
        &mut self,
        hw: &mut impl ActuatorPort,
        timer: &mut impl TickTimerPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        let mut seq = TickSequencer::new(timer, self.config.tick_period_ms);

        seq.start_periodic()?;
        seq.reset_ticks();
        hw.buzzer_on();
        sink.emit(&AppEvent::AlarmPhase(AlarmPhase::Sounding));
        seq.wait_until(self.config.alarm_ticks);

        hw.buzzer_off();
        seq.stop_periodic();
        seq.reset_ticks();
        sink.emit(&AppEvent::AlarmPhase(AlarmPhase::Silent));

        self.stats.record_alarm();
        Ok(())
    }

    // ── Internal ──────────────────────────────────────────────

    /// Discard bytes until `expected` arrives.  This is the protocol's only
    /// answer to desynchronization: keep reading.
    fn await_code(link: &mut impl LinkPort, expected: Code) -> Result<()> {
        loop {
            if link.recv()? == expected as u8 {
                return Ok(());
            }
        }
    }

    fn transition(&mut self, next: LockState, sink: &mut impl EventSink) {
        if next != self.state {
            sink.emit(&AppEvent::StateChanged {
                from: self.state,
                to: next,
            });
            self.state = next;
        }
    }
}
