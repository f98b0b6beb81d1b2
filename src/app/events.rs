//! Outbound application events.
//!
//! The [`LockService`](super::service::LockService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other side
//! decide what to do with them — log to serial, feed a diagnostics buffer,
//! etc.  Events never travel over the HMI wire.

use super::service::{AlarmPhase, LockState, MotorPhase};
use crate::vault::CREDENTIAL_LEN;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The dispatcher has started (carries initial state).
    Started(LockState),

    /// The dispatcher transitioned between states.
    StateChanged { from: LockState, to: LockState },

    /// The startup handshake with the HMI ECU completed.
    PeerReady,

    /// A 5-byte credential was persisted (initial provisioning or
    /// password change).
    CredentialStored,

    /// A verification round completed, with its per-position verdicts.
    VerifyCompleted {
        positions: [bool; CREDENTIAL_LEN],
        matched: bool,
    },

    /// The motor sequence entered a new phase.
    MotorPhase(MotorPhase),

    /// The alarm sequence entered a new phase.
    AlarmPhase(AlarmPhase),

    /// A byte outside the idle vocabulary was received and ignored.
    UnknownCommand(u8),
}
