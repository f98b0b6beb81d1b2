//! Wire-protocol vocabulary shared with the HMI ECU.
//!
//! Half-duplex, byte-oriented, synchronous request/response.  There is no
//! framing beyond implicit protocol position, so the code values below ARE
//! the wire contract — they must stay disjoint and identical on both
//! controllers.
//!
//! `CtrlReady` doubles as the per-byte "ready for next byte" acknowledgment
//! during the provisioning and verification rounds.

/// One wire command code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Code {
    /// HMI ECU announces readiness after boot.
    HmiReady = 0x01,
    /// Control ECU announces readiness; also the per-byte-ready ack.
    CtrlReady = 0x02,
    /// Begins a 5-byte provisioning round.
    StorePassword = 0x04,
    /// All 5 credential bytes persisted.
    PasswordStored = 0x05,
    /// Idle dispatch: the HMI wants a password verified.
    SubmitPassword = 0x06,
    /// Begins the 5-byte verification round.
    CheckPassword = 0x07,
    /// Per-position verdict: byte did not match the stored credential.
    Mismatch = 0x08,
    /// Per-position verdict: byte matched the stored credential.
    Match = 0x09,
    /// Idle dispatch: run the alarm sequence.
    RaiseAlarm = 0x11,
    /// Idle dispatch: run the door unlock sequence.
    UnlockDoor = 0x12,
    /// Idle dispatch: re-enter the provisioning exchange.
    ChangePassword = 0x13,
}

impl Code {
    /// Decode a received byte.  Returns `None` for anything outside the
    /// vocabulary — the dispatcher ignores such bytes.
    pub fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            0x01 => Some(Self::HmiReady),
            0x02 => Some(Self::CtrlReady),
            0x04 => Some(Self::StorePassword),
            0x05 => Some(Self::PasswordStored),
            0x06 => Some(Self::SubmitPassword),
            0x07 => Some(Self::CheckPassword),
            0x08 => Some(Self::Mismatch),
            0x09 => Some(Self::Match),
            0x11 => Some(Self::RaiseAlarm),
            0x12 => Some(Self::UnlockDoor),
            0x13 => Some(Self::ChangePassword),
            _ => None,
        }
    }
}
