//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ LockService (domain)
//! ```
//!
//! Driven adapters (UART link, EEPROM, tick timer, actuators, event sinks)
//! implement these traits.  The [`LockService`](super::service::LockService)
//! consumes them via generics, so the domain core never touches hardware
//! directly.
//!
//! ## Blocking contract
//!
//! - [`LinkPort::recv`] and [`TickTimerPort::wait_for_tick`] block the
//!   calling context.  On hardware they block indefinitely ("block, never
//!   crash"); simulated implementations return [`LinkError::Closed`] /
//!   advance synthetic time so tests terminate.
//! - No port method panics.  Every failure is a typed error.

use crate::config::SystemConfig;
use crate::error::{LinkError, StorageError, TimerError};

// ───────────────────────────────────────────────────────────────
// HMI link port (driven adapter: UART ↔ domain)
// ───────────────────────────────────────────────────────────────

/// Byte transport to the human-interface ECU.
///
/// The wire protocol is half-duplex request/response with no framing beyond
/// protocol position, so the primitive operations are single bytes.
pub trait LinkPort {
    /// Transmit one byte to the peer.
    fn send(&mut self, byte: u8) -> Result<(), LinkError>;

    /// Receive one byte from the peer, blocking until it arrives.
    fn recv(&mut self) -> Result<u8, LinkError>;
}

// ───────────────────────────────────────────────────────────────
// Credential store port (driven adapter: domain ↔ EEPROM)
// ───────────────────────────────────────────────────────────────

/// Byte-addressed persistent store holding the credential.
///
/// No integrity layer: a read returns whatever the medium holds. The
/// credential vault layers its semantics on top.
pub trait EepromPort {
    /// Read one byte at `addr`.
    fn read_byte(&mut self, addr: u16) -> Result<u8, StorageError>;

    /// Write one byte at `addr`.  The write-cycle settle time is **not**
    /// included — callers pace transfers via [`DelayPort`].
    fn write_byte(&mut self, addr: u16, value: u8) -> Result<(), StorageError>;
}

/// Millisecond busy-delay, used to respect the EEPROM write-cycle time
/// between byte transfers.
pub trait DelayPort {
    fn delay_ms(&mut self, ms: u32);
}

// ───────────────────────────────────────────────────────────────
// Tick timer port (driven adapter: periodic interrupt ↔ domain)
// ───────────────────────────────────────────────────────────────

/// Periodic tick source with a shared monotonically increasing counter.
///
/// The counter is incremented by exactly +1 per period in timer-callback
/// context and only read / reset from the control context.  Implementations
/// must perform [`reset_ticks`](TickTimerPort::reset_ticks) with the source
/// masked so a callback increment can never race the reset.
pub trait TickTimerPort {
    /// Arm (or re-arm) the periodic source at `period_ms`.  Idempotent.
    fn arm(&mut self, period_ms: u32) -> Result<(), TimerError>;

    /// Disarm the periodic source.  The counter value is unspecified
    /// afterwards; callers reset it before reuse.
    fn disarm(&mut self);

    /// Current tick count.
    fn ticks(&self) -> u32;

    /// Zero the tick counter.  Must mask the source for the duration.
    fn reset_ticks(&mut self);

    /// Block until the counter has advanced (or a short timeout elapses —
    /// callers re-check the count, so spurious wakeups are harmless).
    fn wait_for_tick(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command actuators.
pub trait ActuatorPort {
    /// Drive the lock motor at `duty` (0–100), `clockwise` = unlock
    /// direction.
    fn drive_motor(&mut self, duty: u8, clockwise: bool);

    /// Stop the lock motor (coast).
    fn stop_motor(&mut self);

    /// Energise the alarm buzzer.
    fn buzzer_on(&mut self);

    /// Silence the alarm buzzer.
    fn buzzer_off(&mut self);

    /// Kill all actuators — safe shutdown.
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log,
/// diagnostics buffer, etc.).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists system configuration.
///
/// Implementations MUST validate config values before persisting.
/// Invalid ranges are rejected with [`ConfigError::ValidationFailed`],
/// not silently clamped.
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    fn load(&self) -> Result<SystemConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError>;
}

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// No config found in storage (first boot).
    NotFound,
    /// Stored config failed integrity / deserialization check.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Underlying storage is full.
    StorageFull,
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::StorageFull => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
