//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).
//! A future telemetry adapter would implement the same trait.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(state) => {
                info!("START | initial_state={:?}", state);
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            AppEvent::PeerReady => {
                info!("LINK  | HMI handshake complete");
            }
            AppEvent::CredentialStored => {
                info!("VAULT | credential persisted");
            }
            AppEvent::VerifyCompleted { positions, matched } => {
                // The credential itself never reaches the log — only the
                // per-position verdict pattern.
                let mut pattern = heapless::String::<8>::new();
                for &ok in positions {
                    let _ = pattern.push(if ok { 'Y' } else { 'n' });
                }
                info!(
                    "VERIFY| result={} pattern={}",
                    if *matched { "match" } else { "mismatch" },
                    pattern,
                );
            }
            AppEvent::MotorPhase(phase) => {
                info!("MOTOR | {:?}", phase);
            }
            AppEvent::AlarmPhase(phase) => {
                info!("ALARM | {:?}", phase);
            }
            AppEvent::UnknownCommand(byte) => {
                warn!("LINK  | ignoring unknown idle byte 0x{:02X}", byte);
            }
        }
    }
}
