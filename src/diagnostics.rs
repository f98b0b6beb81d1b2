//! Runtime protocol diagnostics.
//!
//! Counters accumulated by the dispatcher and logged on demand.  Nothing
//! here is surfaced over the HMI wire, and nothing here drives control
//! flow — in particular the failed-verification count is observational
//! only (the HMI side owns the wrong-attempt policy).

use log::info;

/// Number of recently ignored idle bytes kept for the log summary.
const UNKNOWN_RING_SLOTS: usize = 8;

/// Counters accumulated across the dispatcher's lifetime.
#[derive(Debug, Default)]
pub struct ProtocolStats {
    /// Idle bytes outside the dispatch vocabulary, silently ignored.
    pub unknown_commands: u32,
    /// Completed verification rounds.
    pub verify_rounds: u32,
    /// Verification rounds whose overall verdict was a mismatch.
    pub verify_failures: u32,
    /// Provisioning exchanges completed (initial + password changes).
    pub provisions: u32,
    /// Motor unlock sequences run.
    pub unlock_sequences: u32,
    /// Buzzer alarm sequences run.
    pub alarm_sequences: u32,
    /// Most recently ignored bytes, oldest evicted first.
    recent_unknown: heapless::Vec<u8, UNKNOWN_RING_SLOTS>,
}

impl ProtocolStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_unknown(&mut self, byte: u8) {
        self.unknown_commands += 1;
        if self.recent_unknown.is_full() {
            self.recent_unknown.remove(0);
        }
        let _ = self.recent_unknown.push(byte);
    }

    pub fn record_verify(&mut self, matched: bool) {
        self.verify_rounds += 1;
        if !matched {
            self.verify_failures += 1;
        }
    }

    pub fn record_provision(&mut self) {
        self.provisions += 1;
    }

    pub fn record_unlock(&mut self) {
        self.unlock_sequences += 1;
    }

    pub fn record_alarm(&mut self) {
        self.alarm_sequences += 1;
    }

    /// Recently ignored idle bytes, oldest first.
    pub fn recent_unknown(&self) -> impl Iterator<Item = &u8> {
        self.recent_unknown.iter()
    }

    /// Write a one-shot summary to the log.
    pub fn log_summary(&self) {
        info!(
            "STATS | provisions={} verify={}/{} unlock={} alarm={} unknown={}",
            self.provisions,
            self.verify_rounds - self.verify_failures,
            self.verify_rounds,
            self.unlock_sequences,
            self.alarm_sequences,
            self.unknown_commands,
        );
    }
}
