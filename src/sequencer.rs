//! Tick sequencer — converts the periodic timer interrupt into elapsed-time
//! waits for the actuator phase sequences.
//!
//! The underlying [`TickTimerPort`] owns a shared counter incremented by
//! exactly +1 per period in timer-callback context.  The sequencer borrows
//! the port for the duration of one timed sequence, so the timer resource is
//! provably held by a single owner: armed immediately before a sequence,
//! disarmed immediately after, never left running across dispatcher states.
//!
//! [`wait_until`](TickSequencer::wait_until) uses **threshold** (`>=`)
//! semantics rather than the equality wait of classic bare-metal loops: an
//! equality wait never terminates if an increment is ever lost or doubled,
//! while the threshold wait stays correct as long as the counter is
//! monotonic.  The `+1 per period` invariant is still maintained by the
//! timer driver, so both semantics agree in normal operation.

use crate::app::ports::TickTimerPort;
use crate::error::TimerError;

/// Exclusive handle on the periodic timer for one timed sequence.
pub struct TickSequencer<'a, T: TickTimerPort> {
    timer: &'a mut T,
    period_ms: u32,
}

impl<'a, T: TickTimerPort> TickSequencer<'a, T> {
    pub fn new(timer: &'a mut T, period_ms: u32) -> Self {
        Self { timer, period_ms }
    }

    /// Arm (or re-arm) the periodic source.  Each timed sequence calls this
    /// on entry, so re-arming an already armed source must be safe.
    pub fn start_periodic(&mut self) -> Result<(), TimerError> {
        self.timer.arm(self.period_ms)
    }

    /// Disarm the periodic source.  The counter is left unspecified;
    /// callers reset it before the next use.
    pub fn stop_periodic(&mut self) {
        self.timer.disarm();
    }

    /// Zero the shared counter.  The port masks the source while zeroing,
    /// so no callback increment can be lost to the reset.
    pub fn reset_ticks(&mut self) {
        self.timer.reset_ticks();
    }

    /// Current tick count.
    pub fn ticks(&self) -> u32 {
        self.timer.ticks()
    }

    /// Block until at least `target` ticks have elapsed since the last
    /// reset.  Returns immediately if the counter is already there.
    pub fn wait_until(&mut self, target: u32) {
        while self.timer.ticks() < target {
            self.timer.wait_for_tick();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Synthetic tick source: `wait_for_tick` advances time by `step`.
    struct FakeTimer {
        ticks: u32,
        step: u32,
        armed: bool,
        arm_calls: u32,
        waits: u32,
    }

    impl FakeTimer {
        fn new(step: u32) -> Self {
            Self {
                ticks: 0,
                step,
                armed: false,
                arm_calls: 0,
                waits: 0,
            }
        }
    }

    impl TickTimerPort for FakeTimer {
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
        }

        fn wait_for_tick(&mut self) {
            assert!(self.armed, "wait on a disarmed timer would block forever");
            self.ticks += self.step;
            self.waits += 1;
        }
    }

    #[test]
    fn wait_until_blocks_for_exactly_n_periods() {
        let mut timer = FakeTimer::new(1);
        let mut seq = TickSequencer::new(&mut timer, 1000);
        seq.start_periodic().unwrap();
        seq.reset_ticks();
        seq.wait_until(15);
        assert_eq!(timer.waits, 15, "one wakeup per period, never fewer");
    }

    #[test]
    fn wait_until_returns_immediately_when_already_elapsed() {
        let mut timer = FakeTimer::new(1);
        timer.ticks = 20;
        let mut seq = TickSequencer::new(&mut timer, 1000);
        seq.start_periodic().unwrap();
        seq.wait_until(15);
        assert_eq!(timer.waits, 0);
    }

    #[test]
    fn threshold_wait_terminates_even_if_a_tick_is_skipped() {
        // Deliberate deviation from the classic equality wait: a counter
        // stepping by 2 jumps straight over the target value.  The equality
        // form would spin forever; the threshold form must terminate.
        let mut timer = FakeTimer::new(2);
        let mut seq = TickSequencer::new(&mut timer, 1000);
        seq.start_periodic().unwrap();
        seq.reset_ticks();
        seq.wait_until(15);
        assert!(timer.ticks >= 15);
    }

    #[test]
    fn start_periodic_is_idempotent() {
        let mut timer = FakeTimer::new(1);
        let mut seq = TickSequencer::new(&mut timer, 1000);
        seq.start_periodic().unwrap();
        seq.start_periodic().unwrap();
        assert!(timer.armed);
        assert_eq!(timer.arm_calls, 2);
    }

    #[test]
    fn reset_restarts_the_elapsed_count() {
        let mut timer = FakeTimer::new(1);
        let mut seq = TickSequencer::new(&mut timer, 1000);
        seq.start_periodic().unwrap();
        seq.wait_until(5);
        seq.reset_ticks();
        assert_eq!(seq.ticks(), 0);
        seq.wait_until(3);
        assert_eq!(timer.waits, 8);
    }
}
