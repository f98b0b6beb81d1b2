//! Periodic tick timer driving the actuator phase sequences.
//!
//! Wraps the ESP-IDF esp_timer API: a periodic callback increments the
//! shared tick counter by exactly +1 per period and wakes the waiting
//! control context.  Callbacks execute in the ESP timer task context (not
//! ISR), so notifying a condvar from them is safe.
//!
//! Only the counter crosses the callback/control boundary, as an
//! `AtomicU32`; `reset` masks the source (stop → zero → restart) so a
//! callback increment can never race the reset.  On simulation targets the
//! counter advances synthetically, one tick per wait.

#[cfg(target_os = "espidf")]
use core::sync::atomic::{AtomicU32, Ordering};

use crate::app::ports::TickTimerPort;
use crate::error::TimerError;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use std::sync::{Condvar, Mutex};

/// Shared tick counter.  Written (+1) by the timer callback, read and reset
/// by the control context.
#[cfg(target_os = "espidf")]
static TICK_COUNT: AtomicU32 = AtomicU32::new(0);

#[cfg(target_os = "espidf")]
static TICK_WAKE: (Mutex<()>, Condvar) = (Mutex::new(()), Condvar::new());

#[cfg(target_os = "espidf")]
static mut TICK_TIMER: esp_timer_handle_t = core::ptr::null_mut();

/// SAFETY: TICK_TIMER is written once in `ensure_created()` from the single
/// main-task context before any callback fires.
#[cfg(target_os = "espidf")]
unsafe fn tick_timer_handle() -> esp_timer_handle_t {
    unsafe { TICK_TIMER }
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn tick_cb(_arg: *mut core::ffi::c_void) {
    TICK_COUNT.fetch_add(1, Ordering::Release);
    let (lock, cvar) = &TICK_WAKE;
    // Briefly take the lock so a waiter between its count check and its
    // wait cannot miss this notification entirely.
    drop(lock.lock());
    cvar.notify_all();
}

pub struct TickTimerDriver {
    #[cfg(target_os = "espidf")]
    period_ms: u32,
    armed: bool,
    #[cfg(not(target_os = "espidf"))]
    sim_ticks: u32,
}

impl TickTimerDriver {
    pub fn new() -> Self {
        Self {
            #[cfg(target_os = "espidf")]
            period_ms: 0,
            armed: false,
            #[cfg(not(target_os = "espidf"))]
            sim_ticks: 0,
        }
    }

    #[cfg(target_os = "espidf")]
    fn ensure_created(&mut self) -> Result<(), TimerError> {
        // SAFETY: TICK_TIMER is created once from the single main-task
        // context; the callback only touches TICK_COUNT and TICK_WAKE.
        unsafe {
            if !tick_timer_handle().is_null() {
                return Ok(());
            }
            let args = esp_timer_create_args_t {
                callback: Some(tick_cb),
                arg: core::ptr::null_mut(),
                dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
                name: b"tick\0".as_ptr() as *const _,
                skip_unhandled_events: false,
            };
            let ret = esp_timer_create(&args, &raw mut TICK_TIMER);
            if ret != ESP_OK {
                return Err(TimerError::ArmFailed);
            }
        }
        Ok(())
    }
}

#[cfg(target_os = "espidf")]
impl TickTimerPort for TickTimerDriver {
    fn arm(&mut self, period_ms: u32) -> Result<(), TimerError> {
        self.ensure_created()?;
        // SAFETY: handle is valid after ensure_created(); stop before
        // start makes re-arming idempotent.
        unsafe {
            if self.armed {
                esp_timer_stop(tick_timer_handle());
            }
            let ret = esp_timer_start_periodic(tick_timer_handle(), period_ms as u64 * 1_000);
            if ret != ESP_OK {
                self.armed = false;
                return Err(TimerError::ArmFailed);
            }
        }
        self.period_ms = period_ms;
        self.armed = true;
        Ok(())
    }

    fn disarm(&mut self) {
        if self.armed {
            // SAFETY: handle is valid whenever armed is true.
            unsafe {
                esp_timer_stop(tick_timer_handle());
            }
            self.armed = false;
        }
    }

    fn ticks(&self) -> u32 {
        TICK_COUNT.load(Ordering::Acquire)
    }

    fn reset_ticks(&mut self) {
        // Mask the source while zeroing so no increment can race the reset.
        let was_armed = self.armed;
        if was_armed {
            // SAFETY: handle is valid whenever armed is true.
            unsafe {
                esp_timer_stop(tick_timer_handle());
            }
        }
        TICK_COUNT.store(0, Ordering::Release);
        if was_armed {
            // SAFETY: restarting the timer we just stopped.
            unsafe {
                esp_timer_start_periodic(tick_timer_handle(), self.period_ms as u64 * 1_000);
            }
        }
    }

    fn wait_for_tick(&mut self) {
        // Bounded wait: the notify self-heals any lost wakeup, and callers
        // re-check the counter, so spurious returns are harmless.
        let timeout = std::time::Duration::from_millis(u64::from((self.period_ms / 4).max(10)));
        let (lock, cvar) = &TICK_WAKE;
        let guard = lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let _ = cvar.wait_timeout(guard, timeout);
    }
}

#[cfg(not(target_os = "espidf"))]
impl TickTimerPort for TickTimerDriver {
    fn arm(&mut self, _period_ms: u32) -> Result<(), TimerError> {
        self.armed = true;
        Ok(())
    }

    fn disarm(&mut self) {
        self.armed = false;
    }

    fn ticks(&self) -> u32 {
        self.sim_ticks
    }

    fn reset_ticks(&mut self) {
        self.sim_ticks = 0;
    }

    fn wait_for_tick(&mut self) {
        if self.armed {
            // Synthetic time: one tick per wait.
            self.sim_ticks += 1;
        } else {
            // A disarmed source never ticks; mirror the hardware stall
            // without burning a core.
            std::thread::sleep(std::time::Duration::from_millis(1));
        }
    }
}
