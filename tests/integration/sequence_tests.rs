//! Integration tests for the timed actuator sequences.
//!
//! The synthetic tick timer advances one tick per wait, so phase durations
//! are observable as exact wait counts.

use crate::mock_hw::{ActuatorCall, MockActuators, MockEeprom, MockTickTimer, RecordingSink, ScriptedLink};

use doorsentry::app::events::AppEvent;
use doorsentry::app::service::{AlarmPhase, LockService, MotorPhase};
use doorsentry::app::wire::Code;
use doorsentry::config::SystemConfig;

/// Provision then issue one idle command, running until the script ends.
fn run_after_provisioning(command: Code) -> (ScriptedLink, MockTickTimer, MockActuators, RecordingSink, LockService) {
    let mut service = LockService::new(SystemConfig::default());
    let mut link = ScriptedLink::new(&[
        Code::HmiReady as u8,
        Code::StorePassword as u8,
        1,
        2,
        3,
        4,
        5,
        command as u8,
    ]);
    let mut store = MockEeprom::new();
    let mut timer = MockTickTimer::new();
    let mut hw = MockActuators::new();
    let mut sink = RecordingSink::new();

    service
        .run(&mut link, &mut hw, &mut timer, &mut store, &mut sink)
        .unwrap_err();

    (link, timer, hw, sink, service)
}

// ── Motor sequence ───────────────────────────────────────────

#[test]
fn motor_sequence_is_strictly_ordered() {
    let (_, _, hw, _, _) = run_after_provisioning(Code::UnlockDoor);
    assert_eq!(
        hw.calls,
        vec![
            ActuatorCall::Motor {
                duty: 100,
                clockwise: true
            },
            ActuatorCall::StopMotor,
            ActuatorCall::Motor {
                duty: 100,
                clockwise: false
            },
            ActuatorCall::StopMotor,
        ]
    );
}

#[test]
fn motor_sequence_totals_33_ticks() {
    let (_, timer, _, _, _) = run_after_provisioning(Code::UnlockDoor);
    // 15 unlock + 3 hold-open + 15 relock, one wakeup per tick.
    assert_eq!(timer.wait_calls, 33);
    assert_eq!(timer.reset_calls, 3, "each phase restarts the count");
}

#[test]
fn motor_sequence_releases_the_timer() {
    let (_, timer, _, _, _) = run_after_provisioning(Code::UnlockDoor);
    assert_eq!(timer.arm_calls, 1);
    assert!(!timer.armed, "timer must never outlive its sequence");
}

#[test]
fn motor_phases_are_reported_in_order() {
    let (_, _, _, sink, _) = run_after_provisioning(Code::UnlockDoor);
    let phases: Vec<MotorPhase> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::MotorPhase(p) => Some(*p),
            _ => None,
        })
        .collect();
    assert_eq!(
        phases,
        vec![
            MotorPhase::Unlocking,
            MotorPhase::HoldingOpen,
            MotorPhase::Relocking,
            MotorPhase::Stopped,
        ]
    );
}

// ── Alarm sequence ───────────────────────────────────────────

#[test]
fn alarm_sequence_sounds_for_60_ticks() {
    let (_, timer, hw, _, _) = run_after_provisioning(Code::RaiseAlarm);
    assert_eq!(hw.calls, vec![ActuatorCall::BuzzerOn, ActuatorCall::BuzzerOff]);
    assert_eq!(timer.wait_calls, 60);
    assert!(!timer.armed);
    assert_eq!(timer.ticks, 0, "alarm sequence leaves the count cleared");
}

#[test]
fn alarm_phases_are_reported_in_order() {
    let (_, _, _, sink, service) = run_after_provisioning(Code::RaiseAlarm);
    let phases: Vec<AlarmPhase> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::AlarmPhase(p) => Some(*p),
            _ => None,
        })
        .collect();
    assert_eq!(phases, vec![AlarmPhase::Sounding, AlarmPhase::Silent]);
    assert_eq!(service.stats().alarm_sequences, 1);
}

// ── Timer ownership across sequences ─────────────────────────

#[test]
fn back_to_back_sequences_rearm_cleanly() {
    let mut service = LockService::new(SystemConfig::default());
    let mut link = ScriptedLink::new(&[
        Code::HmiReady as u8,
        Code::StorePassword as u8,
        1,
        2,
        3,
        4,
        5,
        Code::UnlockDoor as u8,
        Code::RaiseAlarm as u8,
    ]);
    let mut store = MockEeprom::new();
    let mut timer = MockTickTimer::new();
    let mut hw = MockActuators::new();
    let mut sink = RecordingSink::new();

    service
        .run(&mut link, &mut hw, &mut timer, &mut store, &mut sink)
        .unwrap_err();

    assert_eq!(timer.arm_calls, 2, "one arm per sequence");
    assert!(!timer.armed);
    assert_eq!(timer.wait_calls, 33 + 60);
    assert_eq!(service.stats().unlock_sequences, 1);
    assert_eq!(service.stats().alarm_sequences, 1);
}
