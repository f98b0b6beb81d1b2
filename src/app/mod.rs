//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the business rules for the DoorSentry control ECU:
//! the command dispatcher state machine, the wire-protocol vocabulary, and
//! the actuator phase sequences.  All interaction with hardware happens
//! through **port traits** defined in [`ports`], keeping this layer fully
//! testable without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
pub mod wire;
