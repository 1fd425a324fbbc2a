//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the business rules for the SmartBin principal
//! node: the shared snapshot, window and deposit policy, reporting and
//! alerts, and the per-iteration task ordering.  All interaction with
//! hardware happens through **port traits** defined in [`ports`], keeping
//! this layer fully testable without real peripherals.

pub mod commands;
pub mod context;
pub mod events;
pub mod ports;
pub mod report;
pub mod service;
pub mod window;
