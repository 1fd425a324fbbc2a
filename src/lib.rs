//! SmartBin principal-node firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod scheduler;

pub mod pins;

// Hardware-facing layers; the real implementations are guarded by cfg
// attributes inside, with host simulation stubs alongside.
pub mod adapters;
pub mod drivers;
pub mod sensors;
