//! Pin-level drivers, hardware initialisation, and peripheral helpers.

pub mod dht11;
pub mod echo;
pub mod edge;
pub mod gpio;
pub mod hw_init;
pub mod stepper;
