//! Pulse oximeter firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod alerts;
pub mod app;
pub mod config;
pub mod display;
pub mod error;
pub mod fsm;
pub mod pins;
pub mod sensors;

// Hardware-facing code. Generic over `embedded_hal` traits, so it also
// builds (and is tested) on the host.
pub mod adapters;
pub mod drivers;
