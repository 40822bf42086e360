//! Actuator drivers and status-indicator patterns.

pub mod buzzer;
pub mod led_patterns;
pub mod status_led;
