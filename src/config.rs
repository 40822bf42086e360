//! Monitor configuration parameters
//!
//! All tunable parameters for the pulse oximeter. Values are compiled in
//! through [`MonitorConfig::default`] and checked once at boot by
//! [`MonitorConfig::validate`].

use serde::{Deserialize, Serialize};

use crate::sensors::buffer::BUFFER_LEN;

/// Core monitor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    // --- Acquisition ---
    /// Samples replaced per windowed refresh (must be in `1..BUFFER_LEN`)
    pub window_shift: usize,
    /// Raw level both channels must exceed for a finger to count as present
    pub finger_threshold: u32,
    /// Effective sensor sample rate after on-chip averaging (Hz)
    pub sample_rate_hz: u32,
    /// Give up waiting for a single sample after this long (milliseconds)
    pub sample_timeout_ms: u32,
    /// Wait between two availability polls (microseconds)
    pub sample_poll_interval_us: u32,

    // --- Estimate acceptance ---
    /// SpO2 must be strictly above this to show results (%)
    pub spo2_accept_min: i32,
    /// Heart rate must be strictly above this to show results (BPM)
    pub hr_accept_min: i32,
    /// Heart rate must be strictly below this to show results (BPM)
    pub hr_accept_max: i32,

    // --- Alerts ---
    /// SpO2 at or below this (and above 0) triggers the continuous tone (%)
    pub spo2_critical_max: i32,
    /// SpO2 below this triggers the double tone (%)
    pub spo2_low_below: i32,
    /// Heart rate above this triggers the short tone (BPM)
    pub hr_alert_above: i32,
    /// Heart rate below this triggers the short tone (BPM)
    pub hr_alert_below: i32,
    /// Minimum gap between two SpO2 alert pattern starts (milliseconds)
    pub alert_cooldown_ms: u32,
    /// Minimum gap between two heart-rate alert starts (milliseconds)
    pub hr_alert_cooldown_ms: u32,

    // --- Display ---
    /// SpO2 at or above this is tagged `OK` (%)
    pub spo2_ok_min: i32,
    /// Display refresh interval in normal states (milliseconds)
    pub display_interval_ms: u32,
    /// Display refresh interval in the Error state (milliseconds)
    pub error_display_interval_ms: u32,

    // --- Timing ---
    /// Idle delay at the end of every control-loop iteration (milliseconds)
    pub loop_idle_ms: u32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            // Acquisition
            window_shift: 25,
            finger_threshold: 50_000,
            sample_rate_hz: 25, // 100 sps, 4x averaging
            sample_timeout_ms: 1000,
            sample_poll_interval_us: 1000,

            // Acceptance bounds
            spo2_accept_min: 70,
            hr_accept_min: 30,
            hr_accept_max: 200,

            // Alerts
            spo2_critical_max: 80,
            spo2_low_below: 90,
            hr_alert_above: 120,
            hr_alert_below: 50,
            alert_cooldown_ms: 3000,
            hr_alert_cooldown_ms: 3000,

            // Display
            spo2_ok_min: 95,
            display_interval_ms: 1000,
            error_display_interval_ms: 2000,

            // Timing
            loop_idle_ms: 10,
        }
    }
}

impl MonitorConfig {
    /// Reject values that would break buffer or timing invariants.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.window_shift == 0 || self.window_shift >= BUFFER_LEN {
            return Err("window_shift must be in 1..BUFFER_LEN");
        }
        if self.finger_threshold == 0 {
            return Err("finger_threshold must be non-zero");
        }
        if self.sample_rate_hz == 0 {
            return Err("sample_rate_hz must be non-zero");
        }
        if self.sample_timeout_ms == 0 || self.sample_poll_interval_us == 0 {
            return Err("sample poll timeout and interval must be non-zero");
        }
        if !(0..=100).contains(&self.spo2_accept_min) {
            return Err("spo2_accept_min must be 0–100");
        }
        if self.hr_accept_min >= self.hr_accept_max {
            return Err("hr_accept_min must be < hr_accept_max");
        }
        if self.spo2_critical_max >= self.spo2_low_below {
            return Err("spo2_critical_max must be < spo2_low_below");
        }
        if self.hr_alert_below >= self.hr_alert_above {
            return Err("hr_alert_below must be < hr_alert_above");
        }
        if self.spo2_low_below > self.spo2_ok_min {
            return Err("spo2_low_below must be <= spo2_ok_min");
        }
        if self.display_interval_ms == 0 || self.error_display_interval_ms == 0 {
            return Err("display intervals must be non-zero");
        }
        Ok(())
    }

    /// Milliseconds between two consecutive sensor samples.
    pub fn sample_period_ms(&self) -> u32 {
        1000 / self.sample_rate_hz.max(1)
    }

    /// Number of availability polls before a single sample read times out.
    pub fn sample_poll_attempts(&self) -> u32 {
        let interval = self.sample_poll_interval_us.max(1);
        (self.sample_timeout_ms.saturating_mul(1000) / interval).max(1)
    }
}
