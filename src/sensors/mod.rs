//! PPG signal subsystem: sample types, the sliding window, and the
//! reference estimator.
//!
//! The raw photodetector is reached through the
//! [`SampleSource`](crate::app::ports::SampleSource) port; everything in
//! here is pure logic that runs identically on the host.

pub mod buffer;
pub mod estimator;

use serde::{Deserialize, Serialize};

/// One red/infrared intensity pair, captured once per sensor tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplePair {
    pub red: u32,
    pub infrared: u32,
}

impl SamplePair {
    pub const fn new(red: u32, infrared: u32) -> Self {
        Self { red, infrared }
    }

    /// Both channels clear `threshold` (finger present with adequate perfusion).
    pub fn above(&self, threshold: u32) -> bool {
        self.red > threshold && self.infrared > threshold
    }
}

/// Heart-rate / SpO2 estimate over the current window.
/// Replaced wholesale on every refresh; no history is kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Estimate {
    /// Beats per minute.
    pub heart_rate: i32,
    pub heart_rate_valid: bool,
    /// Saturation percentage (0–100).
    pub spo2: i32,
    pub spo2_valid: bool,
}

impl Estimate {
    /// Invalid estimate used before the first window and after finger loss.
    pub const fn none() -> Self {
        Self {
            heart_rate: 0,
            heart_rate_valid: false,
            spo2: 0,
            spo2_valid: false,
        }
    }
}

/// Qualitative contact quality shown while measuring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalStrength {
    Weak,
    Good,
    Strong,
}

impl SignalStrength {
    /// Classify an infrared level against multiples of the finger threshold.
    pub fn classify(infrared: u32, finger_threshold: u32) -> Self {
        let ir = u64::from(infrared);
        let t = u64::from(finger_threshold);
        if ir < 2 * t {
            Self::Weak
        } else if ir < 3 * t {
            Self::Good
        } else {
            Self::Strong
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Weak => "weak",
            Self::Good => "good",
            Self::Strong => "strong",
        }
    }
}
