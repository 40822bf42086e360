//! Shared mutable context threaded through every FSM handler.
//!
//! `FsmContext` is the single struct that state handlers read from and
//! write to. The application service writes the latest sample and
//! estimate before each tick; handlers decide transitions from them and
//! leave requests (such as a window fill) for the service to carry out.

use crate::config::MonitorConfig;
use crate::error::SetupFailure;
use crate::sensors::{Estimate, SamplePair};

/// The shared context passed to every state handler function.
pub struct FsmContext {
    // -- Signal --
    /// Most recent sample pair: the window's newest entry while measuring,
    /// the last probe while waiting. `None` until anything was read.
    pub latest: Option<SamplePair>,
    /// Estimate over the current window.
    pub estimate: Estimate,
    /// Set by the service when this tick's sample read timed out.
    pub sensor_timeout: bool,

    // -- Requests (written by handlers, consumed by the service) --
    /// A fresh full window must be captured before the next refresh.
    pub fill_requested: bool,

    // -- Setup --
    /// First failure reported during boot, if any.
    pub setup_failure: Option<SetupFailure>,

    // -- Configuration --
    pub config: MonitorConfig,
}

impl FsmContext {
    /// Create a new context with the given configuration.
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            latest: None,
            estimate: Estimate::none(),
            sensor_timeout: false,
            fill_requested: false,
            setup_failure: None,
            config,
        }
    }

    /// Both channels of the latest sample clear the finger threshold.
    pub fn finger_present(&self) -> bool {
        self.latest
            .is_some_and(|s| s.above(self.config.finger_threshold))
    }

    /// The estimate is trustworthy enough to show as a result.
    pub fn estimate_acceptable(&self) -> bool {
        let e = &self.estimate;
        let c = &self.config;
        e.heart_rate_valid
            && e.spo2_valid
            && e.spo2 > c.spo2_accept_min
            && e.heart_rate > c.hr_accept_min
            && e.heart_rate < c.hr_accept_max
    }
}
