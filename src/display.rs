//! Rate-limited rendering of state-specific text to the 16×2 display.
//!
//! Content is built by [`render_lines`] (pure, no I/O), then pushed through
//! the [`DisplayPort`] only when the state's interval has elapsed since the
//! previous render.
//!
//! ```text
//!  WaitingForFinger   "Place finger"    / "on sensor"
//!  Measuring          "Measuring..."    / "Signal: good"
//!  DisplayingResults  "HR: 72 BPM"      / "SpO2: 97% OK"
//!  Error              "Sensor error"    / "Restart device"
//! ```

use core::fmt::Write;

use heapless::String;

use crate::app::ports::DisplayPort;
use crate::config::MonitorConfig;
use crate::fsm::StateId;
use crate::fsm::context::FsmContext;
use crate::sensors::SignalStrength;

/// Characters per display row.
pub const LINE_WIDTH: usize = 16;

/// One display row.
pub type Line = String<LINE_WIDTH>;

/// Display throttler. Owns the "last rendered" timestamp.
#[derive(Debug, Default)]
pub struct DisplayThrottler {
    last_render_ms: Option<u32>,
}

impl DisplayThrottler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render the current state's content if its interval has elapsed.
    /// Returns `true` if the display was written.
    pub fn update(
        &mut self,
        state: StateId,
        ctx: &FsmContext,
        now_ms: u32,
        display: &mut impl DisplayPort,
    ) -> bool {
        let interval = interval_for(state, &ctx.config);
        let due = self
            .last_render_ms
            .is_none_or(|t| now_ms.wrapping_sub(t) >= interval);
        if !due {
            return false;
        }

        let Some((top, bottom)) = render_lines(state, ctx) else {
            return false;
        };

        display.clear();
        display.set_cursor(0, 0);
        display.print(&top);
        display.set_cursor(0, 1);
        display.print(&bottom);
        display.commit();

        self.last_render_ms = Some(now_ms);
        true
    }
}

fn interval_for(state: StateId, config: &MonitorConfig) -> u32 {
    match state {
        StateId::Error => config.error_display_interval_ms,
        _ => config.display_interval_ms,
    }
}

/// Build the two display rows for `state`. `None` means nothing to show.
pub fn render_lines(state: StateId, ctx: &FsmContext) -> Option<(Line, Line)> {
    let mut top = Line::new();
    let mut bottom = Line::new();

    // Lines are sized for the glass; overflowing writes are truncated.
    match state {
        StateId::Initializing => return None,
        StateId::WaitingForFinger => {
            let _ = top.push_str("Place finger");
            let _ = bottom.push_str("on sensor");
        }
        StateId::Measuring => {
            let _ = top.push_str("Measuring...");
            let ir = ctx.latest.map_or(0, |s| s.infrared);
            let strength = SignalStrength::classify(ir, ctx.config.finger_threshold);
            let _ = write!(bottom, "Signal: {}", strength.label());
        }
        StateId::DisplayingResults => {
            let e = &ctx.estimate;
            if e.heart_rate_valid {
                let _ = write!(top, "HR: {} BPM", e.heart_rate);
            } else {
                let _ = top.push_str("HR: -- BPM");
            }
            if e.spo2_valid {
                let _ = write!(bottom, "SpO2: {}% {}", e.spo2, spo2_tag(e.spo2, &ctx.config));
            } else {
                let _ = bottom.push_str("SpO2: --%");
            }
        }
        StateId::Error => {
            let _ = top.push_str("Sensor error");
            let _ = bottom.push_str("Restart device");
        }
    }

    Some((top, bottom))
}

/// Qualitative SpO2 tag: `OK`, `LO`, or the critical marker `!!`.
pub fn spo2_tag(spo2: i32, config: &MonitorConfig) -> &'static str {
    if spo2 >= config.spo2_ok_min {
        "OK"
    } else if spo2 >= config.spo2_low_below {
        "LO"
    } else {
        "!!"
    }
}
