//! Status LED pattern selection.
//!
//! The indicator level is a pure function of the current monitor state
//! and the clock, so it needs no phase bookkeeping and recovers cleanly
//! from skipped ticks.
//!
//! ## Patterns by state
//!
//! | State             | Pattern         | On / period     |
//! |-------------------|-----------------|-----------------|
//! | Initializing      | Off             | -               |
//! | WaitingForFinger  | Slow blink      | 500 / 1000 ms   |
//! | Measuring         | Fast blink      | 100 / 200 ms    |
//! | DisplayingResults | Solid           | -               |
//! | Error             | Rapid flash     | 50 / 100 ms     |

use crate::app::ports::StatusLedPort;
use crate::fsm::StateId;

/// Square-wave or constant pattern for a single-colour LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedPattern {
    Off,
    Solid,
    /// ON for the first `on_ms` of every `period_ms`.
    Blink { on_ms: u32, period_ms: u32 },
}

impl LedPattern {
    pub const SLOW_BLINK: Self = Self::Blink {
        on_ms: 500,
        period_ms: 1000,
    };
    pub const FAST_BLINK: Self = Self::Blink {
        on_ms: 100,
        period_ms: 200,
    };
    pub const RAPID_FLASH: Self = Self::Blink {
        on_ms: 50,
        period_ms: 100,
    };

    pub fn for_state(state: StateId) -> Self {
        match state {
            StateId::Initializing => Self::Off,
            StateId::WaitingForFinger => Self::SLOW_BLINK,
            StateId::Measuring => Self::FAST_BLINK,
            StateId::DisplayingResults => Self::Solid,
            StateId::Error => Self::RAPID_FLASH,
        }
    }

    /// LED level at absolute time `now_ms`.
    pub fn level(self, now_ms: u32) -> bool {
        match self {
            Self::Off => false,
            Self::Solid => true,
            Self::Blink { on_ms, period_ms } => now_ms % period_ms.max(1) < on_ms,
        }
    }
}

/// Drives the status LED from the monitor state every loop iteration.
#[derive(Debug, Default)]
pub struct StatusIndicator;

impl StatusIndicator {
    pub fn new() -> Self {
        Self
    }

    /// Set the LED to the level the current state's pattern dictates.
    pub fn update(&mut self, state: StateId, now_ms: u32, led: &mut impl StatusLedPort) {
        led.set_level(LedPattern::for_state(state).level(now_ms));
    }
}
