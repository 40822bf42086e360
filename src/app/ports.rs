//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (PPG sensor, LCD, buzzer, LED, clock, event sinks)
//! implement these traits. The [`AppService`](super::service::AppService)
//! consumes them via generics, so the domain core never touches hardware
//! directly. Blocking waits go through [`embedded_hal::delay::DelayNs`].

use crate::sensors::Estimate;
use crate::sensors::SamplePair;
use crate::sensors::buffer::SignalBuffer;

// ───────────────────────────────────────────────────────────────
// Sample source (driven adapter: photodetector → domain)
// ───────────────────────────────────────────────────────────────

/// Polled source of raw red/IR pairs.
///
/// The caller checks availability, reads the current pair, then calls
/// [`advance`](Self::advance) so the next poll can surface a new one.
pub trait SampleSource {
    /// Whether an unread sample is waiting. May return `false` repeatedly.
    fn is_sample_available(&mut self) -> bool;

    /// The current sample. Only meaningful after `is_sample_available()`.
    fn read_pair(&mut self) -> SamplePair;

    /// Consume the current sample.
    fn advance(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Estimator (pure function over the window)
// ───────────────────────────────────────────────────────────────

/// Heart-rate / SpO2 estimation. Deterministic, no side effects.
pub trait Estimator {
    fn estimate(&self, buffer: &SignalBuffer) -> Estimate;
}

// ───────────────────────────────────────────────────────────────
// Output ports (driven adapters: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Character display. Nothing reaches the glass until [`commit`](Self::commit).
pub trait DisplayPort {
    fn clear(&mut self);
    fn set_cursor(&mut self, col: u8, row: u8);
    fn print(&mut self, text: &str);
    fn commit(&mut self);
}

/// Piezo buzzer. The caller owns the timing between on/off edges.
pub trait BuzzerPort {
    fn set_tone(&mut self, on: bool);
}

/// Single-colour status LED.
pub trait StatusLedPort {
    fn set_level(&mut self, on: bool);
}

/// Monotonic millisecond clock. Wraps at `u32::MAX`; compare with
/// `wrapping_sub`.
pub trait ClockPort {
    fn now_ms(&self) -> u32;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
