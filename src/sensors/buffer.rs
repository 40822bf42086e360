//! Fixed-capacity sliding window over the red/IR channels.
//!
//! ```text
//!  index:   0 ............................. N-k-1 | N-k ........ N-1
//!  before:  [ oldest k ][      retained N-k      ]
//!  after:   [      retained N-k      ][ k fresh samples from source ]
//! ```
//!
//! The window is filled once per measurement session and then refreshed
//! `k` samples at a time. Every sample wait is bounded: the source is
//! polled at most [`PollBudget::attempts`] times, sleeping
//! [`PollBudget::interval_us`] between polls, before the read gives up
//! with [`SensorError::Timeout`].

use embedded_hal::delay::DelayNs;
use log::debug;

use super::SamplePair;
use crate::app::ports::SampleSource;
use crate::config::MonitorConfig;
use crate::error::SensorError;

/// Number of sample pairs in the window.
pub const BUFFER_LEN: usize = 100;

/// Upper bound on how long a single sample read may wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollBudget {
    pub attempts: u32,
    pub interval_us: u32,
}

impl From<&MonitorConfig> for PollBudget {
    fn from(cfg: &MonitorConfig) -> Self {
        Self {
            attempts: cfg.sample_poll_attempts(),
            interval_us: cfg.sample_poll_interval_us,
        }
    }
}

/// Wait for one fresh sample pair, consuming it from the source.
pub fn poll_pair(
    source: &mut (impl SampleSource + DelayNs),
    budget: PollBudget,
) -> Result<SamplePair, SensorError> {
    for _ in 0..budget.attempts {
        if source.is_sample_available() {
            let pair = source.read_pair();
            source.advance();
            return Ok(pair);
        }
        source.delay_us(budget.interval_us);
    }
    Err(SensorError::Timeout)
}

/// The sliding sample window. Always exactly [`BUFFER_LEN`] entries, oldest first.
pub struct SignalBuffer {
    samples: [SamplePair; BUFFER_LEN],
    filled: bool,
}

impl Default for SignalBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalBuffer {
    pub fn new() -> Self {
        Self {
            samples: [SamplePair::default(); BUFFER_LEN],
            filled: false,
        }
    }

    /// Capture [`BUFFER_LEN`] fresh samples, replacing the whole window.
    ///
    /// On timeout the window is left stale and must be filled again.
    pub fn fill(
        &mut self,
        source: &mut (impl SampleSource + DelayNs),
        budget: PollBudget,
    ) -> Result<(), SensorError> {
        self.filled = false;
        for slot in &mut self.samples {
            *slot = poll_pair(source, budget)?;
        }
        self.filled = true;
        Ok(())
    }

    /// Drop the oldest `shift` samples and append `shift` fresh ones.
    ///
    /// A window that was never filled (or went stale) gets a full fill
    /// instead.
    pub fn slide_refresh(
        &mut self,
        shift: usize,
        source: &mut (impl SampleSource + DelayNs),
        budget: PollBudget,
    ) -> Result<(), SensorError> {
        if !self.filled {
            debug!("SignalBuffer: refresh on stale window, doing full fill");
            return self.fill(source, budget);
        }
        debug_assert!(shift > 0 && shift < BUFFER_LEN, "invalid shift {shift}");
        let shift = shift.clamp(1, BUFFER_LEN - 1);

        self.samples.copy_within(shift.., 0);

        // Tail is invalid until every new sample has arrived.
        self.filled = false;
        for slot in &mut self.samples[BUFFER_LEN - shift..] {
            *slot = poll_pair(source, budget)?;
        }
        self.filled = true;
        Ok(())
    }

    /// Most recently appended pair, or `None` before the first fill.
    pub fn latest(&self) -> Option<SamplePair> {
        self.filled.then(|| self.samples[BUFFER_LEN - 1])
    }

    /// Whether the window holds a complete, current set of samples.
    pub fn is_filled(&self) -> bool {
        self.filled
    }

    /// Mark the window stale (e.g. finger removed).
    pub fn invalidate(&mut self) {
        self.filled = false;
    }

    pub fn samples(&self) -> &[SamplePair; BUFFER_LEN] {
        &self.samples
    }

    pub fn red(&self) -> impl Iterator<Item = u32> + '_ {
        self.samples.iter().map(|s| s.red)
    }
}
