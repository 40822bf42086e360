//! Mock hardware adapter for integration tests.
//!
//! A single value implementing every hardware port plus `DelayNs`. Time
//! is simulated: delays advance the clock, and consuming a sample costs
//! one sample period, so every test is fully deterministic. Every output
//! call is recorded with its timestamp.

#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use pulseox::app::events::AppEvent;
use pulseox::app::ports::{
    BuzzerPort, ClockPort, DisplayPort, Estimator, EventSink, SampleSource, StatusLedPort,
};
use pulseox::sensors::buffer::SignalBuffer;
use pulseox::sensors::{Estimate, SamplePair};

/// Comfortably above the default finger threshold on both channels.
pub const FINGER: SamplePair = SamplePair::new(120_000, 120_000);
/// Ambient light only.
pub const NO_FINGER: SamplePair = SamplePair::new(2_000, 2_000);

/// One committed display frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Render {
    pub at_ms: u32,
    pub lines: [String; 2],
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    now_ns: u64,
    /// Level returned by every sample read.
    pub level: SamplePair,
    /// When set, the sensor never reports a sample.
    pub stalled: bool,
    /// Stall once this many samples have been consumed in total.
    pub stall_after: Option<u64>,
    /// Superimpose a 72 BPM pulse on `level` (red 1 %, IR 2 % modulation).
    pub pulse: bool,
    pub sample_period_ms: u32,
    pub samples_consumed: u64,

    /// `(on, at_ms)` for every buzzer edge.
    pub tones: Vec<(bool, u32)>,
    /// `(on, at_ms)` for every LED write.
    pub led: Vec<(bool, u32)>,
    pub renders: Vec<Render>,
    frame: [String; 2],
    row: usize,
}

impl MockHardware {
    pub fn new() -> Self {
        Self {
            now_ns: 0,
            level: NO_FINGER,
            stalled: false,
            stall_after: None,
            pulse: false,
            sample_period_ms: 40,
            samples_consumed: 0,
            tones: Vec::new(),
            led: Vec::new(),
            renders: Vec::new(),
            frame: Default::default(),
            row: 0,
        }
    }

    pub fn with_level(level: SamplePair) -> Self {
        Self {
            level,
            ..Self::new()
        }
    }

    pub fn elapsed_ms(&self) -> u32 {
        self.now_ms()
    }

    pub fn last_render(&self) -> Option<&Render> {
        self.renders.last()
    }

    pub fn last_lines(&self) -> Option<(&str, &str)> {
        self.renders
            .last()
            .map(|r| (r.lines[0].as_str(), r.lines[1].as_str()))
    }

    /// Buzzer-on edges (pattern tone starts).
    pub fn tone_starts(&self) -> Vec<u32> {
        self.tones.iter().filter(|(on, _)| *on).map(|(_, t)| *t).collect()
    }

    fn advance_ms(&mut self, ms: u32) {
        self.now_ns += u64::from(ms) * 1_000_000;
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleSource for MockHardware {
    fn is_sample_available(&mut self) -> bool {
        !self.stalled && self.stall_after.is_none_or(|n| self.samples_consumed < n)
    }

    fn read_pair(&mut self) -> SamplePair {
        if !self.pulse {
            return self.level;
        }
        let t = self.samples_consumed as f32 * self.sample_period_ms as f32 / 1000.0;
        let phase = (2.0 * std::f32::consts::PI * 1.2 * t).sin();
        let red = self.level.red as f32;
        let ir = self.level.infrared as f32;
        SamplePair::new(
            (red + red * 0.01 * phase) as u32,
            (ir + ir * 0.02 * phase) as u32,
        )
    }

    fn advance(&mut self) {
        self.samples_consumed += 1;
        self.advance_ms(self.sample_period_ms);
    }
}

impl DisplayPort for MockHardware {
    fn clear(&mut self) {
        self.frame = Default::default();
        self.row = 0;
    }

    fn set_cursor(&mut self, _col: u8, row: u8) {
        self.row = usize::from(row).min(1);
    }

    fn print(&mut self, text: &str) {
        self.frame[self.row].push_str(text);
    }

    fn commit(&mut self) {
        let at_ms = self.now_ms();
        self.renders.push(Render {
            at_ms,
            lines: self.frame.clone(),
        });
    }
}

impl BuzzerPort for MockHardware {
    fn set_tone(&mut self, on: bool) {
        let at = self.now_ms();
        self.tones.push((on, at));
    }
}

impl StatusLedPort for MockHardware {
    fn set_level(&mut self, on: bool) {
        let at = self.now_ms();
        self.led.push((on, at));
    }
}

impl ClockPort for MockHardware {
    fn now_ms(&self) -> u32 {
        (self.now_ns / 1_000_000) as u32
    }
}

impl DelayNs for MockHardware {
    fn delay_ns(&mut self, ns: u32) {
        self.now_ns += u64::from(ns);
    }

    fn delay_us(&mut self, us: u32) {
        self.now_ns += u64::from(us) * 1_000;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.advance_ms(ms);
    }
}

// ── Scripted estimator ────────────────────────────────────────

/// Estimator whose output the test sets directly.
#[derive(Clone)]
pub struct ScriptedEstimator(pub Rc<Cell<Estimate>>);

impl ScriptedEstimator {
    pub fn new(initial: Estimate) -> Self {
        Self(Rc::new(Cell::new(initial)))
    }

    pub fn set(&self, estimate: Estimate) {
        self.0.set(estimate);
    }
}

impl Estimator for ScriptedEstimator {
    fn estimate(&self, _buffer: &SignalBuffer) -> Estimate {
        self.0.get()
    }
}

pub fn reading(spo2: i32, heart_rate: i32) -> Estimate {
    Estimate {
        heart_rate,
        heart_rate_valid: true,
        spo2,
        spo2_valid: true,
    }
}

// ── Event recorder ────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
