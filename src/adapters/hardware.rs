//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the sensor, display, buzzer, status LED, delay provider and
//! clock, exposing them together so the
//! [`AppService`](crate::app::service::AppService) can take a single
//! `&mut` per tick. This is the only value in the system that touches
//! actual hardware; every port simply forwards to the owned driver.

use embedded_hal::delay::DelayNs;

use crate::app::ports::{
    BuzzerPort, ClockPort, DisplayPort, SampleSource, StatusLedPort,
};
use crate::sensors::SamplePair;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<S, L, B, P, D, C> {
    sensor: S,
    display: L,
    buzzer: B,
    led: P,
    delay: D,
    clock: C,
}

impl<S, L, B, P, D, C> HardwareAdapter<S, L, B, P, D, C> {
    pub fn new(sensor: S, display: L, buzzer: B, led: P, delay: D, clock: C) -> Self {
        Self {
            sensor,
            display,
            buzzer,
            led,
            delay,
            clock,
        }
    }
}

// ── SampleSource ──────────────────────────────────────────────

impl<S: SampleSource, L, B, P, D, C> SampleSource for HardwareAdapter<S, L, B, P, D, C> {
    fn is_sample_available(&mut self) -> bool {
        self.sensor.is_sample_available()
    }

    fn read_pair(&mut self) -> SamplePair {
        self.sensor.read_pair()
    }

    fn advance(&mut self) {
        self.sensor.advance();
    }
}

// ── Output ports ──────────────────────────────────────────────

impl<S, L: DisplayPort, B, P, D, C> DisplayPort for HardwareAdapter<S, L, B, P, D, C> {
    fn clear(&mut self) {
        self.display.clear();
    }

    fn set_cursor(&mut self, col: u8, row: u8) {
        self.display.set_cursor(col, row);
    }

    fn print(&mut self, text: &str) {
        self.display.print(text);
    }

    fn commit(&mut self) {
        self.display.commit();
    }
}

impl<S, L, B: BuzzerPort, P, D, C> BuzzerPort for HardwareAdapter<S, L, B, P, D, C> {
    fn set_tone(&mut self, on: bool) {
        self.buzzer.set_tone(on);
    }
}

impl<S, L, B, P: StatusLedPort, D, C> StatusLedPort for HardwareAdapter<S, L, B, P, D, C> {
    fn set_level(&mut self, on: bool) {
        self.led.set_level(on);
    }
}

// ── Time ──────────────────────────────────────────────────────

impl<S, L, B, P, D, C: ClockPort> ClockPort for HardwareAdapter<S, L, B, P, D, C> {
    fn now_ms(&self) -> u32 {
        self.clock.now_ms()
    }
}

impl<S, L, B, P, D: DelayNs, C> DelayNs for HardwareAdapter<S, L, B, P, D, C> {
    fn delay_ns(&mut self, ns: u32) {
        self.delay.delay_ns(ns);
    }

    fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}
