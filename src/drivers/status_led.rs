//! Single-colour status LED driver.
//!
//! ## Dual-target design
//!
//! Generic over any `embedded_hal` output pin: on ESP-IDF this is an
//! `esp_idf_hal::gpio::PinDriver`, in tests a recording mock. The last
//! requested level is tracked in-memory so redundant writes are skipped.

use embedded_hal::digital::OutputPin;
use log::warn;

use crate::app::ports::StatusLedPort;

pub struct StatusLed<P: OutputPin> {
    pin: P,
    current: Option<bool>,
}

impl<P: OutputPin> StatusLed<P> {
    pub fn new(pin: P) -> Self {
        Self { pin, current: None }
    }

    pub fn off(&mut self) {
        self.set_level(false);
    }

    /// Last level written, `None` before the first write.
    pub fn current_level(&self) -> Option<bool> {
        self.current
    }
}

impl<P: OutputPin> StatusLedPort for StatusLed<P> {
    fn set_level(&mut self, on: bool) {
        if self.current == Some(on) {
            return;
        }
        let res = if on {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        match res {
            Ok(()) => self.current = Some(on),
            Err(e) => warn!("StatusLed: pin write failed: {e:?}"),
        }
    }
}
