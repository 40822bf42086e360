//! Active piezo buzzer driver.
//!
//! The buzzer has an internal oscillator, so a tone is just the GPIO held
//! HIGH. Pattern timing lives in [`crate::alerts`]; this driver is a dumb
//! actuator.

use embedded_hal::digital::OutputPin;
use log::warn;

use crate::app::ports::BuzzerPort;

pub struct Buzzer<P: OutputPin> {
    pin: P,
    sounding: bool,
}

impl<P: OutputPin> Buzzer<P> {
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            sounding: false,
        }
    }

    pub fn is_sounding(&self) -> bool {
        self.sounding
    }
}

impl<P: OutputPin> BuzzerPort for Buzzer<P> {
    fn set_tone(&mut self, on: bool) {
        let res = if on {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        match res {
            Ok(()) => self.sounding = on,
            Err(e) => warn!("Buzzer: pin write failed: {e:?}"),
        }
    }
}
