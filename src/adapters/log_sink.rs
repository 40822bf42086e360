//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::{error, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Reading(e) => {
                info!(
                    "READING | HR={}{} BPM | SpO2={}{}%",
                    e.heart_rate,
                    if e.heart_rate_valid { "" } else { "?" },
                    e.spo2,
                    if e.spo2_valid { "" } else { "?" },
                );
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            AppEvent::AlertFired(kind) => {
                warn!("ALERT | {kind}");
            }
            AppEvent::SensorTimeout(state) => {
                warn!("SENSOR | sample timeout in {:?}", state);
            }
            AppEvent::SetupFailed(failure) => {
                error!("SETUP | {failure}");
            }
            AppEvent::Started(state) => {
                info!("START | initial_state={:?}", state);
            }
        }
    }
}
