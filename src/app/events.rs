//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port. Adapters on the other
//! side decide what to do with them (serial log, test recorder).

use crate::alerts::AlertKind;
use crate::error::SetupFailure;
use crate::fsm::StateId;
use crate::sensors::Estimate;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The application service has started (carries initial state).
    Started(StateId),

    /// The FSM transitioned between states.
    StateChanged { from: StateId, to: StateId },

    /// A fresh estimate was computed from the window.
    Reading(Estimate),

    /// An audible alert pattern was played.
    AlertFired(AlertKind),

    /// The sensor stopped delivering samples while in the given state.
    SensorTimeout(StateId),

    /// Boot-time setup failed; the monitor is parked in `Error`.
    SetupFailed(SetupFailure),
}
