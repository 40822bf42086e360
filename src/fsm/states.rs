//! Concrete state handler functions and table builder.
//!
//! Each state is defined by plain `fn` pointers: no closures, no
//! dynamic dispatch, no heap. Handlers never touch hardware: they read
//! the sample and estimate the service stored in the context and return
//! the next state.
//!
//! ```text
//!  INITIALIZING ──[setup ok]──▶ WAITING_FOR_FINGER ◀──────────────┐
//!        │                        │        ▲                     │
//!   [setup failed]         [finger on]  [finger off / timeout]   │
//!        ▼                        ▼        │                     │
//!      ERROR                   MEASURING ──┘            [finger off / timeout]
//!   (terminal)                    │                              │
//!                          [estimate acceptable]                 │
//!                                 ▼                              │
//!                         DISPLAYING_RESULTS ────────────────────┘
//! ```

use super::context::FsmContext;
use super::{StateDescriptor, StateId};
use crate::sensors::Estimate;
use log::{error, info};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table. Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0: Initializing
        StateDescriptor {
            id: StateId::Initializing,
            name: "Initializing",
            on_enter: Some(initializing_enter),
            on_exit: None,
            on_update: initializing_update,
        },
        // Index 1: WaitingForFinger
        StateDescriptor {
            id: StateId::WaitingForFinger,
            name: "WaitingForFinger",
            on_enter: Some(waiting_enter),
            on_exit: None,
            on_update: waiting_update,
        },
        // Index 2: Measuring
        StateDescriptor {
            id: StateId::Measuring,
            name: "Measuring",
            on_enter: Some(measuring_enter),
            on_exit: None,
            on_update: measuring_update,
        },
        // Index 3: DisplayingResults
        StateDescriptor {
            id: StateId::DisplayingResults,
            name: "DisplayingResults",
            on_enter: Some(displaying_enter),
            on_exit: None,
            on_update: displaying_update,
        },
        // Index 4: Error
        StateDescriptor {
            id: StateId::Error,
            name: "Error",
            on_enter: Some(error_enter),
            on_exit: None,
            on_update: error_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  INITIALIZING state: waiting for boot-time setup to report
// ═══════════════════════════════════════════════════════════════════════════

fn initializing_enter(_ctx: &mut FsmContext) {
    info!("INITIALIZING: bringing up sensor and display");
}

fn initializing_update(ctx: &mut FsmContext) -> Option<StateId> {
    match ctx.setup_failure {
        Some(_) => Some(StateId::Error),
        None => Some(StateId::WaitingForFinger),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  WAITING_FOR_FINGER state: probing one sample per tick for contact
// ═══════════════════════════════════════════════════════════════════════════

fn waiting_enter(ctx: &mut FsmContext) {
    ctx.estimate = Estimate::none();
    ctx.fill_requested = false;
    info!("WAITING: place finger on sensor");
}

fn waiting_update(ctx: &mut FsmContext) -> Option<StateId> {
    if ctx.sensor_timeout {
        return None;
    }
    if ctx.finger_present() {
        return Some(StateId::Measuring);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  MEASURING state: accumulating until the estimate is acceptable
// ═══════════════════════════════════════════════════════════════════════════

fn measuring_enter(ctx: &mut FsmContext) {
    // Fresh session: the service captures a full window before the next refresh.
    ctx.fill_requested = true;
    info!("MEASURING: finger detected, collecting window");
}

fn measuring_update(ctx: &mut FsmContext) -> Option<StateId> {
    if ctx.sensor_timeout || !ctx.finger_present() {
        info!("MEASURING: finger lost, window discarded");
        return Some(StateId::WaitingForFinger);
    }

    if ctx.estimate_acceptable() {
        return Some(StateId::DisplayingResults);
    }

    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  DISPLAYING_RESULTS state: showing live readings
// ═══════════════════════════════════════════════════════════════════════════

fn displaying_enter(ctx: &mut FsmContext) {
    info!(
        "RESULTS: HR {} BPM, SpO2 {}%",
        ctx.estimate.heart_rate, ctx.estimate.spo2
    );
}

fn displaying_update(ctx: &mut FsmContext) -> Option<StateId> {
    if ctx.sensor_timeout || !ctx.finger_present() {
        info!("RESULTS: finger lost");
        return Some(StateId::WaitingForFinger);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  ERROR state: terminal until restart
// ═══════════════════════════════════════════════════════════════════════════

fn error_enter(ctx: &mut FsmContext) {
    match ctx.setup_failure {
        Some(failure) => error!("ERROR: {failure}, restart required"),
        None => error!("ERROR: restart required"),
    }
}

fn error_update(_ctx: &mut FsmContext) -> Option<StateId> {
    None
}
