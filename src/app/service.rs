//! Application service: the hexagonal core.
//!
//! [`AppService`] owns the FSM, the sample window, the alert manager and
//! the display throttler. It exposes a clean, hardware-agnostic API. All
//! I/O flows through port traits injected at call sites, making the
//! entire service testable with mock adapters.
//!
//! ```text
//!  SampleSource ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                   │          AppService          │
//!  DisplayPort  ◀── │  Window · FSM · Alerts ·     │
//!  BuzzerPort   ◀── │  Display · Status LED        │
//!  StatusLedPort◀── └──────────────────────────────┘
//! ```
//!
//! ## Tick order
//!
//! 1. Acquire: probe one sample (waiting) or slide the window and
//!    re-estimate (measuring / showing results).
//! 2. FSM tick. At most one transition.
//! 3. Session start: if the FSM asked for it, capture a full window and
//!    compute the initial estimate.
//! 4. Alerts, then display, then status LED, all against the state the
//!    machine is in *now*.
//! 5. Idle delay.

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use crate::alerts::AlertManager;
use crate::config::MonitorConfig;
use crate::display::DisplayThrottler;
use crate::drivers::led_patterns::StatusIndicator;
use crate::error::{self, SensorError, SetupFailure};
use crate::fsm::context::FsmContext;
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};
use crate::sensors::buffer::{PollBudget, SignalBuffer, poll_pair};
use crate::sensors::{Estimate, SamplePair};

use super::events::AppEvent;
use super::ports::{
    BuzzerPort, ClockPort, DisplayPort, Estimator, EventSink, SampleSource, StatusLedPort,
};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService<E: Estimator> {
    fsm: Fsm,
    ctx: FsmContext,
    buffer: SignalBuffer,
    alerts: AlertManager,
    display: DisplayThrottler,
    indicator: StatusIndicator,
    estimator: E,
    tick_count: u64,
}

impl<E: Estimator> AppService<E> {
    /// Construct the service from configuration.
    ///
    /// Does **not** start the FSM: call [`start`](Self::start) next.
    pub fn new(config: MonitorConfig, estimator: E) -> Self {
        let ctx = FsmContext::new(config);
        let fsm = Fsm::new(build_state_table(), StateId::Initializing);

        Self {
            fsm,
            ctx,
            buffer: SignalBuffer::new(),
            alerts: AlertManager::new(),
            display: DisplayThrottler::new(),
            indicator: StatusIndicator::new(),
            estimator,
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Record the boot-time setup outcome and enter `Initializing`.
    ///
    /// A failed collaborator or an invalid configuration parks the
    /// machine in `Error` on the first tick.
    pub fn start(&mut self, setup: error::Result<()>, sink: &mut impl EventSink) {
        let failure = setup.err().map(error::Error::as_setup_failure).or_else(|| {
            self.ctx
                .config
                .validate()
                .err()
                .map(SetupFailure::Config)
        });

        if let Some(f) = failure {
            warn!("Setup failed: {f}");
            sink.emit(&AppEvent::SetupFailed(f));
        }
        self.ctx.setup_failure = failure;

        self.fsm.start(&mut self.ctx);
        sink.emit(&AppEvent::Started(self.fsm.current_state()));
        info!("AppService started in {:?}", self.fsm.current_state());
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full control-loop iteration.
    ///
    /// The `hw` parameter satisfies **every** hardware port plus
    /// [`DelayNs`]; this avoids double mutable borrows while keeping the
    /// port boundary explicit.
    pub fn tick(
        &mut self,
        hw: &mut (impl SampleSource
                  + DisplayPort
                  + BuzzerPort
                  + StatusLedPort
                  + ClockPort
                  + DelayNs),
        sink: &mut impl EventSink,
    ) {
        self.tick_count += 1;
        let prev_state = self.fsm.current_state();
        let budget = PollBudget::from(&self.ctx.config);
        self.ctx.sensor_timeout = false;

        // 1. Acquire
        match prev_state {
            StateId::WaitingForFinger => match poll_pair(hw, budget) {
                Ok(pair) => self.ctx.latest = Some(pair),
                Err(e) => self.on_sensor_error(prev_state, e, sink),
            },
            StateId::Measuring | StateId::DisplayingResults => {
                let shift = self.ctx.config.window_shift;
                match self.buffer.slide_refresh(shift, hw, budget) {
                    Ok(()) => {
                        self.ctx.latest = self.buffer.latest();
                        self.recompute_estimate(sink);
                    }
                    Err(e) => self.on_sensor_error(prev_state, e, sink),
                }
            }
            StateId::Initializing | StateId::Error => {}
        }

        // 2. FSM tick (pure state logic)
        self.fsm.tick(&mut self.ctx);

        // 3. Session start: full window + initial estimate
        if self.ctx.fill_requested {
            self.ctx.fill_requested = false;
            self.start_session(hw, budget, sink);
        }

        // 4. Emit state change if the FSM moved
        let state = self.fsm.current_state();
        if state != prev_state {
            sink.emit(&AppEvent::StateChanged {
                from: prev_state,
                to: state,
            });
        }

        // 5. Alerts (may block for the pattern's duration)
        let now = hw.now_ms();
        let fired = self.alerts.evaluate(
            &self.ctx.estimate,
            self.ctx.finger_present(),
            now,
            hw,
            &self.ctx.config,
        );
        for kind in fired {
            sink.emit(&AppEvent::AlertFired(kind));
        }

        // 6. Display and status LED
        let now = hw.now_ms();
        self.display.update(state, &self.ctx, now, hw);
        self.indicator.update(state, now, hw);

        // 7. Idle
        hw.delay_ms(self.ctx.config.loop_idle_ms);
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current FSM state.
    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    /// Latest estimate (invalid outside a measuring session).
    pub fn estimate(&self) -> Estimate {
        self.ctx.estimate
    }

    /// Latest sample the finger check ran against.
    pub fn latest_sample(&self) -> Option<SamplePair> {
        self.ctx.latest
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Whether the sliding window currently holds a complete session.
    pub fn window_filled(&self) -> bool {
        self.buffer.is_filled()
    }

    // ── Internal ──────────────────────────────────────────────

    fn start_session(
        &mut self,
        hw: &mut (impl SampleSource + DelayNs),
        budget: PollBudget,
        sink: &mut impl EventSink,
    ) {
        self.buffer.invalidate();
        match self.buffer.fill(hw, budget) {
            Ok(()) => {
                self.ctx.latest = self.buffer.latest();
                self.recompute_estimate(sink);
            }
            Err(e) => {
                let state = self.fsm.current_state();
                self.on_sensor_error(state, e, sink);
                self.fsm
                    .force_transition(StateId::WaitingForFinger, &mut self.ctx);
            }
        }
    }

    fn recompute_estimate(&mut self, sink: &mut impl EventSink) {
        self.ctx.estimate = self.estimator.estimate(&self.buffer);
        sink.emit(&AppEvent::Reading(self.ctx.estimate));
    }

    fn on_sensor_error(&mut self, state: StateId, err: SensorError, sink: &mut impl EventSink) {
        warn!("Sensor {err} in {state:?}, window discarded");
        self.ctx.sensor_timeout = true;
        self.ctx.latest = None;
        self.buffer.invalidate();
        sink.emit(&AppEvent::SensorTimeout(state));
    }
}
