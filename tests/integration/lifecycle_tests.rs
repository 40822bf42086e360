//! Setup failure, sensor timeouts, status LED patterns and the reference
//! estimator driven through the full control loop.

use super::mock_hw::{FINGER, MockHardware, NO_FINGER, RecordingSink, ScriptedEstimator, reading};

use pulseox::app::events::AppEvent;
use pulseox::app::service::AppService;
use pulseox::config::MonitorConfig;
use pulseox::error::{self, SetupFailure};
use pulseox::fsm::StateId;
use pulseox::sensors::Estimate;
use pulseox::sensors::estimator::PeakRatioEstimator;

fn boot_with(
    config: MonitorConfig,
    setup: error::Result<()>,
    estimate: Estimate,
) -> (AppService<ScriptedEstimator>, MockHardware, RecordingSink) {
    let mut app = AppService::new(config, ScriptedEstimator::new(estimate));
    let mut sink = RecordingSink::new();
    app.start(setup, &mut sink);
    (app, MockHardware::with_level(FINGER), sink)
}

fn boot(estimate: Estimate) -> (AppService<ScriptedEstimator>, MockHardware, RecordingSink) {
    boot_with(MonitorConfig::default(), Ok(()), estimate)
}

// ── Setup failure ─────────────────────────────────────────────

#[test]
fn setup_failure_parks_in_error() {
    let (mut app, mut hw, mut sink) =
        boot_with(MonitorConfig::default(), Err(SetupFailure::Sensor.into()), reading(97, 72));

    app.tick(&mut hw, &mut sink);
    assert_eq!(app.state(), StateId::Error);
    assert!(sink.events.contains(&AppEvent::SetupFailed(SetupFailure::Sensor)));
    assert!(sink.events.contains(&AppEvent::StateChanged {
        from: StateId::Initializing,
        to: StateId::Error,
    }));

    for _ in 0..50 {
        app.tick(&mut hw, &mut sink);
    }
    assert_eq!(app.state(), StateId::Error, "Error is terminal");
    assert_eq!(hw.samples_consumed, 0, "sensor is never polled in Error");
    assert!(hw.tones.is_empty());
}

#[test]
fn invalid_config_is_treated_as_setup_failure() {
    let config = MonitorConfig {
        window_shift: 100,
        ..MonitorConfig::default()
    };
    let (mut app, mut hw, mut sink) = boot_with(config, Ok(()), reading(97, 72));
    app.tick(&mut hw, &mut sink);
    assert_eq!(app.state(), StateId::Error);
    assert!(matches!(
        sink.events[0],
        AppEvent::SetupFailed(SetupFailure::Config(_))
    ));
}

#[test]
fn error_message_rerenders_every_two_seconds() {
    let (mut app, mut hw, mut sink) =
        boot_with(MonitorConfig::default(), Err(SetupFailure::Display.into()), Estimate::none());

    // 10 ms idle per tick: 500 ticks span 5 s.
    for _ in 0..500 {
        app.tick(&mut hw, &mut sink);
    }

    let times: Vec<u32> = hw.renders.iter().map(|r| r.at_ms).collect();
    assert_eq!(times, vec![0, 2000, 4000]);
    assert!(
        hw.renders
            .iter()
            .all(|r| r.lines == ["Sensor error".to_string(), "Restart device".to_string()])
    );
}

#[test]
fn error_led_flashes_rapidly() {
    let (mut app, mut hw, mut sink) =
        boot_with(MonitorConfig::default(), Err(SetupFailure::Sensor.into()), Estimate::none());
    for _ in 0..40 {
        app.tick(&mut hw, &mut sink);
    }
    assert!(hw.led.iter().any(|(on, _)| *on));
    assert!(hw.led.iter().any(|(on, _)| !*on));
    for (on, at) in &hw.led {
        assert_eq!(*on, at % 100 < 50, "at {at} ms");
    }
}

// ── Sensor timeout ────────────────────────────────────────────

#[test]
fn timeout_while_showing_results_returns_to_waiting() {
    let (mut app, mut hw, mut sink) = boot(reading(97, 72));
    while app.state() != StateId::DisplayingResults {
        app.tick(&mut hw, &mut sink);
        assert!(app.tick_count() < 10);
    }

    hw.stalled = true;
    let t0 = hw.elapsed_ms();
    app.tick(&mut hw, &mut sink);

    assert_eq!(app.state(), StateId::WaitingForFinger);
    assert!(sink.events.contains(&AppEvent::SensorTimeout(StateId::DisplayingResults)));
    assert!(!app.window_filled());
    assert_eq!(app.latest_sample(), None);
    assert!(hw.elapsed_ms() - t0 >= 1000, "poll is bounded by the sample timeout");

    // Sensor recovers: a new session starts from scratch.
    hw.stalled = false;
    app.tick(&mut hw, &mut sink);
    assert_eq!(app.state(), StateId::Measuring);
    assert!(app.window_filled());
}

#[test]
fn timeout_while_waiting_keeps_waiting() {
    let (mut app, mut hw, mut sink) = boot(reading(97, 72));
    app.tick(&mut hw, &mut sink);
    assert_eq!(app.state(), StateId::WaitingForFinger);

    hw.stalled = true;
    for _ in 0..3 {
        app.tick(&mut hw, &mut sink);
        assert_eq!(app.state(), StateId::WaitingForFinger);
    }
    assert_eq!(
        sink.count(|e| *e == AppEvent::SensorTimeout(StateId::WaitingForFinger)),
        3
    );
}

#[test]
fn timeout_during_session_fill_abandons_session() {
    let (mut app, mut hw, mut sink) = boot(reading(97, 72));
    app.tick(&mut hw, &mut sink);

    // Probe succeeds, the fill dies half way.
    hw.stall_after = Some(hw.samples_consumed + 50);
    app.tick(&mut hw, &mut sink);

    assert_eq!(app.state(), StateId::WaitingForFinger);
    assert!(sink.events.contains(&AppEvent::SensorTimeout(StateId::Measuring)));
    assert!(!app.window_filled());
    assert_eq!(app.estimate(), Estimate::none());
}

// ── Finger handling ───────────────────────────────────────────

#[test]
fn no_finger_keeps_prompting() {
    let (mut app, mut hw, mut sink) = boot(reading(97, 72));
    hw.level = NO_FINGER;
    for _ in 0..30 {
        app.tick(&mut hw, &mut sink);
    }
    assert_eq!(app.state(), StateId::WaitingForFinger);
    assert_eq!(hw.last_lines(), Some(("Place finger", "on sensor")));
    assert_eq!(sink.count(|e| matches!(e, AppEvent::Reading(_))), 0);
}

#[test]
fn finger_removed_mid_measurement() {
    let (mut app, mut hw, mut sink) = boot(Estimate::none());
    app.tick(&mut hw, &mut sink);
    app.tick(&mut hw, &mut sink);
    assert_eq!(app.state(), StateId::Measuring);

    hw.level = NO_FINGER;
    app.tick(&mut hw, &mut sink);
    assert_eq!(app.state(), StateId::WaitingForFinger);
}

#[test]
fn prompt_is_throttled_to_display_interval() {
    let (mut app, mut hw, mut sink) = boot(reading(97, 72));
    hw.level = NO_FINGER;
    // 50 ms per waiting tick (one 40 ms sample + 10 ms idle).
    for _ in 0..100 {
        app.tick(&mut hw, &mut sink);
    }
    let span = hw.elapsed_ms();
    assert!(hw.renders.len() as u32 <= span.div_ceil(1000) + 1);
    for pair in hw.renders.windows(2) {
        assert!(pair[1].at_ms - pair[0].at_ms >= 1000);
    }
}

// ── Status LED ────────────────────────────────────────────────

#[test]
fn led_follows_state_pattern() {
    let (mut app, mut hw, mut sink) = boot(reading(97, 72));
    hw.level = NO_FINGER;
    for _ in 0..40 {
        app.tick(&mut hw, &mut sink);
    }
    for (on, at) in &hw.led {
        assert_eq!(*on, at % 1000 < 500, "slow blink at {at} ms");
    }

    hw.level = FINGER;
    while app.state() != StateId::DisplayingResults {
        app.tick(&mut hw, &mut sink);
    }
    hw.led.clear();
    for _ in 0..5 {
        app.tick(&mut hw, &mut sink);
    }
    assert!(hw.led.iter().all(|(on, _)| *on), "solid while showing results");
}

// ── Reference estimator end to end ────────────────────────────

#[test]
fn reference_estimator_reaches_results_on_synthetic_pulse() {
    let config = MonitorConfig::default();
    let mut app = AppService::new(config.clone(), PeakRatioEstimator::new(config.sample_rate_hz));
    let mut sink = RecordingSink::new();
    let mut hw = MockHardware::with_level(FINGER);
    hw.pulse = true;
    app.start(Ok(()), &mut sink);

    for _ in 0..10 {
        if app.state() == StateId::DisplayingResults {
            break;
        }
        app.tick(&mut hw, &mut sink);
    }

    assert_eq!(app.state(), StateId::DisplayingResults);
    let e = app.estimate();
    assert!((66..=78).contains(&e.heart_rate), "hr={}", e.heart_rate);
    assert!((95..=99).contains(&e.spo2), "spo2={}", e.spo2);
    assert!(hw.tones.is_empty());
}
