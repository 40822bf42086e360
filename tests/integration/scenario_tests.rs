//! End-to-end reading scenarios: finger on the sensor, scripted estimates,
//! and what reaches the display and buzzer.

use super::mock_hw::{FINGER, MockHardware, RecordingSink, ScriptedEstimator, reading};

use pulseox::alerts::AlertKind;
use pulseox::app::events::AppEvent;
use pulseox::app::service::AppService;
use pulseox::config::MonitorConfig;
use pulseox::fsm::StateId;
use pulseox::sensors::{Estimate, SamplePair};

type App = AppService<ScriptedEstimator>;

fn boot(level: SamplePair, estimate: Estimate) -> (App, MockHardware, RecordingSink, ScriptedEstimator) {
    let est = ScriptedEstimator::new(estimate);
    let mut app = AppService::new(MonitorConfig::default(), est.clone());
    let hw = MockHardware::with_level(level);
    let mut sink = RecordingSink::new();
    app.start(Ok(()), &mut sink);
    (app, hw, sink, est)
}

fn run_until(app: &mut App, hw: &mut MockHardware, sink: &mut RecordingSink, target: StateId, max_ticks: u32) -> bool {
    for _ in 0..max_ticks {
        if app.state() == target {
            return true;
        }
        app.tick(hw, sink);
    }
    app.state() == target
}

fn alerts_of(sink: &RecordingSink, kind: AlertKind) -> usize {
    sink.count(|e| *e == AppEvent::AlertFired(kind))
}

// ── Scenario A: normal reading ────────────────────────────────

#[test]
fn normal_reading_is_displayed_without_alert() {
    let (mut app, mut hw, mut sink, _) = boot(FINGER, reading(97, 72));

    assert!(run_until(&mut app, &mut hw, &mut sink, StateId::DisplayingResults, 10));
    app.tick(&mut hw, &mut sink);

    assert_eq!(app.state(), StateId::DisplayingResults);
    assert_eq!(hw.last_lines(), Some(("HR: 72 BPM", "SpO2: 97% OK")));
    assert!(hw.tones.is_empty(), "no buzzer activity expected");
    assert_eq!(sink.count(|e| matches!(e, AppEvent::AlertFired(_))), 0);
}

#[test]
fn session_walks_through_expected_states() {
    let (mut app, mut hw, mut sink, _) = boot(FINGER, reading(97, 72));
    run_until(&mut app, &mut hw, &mut sink, StateId::DisplayingResults, 10);

    let transitions: Vec<(StateId, StateId)> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::StateChanged { from, to } => Some((*from, *to)),
            _ => None,
        })
        .collect();
    assert_eq!(
        transitions,
        vec![
            (StateId::Initializing, StateId::WaitingForFinger),
            (StateId::WaitingForFinger, StateId::Measuring),
            (StateId::Measuring, StateId::DisplayingResults),
        ]
    );
    assert_eq!(sink.events[0], AppEvent::Started(StateId::Initializing));
}

#[test]
fn measuring_prompt_reports_signal_strength() {
    let (mut app, mut hw, mut sink, est) = boot(SamplePair::new(160_000, 160_000), Estimate::none());
    assert!(run_until(&mut app, &mut hw, &mut sink, StateId::Measuring, 5));
    est.set(Estimate::none());
    app.tick(&mut hw, &mut sink);

    assert_eq!(app.state(), StateId::Measuring);
    assert_eq!(hw.last_lines(), Some(("Measuring...", "Signal: strong")));
}

#[test]
fn invalid_estimate_keeps_measuring() {
    let (mut app, mut hw, mut sink, _) = boot(FINGER, reading(65, 72));
    run_until(&mut app, &mut hw, &mut sink, StateId::Measuring, 5);
    for _ in 0..5 {
        app.tick(&mut hw, &mut sink);
        assert_eq!(app.state(), StateId::Measuring);
    }
}

// ── Scenario B: low SpO2 ──────────────────────────────────────

#[test]
fn low_spo2_plays_double_tone_then_cools_down() {
    let (mut app, mut hw, mut sink, _) = boot(FINGER, reading(85, 72));

    for _ in 0..8 {
        app.tick(&mut hw, &mut sink);
    }

    let t0 = hw.tones[0].1;
    assert_eq!(
        &hw.tones[..4],
        &[(true, t0), (false, t0 + 200), (true, t0 + 500), (false, t0 + 700)]
    );

    let starts = hw.tone_starts();
    // Two tone starts per pattern; consecutive patterns are >= 3 s apart.
    for pair in starts.chunks(2).collect::<Vec<_>>().windows(2) {
        assert!(pair[1][0] - pair[0][0] >= 3000, "patterns too close: {starts:?}");
    }
    assert!(alerts_of(&sink, AlertKind::SpO2Low) >= 2);
    assert_eq!(alerts_of(&sink, AlertKind::SpO2Critical), 0);
    assert_eq!(hw.last_lines().map(|l| l.1), Some("SpO2: 85% !!"));
}

// ── Scenario C: critical SpO2 ─────────────────────────────────

#[test]
fn critical_spo2_plays_single_long_tone() {
    let (mut app, mut hw, mut sink, _) = boot(FINGER, reading(60, 72));

    // Init -> Waiting, then Waiting -> Measuring with the initial estimate.
    app.tick(&mut hw, &mut sink);
    app.tick(&mut hw, &mut sink);

    assert_eq!(app.state(), StateId::Measuring, "60% is below the acceptance bound");
    let t0 = hw.tones[0].1;
    assert_eq!(hw.tones, vec![(true, t0), (false, t0 + 1000)]);
    assert_eq!(alerts_of(&sink, AlertKind::SpO2Critical), 1);
    assert_eq!(alerts_of(&sink, AlertKind::SpO2Low), 0);
}

// ── Scenario D: finger removed while showing results ─────────

#[test]
fn finger_loss_returns_to_prompt() {
    let (mut app, mut hw, mut sink, _) = boot(FINGER, reading(97, 72));
    assert!(run_until(&mut app, &mut hw, &mut sink, StateId::DisplayingResults, 10));

    hw.level = SamplePair::new(120_000, 1_000);
    let renders_before = hw.renders.len();
    let t_before = hw.elapsed_ms();
    app.tick(&mut hw, &mut sink);

    assert_eq!(app.state(), StateId::WaitingForFinger);
    assert_eq!(app.estimate(), Estimate::none());
    assert!(!app.window_filled());
    assert!(
        sink.events.contains(&AppEvent::StateChanged {
            from: StateId::DisplayingResults,
            to: StateId::WaitingForFinger,
        })
    );

    // Prompt shows up within one display interval of the transition.
    let deadline = hw.elapsed_ms() + 1000;
    while hw.renders.len() == renders_before && hw.elapsed_ms() <= deadline {
        app.tick(&mut hw, &mut sink);
    }
    let render = hw.last_render().cloned().unwrap_or_else(|| panic!("nothing rendered"));
    assert!(render.at_ms > t_before && render.at_ms <= deadline);
    assert_eq!(render.lines, ["Place finger".to_string(), "on sensor".to_string()]);
}

#[test]
fn finger_returning_starts_a_fresh_session() {
    let (mut app, mut hw, mut sink, _) = boot(FINGER, reading(97, 72));
    run_until(&mut app, &mut hw, &mut sink, StateId::DisplayingResults, 10);

    hw.level = SamplePair::new(1_000, 1_000);
    app.tick(&mut hw, &mut sink);
    assert_eq!(app.state(), StateId::WaitingForFinger);

    hw.level = FINGER;
    let consumed = hw.samples_consumed;
    app.tick(&mut hw, &mut sink);
    assert_eq!(app.state(), StateId::Measuring);
    // One probe plus a full window.
    assert_eq!(hw.samples_consumed - consumed, 101);
    assert!(app.window_filled());
}

// ── Scenario E: heart rate out of range, SpO2 normal ──────────

#[test]
fn high_heart_rate_plays_short_tone_only() {
    let (mut app, mut hw, mut sink, _) = boot(FINGER, reading(96, 135));
    assert!(run_until(&mut app, &mut hw, &mut sink, StateId::DisplayingResults, 10));

    let t0 = hw.tones[0].1;
    assert_eq!(&hw.tones[..2], &[(true, t0), (false, t0 + 100)]);
    assert!(alerts_of(&sink, AlertKind::HeartRateOutOfRange) >= 1);
    assert_eq!(alerts_of(&sink, AlertKind::SpO2Low), 0);
    assert_eq!(alerts_of(&sink, AlertKind::SpO2Critical), 0);
}

#[test]
fn heart_rate_and_spo2_channels_fire_together() {
    let (mut app, mut hw, mut sink, _) = boot(FINGER, reading(85, 40));
    app.tick(&mut hw, &mut sink);
    app.tick(&mut hw, &mut sink);

    assert_eq!(alerts_of(&sink, AlertKind::SpO2Low), 1);
    assert_eq!(alerts_of(&sink, AlertKind::HeartRateOutOfRange), 1);
    // Double tone (2 starts) followed by the short tone (1 start).
    assert_eq!(hw.tone_starts().len(), 3);
}
