//! Audible alert manager.
//!
//! Runs **every tick after the FSM** and maps the current estimate to a
//! buzzer pattern. Two independent channels, each with its own cooldown:
//!
//! | Channel    | Condition                      | Pattern                       |
//! |------------|--------------------------------|-------------------------------|
//! | SpO2       | `0 < spo2 ≤ 80`                | one 1000 ms tone              |
//! | SpO2       | `80 < spo2 < 90`               | 200 ms, 300 ms gap, 200 ms    |
//! | Heart rate | `hr > 120` or `hr < 50` (valid)| one 100 ms tone               |
//!
//! Nothing fires unless SpO2 is valid and a finger is on the sensor.
//! Patterns are played synchronously: the loop is blocked on
//! [`DelayNs`] for the pattern's full duration.

use core::fmt;

use embedded_hal::delay::DelayNs;
use log::warn;

use crate::app::ports::BuzzerPort;
use crate::config::MonitorConfig;
use crate::sensors::Estimate;

/// One buzzer edge followed by a hold time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneStep {
    pub on: bool,
    pub ms: u32,
}

const fn tone(ms: u32) -> ToneStep {
    ToneStep { on: true, ms }
}

const fn gap(ms: u32) -> ToneStep {
    ToneStep { on: false, ms }
}

const CRITICAL_PATTERN: [ToneStep; 1] = [tone(1000)];
const LOW_PATTERN: [ToneStep; 3] = [tone(200), gap(300), tone(200)];
const HEART_RATE_PATTERN: [ToneStep; 1] = [tone(100)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertKind {
    SpO2Critical,
    SpO2Low,
    HeartRateOutOfRange,
}

impl AlertKind {
    /// Buzzer steps for this alert. The buzzer is always left off afterwards.
    pub fn pattern(self) -> &'static [ToneStep] {
        match self {
            Self::SpO2Critical => &CRITICAL_PATTERN,
            Self::SpO2Low => &LOW_PATTERN,
            Self::HeartRateOutOfRange => &HEART_RATE_PATTERN,
        }
    }

    /// Total blocking time of the pattern.
    pub fn duration_ms(self) -> u32 {
        self.pattern().iter().map(|s| s.ms).sum()
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SpO2Critical => write!(f, "SpO2 critical"),
            Self::SpO2Low => write!(f, "SpO2 low"),
            Self::HeartRateOutOfRange => write!(f, "heart rate out of range"),
        }
    }
}

/// Alerts played in one evaluation (at most one per channel).
pub type FiredAlerts = heapless::Vec<AlertKind, 2>;

/// Alert manager. Owns the per-channel "last fired" timestamps.
#[derive(Debug, Default)]
pub struct AlertManager {
    last_spo2_alert_ms: Option<u32>,
    last_hr_alert_ms: Option<u32>,
}

impl AlertManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// SpO2 pattern warranted by `spo2`, ignoring cooldown.
    pub fn classify_spo2(spo2: i32, config: &MonitorConfig) -> Option<AlertKind> {
        if spo2 > 0 && spo2 <= config.spo2_critical_max {
            Some(AlertKind::SpO2Critical)
        } else if spo2 > config.spo2_critical_max && spo2 < config.spo2_low_below {
            Some(AlertKind::SpO2Low)
        } else {
            None
        }
    }

    /// Whether the heart-rate channel is warranted, ignoring cooldown.
    pub fn heart_rate_abnormal(estimate: &Estimate, config: &MonitorConfig) -> bool {
        estimate.heart_rate_valid
            && (estimate.heart_rate > config.hr_alert_above
                || estimate.heart_rate < config.hr_alert_below)
    }

    /// Evaluate both channels and play whatever is due.
    ///
    /// `now_ms` is sampled once by the caller; a channel's cooldown starts
    /// at the moment its pattern starts, so the heart-rate channel is
    /// stamped after any SpO2 pattern played ahead of it.
    pub fn evaluate(
        &mut self,
        estimate: &Estimate,
        finger_present: bool,
        now_ms: u32,
        buzzer: &mut (impl BuzzerPort + DelayNs),
        config: &MonitorConfig,
    ) -> FiredAlerts {
        let mut fired = FiredAlerts::new();
        let mut start_ms = now_ms;
        if !estimate.spo2_valid || !finger_present {
            return fired;
        }

        // ── SpO2 channel ──────────────────────────────────────────
        if let Some(kind) = Self::classify_spo2(estimate.spo2, config) {
            if cooled_down(self.last_spo2_alert_ms, now_ms, config.alert_cooldown_ms) {
                self.last_spo2_alert_ms = Some(now_ms);
                warn!("ALERT: {kind} (SpO2 {}%)", estimate.spo2);
                play(kind, buzzer);
                start_ms = start_ms.wrapping_add(kind.duration_ms());
                let _ = fired.push(kind);
            }
        }

        // ── Heart-rate channel ────────────────────────────────────
        if Self::heart_rate_abnormal(estimate, config)
            && cooled_down(self.last_hr_alert_ms, start_ms, config.hr_alert_cooldown_ms)
        {
            self.last_hr_alert_ms = Some(start_ms);
            let kind = AlertKind::HeartRateOutOfRange;
            warn!("ALERT: {kind} ({} BPM)", estimate.heart_rate);
            play(kind, buzzer);
            let _ = fired.push(kind);
        }

        fired
    }

    pub fn last_spo2_alert_ms(&self) -> Option<u32> {
        self.last_spo2_alert_ms
    }

    pub fn last_hr_alert_ms(&self) -> Option<u32> {
        self.last_hr_alert_ms
    }
}

fn cooled_down(last: Option<u32>, now_ms: u32, cooldown_ms: u32) -> bool {
    last.is_none_or(|t| now_ms.wrapping_sub(t) >= cooldown_ms)
}

fn play(kind: AlertKind, buzzer: &mut (impl BuzzerPort + DelayNs)) {
    for step in kind.pattern() {
        buzzer.set_tone(step.on);
        buzzer.delay_ms(step.ms);
    }
    buzzer.set_tone(false);
}
