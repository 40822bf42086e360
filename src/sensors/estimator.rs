//! Reference heart-rate / SpO2 estimator.
//!
//! A deliberately simple stand-in for the vendor algorithm, good enough
//! for bring-up and host tests:
//!
//! - **Heart rate**: IR peaks above the window mean, spaced at least one
//!   refractory period apart; BPM from the mean peak-to-peak interval.
//! - **SpO2**: ratio of ratios `R = (AC_red / DC_red) / (AC_ir / DC_ir)`,
//!   mapped with the common empirical line `110 − 25·R`.
//!
//! Either value is flagged invalid when the window does not support it
//! (flat signal, fewer than two peaks, ratio outside the calibrated range).

use super::Estimate;
use super::buffer::{BUFFER_LEN, SignalBuffer};
use crate::app::ports::Estimator;

/// Fastest heart rate the peak picker will resolve (BPM).
const MAX_PHYSIOLOGICAL_BPM: u32 = 240;

pub struct PeakRatioEstimator {
    sample_rate_hz: u32,
}

impl PeakRatioEstimator {
    pub fn new(sample_rate_hz: u32) -> Self {
        Self {
            sample_rate_hz: sample_rate_hz.max(1),
        }
    }

    fn heart_rate(&self, ir: &[f32; BUFFER_LEN]) -> Option<i32> {
        let mean = mean(ir);
        let refractory = (self.sample_rate_hz * 60 / MAX_PHYSIOLOGICAL_BPM).max(1) as usize;

        let mut count = 0u32;
        let mut first = 0usize;
        let mut last: Option<usize> = None;
        for i in 1..BUFFER_LEN - 1 {
            let v = ir[i] - mean;
            let is_peak = v > 0.0 && ir[i] > ir[i - 1] && ir[i] >= ir[i + 1];
            if !is_peak {
                continue;
            }
            if last.is_some_and(|p| i - p < refractory) {
                continue;
            }
            if last.is_none() {
                first = i;
            }
            last = Some(i);
            count += 1;
        }

        let last = last?;
        if count < 2 {
            return None;
        }
        let interval = (last - first) as f32 / (count - 1) as f32;
        Some((60.0 * self.sample_rate_hz as f32 / interval).round() as i32)
    }

    fn spo2(red: &[f32; BUFFER_LEN], ir: &[f32; BUFFER_LEN]) -> Option<i32> {
        let (ac_red, dc_red) = ac_dc(red);
        let (ac_ir, dc_ir) = ac_dc(ir);
        if dc_red <= 0.0 || dc_ir <= 0.0 || ac_red <= 0.0 || ac_ir <= 0.0 {
            return None;
        }
        let r = (ac_red / dc_red) / (ac_ir / dc_ir);
        let spo2 = (110.0 - 25.0 * r).round();
        (0.0..=100.0).contains(&spo2).then_some(spo2 as i32)
    }
}

impl Estimator for PeakRatioEstimator {
    fn estimate(&self, buffer: &SignalBuffer) -> Estimate {
        let mut red = [0.0f32; BUFFER_LEN];
        let mut ir = [0.0f32; BUFFER_LEN];
        for (i, s) in buffer.samples().iter().enumerate() {
            red[i] = s.red as f32;
            ir[i] = s.infrared as f32;
        }

        let hr = self.heart_rate(&ir);
        let spo2 = Self::spo2(&red, &ir);
        Estimate {
            heart_rate: hr.unwrap_or(0),
            heart_rate_valid: hr.is_some(),
            spo2: spo2.unwrap_or(0),
            spo2_valid: spo2.is_some(),
        }
    }
}

fn mean(xs: &[f32]) -> f32 {
    xs.iter().sum::<f32>() / xs.len() as f32
}

/// Peak-to-peak amplitude and mean level.
fn ac_dc(xs: &[f32]) -> (f32, f32) {
    let (lo, hi) = xs
        .iter()
        .fold((f32::MAX, f32::MIN), |(lo, hi), &x| (lo.min(x), hi.max(x)));
    (hi - lo, mean(xs))
}
