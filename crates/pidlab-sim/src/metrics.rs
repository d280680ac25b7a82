//! Response metrics computed from a completed run.
//!
//! These are display-layer numbers (the control loop never reads them), but
//! they live here so the CLI and the tests share one implementation.

use pidlab_core::{Real, within_band};
use serde::{Deserialize, Serialize};

use crate::runner::SimulationRun;

/// Standard step-response quality metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ResponseMetrics {
    /// `|error|` at the final sample.
    pub steady_state_error: Real,
    /// Peak output excursion above the setpoint, percent of setpoint.
    /// Zero when the output never exceeds the setpoint or the setpoint is 0.
    pub overshoot_pct: Real,
    /// First time after which the output stays inside the ±2% band around
    /// the setpoint. Zero when the output never leaves the band.
    pub settling_time_s: Real,
}

const SETTLING_BAND_FRAC: Real = 0.02;

impl ResponseMetrics {
    /// Compute metrics for a finished run.
    ///
    /// The driver never produces an empty run, but the series fields are
    /// public; a caller-built run with no samples yields all-zero metrics
    /// instead of panicking.
    pub fn from_run(run: &SimulationRun) -> Self {
        if run.is_empty() {
            return Self::default();
        }
        let n = run.len();
        let steady_state_error = run.error[n - 1].abs();

        let peak = run.output.iter().copied().fold(Real::NEG_INFINITY, Real::max);
        let overshoot_pct = if run.setpoint != 0.0 {
            ((peak - run.setpoint) / run.setpoint * 100.0).max(0.0)
        } else {
            0.0
        };

        let settling_time_s = settling_time(&run.output, &run.time, run.setpoint);

        Self {
            steady_state_error,
            overshoot_pct,
            settling_time_s,
        }
    }
}

/// Time of the sample after the last departure from the ±2% band.
///
/// Returns 0 when the trajectory never leaves the band, and the final time
/// when the final sample itself is outside it (the run never settled).
fn settling_time(output: &[Real], time: &[Real], setpoint: Real) -> Real {
    let last_violation = output
        .iter()
        .rposition(|&y| !within_band(y, setpoint, SETTLING_BAND_FRAC));

    match last_violation {
        None => 0.0,
        Some(idx) if idx >= time.len() - 1 => time[time.len() - 1],
        Some(idx) => time[idx + 1],
    }
}
