//! Discrete-time PID controller with anti-windup.

use pidlab_core::Real;
use serde::{Deserialize, Serialize};

/// Saturation limits applied to the controller output.
///
/// No ordering is enforced between `min` and `max`; the controller trusts its
/// caller, like everything else in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutputLimits {
    /// Minimum output value.
    pub min: Real,
    /// Maximum output value.
    pub max: Real,
}

impl OutputLimits {
    pub fn new(min: Real, max: Real) -> Self {
        Self { min, max }
    }
}

/// Individual P/I/D contributions from the last `update` call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PidComponents {
    pub proportional: Real,
    pub integral: Real,
    pub derivative: Real,
}

/// Snapshot of gains and internal state, for display and debugging.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidTuning {
    pub kp: Real,
    pub ki: Real,
    pub kd: Real,
    /// Accumulated error-time product.
    pub integral_state: Real,
    /// Error seen by the previous `update` call.
    pub previous_error: Real,
}

/// Stateful discrete PID controller.
///
/// Computes `u = kp*e + ki*∫e dt + kd*de/dt` with rectangular integration and
/// a backward-difference derivative. When [`OutputLimits`] are set, the output
/// is clamped and the integral accumulator is back-solved so that the stored
/// state reproduces the clamped output exactly (anti-windup).
///
/// # Example
///
/// ```
/// use pidlab_control::PidController;
///
/// let mut pid = PidController::new(1.0, 0.1, 0.05);
/// let u = pid.update(10.0, 0.01);
/// assert!(u > 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PidController {
    /// Proportional gain.
    pub kp: Real,
    /// Integral gain.
    pub ki: Real,
    /// Derivative gain.
    pub kd: Real,
    output_limits: Option<OutputLimits>,
    integral: Real,
    previous_error: Real,
    components: PidComponents,
}

impl PidController {
    /// Create a controller with the given gains and no output limits.
    ///
    /// Gains are accepted as-is; this controller performs no tuning
    /// validation.
    pub fn new(kp: Real, ki: Real, kd: Real) -> Self {
        Self {
            kp,
            ki,
            kd,
            output_limits: None,
            integral: 0.0,
            previous_error: 0.0,
            components: PidComponents::default(),
        }
    }

    /// Attach output saturation limits.
    pub fn with_output_limits(mut self, limits: OutputLimits) -> Self {
        self.output_limits = Some(limits);
        self
    }

    /// Install or replace output limits after construction.
    pub fn set_output_limits(&mut self, min: Real, max: Real) {
        self.output_limits = Some(OutputLimits { min, max });
    }

    /// Advance the controller by one sample and return the control signal.
    ///
    /// `error` is `setpoint - measured`; `dt` is the time since the last
    /// update in seconds. A zero `dt` is legal: the derivative term is
    /// defined as zero for that sample instead of dividing by zero.
    ///
    /// Ordering matters for the anti-windup correction: P, the integral
    /// accumulation, and D are all computed from the pre-clamp state, THEN
    /// the output is clamped and the integral is back-solved from those same
    /// pre-clamp P and D values. This makes the stored integral satisfy
    /// `kp*e + ki*integral + kd*d == bound` for the inputs of this step.
    pub fn update(&mut self, error: Real, dt: Real) -> Real {
        let p = self.kp * error;

        self.integral += error * dt;
        let i = self.ki * self.integral;

        let derivative = if dt > 0.0 {
            (error - self.previous_error) / dt
        } else {
            0.0
        };
        let d = self.kd * derivative;

        let mut output = p + i + d;

        // Components snapshot the pre-clamp terms; the anti-windup
        // correction below rewrites the accumulator, not these.
        self.components = PidComponents {
            proportional: p,
            integral: i,
            derivative: d,
        };

        if let Some(limits) = self.output_limits {
            if output > limits.max {
                output = limits.max;
                self.integral = if self.ki != 0.0 {
                    (limits.max - p - d) / self.ki
                } else {
                    // Cannot back-solve without integral action; park at zero.
                    0.0
                };
            } else if output < limits.min {
                output = limits.min;
                self.integral = if self.ki != 0.0 {
                    (limits.min - p - d) / self.ki
                } else {
                    0.0
                };
            }
        }

        // Unconditional, even when saturated.
        self.previous_error = error;

        output
    }

    /// Zero the accumulator, the previous-error memory, and the stored P/I/D
    /// components. Gains and limits are untouched.
    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.previous_error = 0.0;
        self.components = PidComponents::default();
    }

    /// Replace the three gains.
    ///
    /// Does not reset state: changing `ki` while the accumulator is nonzero
    /// immediately changes future integral contributions.
    pub fn set_gains(&mut self, kp: Real, ki: Real, kd: Real) {
        self.kp = kp;
        self.ki = ki;
        self.kd = kd;
    }

    /// P/I/D contributions from the last `update` call (not recomputed).
    pub fn components(&self) -> PidComponents {
        self.components
    }

    /// Gains plus internal state, for display layers.
    pub fn tuning(&self) -> PidTuning {
        PidTuning {
            kp: self.kp,
            ki: self.ki,
            kd: self.kd,
            integral_state: self.integral,
            previous_error: self.previous_error,
        }
    }

    pub fn output_limits(&self) -> Option<OutputLimits> {
        self.output_limits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proportional_only_response() {
        let mut pid = PidController::new(2.0, 0.0, 0.0);
        let u = pid.update(3.0, 0.01);
        assert!((u - 6.0).abs() < 1e-12);
    }

    #[test]
    fn integral_accumulates_constant_error() {
        let mut pid = PidController::new(0.0, 1.0, 0.0);
        for _ in 0..100 {
            pid.update(1.0, 0.01);
        }
        // 100 steps of 1.0 error at dt=0.01 -> integral exactly 1.0
        assert!((pid.tuning().integral_state - 1.0).abs() < 1e-12);
    }

    #[test]
    fn integral_monotone_in_error_sign() {
        let mut pid = PidController::new(1.0, 0.5, 0.0);
        let mut last = 0.0;
        for _ in 0..50 {
            pid.update(2.0, 0.01);
            let now = pid.tuning().integral_state;
            assert!(now > last);
            last = now;
        }

        let mut pid = PidController::new(1.0, 0.5, 0.0);
        let mut last = 0.0;
        for _ in 0..50 {
            pid.update(-2.0, 0.01);
            let now = pid.tuning().integral_state;
            assert!(now < last);
            last = now;
        }
    }

    #[test]
    fn derivative_zero_when_dt_zero() {
        let mut pid = PidController::new(0.0, 0.0, 5.0);
        pid.update(1.0, 0.01);
        let u = pid.update(100.0, 0.0);
        assert_eq!(u, 0.0);
        assert_eq!(pid.components().derivative, 0.0);
    }

    #[test]
    fn derivative_tracks_error_slope() {
        let mut pid = PidController::new(0.0, 0.0, 1.0);
        pid.update(0.0, 0.1);
        let u = pid.update(1.0, 0.1);
        // de/dt = (1.0 - 0.0) / 0.1 = 10.0
        assert!((u - 10.0).abs() < 1e-12);
    }

    #[test]
    fn anti_windup_back_solve_reproduces_bound() {
        let mut pid =
            PidController::new(1.0, 0.5, 0.0).with_output_limits(OutputLimits::new(-1.0, 1.0));

        // Large persistent error saturates high.
        let u = pid.update(10.0, 0.1);
        assert_eq!(u, 1.0);

        // Recompute the unsaturated output from the stored state for the
        // same inputs: it must land exactly on the bound.
        let t = pid.tuning();
        let p = t.kp * 10.0;
        let i = t.ki * t.integral_state;
        // previous_error == error now, so d == 0 on a repeat
        assert!((p + i - 1.0).abs() < 1e-12);
    }

    #[test]
    fn anti_windup_low_side() {
        let mut pid =
            PidController::new(1.0, 0.5, 0.0).with_output_limits(OutputLimits::new(-1.0, 1.0));
        let u = pid.update(-10.0, 0.1);
        assert_eq!(u, -1.0);
        let t = pid.tuning();
        assert!((t.kp * -10.0 + t.ki * t.integral_state + 1.0).abs() < 1e-12);
    }

    #[test]
    fn saturation_without_integral_gain_zeroes_accumulator() {
        let mut pid =
            PidController::new(10.0, 0.0, 0.0).with_output_limits(OutputLimits::new(-1.0, 1.0));
        pid.update(5.0, 0.1);
        assert_eq!(pid.tuning().integral_state, 0.0);
    }

    #[test]
    fn previous_error_updates_even_when_saturated() {
        let mut pid =
            PidController::new(10.0, 0.1, 0.0).with_output_limits(OutputLimits::new(-1.0, 1.0));
        pid.update(5.0, 0.1);
        assert_eq!(pid.tuning().previous_error, 5.0);
    }

    #[test]
    fn reset_restores_fresh_behavior() {
        let errors = [3.0, 1.5, -0.25, 0.75, 2.0];
        let dt = 0.01;

        let mut fresh = PidController::new(1.2, 0.3, 0.04);
        let expected: Vec<f64> = errors.iter().map(|&e| fresh.update(e, dt)).collect();

        let mut reused = PidController::new(1.2, 0.3, 0.04);
        for &e in &errors {
            reused.update(e, dt);
        }
        reused.reset();
        let replayed: Vec<f64> = errors.iter().map(|&e| reused.update(e, dt)).collect();

        // Bit-identical, not approximately equal.
        assert_eq!(expected, replayed);
    }

    #[test]
    fn set_gains_keeps_state() {
        let mut pid = PidController::new(1.0, 1.0, 0.0);
        pid.update(1.0, 1.0); // integral = 1.0
        pid.set_gains(1.0, 2.0, 0.0);
        assert_eq!(pid.tuning().integral_state, 1.0);
        // Next update sees the doubled ki applied to the old accumulator.
        let u = pid.update(0.0, 1.0);
        assert!((u - 2.0).abs() < 1e-12);
    }

    #[test]
    fn components_report_last_update() {
        let mut pid = PidController::new(2.0, 1.0, 0.0);
        pid.update(1.0, 0.5);
        let c = pid.components();
        assert!((c.proportional - 2.0).abs() < 1e-12);
        assert!((c.integral - 0.5).abs() < 1e-12);
        assert_eq!(c.derivative, 0.0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn unsaturated_integral_monotone(
            errors in prop::collection::vec(0.01_f64..10.0_f64, 1..50),
            ki in 0.01_f64..5.0_f64,
        ) {
            let mut pid = PidController::new(0.0, ki, 0.0);
            let mut last = 0.0;
            for &e in &errors {
                pid.update(e, 0.01);
                let now = pid.tuning().integral_state;
                prop_assert!(now > last);
                last = now;
            }
        }

        #[test]
        fn saturated_state_reproduces_bound(
            error in 2.0_f64..50.0_f64,
            kp in 1.0_f64..5.0_f64,
            ki in 0.1_f64..5.0_f64,
        ) {
            let mut pid = PidController::new(kp, ki, 0.0)
                .with_output_limits(OutputLimits::new(-1.0, 1.0));
            let u = pid.update(error, 0.1);
            prop_assert_eq!(u, 1.0);
            let t = pid.tuning();
            let recomputed = t.kp * error + t.ki * t.integral_state;
            prop_assert!((recomputed - 1.0).abs() < 1e-9);
        }
    }
}
