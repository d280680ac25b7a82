//! Fixed-step closed-loop runner and result recording.

use pidlab_control::PidController;
use pidlab_core::{Real, ensure_finite};
use pidlab_plant::Plant;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Options for closed-loop runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimOptions {
    /// Fixed time step (seconds).
    pub dt: Real,
    /// Final simulation time (seconds).
    pub duration: Real,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            dt: 0.01,
            duration: 20.0,
        }
    }
}

impl SimOptions {
    /// Number of samples for these options: `floor(duration/dt)`.
    pub fn steps(&self) -> usize {
        (self.duration / self.dt) as usize
    }
}

/// Record of one closed-loop run.
///
/// All four series have the same length `N = floor(duration/dt)`. The control
/// signal lags the output by one step: no control is computed for the final
/// sample, so the previous value is carried into the last slot. Immutable
/// once produced; owned by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRun {
    /// Sample times, `time[i] = i*dt` (seconds).
    pub time: Vec<Real>,
    /// Plant output trajectory.
    pub output: Vec<Real>,
    /// Controller output applied at each step.
    pub control_signal: Vec<Real>,
    /// `setpoint - output` at each sample.
    pub error: Vec<Real>,
    /// Target the controller was driving toward.
    pub setpoint: Real,
    /// Time step the run was produced with.
    pub dt: Real,
}

impl SimulationRun {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// Drive `plant` toward `setpoint` with `pid` over a fixed-step run.
///
/// The loop is strictly sequential: step `i` depends on step `i-1`'s plant
/// output and on the controller's accumulated state. The first recorded
/// output sample is the plant's state at entry (zero when starting from
/// rest), and the first error/control pair is computed against it.
///
/// # Errors
///
/// `InvalidArg` when `dt` or `duration` is not positive, or when the
/// horizon is too short to hold at least two samples; `NonFinite` when the
/// setpoint is NaN or infinite.
pub fn run_closed_loop(
    pid: &mut PidController,
    plant: &mut Plant,
    setpoint: Real,
    opts: &SimOptions,
) -> SimResult<SimulationRun> {
    let setpoint = ensure_finite(setpoint, "setpoint")?;
    if opts.dt <= 0.0 {
        return Err(SimError::InvalidArg {
            what: "dt must be positive",
        });
    }
    if opts.duration <= 0.0 {
        return Err(SimError::InvalidArg {
            what: "duration must be positive",
        });
    }
    let n = opts.steps();
    if n < 2 {
        return Err(SimError::InvalidArg {
            what: "duration must cover at least two samples",
        });
    }

    let mut time = vec![0.0; n];
    let mut output = vec![0.0; n];
    let mut control_signal = vec![0.0; n];
    let mut error = vec![0.0; n];

    output[0] = plant.output();
    for (i, t) in time.iter_mut().enumerate() {
        *t = i as Real * opts.dt;
    }

    for i in 1..n {
        error[i - 1] = setpoint - output[i - 1];
        control_signal[i - 1] = pid.update(error[i - 1], opts.dt);
        output[i] = plant.update(control_signal[i - 1], opts.dt);
    }

    // The last sample gets an error reading but no fresh control action.
    error[n - 1] = setpoint - output[n - 1];
    control_signal[n - 1] = control_signal[n - 2];

    tracing::debug!(
        steps = n,
        dt = opts.dt,
        setpoint,
        final_output = output[n - 1],
        "closed-loop run complete"
    );

    Ok(SimulationRun {
        time,
        output,
        control_signal,
        error,
        setpoint,
        dt: opts.dt,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pidlab_plant::PlantConfig;

    fn first_order_plant(tau: f64, k: f64) -> Plant {
        Plant::from_config(&PlantConfig::FirstOrder {
            time_constant: tau,
            gain: k,
        })
        .unwrap()
    }

    #[test]
    fn rejects_bad_options() {
        let mut pid = PidController::new(1.0, 0.0, 0.0);
        let mut plant = first_order_plant(1.0, 1.0);

        let opts = SimOptions {
            dt: 0.0,
            duration: 1.0,
        };
        assert!(run_closed_loop(&mut pid, &mut plant, 1.0, &opts).is_err());

        let opts = SimOptions {
            dt: 0.01,
            duration: -1.0,
        };
        assert!(run_closed_loop(&mut pid, &mut plant, 1.0, &opts).is_err());

        // One sample is not a trajectory
        let opts = SimOptions {
            dt: 1.0,
            duration: 1.5,
        };
        assert!(run_closed_loop(&mut pid, &mut plant, 1.0, &opts).is_err());
    }

    #[test]
    fn rejects_non_finite_setpoint() {
        let mut pid = PidController::new(1.0, 0.0, 0.0);
        let mut plant = first_order_plant(1.0, 1.0);
        let opts = SimOptions::default();

        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = run_closed_loop(&mut pid, &mut plant, bad, &opts).unwrap_err();
            assert!(err.to_string().contains("setpoint"), "got: {err}");
        }
    }

    #[test]
    fn array_shapes_and_time_base() {
        let mut pid = PidController::new(1.0, 0.1, 0.0);
        let mut plant = first_order_plant(1.0, 1.0);
        let opts = SimOptions {
            dt: 0.1,
            duration: 1.0,
        };

        let run = run_closed_loop(&mut pid, &mut plant, 5.0, &opts).unwrap();
        assert_eq!(run.len(), 10);
        assert_eq!(run.output.len(), 10);
        assert_eq!(run.control_signal.len(), 10);
        assert_eq!(run.error.len(), 10);
        assert_eq!(run.time[0], 0.0);
        assert!((run.time[9] - 0.9).abs() < 1e-12);
    }

    #[test]
    fn starts_from_rest_and_carries_last_control() {
        let mut pid = PidController::new(1.0, 0.1, 0.05);
        let mut plant = first_order_plant(1.0, 1.0);
        let opts = SimOptions::default();

        let run = run_closed_loop(&mut pid, &mut plant, 10.0, &opts).unwrap();
        let n = run.len();
        assert_eq!(run.output[0], 0.0);
        assert_eq!(run.error[0], 10.0);
        assert_eq!(run.control_signal[n - 1], run.control_signal[n - 2]);
        assert!((run.error[n - 1] - (10.0 - run.output[n - 1])).abs() < 1e-12);
    }

    #[test]
    fn control_lags_output_by_one_step() {
        // With a pure-P controller and an integrator plant the relation
        // output[i] = output[i-1] + dt*K*u[i-1] is exact and checkable.
        let mut pid = PidController::new(2.0, 0.0, 0.0);
        let mut plant = Plant::from_config(&PlantConfig::Integrator { gain: 1.0 }).unwrap();
        let opts = SimOptions {
            dt: 0.1,
            duration: 2.0,
        };

        let run = run_closed_loop(&mut pid, &mut plant, 1.0, &opts).unwrap();
        for i in 1..run.len() {
            let expected = run.output[i - 1] + 0.1 * run.control_signal[i - 1];
            assert!((run.output[i] - expected).abs() < 1e-12);
        }
    }
}
