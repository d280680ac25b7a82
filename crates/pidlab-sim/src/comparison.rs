//! Batch execution of tuning scenarios for side-by-side comparison.
//!
//! One run is strictly sequential, but independent runs share no mutable
//! state: each scenario gets a freshly constructed controller and plant, so
//! the batch axis parallelizes trivially with rayon.

use pidlab_control::{OutputLimits, PidController};
use pidlab_core::Real;
use pidlab_plant::{Plant, PlantConfig};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::SimResult;
use crate::metrics::ResponseMetrics;
use crate::runner::{SimOptions, SimulationRun, run_closed_loop};

/// One tuning to evaluate: gains plus run settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Display name, e.g. `"Aggressive"`.
    pub label: String,
    pub kp: Real,
    pub ki: Real,
    pub kd: Real,
    pub setpoint: Real,
    /// Horizon for this scenario (seconds).
    pub duration: Real,
    /// Optional actuator saturation.
    #[serde(default)]
    pub output_limits: Option<OutputLimits>,
}

/// Outcome of one scenario within a comparison batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub scenario: Scenario,
    pub run: SimulationRun,
    pub metrics: ResponseMetrics,
}

/// The classic playground tuning table.
pub fn preset_scenarios() -> Vec<Scenario> {
    let scenario = |label: &str, kp, ki, kd, duration| Scenario {
        label: label.to_string(),
        kp,
        ki,
        kd,
        setpoint: 10.0,
        duration,
        output_limits: None,
    };
    vec![
        scenario("Conservative", 1.0, 0.1, 0.05, 20.0),
        scenario("Aggressive", 3.0, 1.0, 0.2, 20.0),
        scenario("Oscillatory", 4.0, 2.0, 0.0, 20.0),
        scenario("Sluggish", 0.5, 0.02, 0.1, 30.0),
    ]
}

/// Run every scenario against its own instance of the configured plant.
///
/// Scenarios execute in parallel; result order matches input order. `dt` is
/// shared by the whole batch, while each scenario supplies its own horizon.
pub fn run_comparison(
    scenarios: &[Scenario],
    plant_config: &PlantConfig,
    dt: Real,
) -> SimResult<Vec<ComparisonResult>> {
    scenarios
        .par_iter()
        .map(|scenario| -> SimResult<ComparisonResult> {
            let mut pid = PidController::new(scenario.kp, scenario.ki, scenario.kd);
            if let Some(limits) = scenario.output_limits {
                pid = pid.with_output_limits(limits);
            }
            let mut plant = Plant::from_config(plant_config)?;
            let run_opts = SimOptions {
                dt,
                duration: scenario.duration,
            };
            let run = run_closed_loop(&mut pid, &mut plant, scenario.setpoint, &run_opts)?;
            let metrics = ResponseMetrics::from_run(&run);
            Ok(ComparisonResult {
                scenario: scenario.clone(),
                run,
                metrics,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_cover_the_classic_table() {
        let presets = preset_scenarios();
        let labels: Vec<&str> = presets.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Conservative", "Aggressive", "Oscillatory", "Sluggish"]
        );
        assert_eq!(presets[3].duration, 30.0);
    }

    #[test]
    fn batch_results_match_sequential_runs() {
        let scenarios = preset_scenarios();
        let config = PlantConfig::FirstOrder {
            time_constant: 1.0,
            gain: 1.0,
        };
        let dt = 0.01;

        let batch = run_comparison(&scenarios, &config, dt).unwrap();
        assert_eq!(batch.len(), scenarios.len());

        // Parallel execution must be invisible in the numbers.
        for (result, scenario) in batch.iter().zip(&scenarios) {
            let mut pid = PidController::new(scenario.kp, scenario.ki, scenario.kd);
            let mut plant = Plant::from_config(&config).unwrap();
            let run_opts = SimOptions {
                dt,
                duration: scenario.duration,
            };
            let solo = run_closed_loop(&mut pid, &mut plant, scenario.setpoint, &run_opts).unwrap();
            assert_eq!(result.run, solo);
            assert_eq!(result.scenario.label, scenario.label);
        }
    }

    #[test]
    fn bad_plant_config_fails_the_batch() {
        let config = PlantConfig::FirstOrder {
            time_constant: 0.0,
            gain: 1.0,
        };
        let err = run_comparison(&preset_scenarios(), &config, 0.01);
        assert!(err.is_err());
    }
}
