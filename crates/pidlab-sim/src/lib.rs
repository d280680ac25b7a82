//! Closed-loop simulation driver for pidlab.
//!
//! Ties a [`pidlab_control::PidController`] and a [`pidlab_plant::Plant`]
//! together in a fixed-step loop and records the resulting trajectories.
//! Also provides response metrics (overshoot, settling time, steady-state
//! error) and parallel execution of scenario batches for tuning comparisons.

pub mod comparison;
pub mod error;
pub mod metrics;
pub mod runner;

pub use comparison::{ComparisonResult, Scenario, preset_scenarios, run_comparison};
pub use error::{SimError, SimResult};
pub use metrics::ResponseMetrics;
pub use runner::{SimOptions, SimulationRun, run_closed_loop};
