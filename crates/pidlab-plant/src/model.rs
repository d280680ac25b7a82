//! Plant variant dispatch and collaborator-facing configuration.

use std::fmt;
use std::str::FromStr;

use pidlab_core::Real;
use serde::{Deserialize, Serialize};

use crate::error::{PlantError, PlantResult};
use crate::first_order::FirstOrder;
use crate::integrator::Integrator;
use crate::second_order::SecondOrder;

/// Laplace-domain description of a plant, for display layers.
///
/// Coefficient vectors are in descending powers of `s`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferFunction {
    pub numerator: Vec<Real>,
    pub denominator: Vec<Real>,
    /// Human-readable rendering, e.g. `G(s) = 1 / (2*s + 1)`.
    pub description: String,
}

/// Tag naming one of the supported plant variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemType {
    FirstOrder,
    SecondOrder,
    Integrator,
}

impl fmt::Display for SystemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SystemType::FirstOrder => "First Order",
            SystemType::SecondOrder => "Second Order",
            SystemType::Integrator => "Integrator",
        };
        f.write_str(name)
    }
}

impl FromStr for SystemType {
    type Err = PlantError;

    /// Parse a type tag. Accepts `"First Order"`, `"first_order"`,
    /// `"first-order"` and case variants thereof; anything else is
    /// `UnknownSystemType` (never a silent default).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .map(|c| if c == ' ' || c == '-' { '_' } else { c })
            .collect();
        match normalized.as_str() {
            "first_order" => Ok(SystemType::FirstOrder),
            "second_order" => Ok(SystemType::SecondOrder),
            "integrator" => Ok(SystemType::Integrator),
            _ => Err(PlantError::UnknownSystemType {
                name: s.to_string(),
            }),
        }
    }
}

fn default_gain() -> Real {
    1.0
}

fn default_time_constant() -> Real {
    1.0
}

fn default_damping() -> Real {
    0.5
}

fn default_natural_freq() -> Real {
    1.0
}

/// Collaborator-supplied plant parameters, tagged by variant.
///
/// Defaults match the interactive playground this library backs: unit gains
/// and time constants, moderately damped second-order dynamics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlantConfig {
    FirstOrder {
        #[serde(default = "default_time_constant")]
        time_constant: Real,
        #[serde(default = "default_gain")]
        gain: Real,
    },
    SecondOrder {
        #[serde(default = "default_damping")]
        damping: Real,
        #[serde(default = "default_natural_freq")]
        natural_freq: Real,
        #[serde(default = "default_gain")]
        gain: Real,
    },
    Integrator {
        #[serde(default = "default_gain")]
        gain: Real,
    },
}

impl PlantConfig {
    pub fn system_type(&self) -> SystemType {
        match self {
            PlantConfig::FirstOrder { .. } => SystemType::FirstOrder,
            PlantConfig::SecondOrder { .. } => SystemType::SecondOrder,
            PlantConfig::Integrator { .. } => SystemType::Integrator,
        }
    }
}

impl Default for PlantConfig {
    fn default() -> Self {
        PlantConfig::SecondOrder {
            damping: default_damping(),
            natural_freq: default_natural_freq(),
            gain: default_gain(),
        }
    }
}

/// Snapshot of a plant's dynamic state, for display layers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlantState {
    pub output: Real,
    /// Only second-order plants carry a rate state.
    pub output_dot: Option<Real>,
}

/// A plant variant selected once at construction.
///
/// Delegates every operation to the variant's own implementation; there is
/// no per-call branching on a type tag beyond this single dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Plant {
    FirstOrder(FirstOrder),
    SecondOrder(SecondOrder),
    Integrator(Integrator),
}

impl Plant {
    /// Build a plant from a collaborator-supplied configuration.
    pub fn from_config(config: &PlantConfig) -> PlantResult<Self> {
        match *config {
            PlantConfig::FirstOrder {
                time_constant,
                gain,
            } => Ok(Plant::FirstOrder(FirstOrder::new(time_constant, gain)?)),
            PlantConfig::SecondOrder {
                damping,
                natural_freq,
                gain,
            } => Ok(Plant::SecondOrder(SecondOrder::new(
                damping,
                natural_freq,
                gain,
            )?)),
            PlantConfig::Integrator { gain } => Ok(Plant::Integrator(Integrator::new(gain)?)),
        }
    }

    pub fn system_type(&self) -> SystemType {
        match self {
            Plant::FirstOrder(_) => SystemType::FirstOrder,
            Plant::SecondOrder(_) => SystemType::SecondOrder,
            Plant::Integrator(_) => SystemType::Integrator,
        }
    }

    /// Advance one Euler step with control input `u` and return the output.
    pub fn update(&mut self, u: Real, dt: Real) -> Real {
        match self {
            Plant::FirstOrder(p) => p.update(u, dt),
            Plant::SecondOrder(p) => p.update(u, dt),
            Plant::Integrator(p) => p.update(u, dt),
        }
    }

    pub fn output(&self) -> Real {
        match self {
            Plant::FirstOrder(p) => p.output(),
            Plant::SecondOrder(p) => p.output(),
            Plant::Integrator(p) => p.output(),
        }
    }

    /// Return the plant to rest.
    pub fn reset(&mut self) {
        match self {
            Plant::FirstOrder(p) => p.reset(),
            Plant::SecondOrder(p) => p.reset(),
            Plant::Integrator(p) => p.reset(),
        }
    }

    /// Override the state directly, bypassing the dynamics.
    ///
    /// `ydot0` only applies to second-order plants and is ignored otherwise.
    pub fn set_initial_conditions(&mut self, y0: Real, ydot0: Real) {
        match self {
            Plant::FirstOrder(p) => p.set_initial_conditions(y0),
            Plant::SecondOrder(p) => p.set_initial_conditions(y0, ydot0),
            Plant::Integrator(p) => p.set_initial_conditions(y0),
        }
    }

    /// Current dynamic state, for display layers.
    pub fn state(&self) -> PlantState {
        match self {
            Plant::FirstOrder(p) => PlantState {
                output: p.output(),
                output_dot: None,
            },
            Plant::SecondOrder(p) => PlantState {
                output: p.output(),
                output_dot: Some(p.output_dot()),
            },
            Plant::Integrator(p) => PlantState {
                output: p.output(),
                output_dot: None,
            },
        }
    }

    /// Laplace-domain coefficients and description, parameter-derived only.
    pub fn transfer_function(&self) -> TransferFunction {
        match self {
            Plant::FirstOrder(p) => p.transfer_function(),
            Plant::SecondOrder(p) => p.transfer_function(),
            Plant::Integrator(p) => p.transfer_function(),
        }
    }

    /// Closed-form step response evaluated over `times`, independent of the
    /// simulated state. Serves as the oracle for the Euler path.
    pub fn step_response_analytical(&self, times: &[Real], magnitude: Real) -> Vec<Real> {
        match self {
            Plant::FirstOrder(p) => p.step_response_analytical(times, magnitude),
            Plant::SecondOrder(p) => p.step_response_analytical(times, magnitude),
            Plant::Integrator(p) => p.step_response_analytical(times, magnitude),
        }
    }
}
