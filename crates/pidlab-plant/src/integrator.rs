//! Pure integrator plant: `dy/dt = K·u`.

use pidlab_core::Real;
use serde::{Deserialize, Serialize};

use crate::error::PlantResult;
use crate::model::TransferFunction;

/// Pure integrator with gain `K`.
///
/// The Euler step `y += dt·K·u` is exact for piecewise-constant input, so
/// this plant doubles as a truncation-error-free reference in tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Integrator {
    /// Integration gain K.
    pub gain: Real,
    output: Real,
}

impl Integrator {
    /// Create an integrator plant at rest.
    pub fn new(gain: Real) -> PlantResult<Self> {
        Ok(Self { gain, output: 0.0 })
    }

    /// Advance one Euler step with control input `u` and return the output.
    pub fn update(&mut self, u: Real, dt: Real) -> Real {
        self.output += self.gain * u * dt;
        self.output
    }

    pub fn output(&self) -> Real {
        self.output
    }

    /// Return the plant to rest.
    pub fn reset(&mut self) {
        self.output = 0.0;
    }

    /// Override the state directly, bypassing the dynamics.
    pub fn set_initial_conditions(&mut self, y0: Real) {
        self.output = y0;
    }

    /// `G(s) = K / s`.
    pub fn transfer_function(&self) -> TransferFunction {
        TransferFunction {
            numerator: vec![self.gain],
            denominator: vec![1.0, 0.0],
            description: format!("G(s) = {} / s", self.gain),
        }
    }

    /// Ramp response to a sustained step: `y(t) = K·M·t`.
    pub fn step_response_analytical(&self, times: &[Real], magnitude: Real) -> Vec<Real> {
        times
            .iter()
            .map(|&t| self.gain * magnitude * t)
            .collect()
    }
}
