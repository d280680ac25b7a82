//! First-order lag plant: `τ·dy/dt + y = K·u`.

use pidlab_core::Real;
use serde::{Deserialize, Serialize};

use crate::error::{PlantError, PlantResult};
use crate::model::TransferFunction;

/// First-order linear plant with time constant `τ` and static gain `K`.
///
/// Dynamics: `dy/dt = (K·u − y)/τ`, advanced with explicit Euler.
///
/// # Example
///
/// ```
/// use pidlab_plant::FirstOrder;
///
/// let mut plant = FirstOrder::new(0.2, 1.0).unwrap();
/// for _ in 0..1000 {
///     plant.update(1.0, 0.01);
/// }
/// // Settles near the DC gain for a unit input
/// assert!((plant.output() - 1.0).abs() < 1e-3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirstOrder {
    /// Time constant τ (seconds), must be nonzero.
    pub time_constant: Real,
    /// Static gain K.
    pub gain: Real,
    output: Real,
}

impl FirstOrder {
    /// Create a first-order plant at rest.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if `time_constant == 0` (the derivative
    /// `(K·u − y)/τ` is undefined).
    pub fn new(time_constant: Real, gain: Real) -> PlantResult<Self> {
        if time_constant == 0.0 {
            return Err(PlantError::InvalidParameter {
                what: "time_constant must be nonzero",
            });
        }
        Ok(Self {
            time_constant,
            gain,
            output: 0.0,
        })
    }

    /// Advance one Euler step with control input `u` and return the output.
    pub fn update(&mut self, u: Real, dt: Real) -> Real {
        let dydt = (self.gain * u - self.output) / self.time_constant;
        self.output += dydt * dt;
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

    /// `G(s) = K / (τs + 1)`.
    pub fn transfer_function(&self) -> TransferFunction {
        TransferFunction {
            numerator: vec![self.gain],
            denominator: vec![self.time_constant, 1.0],
            description: format!(
                "G(s) = {} / ({}*s + 1)",
                self.gain, self.time_constant
            ),
        }
    }

    /// Closed-form response to a sustained step of `magnitude`, from rest:
    /// `y(t) = K·M·(1 − e^{−t/τ})`. Independent of the simulated state.
    pub fn step_response_analytical(&self, times: &[Real], magnitude: Real) -> Vec<Real> {
        times
            .iter()
            .map(|&t| self.gain * magnitude * (1.0 - (-t / self.time_constant).exp()))
            .collect()
    }
}
