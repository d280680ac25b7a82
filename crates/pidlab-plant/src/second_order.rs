//! Second-order plant: `d²y/dt² + 2ζωn·dy/dt + ωn²·y = ωn²·K·u`.

use pidlab_core::Real;
use serde::{Deserialize, Serialize};

use crate::error::PlantResult;
use crate::model::TransferFunction;

/// Second-order linear plant with damping ratio `ζ`, natural frequency `ωn`
/// and static gain `K`.
///
/// State space with `x1 = y`, `x2 = dy/dt`:
/// `dx1/dt = x2`, `dx2/dt = −ωn²·x1 − 2ζωn·x2 + ωn²·K·u`.
///
/// The Euler step is synchronized: both state components advance from the
/// same pre-update snapshot. Updating `y` with the already-advanced `ẏ`
/// would be a semi-implicit scheme with different (slightly more stable)
/// behavior; the reference dynamics are the synchronized variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecondOrder {
    /// Damping ratio ζ.
    pub damping: Real,
    /// Natural frequency ωn (rad/s).
    pub natural_freq: Real,
    /// Static gain K.
    pub gain: Real,
    output: Real,
    output_dot: Real,
}

impl SecondOrder {
    /// Create a second-order plant at rest.
    ///
    /// Any real `damping` is accepted; over-, under- and critically damped
    /// regimes flow through the same integration formula. Only the analytical
    /// step response branches on ζ, and only when requested.
    pub fn new(damping: Real, natural_freq: Real, gain: Real) -> PlantResult<Self> {
        Ok(Self {
            damping,
            natural_freq,
            gain,
            output: 0.0,
            output_dot: 0.0,
        })
    }

    /// Advance one synchronized Euler step and return the output.
    pub fn update(&mut self, u: Real, dt: Real) -> Real {
        let wn = self.natural_freq;
        let zeta = self.damping;

        // Derivatives from the pre-update snapshot
        let dx1 = self.output_dot;
        let dx2 = -wn * wn * self.output - 2.0 * zeta * wn * self.output_dot
            + wn * wn * self.gain * u;

        self.output += dx1 * dt;
        self.output_dot += dx2 * dt;

        self.output
    }

    pub fn output(&self) -> Real {
        self.output
    }

    /// Rate of change of the output, for display layers.
    pub fn output_dot(&self) -> Real {
        self.output_dot
    }

    /// Return the plant to rest.
    pub fn reset(&mut self) {
        self.output = 0.0;
        self.output_dot = 0.0;
    }

    /// Override both state components directly, bypassing the dynamics.
    pub fn set_initial_conditions(&mut self, y0: Real, ydot0: Real) {
        self.output = y0;
        self.output_dot = ydot0;
    }

    /// `G(s) = K·ωn² / (s² + 2ζωn·s + ωn²)`.
    pub fn transfer_function(&self) -> TransferFunction {
        let wn = self.natural_freq;
        let zeta = self.damping;
        TransferFunction {
            numerator: vec![self.gain * wn * wn],
            denominator: vec![1.0, 2.0 * zeta * wn, wn * wn],
            description: format!(
                "G(s) = {:.2} / (s² + {:.2}*s + {:.2})",
                self.gain * wn * wn,
                2.0 * zeta * wn,
                wn * wn
            ),
        }
    }

    /// Closed-form step response from rest, branching on the damping regime.
    ///
    /// - ζ < 1 (underdamped): decaying sinusoid at `ωd = ωn√(1−ζ²)`
    /// - ζ = 1 (critically damped): `1 − e^{−ωn t}(1 + ωn t)`
    /// - ζ > 1 (overdamped): two real exponentials
    pub fn step_response_analytical(&self, times: &[Real], magnitude: Real) -> Vec<Real> {
        let wn = self.natural_freq;
        let zeta = self.damping;
        let scale = self.gain * magnitude;

        if zeta < 1.0 {
            let wd = wn * (1.0 - zeta * zeta).sqrt();
            times
                .iter()
                .map(|&t| {
                    let envelope = (-zeta * wn * t).exp();
                    scale
                        * (1.0
                            - envelope
                                * ((wd * t).cos() + (zeta * wn / wd) * (wd * t).sin()))
                })
                .collect()
        } else if zeta == 1.0 {
            times
                .iter()
                .map(|&t| scale * (1.0 - (-wn * t).exp() * (1.0 + wn * t)))
                .collect()
        } else {
            let root_term = (zeta * zeta - 1.0).sqrt();
            let r1 = -wn * (zeta + root_term);
            let r2 = -wn * (zeta - root_term);
            times
                .iter()
                .map(|&t| {
                    scale * (1.0 - (r2 * (r1 * t).exp() - r1 * (r2 * t).exp()) / (r2 - r1))
                })
                .collect()
        }
    }
}
