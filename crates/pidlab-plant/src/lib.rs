//! Plant models for pidlab: simple 1D dynamical systems under PID control.
//!
//! Three linear plants are provided, each simulated with explicit Euler
//! integration and each carrying an independent closed-form step response
//! used to cross-check the numerical path:
//! - **First order**: `τ·dy/dt + y = K·u`
//! - **Second order**: `d²y/dt² + 2ζωn·dy/dt + ωn²·y = ωn²·K·u`
//! - **Integrator**: `dy/dt = K·u`
//!
//! # Architecture
//!
//! Each variant is its own struct with its own state and invariants; the
//! [`Plant`] enum selects a variant once at construction and delegates. This
//! keeps per-model logic in one place instead of branching on a type tag in
//! every method.

pub mod error;
pub mod first_order;
pub mod integrator;
pub mod model;
pub mod second_order;

pub use error::{PlantError, PlantResult};
pub use first_order::FirstOrder;
pub use integrator::Integrator;
pub use model::{Plant, PlantConfig, PlantState, SystemType, TransferFunction};
pub use second_order::SecondOrder;
