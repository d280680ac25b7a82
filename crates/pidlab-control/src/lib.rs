//! PID controller primitives for pidlab.
//!
//! This crate provides the discrete-time PID law used by the closed-loop
//! simulator. The controller is deliberately permissive: gains are never
//! validated (negative or zero gains are legal inputs), and `update` cannot
//! fail. The only nontrivial behavior is output saturation with back-solved
//! anti-windup, documented on [`PidController::update`].

pub mod pid;

pub use pid::{OutputLimits, PidComponents, PidController, PidTuning};
