//! # Steering control library.
//!
//! This library allows other crates in the workspace (and the benchmarks) to access the
//! controllers defined inside the steering executable.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Controller interface - the contract shared by every steering controller
pub mod ctrl_if;

/// Hybrid control - feedback plus preview feedforward with output smoothing
pub mod hybrid_ctrl;

/// Predictive control - gradient descent over a short command horizon
pub mod mpc_ctrl;

/// PID control - the baseline feedback controller
pub mod pid_ctrl;

/// Rollout - fixed step closed loop runner used by the executable
pub mod rollout;
