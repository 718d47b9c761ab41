//! # Predictive control module
//!
//! MpcCtrl plans a sequence of `N` future steering commands against a first order model of how
//! the lateral acceleration responds to the command, then applies only the first command of the
//! plan. Planning happens from scratch every tick:
//!
//!  1. The reference horizon is built from the future plan (truncated, edge padded, or filled
//!     with the current target if the plan is empty).
//!  1. The command sequence is seeded with the previously applied command.
//!  1. A fixed number of gradient descent passes are made on a tracking plus smoothness cost,
//!     clamping the sequence to the actuator limits after every pass.
//!
//! The tracking gradient is deliberately approximate: each predicted acceleration error is
//! pushed straight onto the command at the same step, ignoring the coupling the model introduces
//! between steps. The tuned weights and step size assume this form, so it must not be replaced
//! by the exact gradient through the model.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod horizon;
pub mod model;
pub mod params;
pub mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use horizon::reference_horizon;
pub use model::ActuatorResponseModel;
pub use params::Params;
pub use state::*;
