//! # PID control module
//!
//! The baseline feedback controller. It acts on the lateral acceleration tracking error,
//! `target - current`, once per fixed control tick. The integral is a plain running sum of the
//! error and the derivative is its first difference, so no time step enters the gains.
//!
//! The hybrid controller consumes this (or any other `Controller`) as its feedback term.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod params;
pub mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use params::Params;
pub use state::*;
