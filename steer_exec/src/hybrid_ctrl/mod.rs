//! # Hybrid control module
//!
//! HybridCtrl sums three independently computed terms into one steering command:
//!
//! - a feedback term from a baseline controller (the PID by default) reacting to the current
//!   tracking error,
//! - a feedforward term proportional to the mean of the first few values of the future plan,
//! - an exponential low pass filter blending the raw command with the previously applied one.
//!
//! The filter picks its smoothing factor from the size of the jump between the raw command and
//! the previous command. In the tuned configuration both factors are 0.9, so the selection has
//! no numeric effect, but it is kept so the two cases can be tuned separately.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod feedforward;
pub mod params;
pub mod smoothing;
pub mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use feedforward::*;
pub use params::Params;
pub use smoothing::AdaptiveSmoother;
pub use state::*;
