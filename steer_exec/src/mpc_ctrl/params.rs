//! Predictive control parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// Internal
use super::MpcCtrlError;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for predictive control
///
/// Any field missing from a parameter file takes its tuned default.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct Params {
    /// Model time step
    pub dt_s: f64,

    /// Number of steps in the planning horizon
    pub horizon: usize,

    /// Time constant of the actuator response model
    pub tau_s: f64,

    /// Weight on the squared tracking error
    pub w_err: f64,

    /// Weight on the squared change in command between steps
    pub w_jerk: f64,

    /// Minimum steering command
    pub u_min: f64,

    /// Maximum steering command
    pub u_max: f64,

    /// Gradient descent step size
    pub step_size: f64,

    /// Number of gradient descent passes per tick
    pub num_iters: usize
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            dt_s: 0.1,
            horizon: 10,
            tau_s: 0.25,
            w_err: 50.0,
            w_jerk: 0.5,
            u_min: -2.0,
            u_max: 2.0,
            step_size: 0.05,
            num_iters: 30
        }
    }
}

impl Params {
    /// Check the parameters describe a usable optimiser.
    pub fn validate(&self) -> Result<(), MpcCtrlError> {
        if self.horizon == 0 {
            return Err(MpcCtrlError::InvalidParam("horizon must be at least 1"))
        }
        if self.num_iters == 0 {
            return Err(MpcCtrlError::InvalidParam("num_iters must be at least 1"))
        }
        if !(self.dt_s > 0.0) || !self.dt_s.is_finite() {
            return Err(MpcCtrlError::InvalidParam("dt_s must be positive"))
        }
        if !(self.tau_s > 0.0) || !self.tau_s.is_finite() {
            return Err(MpcCtrlError::InvalidParam("tau_s must be positive"))
        }
        if !(self.step_size > 0.0) || !self.step_size.is_finite() {
            return Err(MpcCtrlError::InvalidParam("step_size must be positive"))
        }
        if !self.w_err.is_finite() || !self.w_jerk.is_finite() {
            return Err(MpcCtrlError::InvalidParam("cost weights must be finite"))
        }
        if !(self.u_min < self.u_max) {
            return Err(MpcCtrlError::InvalidLimits(self.u_min, self.u_max))
        }

        Ok(())
    }
}
