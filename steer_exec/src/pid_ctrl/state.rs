//! PID controller state

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace};
use serde::Serialize;

// Internal
use super::Params;
use crate::ctrl_if::{Controller, FuturePlan, VehicleState};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A fixed step PID controller
#[derive(Debug, Serialize, Clone)]
pub struct PidCtrl {
    /// Proportional gain
    k_p: f64,

    /// Integral gain
    k_i: f64,

    /// Dervative gain
    k_d: f64,

    /// Previous error
    prev_error: Option<f64>,

    /// The integral accumulation
    integral: f64
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur when building a PID controller.
#[derive(Debug, thiserror::Error)]
pub enum PidCtrlError {
    #[error("Gain {0} must be finite, found {1}")]
    NonFiniteGain(&'static str, f64)
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PidCtrl {

    /// Create a new controller with the baseline gains.
    pub fn new() -> Self {
        Self::with_gains(&Params::default())
    }

    /// Create a new controller from validated parameters.
    pub fn from_params(params: &Params) -> Result<Self, PidCtrlError> {
        params.validate()?;
        Ok(Self::with_gains(params))
    }

    fn with_gains(params: &Params) -> Self {
        Self {
            k_p: params.k_p,
            k_i: params.k_i,
            k_d: params.k_d,
            integral: 0f64,
            prev_error: None
        }
    }

    /// Get the value of the controller for the given error.
    ///
    /// On the first call after a reset the previous error is taken to be
    /// zero, so the derivative is the error itself.
    pub fn get(&mut self, error: f64) -> f64 {
        // Accumulate the integral term
        self.integral += error;

        // Calculate the derivative
        let deriv = match self.prev_error {
            Some(e) => error - e,
            None => error
        };

        // Calculate the output
        let out =
            self.k_p * error
            + self.k_i * self.integral
            + self.k_d * deriv;

        // Remember the previous error
        self.prev_error = Some(error);

        trace!(
            "PID: err = {:.6}, int = {:.6}, deriv = {:.6}, out = {:.6}",
            error, self.integral, deriv, out
        );

        out
    }
}

impl Default for PidCtrl {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller for PidCtrl {
    fn reset(&mut self) {
        self.integral = 0f64;
        self.prev_error = None;

        debug!("PidCtrl reset");
    }

    fn update(
        &mut self,
        target_lataccel: f64,
        current_lataccel: f64,
        _state: &VehicleState,
        _future_plan: &FuturePlan
    ) -> f64 {
        self.get(target_lataccel - current_lataccel)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn step(ctrl: &mut PidCtrl, target: f64, current: f64) -> f64 {
        ctrl.update(target, current, &VehicleState::default(), &FuturePlan::default())
    }

    #[test]
    fn test_zero_error() {
        let mut pid = PidCtrl::new();
        assert_eq!(step(&mut pid, 1.0, 1.0), 0.0);
    }

    #[test]
    fn test_first_tick_uses_zero_prev_error() {
        let mut pid = PidCtrl::new();

        // 0.3*1 + 0.05*1 - 0.1*1
        assert!((step(&mut pid, 1.0, 0.0) - 0.25).abs() < 1e-12);

        // Second tick, same error: 0.3*1 + 0.05*2 - 0.1*0
        assert!((step(&mut pid, 1.0, 0.0) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_reset_clears_state() {
        let mut pid = PidCtrl::new();
        let first = step(&mut pid, 0.7, 0.1);
        step(&mut pid, -0.4, 0.2);

        pid.reset();
        pid.reset();
        assert_eq!(step(&mut pid, 0.7, 0.1), first);
    }

    #[test]
    fn test_from_params_rejects_nan() {
        let params = Params { k_i: f64::NAN, ..Default::default() };
        match PidCtrl::from_params(&params) {
            Err(PidCtrlError::NonFiniteGain("k_i", _)) => (),
            r => panic!("Expected a non-finite gain error, got {:?}", r)
        }
    }
}
