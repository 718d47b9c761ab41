//! Actuator response model
//!
//! A first order lag between the steering command and the realised lateral acceleration:
//!
//! ```text
//! a[k+1] = a[k] + (dt / tau) * (u[k] - a[k])
//! ```

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::DVector;
use serde::Serialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// First order lag response model.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ActuatorResponseModel {
    /// Time step
    dt_s: f64,

    /// Time constant
    tau_s: f64,

    /// Current simulated acceleration
    accel: f64
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ActuatorResponseModel {
    /// Create a new model starting from zero acceleration.
    pub fn new(dt_s: f64, tau_s: f64) -> Self {
        Self {
            dt_s,
            tau_s,
            accel: 0.0
        }
    }

    /// The acceleration one step after `accel` when commanded with `u`.
    pub fn next(&self, accel: f64, u: f64) -> f64 {
        accel + (self.dt_s / self.tau_s) * (u - accel)
    }

    /// Predict the acceleration at every step of a command sequence, starting
    /// from `accel_0`.
    ///
    /// Element `k` of the output is the acceleration after applying `u_seq[k]`.
    pub fn predict(&self, accel_0: f64, u_seq: &DVector<f64>) -> DVector<f64> {
        let mut accel = accel_0;

        DVector::from_iterator(
            u_seq.len(),
            u_seq.iter().map(|&u| {
                accel = self.next(accel, u);
                accel
            })
        )
    }

    /// Advance the model's own state by one step and return the new
    /// acceleration.
    pub fn step(&mut self, u: f64) -> f64 {
        self.accel = self.next(self.accel, u);
        self.accel
    }

    /// Current simulated acceleration.
    pub fn accel(&self) -> f64 {
        self.accel
    }

    /// Set the simulated acceleration.
    pub fn set_accel(&mut self, accel: f64) {
        self.accel = accel;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_next() {
        let model = ActuatorResponseModel::new(0.1, 0.25);

        // 40% of the gap is closed each step
        assert!((model.next(0.0, 1.0) - 0.4).abs() < 1e-12);
        assert_eq!(model.next(1.5, 1.5), 1.5);
    }

    #[test]
    fn test_predict_is_recursive() {
        let model = ActuatorResponseModel::new(0.1, 0.25);
        let pred = model.predict(0.0, &DVector::from_element(3, 1.0));

        assert_eq!(pred.len(), 3);
        assert!((pred[0] - 0.4).abs() < 1e-12);
        assert!((pred[1] - 0.64).abs() < 1e-12);
        assert!((pred[2] - 0.784).abs() < 1e-12);
    }

    #[test]
    fn test_step_matches_predict() {
        let mut model = ActuatorResponseModel::new(0.1, 0.25);
        model.set_accel(0.3);
        let u_seq = DVector::from_vec(vec![1.0, -0.5, 2.0, 0.0]);
        let pred = model.predict(0.3, &u_seq);

        for (k, &u) in u_seq.iter().enumerate() {
            assert_eq!(model.step(u), pred[k]);
        }
        assert_eq!(model.accel(), pred[3]);
    }
}
