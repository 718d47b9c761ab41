//! Predictive controller state

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace};
use nalgebra::DVector;
use serde::Serialize;

// Internal
use super::{reference_horizon, ActuatorResponseModel, Params};
use crate::ctrl_if::{Controller, FuturePlan, VehicleState};
use util::maths::clamp;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Predictive horizon controller
#[derive(Debug, Clone)]
pub struct MpcCtrl {
    params: Params,

    /// Response model used for prediction over the horizon
    model: ActuatorResponseModel,

    /// The command applied on the previous tick, zero at rollout start
    u_prev: f64,

    report: StatusReport
}

/// Monitoring quantities from the last tick.
#[derive(Debug, Default, Copy, Clone, Serialize, PartialEq)]
pub struct StatusReport {
    /// Length of the supplied future plan
    pub plan_len: usize,

    /// The applied command
    pub u_0: f64,

    /// Predicted minus reference acceleration at the first horizon step
    pub pred_err_0: f64,

    /// True if the applied command sits on one of the actuator limits
    pub saturated: bool
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur when building a predictive controller.
#[derive(Debug, thiserror::Error)]
pub enum MpcCtrlError {
    #[error("Invalid parameter: {0}")]
    InvalidParam(&'static str),

    #[error("Command limits must satisfy u_min < u_max, found [{0}, {1}]")]
    InvalidLimits(f64, f64)
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl MpcCtrl {
    /// Create a new controller with the tuned parameters.
    pub fn new() -> Self {
        Self::build(Params::default())
    }

    /// Create a new controller from the given parameters.
    pub fn from_params(params: Params) -> Result<Self, MpcCtrlError> {
        params.validate()?;

        debug!("MpcCtrl built with {:?}", params);

        Ok(Self::build(params))
    }

    fn build(params: Params) -> Self {
        Self {
            model: ActuatorResponseModel::new(params.dt_s, params.tau_s),
            params,
            u_prev: 0.0,
            report: StatusReport::default()
        }
    }

    /// Parameters in use.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Status report for the last tick.
    pub fn report(&self) -> StatusReport {
        self.report
    }

    /// The command applied on the previous tick.
    pub fn previous_command(&self) -> f64 {
        self.u_prev
    }

    /// Optimise the command sequence over the horizon.
    ///
    /// Returns the optimised sequence, every element of which lies within the
    /// command limits.
    pub fn optimise(&self, accel_0: f64, refs: &DVector<f64>) -> DVector<f64> {
        let p = &self.params;

        let mut u_seq = DVector::from_element(refs.len(), self.u_prev);

        for _ in 0..p.num_iters {
            let pred = self.model.predict(accel_0, &u_seq);

            // Tracking error is pushed directly onto the command at the same
            // step
            let mut grad = (&pred - refs) * (2.0 * p.w_err);

            // Smoothness on the change in command, the first change being
            // relative to the last applied command
            grad += self.first_diff(&u_seq) * (2.0 * p.w_jerk);

            u_seq -= grad * p.step_size;
            u_seq = u_seq.map(|u| clamp(&u, &p.u_min, &p.u_max));
        }

        u_seq
    }

    /// First differences of the sequence, prefixed by the previous command.
    fn first_diff(&self, u_seq: &DVector<f64>) -> DVector<f64> {
        DVector::from_fn(u_seq.len(), |k, _| {
            if k == 0 {
                u_seq[0] - self.u_prev
            }
            else {
                u_seq[k] - u_seq[k - 1]
            }
        })
    }
}

impl Default for MpcCtrl {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller for MpcCtrl {
    fn reset(&mut self) {
        self.u_prev = 0.0;
        self.report = StatusReport::default();

        debug!("MpcCtrl reset");
    }

    fn update(
        &mut self,
        target_lataccel: f64,
        current_lataccel: f64,
        _state: &VehicleState,
        future_plan: &FuturePlan
    ) -> f64 {
        let refs = reference_horizon(
            &future_plan.lataccel,
            target_lataccel,
            self.params.horizon
        );

        let u_seq = self.optimise(current_lataccel, &refs);
        let u_0 = u_seq[0];

        self.report = StatusReport {
            plan_len: future_plan.lataccel.len(),
            u_0,
            pred_err_0: self.model.next(current_lataccel, u_0) - refs[0],
            saturated: u_0 <= self.params.u_min || u_0 >= self.params.u_max
        };

        trace!(
            "MpcCtrl: target = {:.4}, current = {:.4}, u = {:.4}, {:?}",
            target_lataccel, current_lataccel, u_0, self.report
        );

        self.u_prev = u_0;
        u_0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    /// Straightforward loop form of the optimiser, used to check the vector
    /// form step for step.
    fn optimise_loops(p: &Params, u_prev: f64, accel_0: f64, refs: &[f64]) -> Vec<f64> {
        let n = refs.len();
        let mut u = vec![u_prev; n];

        for _ in 0..p.num_iters {
            let mut a = accel_0;
            let mut grad = vec![0.0; n];
            for k in 0..n {
                a = a + (p.dt_s / p.tau_s) * (u[k] - a);
                grad[k] = 2.0 * p.w_err * (a - refs[k]);
            }
            for k in 0..n {
                let prev = if k == 0 { u_prev } else { u[k - 1] };
                grad[k] += 2.0 * p.w_jerk * (u[k] - prev);
            }
            for k in 0..n {
                u[k] = (u[k] - p.step_size * grad[k]).clamp(p.u_min, p.u_max);
            }
        }

        u
    }

    fn step(ctrl: &mut MpcCtrl, target: f64, current: f64, plan: &[f64]) -> f64 {
        ctrl.update(
            target,
            current,
            &VehicleState::default(),
            &FuturePlan::from_lataccel(plan.to_vec())
        )
    }

    #[test]
    fn test_matches_loop_form() {
        let ctrl = MpcCtrl::new();
        let refs = [0.1, 0.15, 0.2, 0.3, 0.3, 0.25, 0.2, 0.2, 0.1, 0.0];

        let vector_form = ctrl.optimise(0.05, &DVector::from_vec(refs.to_vec()));
        let loop_form = optimise_loops(ctrl.params(), 0.0, 0.05, &refs);

        assert_eq!(vector_form.as_slice(), loop_form.as_slice());
    }

    #[test]
    fn test_zero_reference_gives_zero_command() {
        let mut ctrl = MpcCtrl::new();

        assert_eq!(step(&mut ctrl, 0.0, 0.0, &[0.0; 10]), 0.0);
    }

    #[test]
    fn test_small_on_target_reference_gives_small_command() {
        let mut ctrl = MpcCtrl::new();
        let u = step(&mut ctrl, 0.1, 0.1, &[0.1; 10]);

        assert!(u.abs() < 0.5, "Command should stay small: {}", u);
    }

    #[test]
    fn test_commands_within_limits() {
        let mut ctrl = MpcCtrl::new();

        for &(target, current) in [(10.0, -10.0), (-10.0, 10.0), (3.0, 0.0), (0.0, 0.0)].iter() {
            let u = step(&mut ctrl, target, current, &[target; 4]);
            assert!(u >= -2.0 && u <= 2.0, "Command out of limits: {}", u);

            let u_seq = ctrl.optimise(current, &DVector::from_element(10, target));
            assert!(u_seq.iter().all(|&u| u >= -2.0 && u <= 2.0));
        }
    }

    #[test]
    fn test_empty_plan_tracks_target() {
        let mut empty = MpcCtrl::new();
        let mut filled = MpcCtrl::new();

        let u_empty = step(&mut empty, 1.5, 0.2, &[]);
        let u_filled = step(&mut filled, 1.5, 0.2, &[1.5; 10]);

        assert_eq!(u_empty, u_filled);
        assert_eq!(empty.report().plan_len, 0);
    }

    #[test]
    fn test_deterministic() {
        let run = || {
            let mut ctrl = MpcCtrl::new();
            (0..50)
                .map(|i| {
                    let t = i as f64 * 0.1;
                    let plan: Vec<f64> = (1..=8).map(|j| (t + j as f64 * 0.1).sin()).collect();
                    step(&mut ctrl, t.sin(), 0.8 * t.sin(), &plan)
                })
                .collect::<Vec<f64>>()
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn test_reset() {
        let mut ctrl = MpcCtrl::new();
        let first = step(&mut ctrl, 0.3, 0.0, &[0.3, 0.4]);
        step(&mut ctrl, -0.2, 0.1, &[-0.2]);
        assert_ne!(ctrl.previous_command(), 0.0);

        ctrl.reset();
        assert_eq!(ctrl.previous_command(), 0.0);
        ctrl.reset();
        assert_eq!(ctrl.previous_command(), 0.0);
        assert_eq!(ctrl.report(), StatusReport::default());

        assert_eq!(step(&mut ctrl, 0.3, 0.0, &[0.3, 0.4]), first);
    }

    #[test]
    fn test_previous_command_persists() {
        let mut ctrl = MpcCtrl::new();
        let u = step(&mut ctrl, 0.2, 0.0, &[0.2; 10]);

        assert_eq!(ctrl.previous_command(), u);
        assert_eq!(ctrl.report().u_0, u);
    }
}
