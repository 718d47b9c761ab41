//! Hybrid controller state

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace};
use serde::Serialize;

// Internal
use super::{compute_feedforward, AdaptiveSmoother, Params};
use crate::ctrl_if::{Controller, FuturePlan, VehicleState};
use crate::pid_ctrl::PidCtrl;
use util::maths::clamp;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Feedforward, feedback and smoothing controller.
///
/// The feedback controller is owned by composition and only driven through
/// the `Controller` trait.
#[derive(Debug, Clone)]
pub struct HybridCtrl<F: Controller = PidCtrl> {
    params: Params,

    /// Baseline feedback controller
    feedback: F,

    smoother: AdaptiveSmoother,

    /// The command applied on the previous tick, zero at rollout start
    u_prev: f64,

    report: StatusReport
}

/// Monitoring quantities from the last tick.
#[derive(Debug, Default, Copy, Clone, Serialize, PartialEq)]
pub struct StatusReport {
    /// Feedback term
    pub u_fb: f64,

    /// Feedforward term
    pub u_ff: f64,

    /// Sum of the feedback and feedforward terms
    pub u_raw: f64,

    /// Smoothing factor applied
    pub alpha: f64,

    /// True if the raw command jumped by more than the jump threshold
    pub jump_detected: bool,

    /// True if the smoothed command had to be clamped
    pub saturated: bool
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur when building a hybrid controller.
#[derive(Debug, thiserror::Error)]
pub enum HybridCtrlError {
    #[error("Invalid parameter: {0}")]
    InvalidParam(&'static str),

    #[error("Smoothing factors must lie in [0, 1], found {0}")]
    InvalidSmoothingFactor(f64),

    #[error("Command limits must satisfy u_min < u_max, found [{0}, {1}]")]
    InvalidLimits(f64, f64)
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl HybridCtrl<PidCtrl> {
    /// Create a new controller with the tuned parameters and the baseline PID
    /// as the feedback controller.
    pub fn new() -> Self {
        Self::build(Params::default(), PidCtrl::new())
    }
}

impl Default for HybridCtrl<PidCtrl> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Controller> HybridCtrl<F> {
    /// Create a new controller with the tuned parameters around the given
    /// feedback controller.
    pub fn with_feedback(feedback: F) -> Self {
        Self::build(Params::default(), feedback)
    }

    /// Create a new controller from the given parameters and feedback
    /// controller.
    pub fn from_params(params: Params, feedback: F) -> Result<Self, HybridCtrlError> {
        params.validate()?;

        debug!("HybridCtrl built with {:?}", params);

        Ok(Self::build(params, feedback))
    }

    fn build(params: Params, feedback: F) -> Self {
        Self {
            smoother: AdaptiveSmoother::new(&params),
            params,
            feedback,
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

    /// The wrapped feedback controller.
    pub fn feedback(&self) -> &F {
        &self.feedback
    }
}

impl<F: Controller> Controller for HybridCtrl<F> {
    fn reset(&mut self) {
        self.u_prev = 0.0;
        self.report = StatusReport::default();
        self.feedback.reset();

        debug!("HybridCtrl reset");
    }

    fn update(
        &mut self,
        target_lataccel: f64,
        current_lataccel: f64,
        state: &VehicleState,
        future_plan: &FuturePlan
    ) -> f64 {
        let p = &self.params;

        let u_fb = self.feedback.update(target_lataccel, current_lataccel, state, future_plan);
        let u_ff = compute_feedforward(
            p.k_ff,
            &future_plan.lataccel,
            target_lataccel,
            p.preview_horizon
        );
        let u_raw = u_fb + u_ff;

        let (alpha, jump_detected) = self.smoother.select_alpha(u_raw, self.u_prev);
        let u_smooth = AdaptiveSmoother::blend(alpha, u_raw, self.u_prev);
        let u = clamp(&u_smooth, &p.u_min, &p.u_max);

        self.report = StatusReport {
            u_fb,
            u_ff,
            u_raw,
            alpha,
            jump_detected,
            saturated: u != u_smooth
        };

        trace!(
            "HybridCtrl: target = {:.4}, current = {:.4}, u = {:.4}, {:?}",
            target_lataccel, current_lataccel, u, self.report
        );

        self.u_prev = u;
        u
    }
}

#[cfg(test)]
mod test {
    use super::*;

    /// Feedback controller with a fixed output which counts its resets.
    #[derive(Debug, Default)]
    struct FixedFeedback {
        out: f64,
        resets: usize
    }

    impl Controller for FixedFeedback {
        fn reset(&mut self) {
            self.resets += 1;
        }

        fn update(&mut self, _: f64, _: f64, _: &VehicleState, _: &FuturePlan) -> f64 {
            self.out
        }
    }

    /// Feedback controller without a reset of its own.
    struct NoResetFeedback;

    impl Controller for NoResetFeedback {
        fn update(&mut self, target: f64, current: f64, _: &VehicleState, _: &FuturePlan) -> f64 {
            target - current
        }
    }

    fn step<F: Controller>(ctrl: &mut HybridCtrl<F>, target: f64, current: f64, plan: &[f64]) -> f64 {
        ctrl.update(
            target,
            current,
            &VehicleState::default(),
            &FuturePlan::from_lataccel(plan.to_vec())
        )
    }

    #[test]
    fn test_feedforward_term() {
        let mut ctrl = HybridCtrl::with_feedback(FixedFeedback::default());
        step(&mut ctrl, 0.0, 0.0, &[0.2; 5]);

        let report = ctrl.report();
        assert!((report.u_ff - 0.03).abs() < 1e-12, "u_ff = {}", report.u_ff);
        assert_eq!(report.u_fb, 0.0);
    }

    #[test]
    fn test_clamped_output() {
        let mut ctrl = HybridCtrl::with_feedback(FixedFeedback { out: 5.0, resets: 0 });

        // Empty plan with zero target gives no feedforward so u_raw = 5.0
        assert_eq!(step(&mut ctrl, 0.0, 0.0, &[]), 2.0);
        assert_eq!(ctrl.report().u_raw, 5.0);
        assert!(ctrl.report().saturated);
        assert_eq!(ctrl.previous_command(), 2.0);

        ctrl.feedback.out = -5.0;
        assert_eq!(step(&mut ctrl, 0.0, 0.0, &[]), -2.0);
    }

    #[test]
    fn test_smoothing() {
        let mut ctrl = HybridCtrl::with_feedback(FixedFeedback { out: 1.0, resets: 0 });

        let u_0 = step(&mut ctrl, 0.0, 0.0, &[]);
        assert!((u_0 - 0.9).abs() < 1e-12);
        assert!(ctrl.report().jump_detected);

        // 0.9 * 1.0 + 0.1 * 0.9
        let u_1 = step(&mut ctrl, 0.0, 0.0, &[]);
        assert!((u_1 - 0.99).abs() < 1e-12);
        assert!(!ctrl.report().jump_detected);
        assert_eq!(ctrl.report().alpha, 0.9);
    }

    #[test]
    fn test_empty_plan_uses_target() {
        let mut ctrl = HybridCtrl::with_feedback(FixedFeedback::default());
        step(&mut ctrl, 1.5, 1.5, &[]);

        assert!((ctrl.report().u_ff - 0.15 * 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_reset_cascades() {
        let mut ctrl = HybridCtrl::with_feedback(FixedFeedback { out: 0.5, resets: 0 });
        step(&mut ctrl, 0.0, 0.0, &[]);
        assert_ne!(ctrl.previous_command(), 0.0);

        ctrl.reset();
        assert_eq!(ctrl.previous_command(), 0.0);
        assert_eq!(ctrl.feedback().resets, 1);

        ctrl.reset();
        assert_eq!(ctrl.previous_command(), 0.0);
        assert_eq!(ctrl.report(), StatusReport::default());
    }

    #[test]
    fn test_feedback_without_reset() {
        let mut ctrl = HybridCtrl::with_feedback(NoResetFeedback);
        let first = step(&mut ctrl, 0.5, 0.0, &[0.5]);
        step(&mut ctrl, 0.2, 0.1, &[0.1]);

        ctrl.reset();
        assert_eq!(step(&mut ctrl, 0.5, 0.0, &[0.5]), first);
    }

    #[test]
    fn test_pid_rollout_deterministic_and_bounded() {
        let run = || {
            let mut ctrl = HybridCtrl::new();
            let mut current = 0.0;
            (0..100)
                .map(|i| {
                    let t = i as f64 * 0.1;
                    let target = 3.0 * t.sin();
                    let plan: Vec<f64> = (1..=12).map(|j| 3.0 * (t + j as f64 * 0.1).sin()).collect();
                    let u = step(&mut ctrl, target, current, &plan);
                    current += 0.4 * (u - current);
                    u
                })
                .collect::<Vec<f64>>()
        };

        let first = run();
        assert_eq!(first, run());
        assert!(first.iter().all(|&u| u >= -2.0 && u <= 2.0));
    }

    #[test]
    fn test_from_params_rejects_invalid() {
        let params = Params { alpha_base: -0.1, ..Default::default() };

        assert!(HybridCtrl::from_params(params, PidCtrl::new()).is_err());
    }
}
