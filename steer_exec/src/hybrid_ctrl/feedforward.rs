//! Preview feedforward
//!
//! The feedforward term anticipates upcoming curvature by averaging the first few values of the
//! future plan and scaling the result by a fixed gain.

use util::maths::mean;

/// The previewed lateral acceleration.
///
/// This is the mean of the first `min(preview_horizon, len)` plan values, or
/// `target_lataccel` if the plan is empty.
pub fn preview_lataccel(plan_lataccel: &[f64], target_lataccel: f64, preview_horizon: usize) -> f64 {
    let len = preview_horizon.min(plan_lataccel.len());

    mean(&plan_lataccel[..len]).unwrap_or(target_lataccel)
}

/// The feedforward command for the given plan.
pub fn compute_feedforward(
    k_ff: f64,
    plan_lataccel: &[f64],
    target_lataccel: f64,
    preview_horizon: usize
) -> f64 {
    k_ff * preview_lataccel(plan_lataccel, target_lataccel, preview_horizon)
}
