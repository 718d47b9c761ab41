//! Adaptive output smoothing

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;

use super::Params;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Exponential low pass filter with a jump dependent smoothing factor.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AdaptiveSmoother {
    alpha_base: f64,
    alpha_jump: f64,
    jump_threshold: f64
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl AdaptiveSmoother {
    pub fn new(params: &Params) -> Self {
        Self {
            alpha_base: params.alpha_base,
            alpha_jump: params.alpha_jump,
            jump_threshold: params.jump_threshold
        }
    }

    /// Select the smoothing factor for the given raw and previous commands.
    ///
    /// Returns the factor and whether the change counted as a jump.
    pub fn select_alpha(&self, u_raw: f64, u_prev: f64) -> (f64, bool) {
        let delta = (u_raw - u_prev).abs();

        if delta > self.jump_threshold {
            (self.alpha_jump, true)
        }
        else {
            (self.alpha_base, false)
        }
    }

    /// Blend the raw command with the previous command.
    pub fn blend(alpha: f64, u_raw: f64, u_prev: f64) -> f64 {
        alpha * u_raw + (1.0 - alpha) * u_prev
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_tuned_factors_equal() {
        let smoother = AdaptiveSmoother::new(&Params::default());

        assert_eq!(smoother.select_alpha(0.05, 0.0), (0.9, false));
        assert_eq!(smoother.select_alpha(1.0, 0.0), (0.9, true));
        assert_eq!(smoother.select_alpha(-0.2, 0.0), (0.9, true));
    }

    #[test]
    fn test_retuned_factors() {
        let smoother = AdaptiveSmoother::new(&Params {
            alpha_base: 0.5,
            ..Default::default()
        });

        assert_eq!(smoother.select_alpha(0.05, 0.0), (0.5, false));

        // Exactly at the threshold is not a jump
        assert_eq!(smoother.select_alpha(0.1, 0.0).1, false);
        assert_eq!(smoother.select_alpha(0.5, 0.0), (0.9, true));
    }

    #[test]
    fn test_blend() {
        assert_eq!(AdaptiveSmoother::blend(1.0, 0.7, -3.0), 0.7);
        assert_eq!(AdaptiveSmoother::blend(0.0, 0.7, -3.0), -3.0);
        assert!((AdaptiveSmoother::blend(0.9, 1.0, 0.0) - 0.9).abs() < 1e-12);
    }
}
