//! Hybrid control parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// Internal
use super::HybridCtrlError;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for hybrid control
///
/// Any field missing from a parameter file takes its tuned default.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct Params {
    /// Number of future plan values averaged for the feedforward preview
    pub preview_horizon: usize,

    /// Feedforward gain
    pub k_ff: f64,

    /// Smoothing factor used when the raw command is close to the previous
    /// command
    pub alpha_base: f64,

    /// Smoothing factor used when the raw command jumps away from the
    /// previous command
    pub alpha_jump: f64,

    /// Change in command above which the jump smoothing factor is used
    pub jump_threshold: f64,

    /// Minimum steering command
    pub u_min: f64,

    /// Maximum steering command
    pub u_max: f64
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            preview_horizon: 10,
            k_ff: 0.15,
            alpha_base: 0.9,
            alpha_jump: 0.9,
            jump_threshold: 0.10,
            u_min: -2.0,
            u_max: 2.0
        }
    }
}

impl Params {
    /// Check the parameters describe a usable controller.
    pub fn validate(&self) -> Result<(), HybridCtrlError> {
        if self.preview_horizon == 0 {
            return Err(HybridCtrlError::InvalidParam("preview_horizon must be at least 1"))
        }
        if !self.k_ff.is_finite() {
            return Err(HybridCtrlError::InvalidParam("k_ff must be finite"))
        }
        for alpha in [self.alpha_base, self.alpha_jump].iter() {
            if !(*alpha >= 0.0 && *alpha <= 1.0) {
                return Err(HybridCtrlError::InvalidSmoothingFactor(*alpha))
            }
        }
        if !(self.jump_threshold >= 0.0) {
            return Err(HybridCtrlError::InvalidParam("jump_threshold must be non-negative"))
        }
        if !(self.u_min < self.u_max) {
            return Err(HybridCtrlError::InvalidLimits(self.u_min, self.u_max))
        }

        Ok(())
    }
}
