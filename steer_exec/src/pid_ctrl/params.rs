//! PID control parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// Internal
use super::PidCtrlError;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the PID controller
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct Params {
    /// Proportional gain
    pub k_p: f64,

    /// Integral gain
    pub k_i: f64,

    /// Derivative gain
    pub k_d: f64
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            k_p: 0.3,
            k_i: 0.05,
            k_d: -0.1
        }
    }
}

impl Params {
    /// Check that all gains are finite.
    pub fn validate(&self) -> Result<(), PidCtrlError> {
        for (name, gain) in [("k_p", self.k_p), ("k_i", self.k_i), ("k_d", self.k_d)].iter() {
            if !gain.is_finite() {
                return Err(PidCtrlError::NonFiniteGain(*name, *gain))
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_shipped_params_match_defaults() {
        let params: Params = toml::from_str(
            include_str!("../../../params/pid_ctrl.toml")
        ).unwrap();

        assert_eq!(params, Params::default());
        assert!(params.validate().is_ok());
    }
}
