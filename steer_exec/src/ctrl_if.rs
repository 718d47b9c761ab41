//! # Controller interface
//!
//! Every steering controller is driven through the [`Controller`] trait. Once per tick (10 Hz)
//! the caller passes in the target and measured lateral acceleration, the current vehicle state
//! and a short future plan, and gets back a single steering command.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Control cycle period.
pub const CTRL_PERIOD_S: f64 = 0.1;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Vehicle state at the current tick.
///
/// The controllers in this crate treat this as opaque, it is only forwarded to feedback
/// controllers which may want it.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct VehicleState {
    /// Lateral acceleration due to road roll
    pub roll_lataccel: f64,

    /// Forward speed of the vehicle
    pub v_ego: f64,

    /// Forward acceleration of the vehicle
    pub a_ego: f64
}

/// Short future reference trajectory, one element per upcoming tick.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub struct FuturePlan {
    /// Upcoming target lateral accelerations
    pub lataccel: Vec<f64>,

    /// Upcoming road roll lateral accelerations
    #[serde(default)]
    pub roll_lataccel: Vec<f64>,

    /// Upcoming forward speeds
    #[serde(default)]
    pub v_ego: Vec<f64>,

    /// Upcoming forward accelerations
    #[serde(default)]
    pub a_ego: Vec<f64>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The controllers which can be selected to drive a rollout.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CtrlKind {
    /// Predictive horizon optimiser
    Mpc,

    /// Feedforward, feedback and smoothing hybrid
    Hybrid
}

/// Error returned when parsing an unknown controller name.
#[derive(Debug, Error)]
#[error("Unknown controller \"{0}\", expected one of \"mpc\" or \"hybrid\"")]
pub struct UnknownCtrlKind(pub String);

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A single input single output steering controller.
pub trait Controller {
    /// Return the controller to its rollout-start state.
    ///
    /// The default implementation does nothing, which suits stateless controllers.
    fn reset(&mut self) {}

    /// Compute the steering command for this tick.
    fn update(
        &mut self,
        target_lataccel: f64,
        current_lataccel: f64,
        state: &VehicleState,
        future_plan: &FuturePlan
    ) -> f64;
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<C: Controller + ?Sized> Controller for Box<C> {
    fn reset(&mut self) {
        (**self).reset()
    }

    fn update(
        &mut self,
        target_lataccel: f64,
        current_lataccel: f64,
        state: &VehicleState,
        future_plan: &FuturePlan
    ) -> f64 {
        (**self).update(target_lataccel, current_lataccel, state, future_plan)
    }
}

impl FuturePlan {
    /// Build a plan carrying only lateral accelerations.
    pub fn from_lataccel(lataccel: Vec<f64>) -> Self {
        Self {
            lataccel,
            ..Default::default()
        }
    }
}

impl FromStr for CtrlKind {
    type Err = UnknownCtrlKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mpc" => Ok(CtrlKind::Mpc),
            "hybrid" => Ok(CtrlKind::Hybrid),
            _ => Err(UnknownCtrlKind(String::from(s)))
        }
    }
}

impl fmt::Display for CtrlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CtrlKind::Mpc => write!(f, "mpc"),
            CtrlKind::Hybrid => write!(f, "hybrid")
        }
    }
}
