//! # Rollout module
//!
//! Runs one closed loop rollout of a controller at the fixed control period. The target lateral
//! acceleration follows a sinusoid, and the future plan handed to the controller each tick is
//! the next `plan_len` targets. Near the end of the rollout the plan gets shorter, and on the
//! final tick it is empty.
//!
//! The plant is a first order lag standing in for the vehicle. This is only meant to exercise a
//! controller end to end and produce archives for inspection, not to score it.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Internal
use crate::ctrl_if::{Controller, FuturePlan, VehicleState, CTRL_PERIOD_S};
use crate::mpc_ctrl::ActuatorResponseModel;
use util::archive::{ArchiveError, Archived, Archiver};
use util::maths::{max_abs_diff, rms};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for a rollout
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct Params {
    /// Length of the rollout
    pub duration_s: f64,

    /// Amplitude of the target sinusoid
    pub ref_amplitude: f64,

    /// Period of the target sinusoid
    pub ref_period_s: f64,

    /// Constant offset added to the target sinusoid
    pub ref_offset: f64,

    /// Maximum number of future targets handed to the controller
    pub plan_len: usize,

    /// Time constant of the stand-in plant
    pub plant_tau_s: f64,

    /// Forward speed reported in the vehicle state
    pub v_ego: f64,

    /// Road roll lateral acceleration reported in the vehicle state
    pub roll_lataccel: f64
}

/// One archived tick of a rollout.
#[derive(Debug, Default, Clone, Copy, Serialize, PartialEq)]
pub struct TickRecord {
    pub time_s: f64,
    pub target_lataccel: f64,
    pub current_lataccel: f64,
    pub plan_len: usize,
    pub command: f64
}

/// Diagnostics for a finished rollout.
#[derive(Debug, Default, Clone, Copy, Serialize, PartialEq)]
pub struct RolloutSummary {
    pub num_ticks: usize,

    /// RMS of target minus current lateral acceleration
    pub rms_tracking_error: f64,

    /// Largest change in command between consecutive ticks
    pub max_command_step: f64,

    pub final_command: f64
}

/// Closed loop rollout runner.
pub struct Rollout {
    params: Params,

    /// Target lateral acceleration at every tick
    targets: Vec<f64>,

    plant: ActuatorResponseModel,

    archiver: Archiver,

    last_record: Option<TickRecord>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur during a rollout.
#[derive(Debug, Error)]
pub enum RolloutError {
    #[error("Invalid rollout parameter: {0}")]
    InvalidParam(&'static str),

    #[error("Could not archive the rollout: {0}")]
    ArchiveError(#[from] ArchiveError)
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            duration_s: 20.0,
            ref_amplitude: 1.5,
            ref_period_s: 8.0,
            ref_offset: 0.0,
            plan_len: 50,
            plant_tau_s: 0.25,
            v_ego: 25.0,
            roll_lataccel: 0.0
        }
    }
}

impl Params {
    /// Check the parameters describe a usable rollout.
    pub fn validate(&self) -> Result<(), RolloutError> {
        if !(self.duration_s >= CTRL_PERIOD_S) || !self.duration_s.is_finite() {
            return Err(RolloutError::InvalidParam("duration_s must cover at least one tick"))
        }
        if !(self.ref_period_s > 0.0) || !self.ref_period_s.is_finite() {
            return Err(RolloutError::InvalidParam("ref_period_s must be positive"))
        }
        if !(self.plant_tau_s > 0.0) || !self.plant_tau_s.is_finite() {
            return Err(RolloutError::InvalidParam("plant_tau_s must be positive"))
        }
        if !self.ref_amplitude.is_finite() || !self.ref_offset.is_finite() {
            return Err(RolloutError::InvalidParam("reference must be finite"))
        }

        Ok(())
    }

    /// Number of control ticks in the rollout.
    pub fn num_ticks(&self) -> usize {
        (self.duration_s / CTRL_PERIOD_S).round() as usize
    }
}

impl Rollout {
    /// Create a new rollout which does not archive its ticks.
    pub fn new(params: Params) -> Result<Self, RolloutError> {
        params.validate()?;

        let targets = (0..params.num_ticks())
            .map(|k| {
                let t = k as f64 * CTRL_PERIOD_S;
                params.ref_offset
                    + params.ref_amplitude
                    * (std::f64::consts::TAU * t / params.ref_period_s).sin()
            })
            .collect();

        Ok(Self {
            params,
            targets,
            plant: ActuatorResponseModel::new(CTRL_PERIOD_S, params.plant_tau_s),
            archiver: Archiver::default(),
            last_record: None
        })
    }

    /// Archive every tick with the given archiver.
    pub fn with_archiver(mut self, archiver: Archiver) -> Self {
        self.archiver = archiver;
        self
    }

    /// Target lateral acceleration at every tick.
    pub fn targets(&self) -> &[f64] {
        &self.targets
    }

    /// Run the controller through the rollout.
    ///
    /// The controller is reset before the first tick, so the same controller
    /// may be run through several rollouts.
    pub fn run<C: Controller + ?Sized>(
        &mut self,
        ctrl: &mut C
    ) -> Result<(Vec<TickRecord>, RolloutSummary), RolloutError> {
        ctrl.reset();
        self.plant.set_accel(0.0);

        let state = VehicleState {
            roll_lataccel: self.params.roll_lataccel,
            v_ego: self.params.v_ego,
            a_ego: 0.0
        };

        let n = self.targets.len();
        let mut records = Vec::with_capacity(n);

        info!("Starting rollout of {} ticks", n);

        for k in 0..n {
            let target_lataccel = self.targets[k];
            let current_lataccel = self.plant.accel();

            let plan_end = (k + 1 + self.params.plan_len).min(n);
            let plan = FuturePlan {
                lataccel: self.targets[k + 1..plan_end].to_vec(),
                roll_lataccel: vec![state.roll_lataccel; plan_end - k - 1],
                v_ego: vec![state.v_ego; plan_end - k - 1],
                a_ego: vec![state.a_ego; plan_end - k - 1]
            };

            let command = ctrl.update(target_lataccel, current_lataccel, &state, &plan);

            let record = TickRecord {
                time_s: k as f64 * CTRL_PERIOD_S,
                target_lataccel,
                current_lataccel,
                plan_len: plan.lataccel.len(),
                command
            };
            self.last_record = Some(record);
            self.write()?;
            records.push(record);

            self.plant.step(command);
        }

        let summary = summarise(&records);

        debug!("Rollout finished: {:?}", summary);

        Ok((records, summary))
    }
}

impl Archived for Rollout {
    fn write(&mut self) -> Result<(), ArchiveError> {
        match self.last_record {
            Some(r) => self.archiver.serialise(r),
            None => Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Summarise a set of tick records.
pub fn summarise(records: &[TickRecord]) -> RolloutSummary {
    let errors: Vec<f64> = records
        .iter()
        .map(|r| r.target_lataccel - r.current_lataccel)
        .collect();
    let commands: Vec<f64> = records.iter().map(|r| r.command).collect();

    RolloutSummary {
        num_ticks: records.len(),
        rms_tracking_error: rms(&errors).unwrap_or(0.0),
        max_command_step: max_abs_diff(&commands),
        final_command: commands.last().copied().unwrap_or(0.0)
    }
}
