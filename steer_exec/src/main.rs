//! Steering control executable entry point.
//!
//! # Architecture
//!
//! The executable runs a single closed loop rollout of one of the steering controllers:
//!
//!     - Parse the command line and start the session
//!     - Load the rollout and controller parameters
//!     - Run the rollout, archiving every tick
//!     - Save a summary of the rollout into the session

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::info;
use std::path::{Path, PathBuf};
use serde::de::DeserializeOwned;
use structopt::StructOpt;
use color_eyre::{Report, eyre::WrapErr};

// Internal
use steer_lib::{
    ctrl_if::{Controller, CtrlKind},
    hybrid_ctrl::{self, HybridCtrl},
    mpc_ctrl::{self, MpcCtrl},
    pid_ctrl::{self, PidCtrl},
    rollout::{self, Rollout}
};
use util::{
    archive::Archiver,
    logger::{logger_init, parse_level},
    params::{self, LoadError},
    session::Session
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Command line options
#[derive(Debug, StructOpt)]
#[structopt(
    name = "steer_exec",
    about = "Run a closed loop lateral acceleration rollout with a steering controller"
)]
struct Opts {
    /// The controller to run, either "mpc" or "hybrid"
    #[structopt(short, long, default_value = "hybrid")]
    ctrl: CtrlKind,

    /// Parameter directory, defaults to $STEER_SW_ROOT/params
    #[structopt(short, long, parse(from_os_str))]
    params: Option<PathBuf>,

    /// Minimum log level (info, debug or trace)
    #[structopt(long, default_value = "info")]
    log_level: String,

    /// Don't create a session, only log to stdout
    #[structopt(long)]
    no_archive: bool
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {

    // ---- EARLY INITIALISATION ----

    color_eyre::install()?;

    let opts = Opts::from_args();

    // Initialise session
    let session = match opts.no_archive {
        true => None,
        false => Some(
            Session::new("steer_exec", "sessions")
                .wrap_err("Failed to create the session")?
        )
    };

    // Initialise logger
    let level = parse_level(&opts.log_level)
        .wrap_err("Invalid log level")?;
    logger_init(level, session.as_ref())
        .wrap_err("Failed to initialise logging")?;

    info!("Steering Control Executable\n");
    if let Some(ref s) = session {
        info!("Session directory: {:?}\n", s.session_root);
    }

    // ---- LOAD PARAMETERS ----

    let params_dir = match opts.params {
        Some(ref p) => p.clone(),
        None => params::params_dir().wrap_err("Cannot find the parameter directory")?
    };

    let rollout_params: rollout::Params = load_params(&params_dir, "rollout.toml")
        .wrap_err("Could not load rollout params")?;

    let mut ctrl = build_ctrl(opts.ctrl, &params_dir)?;

    info!("Parameters loaded from {:?}", params_dir);

    // ---- RUN ROLLOUT ----

    let archiver = match session {
        Some(ref s) => Archiver::from_path(s, format!("{}_ticks.csv", opts.ctrl))
            .wrap_err("Could not create the tick archive")?,
        None => Archiver::default()
    };

    let mut rollout = Rollout::new(rollout_params)
        .wrap_err("Could not initialise the rollout")?
        .with_archiver(archiver);

    info!("Running {} controller", opts.ctrl);

    let (_, summary) = rollout.run(ctrl.as_mut())
        .wrap_err("Rollout failed")?;

    info!("Rollout complete:");
    info!("    Ticks: {}", summary.num_ticks);
    info!("    RMS tracking error: {:.4}", summary.rms_tracking_error);
    info!("    Max command step: {:.4}", summary.max_command_step);

    if let Some(ref s) = session {
        let path = s.save_json(format!("{}_summary.json", opts.ctrl), &summary)
            .wrap_err("Could not save the rollout summary")?;
        info!("Summary saved to {:?}", path);
    }

    Ok(())
}

/// Build the selected controller from the parameters in `params_dir`.
fn build_ctrl(kind: CtrlKind, params_dir: &Path) -> Result<Box<dyn Controller>, Report> {
    let ctrl: Box<dyn Controller> = match kind {
        CtrlKind::Mpc => {
            let p: mpc_ctrl::Params = load_params(params_dir, "mpc_ctrl.toml")
                .wrap_err("Could not load MpcCtrl params")?;

            Box::new(MpcCtrl::from_params(p)
                .wrap_err("Failed to initialise MpcCtrl")?)
        },
        CtrlKind::Hybrid => {
            let pid_params: pid_ctrl::Params = load_params(params_dir, "pid_ctrl.toml")
                .wrap_err("Could not load PidCtrl params")?;
            let p: hybrid_ctrl::Params = load_params(params_dir, "hybrid_ctrl.toml")
                .wrap_err("Could not load HybridCtrl params")?;

            let pid = PidCtrl::from_params(&pid_params)
                .wrap_err("Failed to initialise PidCtrl")?;

            Box::new(HybridCtrl::from_params(p, pid)
                .wrap_err("Failed to initialise HybridCtrl")?)
        }
    };

    Ok(ctrl)
}

/// Load a parameter file from the parameter directory.
fn load_params<P: DeserializeOwned>(params_dir: &Path, file_name: &str) -> Result<P, LoadError> {
    params::load_path(params_dir.join(file_name))
}
