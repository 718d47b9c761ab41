//! Utility library for the steering control software
//!
//! Provides the pieces shared by every executable in the workspace: parameter file loading,
//! session directories, logging setup, CSV archives and a few maths helpers.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod archive;
pub mod host;
pub mod logger;
pub mod maths;
pub mod params;
pub mod session;
pub mod time;
