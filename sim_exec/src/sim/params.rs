//! Simulation driver parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the simulation driver
#[derive(Deserialize, Debug, Clone, Copy)]
pub struct Params {
    /// Target speed the speed controller drives towards
    pub target_speed_ms: f64,

    /// Simulated time budget. The simulation stops once the elapsed time
    /// exceeds this.
    pub sim_duration_s: f64,
}
