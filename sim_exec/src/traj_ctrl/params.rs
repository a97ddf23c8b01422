//! Trajectory control parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for trajectory control
#[derive(Deserialize, Debug, Clone, Copy)]
pub struct Params {
    /// Speed controller proportional gain
    pub speed_k_p: f64,

    /// Distance between the front and rear axles, used by the pure pursuit
    /// steering law
    pub wheelbase_m: f64,
}
