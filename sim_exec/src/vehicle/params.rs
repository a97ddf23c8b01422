//! Vehicle parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters of the vehicle kinematic model
#[derive(Deserialize, Debug, Clone, Copy)]
pub struct Params {
    /// Distance between the front and rear axles
    pub wheelbase_m: f64,

    /// Timestep used to integrate the kinematics
    pub timestep_s: f64,
}
