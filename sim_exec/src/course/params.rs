//! Course parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the look-ahead target search
#[derive(Deserialize, Debug, Clone, Copy)]
pub struct Params {
    /// Speed-proportional look-ahead gain
    pub lookahead_gain_s: f64,

    /// Base look-ahead distance. Must be positive, as the steering law
    /// divides by the look-ahead distance.
    pub lookahead_base_m: f64,
}
