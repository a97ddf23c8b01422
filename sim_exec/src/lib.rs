//! # Simulator library.
//!
//! This library holds the core of the path tracking simulation: the vehicle
//! kinematic model, the target course, the controllers and the simulation
//! driver. The `sim_exec` binary wires these together for the reference
//! scenario, but each module is usable on its own.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Course module - the waypoint path and the look-ahead target search
pub mod course;

/// Simulation driver module - advances the simulation tick by tick
pub mod sim;

/// Trajectory control module - speed and pure pursuit steering controllers
pub mod traj_ctrl;

/// Vehicle module - kinematic bicycle model state and integration
pub mod vehicle;
