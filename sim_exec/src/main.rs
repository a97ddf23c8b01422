//! Main simulation executable entry point.
//!
//! # Architecture
//!
//! The execution methodology consists of:
//!
//!     - Create the session and initialise logging
//!     - Load the parameter files
//!     - Build the reference course and the initial vehicle state
//!     - Run the simulation driver to completion
//!     - Write the driven trajectory into the session directory
//!
//! The trajectory JSON is the hand-off point for any plotting consumer, it
//! carries one `(time, x, y, heading, speed)` sample per tick.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::info;
use nalgebra::Vector2;
use std::env;
use std::path::PathBuf;

// Internal
use sim_lib::{
    course::{self, Path, TargetCourse},
    sim::{self, SimDriver},
    traj_ctrl::{self, PurePursuit, SpeedCtrl},
    vehicle::{self, VehicleState},
};
use util::{
    logger::{logger_init, LevelFilter},
    session::Session,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Extent of the reference course along x.
const COURSE_LENGTH_M: f64 = 50.0;

/// Waypoint spacing of the reference course along x.
const COURSE_SPACING_M: f64 = 0.5;

/// Initial pose of the vehicle, deliberately offset from the course so the
/// controller has an initial error to correct.
const INITIAL_POSITION_M: (f64, f64) = (0.0, -3.0);

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session =
        Session::new("sim_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Trace, &session).wrap_err("Failed to initialise logging")?;

    info!("Pure Pursuit Path Tracking Simulation\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    // The params directory may be overriden with a single CLI argument
    let args: Vec<String> = env::args().collect();
    let params_dir = match args.len() {
        1 => PathBuf::from("params"),
        2 => PathBuf::from(&args[1]),
        _ => {
            return Err(eyre!(
                "Expected either zero or one argument, found {}",
                args.len() - 1
            ))
        }
    };

    let vehicle_params: vehicle::Params = util::params::load(params_dir.join("vehicle.toml"))
        .wrap_err("Could not load vehicle params")?;
    let course_params: course::Params = util::params::load(params_dir.join("course.toml"))
        .wrap_err("Could not load course params")?;
    let ctrl_params: traj_ctrl::Params = util::params::load(params_dir.join("traj_ctrl.toml"))
        .wrap_err("Could not load trajectory control params")?;
    let sim_params: sim::Params = util::params::load(params_dir.join("sim.toml"))
        .wrap_err("Could not load sim params")?;

    info!("Parameters loaded from {:?}", params_dir);

    // ---- BUILD THE SCENARIO ----

    let path = reference_course().wrap_err("Failed to build the reference course")?;

    info!(
        "Course: {} waypoints, {:.1} m long",
        path.num_points(),
        path.length_m()
    );

    let course = TargetCourse::new(path, course_params);

    let vehicle = VehicleState::new(
        vehicle_params,
        Vector2::new(INITIAL_POSITION_M.0, INITIAL_POSITION_M.1),
        0.0,
        0.0,
    );

    let mut driver = SimDriver::new(
        sim_params,
        vehicle,
        course,
        SpeedCtrl::new(&ctrl_params),
        PurePursuit::new(&ctrl_params),
    );

    // ---- RUN ----

    info!("Beginning simulation\n");

    let report = driver.run();

    info!("Simulation complete:");
    info!("    Ticks: {}", report.num_ticks);
    info!("    Simulated time: {:.1} s", report.elapsed_s);
    info!("    Stop cause: {:?}", report.stop_cause);
    info!("    Final speed: {:.2} m/s", report.final_speed_ms);
    info!(
        "    Final position: ({:.2}, {:.2}) m",
        driver.vehicle().position_m()[0],
        driver.vehicle().position_m()[1]
    );

    // ---- WRITE TRAJECTORY ----

    let traj_path = session.session_root.join("trajectory.json");
    let traj_json = serde_json::to_string_pretty(driver.trajectory())
        .wrap_err("Could not serialise the trajectory")?;
    std::fs::write(&traj_path, traj_json).wrap_err("Could not write the trajectory file")?;

    info!("Trajectory written to {:?}", traj_path);
    info!("End of execution");

    Ok(())
}

/// Build the reference course, a sine sweep of growing amplitude.
fn reference_course() -> Result<Path, course::CourseError> {
    let num_points = (COURSE_LENGTH_M / COURSE_SPACING_M) as usize;

    let x_m: Vec<f64> = (0..num_points)
        .map(|i| i as f64 * COURSE_SPACING_M)
        .collect();
    let y_m: Vec<f64> = x_m.iter().map(|x| (x / 5.0).sin() * x / 2.0).collect();

    Path::from_waypoints(&x_m, &y_m)
}
