//! # Simulation driver module
//!
//! The driver owns the vehicle, the course and the controllers, and advances
//! the simulation one tick at a time. Each tick runs the speed controller,
//! then the pure pursuit steering controller, integrates the vehicle state
//! and advances the clock. The driver stops when either the course is
//! exhausted or the simulated time budget is spent.
//!
//! The driver is purely deterministic given its inputs: there is no
//! randomness and no dependence on wall-clock time.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info};
use serde::Serialize;

// Internal
use crate::course::TargetCourse;
use crate::traj_ctrl::{PurePursuit, SpeedCtrl};
use crate::vehicle::VehicleState;
pub use params::Params;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The simulation driver
pub struct SimDriver {
    params: Params,

    mode: SimMode,

    vehicle: VehicleState,
    course: TargetCourse,
    speed_ctrl: SpeedCtrl,
    pursuit: PurePursuit,

    /// Simulated time since the start of the run
    elapsed_s: f64,

    /// Number of completed ticks
    num_ticks: u64,

    /// Target index carried between ticks. Non-decreasing.
    target_index: usize,

    stop_cause: Option<StopCause>,

    /// The trajectory driven so far, one point per tick plus the initial
    /// state
    trajectory: Vec<TrajectoryPoint>,
}

/// A single sampled point of the driven trajectory
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TrajectoryPoint {
    pub time_s: f64,
    pub x_m: f64,
    pub y_m: f64,
    pub heading_rad: f64,
    pub speed_ms: f64,
}

/// Summary of a completed simulation run
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SimReport {
    pub num_ticks: u64,
    pub elapsed_s: f64,
    pub stop_cause: StopCause,
    pub final_speed_ms: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The possible modes of the simulation driver.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SimMode {
    Running,
    Stopped,
}

/// Why the simulation stopped.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum StopCause {
    /// The target index reached the end of the course
    EndOfCourse,

    /// The simulated time budget was spent
    DurationExceeded,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SimDriver {
    /// Create a new driver over the given course.
    ///
    /// The initial target index is seeded with one search from the initial
    /// vehicle state, so the first tick already steers towards a valid
    /// target.
    pub fn new(
        params: Params,
        vehicle: VehicleState,
        mut course: TargetCourse,
        speed_ctrl: SpeedCtrl,
        pursuit: PurePursuit,
    ) -> Self {
        let (target_index, _) = course.search_target_index(&vehicle);

        let mut driver = Self {
            params,
            mode: SimMode::Running,
            vehicle,
            course,
            speed_ctrl,
            pursuit,
            elapsed_s: 0.0,
            num_ticks: 0,
            target_index,
            stop_cause: None,
            trajectory: Vec::new(),
        };

        driver.record_trajectory();

        driver
    }

    /// Get the current driver mode.
    pub fn mode(&self) -> SimMode {
        self.mode
    }

    /// Get the current vehicle state.
    pub fn vehicle(&self) -> &VehicleState {
        &self.vehicle
    }

    /// Get the current target index.
    pub fn target_index(&self) -> usize {
        self.target_index
    }

    /// Get the trajectory driven so far.
    pub fn trajectory(&self) -> &[TrajectoryPoint] {
        &self.trajectory
    }

    /// Advance the simulation by one tick.
    ///
    /// Does nothing once the driver has stopped.
    pub fn step(&mut self) {
        if self.mode == SimMode::Stopped {
            return;
        }

        // Longitudinal control
        let accel_ms2 = self
            .speed_ctrl
            .accel_dem_ms2(self.params.target_speed_ms, self.vehicle.speed_ms());

        // Lateral control
        let (steer_rad, target_index) =
            self.pursuit
                .steer_dem_rad(&self.vehicle, &mut self.course, self.target_index);
        self.target_index = target_index;

        // Integrate the vehicle and advance the clock
        self.vehicle.update(accel_ms2, steer_rad);
        self.elapsed_s += self.vehicle.timestep_s();
        self.num_ticks += 1;

        self.record_trajectory();

        debug!(
            "t = {:6.1} s: pos = ({:7.2}, {:7.2}) m, v = {:5.2} m/s, target = {}",
            self.elapsed_s,
            self.vehicle.position_m()[0],
            self.vehicle.position_m()[1],
            self.vehicle.speed_ms(),
            self.target_index
        );

        // Stopping conditions
        if self.elapsed_s > self.params.sim_duration_s {
            self.stop(StopCause::DurationExceeded);
        } else if self.target_index >= self.course.path().num_points() - 1 {
            self.stop(StopCause::EndOfCourse);
        }
    }

    /// Run the simulation to completion and return the report.
    pub fn run(&mut self) -> SimReport {
        while self.mode == SimMode::Running {
            self.step();
        }

        // Stop cause is always set by the time the mode is Stopped
        SimReport {
            num_ticks: self.num_ticks,
            elapsed_s: self.elapsed_s,
            stop_cause: self.stop_cause.unwrap_or(StopCause::EndOfCourse),
            final_speed_ms: self.vehicle.speed_ms(),
        }
    }

    /// Transition into the stopped mode.
    fn stop(&mut self, cause: StopCause) {
        info!("Simulation stopped after {:.1} s: {:?}", self.elapsed_s, cause);

        self.mode = SimMode::Stopped;
        self.stop_cause = Some(cause);
    }

    /// Append the current vehicle state to the trajectory.
    fn record_trajectory(&mut self) {
        self.trajectory.push(TrajectoryPoint {
            time_s: self.elapsed_s,
            x_m: self.vehicle.position_m()[0],
            y_m: self.vehicle.position_m()[1],
            heading_rad: self.vehicle.heading_rad(),
            speed_ms: self.vehicle.speed_ms(),
        });
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::course::{self, Path};
    use crate::traj_ctrl;
    use crate::vehicle;
    use nalgebra::Vector2;

    fn test_driver(x_m: &[f64], y_m: &[f64], sim_params: Params) -> SimDriver {
        let vehicle_params = vehicle::Params {
            wheelbase_m: 2.9,
            timestep_s: 0.1,
        };
        let course_params = course::Params {
            lookahead_gain_s: 0.1,
            lookahead_base_m: 2.0,
        };
        let ctrl_params = traj_ctrl::Params {
            speed_k_p: 1.0,
            wheelbase_m: 2.9,
        };

        SimDriver::new(
            sim_params,
            VehicleState::new(vehicle_params, Vector2::zeros(), 0.0, 0.0),
            TargetCourse::new(Path::from_waypoints(x_m, y_m).unwrap(), course_params),
            SpeedCtrl::new(&ctrl_params),
            PurePursuit::new(&ctrl_params),
        )
    }

    fn line_waypoints() -> (Vec<f64>, Vec<f64>) {
        let x_m: Vec<f64> = (0..=10).map(|i| i as f64).collect();
        let y_m = vec![0.0; x_m.len()];
        (x_m, y_m)
    }

    #[test]
    fn test_first_tick() {
        let (x_m, y_m) = line_waypoints();
        let mut driver = test_driver(
            &x_m,
            &y_m,
            Params {
                target_speed_ms: 1.0,
                sim_duration_s: 100.0,
            },
        );

        driver.step();

        // The speed steps up by k_p * (target - current) * dt, but the
        // vehicle doesn't move since it was at rest during integration, and
        // a collinear target demands no steering
        let vehicle = driver.vehicle();
        assert!((vehicle.speed_ms() - 0.1).abs() < 1e-12);
        assert!(vehicle.position_m()[0].abs() < 1e-12);
        assert!(vehicle.heading_rad().abs() < 1e-12);
    }

    #[test]
    fn test_stop_on_end_of_course() {
        let (x_m, y_m) = line_waypoints();
        let mut driver = test_driver(
            &x_m,
            &y_m,
            Params {
                target_speed_ms: 2.0,
                sim_duration_s: 100.0,
            },
        );

        let report = driver.run();

        assert_eq!(driver.mode(), SimMode::Stopped);
        assert_eq!(report.stop_cause, StopCause::EndOfCourse);
        assert_eq!(driver.target_index(), 10);
        assert!(report.elapsed_s < 100.0);
    }

    #[test]
    fn test_stop_on_duration() {
        let (x_m, y_m) = line_waypoints();
        let mut driver = test_driver(
            &x_m,
            &y_m,
            Params {
                target_speed_ms: 1.0,
                sim_duration_s: 0.05,
            },
        );

        let report = driver.run();

        // The first tick takes the elapsed time over the budget
        assert_eq!(report.stop_cause, StopCause::DurationExceeded);
        assert_eq!(report.num_ticks, 1);
    }

    #[test]
    fn test_single_waypoint_stops_immediately() {
        let mut driver = test_driver(
            &[0.0],
            &[0.0],
            Params {
                target_speed_ms: 1.0,
                sim_duration_s: 100.0,
            },
        );

        let report = driver.run();

        // Index 0 is already the last waypoint
        assert_eq!(report.stop_cause, StopCause::EndOfCourse);
        assert_eq!(report.num_ticks, 1);
    }

    #[test]
    fn test_target_index_monotonic() {
        let (x_m, y_m) = line_waypoints();
        let mut driver = test_driver(
            &x_m,
            &y_m,
            Params {
                target_speed_ms: 2.0,
                sim_duration_s: 100.0,
            },
        );

        let mut prev_index = driver.target_index();

        while driver.mode() == SimMode::Running {
            driver.step();

            assert!(driver.target_index() >= prev_index);
            prev_index = driver.target_index();
        }
    }

    #[test]
    fn test_trajectory_recorded() {
        let (x_m, y_m) = line_waypoints();
        let mut driver = test_driver(
            &x_m,
            &y_m,
            Params {
                target_speed_ms: 2.0,
                sim_duration_s: 100.0,
            },
        );

        let report = driver.run();

        // One point per tick, plus the initial state
        assert_eq!(driver.trajectory().len() as u64, report.num_ticks + 1);
        assert!(driver.trajectory()[0].time_s.abs() < 1e-12);
    }

    #[test]
    fn test_step_after_stop_is_noop() {
        let mut driver = test_driver(
            &[0.0],
            &[0.0],
            Params {
                target_speed_ms: 1.0,
                sim_duration_s: 100.0,
            },
        );

        let report = driver.run();
        let ticks = report.num_ticks;

        driver.step();

        assert_eq!(driver.trajectory().len() as u64, ticks + 1);
    }
}
