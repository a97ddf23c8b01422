//! # Trajectory control module
//!
//! Trajectory control is responsible for keeping the vehicle on the target
//! course. It does this with a pair of controllers:
//!
//! - A proportional speed controller which produces an acceleration demand
//!   from the difference between the target and current speeds.
//! - A pure pursuit steering controller, which steers the rear axle onto a
//!   circular arc through a look-ahead target point on the course. The
//!   steering angle follows from the chord geometry of that arc and the
//!   wheelbase.
//!
//! Both controllers are pure given their inputs: the updated target index is
//! returned to the caller rather than held as shared state, so a tick can be
//! replayed in isolation.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
use crate::course::TargetCourse;
use crate::vehicle::VehicleState;
pub use params::Params;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Proportional speed controller
#[derive(Debug, Clone)]
pub struct SpeedCtrl {
    k_p: f64,
}

/// Pure pursuit steering controller
#[derive(Debug, Clone)]
pub struct PurePursuit {
    wheelbase_m: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SpeedCtrl {
    /// Create a new speed controller from the parameters.
    pub fn new(params: &Params) -> Self {
        Self {
            k_p: params.speed_k_p,
        }
    }

    /// Get the acceleration demand for the given target and current speeds.
    pub fn accel_dem_ms2(&self, target_speed_ms: f64, speed_ms: f64) -> f64 {
        self.k_p * (target_speed_ms - speed_ms)
    }
}

impl PurePursuit {
    /// Create a new pure pursuit controller from the parameters.
    pub fn new(params: &Params) -> Self {
        Self {
            wheelbase_m: params.wheelbase_m,
        }
    }

    /// Get the steering demand for the given vehicle state and course.
    ///
    /// `prev_target_index` is the target index from the previous tick. The
    /// effective target never falls behind it, so the target is monotonically
    /// non-decreasing over the course even if the search momentarily finds an
    /// earlier waypoint. At the end of the path the target clamps to the last
    /// waypoint.
    ///
    /// Returns the steering angle demand and the updated target index, which
    /// the caller passes back in on the next tick.
    pub fn steer_dem_rad(
        &self,
        vehicle: &VehicleState,
        course: &mut TargetCourse,
        prev_target_index: usize,
    ) -> (f64, usize) {
        let (searched_index, lookahead_m) = course.search_target_index(vehicle);

        // Forward-only target policy
        let mut target_index = prev_target_index.max(searched_index);

        // Clamp to the last waypoint at the end of the path
        let last_index = course.path().num_points() - 1;
        if target_index > last_index {
            target_index = last_index;
        }

        let target_m = course.path().point_m(target_index);
        let rear_axle_m = vehicle.rear_axle_m();

        // Bearing of the target relative to the current heading
        let alpha_rad = (target_m[1] - rear_axle_m[1])
            .atan2(target_m[0] - rear_axle_m[0])
            - vehicle.heading_rad();

        // Pure pursuit steering law. Unclamped, and assumes a positive
        // look-ahead distance.
        let steer_rad =
            (2.0 * self.wheelbase_m * alpha_rad.sin() / lookahead_m).atan2(1.0);

        (steer_rad, target_index)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::course::{self, Path};
    use crate::vehicle;
    use nalgebra::Vector2;

    fn test_params() -> Params {
        Params {
            speed_k_p: 1.0,
            wheelbase_m: 2.9,
        }
    }

    fn line_course() -> TargetCourse {
        let x_m: Vec<f64> = (0..=10).map(|i| i as f64).collect();
        let y_m = vec![0.0; x_m.len()];

        TargetCourse::new(
            Path::from_waypoints(&x_m, &y_m).unwrap(),
            course::Params {
                lookahead_gain_s: 0.1,
                lookahead_base_m: 2.0,
            },
        )
    }

    fn test_vehicle(x_m: f64, y_m: f64, heading_rad: f64, speed_ms: f64) -> VehicleState {
        VehicleState::new(
            vehicle::Params {
                wheelbase_m: 2.9,
                timestep_s: 0.1,
            },
            Vector2::new(x_m, y_m),
            heading_rad,
            speed_ms,
        )
    }

    #[test]
    fn test_accel_dem() {
        let ctrl = SpeedCtrl::new(&test_params());

        assert!((ctrl.accel_dem_ms2(2.0, 0.5) - 1.5).abs() < 1e-12);
        assert!((ctrl.accel_dem_ms2(0.0, 1.0) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_steer_dem_collinear() {
        let ctrl = PurePursuit::new(&test_params());
        let mut course = line_course();

        // A target dead ahead demands zero steering
        let state = test_vehicle(0.0, 0.0, 0.0, 0.0);
        let (steer_rad, _) = ctrl.steer_dem_rad(&state, &mut course, 0);

        assert!(steer_rad.abs() < 1e-12);
    }

    #[test]
    fn test_steer_dem_sign() {
        let ctrl = PurePursuit::new(&test_params());
        let mut course = line_course();

        // Vehicle below the course steers left (positive), above steers
        // right (negative)
        let (steer_rad, _) =
            ctrl.steer_dem_rad(&test_vehicle(0.0, -1.0, 0.0, 0.0), &mut course, 0);
        assert!(steer_rad > 0.0);

        let mut course = line_course();
        let (steer_rad, _) =
            ctrl.steer_dem_rad(&test_vehicle(0.0, 1.0, 0.0, 0.0), &mut course, 0);
        assert!(steer_rad < 0.0);
    }

    #[test]
    fn test_target_forward_only() {
        let ctrl = PurePursuit::new(&test_params());
        let mut course = line_course();

        // Even though the search would return an early waypoint, the target
        // must not regress behind the previous tick's index
        let state = test_vehicle(0.0, 0.0, 0.0, 0.0);
        let (_, target_index) = ctrl.steer_dem_rad(&state, &mut course, 7);

        assert_eq!(target_index, 7);
    }

    #[test]
    fn test_target_clamps_to_path_end() {
        let ctrl = PurePursuit::new(&test_params());
        let mut course = line_course();

        // A previous index beyond the path must clamp to the last waypoint
        // and still produce a finite steering angle
        let state = test_vehicle(10.0, 0.0, 0.0, 0.0);
        let (steer_rad, target_index) = ctrl.steer_dem_rad(&state, &mut course, 99);

        assert_eq!(target_index, 10);
        assert!(steer_rad.is_finite());
    }
}
