//! # Vehicle module
//!
//! This module provides the kinematic state of the simulated vehicle and its
//! integration under the single-track (bicycle) approximation. The state is
//! referenced to the centre of the vehicle, with the rear axle centre derived
//! from it. Pure pursuit tracks the rear axle, not the vehicle origin, so the
//! rear axle point is kept up to date on every mutation of the state.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;

// Internal
pub use params::Params;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The kinematic state of the vehicle.
#[derive(Debug, Clone)]
pub struct VehicleState {
    params: Params,

    /// Position of the vehicle centre in the world frame
    position_m: Vector2<f64>,

    /// Heading (angle to the +ve x axis)
    heading_rad: f64,

    /// Signed longitudinal speed
    speed_ms: f64,

    /// Position of the rear axle centre, derived from the position, heading
    /// and wheelbase. Never set independently.
    rear_axle_m: Vector2<f64>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl VehicleState {
    /// Create a new vehicle state with the given initial pose and speed.
    pub fn new(
        params: Params,
        position_m: Vector2<f64>,
        heading_rad: f64,
        speed_ms: f64,
    ) -> Self {
        let mut state = Self {
            params,
            position_m,
            heading_rad,
            speed_ms,
            rear_axle_m: Vector2::zeros(),
        };

        state.calc_rear_axle();

        state
    }

    /// Integrate the bicycle model over one timestep.
    ///
    /// Position and heading are integrated with the speed from the start of
    /// the tick, then the speed itself is updated. The steering angle is
    /// applied as commanded, without saturation.
    pub fn update(&mut self, accel_ms2: f64, steer_rad: f64) {
        let dt_s = self.params.timestep_s;

        self.position_m[0] += self.speed_ms * self.heading_rad.cos() * dt_s;
        self.position_m[1] += self.speed_ms * self.heading_rad.sin() * dt_s;
        self.heading_rad +=
            self.speed_ms / self.params.wheelbase_m * steer_rad.tan() * dt_s;
        self.speed_ms += accel_ms2 * dt_s;

        self.calc_rear_axle();
    }

    /// Get the distance from the rear axle centre to the given point.
    pub fn distance_to(&self, point_m: &Vector2<f64>) -> f64 {
        (point_m - self.rear_axle_m).norm()
    }

    /// Get the position of the vehicle centre.
    pub fn position_m(&self) -> Vector2<f64> {
        self.position_m
    }

    /// Get the position of the rear axle centre.
    pub fn rear_axle_m(&self) -> Vector2<f64> {
        self.rear_axle_m
    }

    /// Get the heading.
    pub fn heading_rad(&self) -> f64 {
        self.heading_rad
    }

    /// Get the speed.
    pub fn speed_ms(&self) -> f64 {
        self.speed_ms
    }

    /// Get the integration timestep.
    pub fn timestep_s(&self) -> f64 {
        self.params.timestep_s
    }

    /// Recompute the rear axle centre from the current pose.
    ///
    /// Must be called after every mutation of the pose.
    fn calc_rear_axle(&mut self) {
        let half_wb_m = self.params.wheelbase_m / 2.0;

        self.rear_axle_m = Vector2::new(
            self.position_m[0] - half_wb_m * self.heading_rad.cos(),
            self.position_m[1] - half_wb_m * self.heading_rad.sin(),
        );
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn test_params() -> Params {
        Params {
            wheelbase_m: 2.9,
            timestep_s: 0.1,
        }
    }

    #[test]
    fn test_rear_axle_derivation() {
        let mut state = VehicleState::new(
            test_params(),
            Vector2::new(1.0, 2.0),
            0.5,
            1.0,
        );

        // The rear axle must match the derived formula both at construction
        // and after a sequence of updates
        for _ in 0..10 {
            let expected = Vector2::new(
                state.position_m()[0] - 2.9 / 2.0 * state.heading_rad().cos(),
                state.position_m()[1] - 2.9 / 2.0 * state.heading_rad().sin(),
            );

            assert!((state.rear_axle_m() - expected).norm() < 1e-12);

            state.update(0.3, 0.1);
        }
    }

    #[test]
    fn test_update_integration() {
        let mut state = VehicleState::new(
            test_params(),
            Vector2::zeros(),
            0.0,
            1.0,
        );

        state.update(0.0, 0.0);

        // Straight line at 1 m/s for 0.1 s
        assert!((state.position_m()[0] - 0.1).abs() < 1e-12);
        assert!(state.position_m()[1].abs() < 1e-12);
        assert!(state.heading_rad().abs() < 1e-12);
        assert!((state.speed_ms() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_update_order() {
        // The position integrates with the speed from the start of the tick,
        // so accelerating from standstill must not move the vehicle
        let mut state = VehicleState::new(
            test_params(),
            Vector2::zeros(),
            0.0,
            0.0,
        );

        state.update(1.0, 0.0);

        assert!(state.position_m()[0].abs() < 1e-12);
        assert!((state.speed_ms() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_distance_to() {
        let state = VehicleState::new(
            test_params(),
            Vector2::new(2.9 / 2.0, 0.0),
            0.0,
            0.0,
        );

        // Rear axle sits at the origin
        assert!((state.distance_to(&Vector2::new(3.0, 4.0)) - 5.0).abs() < 1e-12);
    }
}
