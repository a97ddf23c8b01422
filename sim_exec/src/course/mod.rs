//! # Course module
//!
//! This module provides the waypoint path the vehicle is to follow, and the
//! look-ahead target search used by the pure pursuit steering controller.
//!
//! The search exploits the ordering of the waypoints: the vehicle is assumed
//! to only ever move forwards along the course, so once the nearest waypoint
//! has been found by a full scan, later searches only refine it by walking
//! forwards from the cached index. The cached index is therefore
//! monotonically non-decreasing over the life of the course.

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
use crate::vehicle::VehicleState;
pub use params::Params;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A path defining the desired trajectory of the vehicle.
#[derive(Debug, Clone)]
pub struct Path {
    points_m: Vec<Vector2<f64>>,
}

/// The course to follow and the state of the look-ahead target search.
#[derive(Debug, Clone)]
pub struct TargetCourse {
    params: Params,

    path: Path,

    /// Index of the waypoint nearest the rear axle, or `None` if no search
    /// has been run yet. Non-decreasing once set.
    nearest_index: Option<usize>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur when building a course.
#[derive(Debug, thiserror::Error)]
pub enum CourseError {
    #[error("Attempted to create a path with no waypoints")]
    EmptyPath,

    #[error("Waypoint sequences have mismatched lengths ({0} x values, {1} y values)")]
    WaypointLengthMismatch(usize, usize),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Path {
    /// Create a new path from a pair of waypoint coordinate sequences.
    ///
    /// The sequences must be of equal length, with at least one point, and
    /// are in traversal order.
    pub fn from_waypoints(x_m: &[f64], y_m: &[f64]) -> Result<Self, CourseError> {
        if x_m.len() != y_m.len() {
            return Err(CourseError::WaypointLengthMismatch(x_m.len(), y_m.len()));
        }

        if x_m.is_empty() {
            return Err(CourseError::EmptyPath);
        }

        Ok(Self {
            points_m: x_m
                .iter()
                .zip(y_m.iter())
                .map(|(x, y)| Vector2::new(*x, *y))
                .collect(),
        })
    }

    /// Get the waypoint at the given index.
    pub fn point_m(&self, index: usize) -> Vector2<f64> {
        self.points_m[index]
    }

    /// Get the number of waypoints in the path.
    pub fn num_points(&self) -> usize {
        self.points_m.len()
    }

    /// Return the polyline length of the path in meters.
    pub fn length_m(&self) -> f64 {
        self.points_m
            .windows(2)
            .map(|seg| (seg[1] - seg[0]).norm())
            .sum()
    }
}

impl TargetCourse {
    /// Create a new target course over the given path.
    pub fn new(path: Path, params: Params) -> Self {
        Self {
            params,
            path,
            nearest_index: None,
        }
    }

    /// Get the path the course follows.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the cached nearest waypoint index.
    pub fn nearest_index(&self) -> Option<usize> {
        self.nearest_index
    }

    /// Search for the look-ahead target waypoint.
    ///
    /// Returns the index of the first waypoint at least the look-ahead
    /// distance from the rear axle (or the last waypoint if none is), along
    /// with the look-ahead distance itself.
    ///
    /// The first call scans the whole path for the nearest waypoint, later
    /// calls only refine the cached index forwards.
    pub fn search_target_index(&mut self, vehicle: &VehicleState) -> (usize, f64) {
        let mut index = match self.nearest_index {
            // First search, scan the full path. The first minimum wins.
            None => {
                let mut nearest = 0;
                let mut nearest_dist_m = std::f64::INFINITY;

                for (i, point_m) in self.path.points_m.iter().enumerate() {
                    let dist_m = vehicle.distance_to(point_m);
                    if dist_m < nearest_dist_m {
                        nearest = i;
                        nearest_dist_m = dist_m;
                    }
                }

                nearest
            }
            // Walk forwards from the cached index until the distance stops
            // decreasing, stopping at the first local minimum or the end of
            // the path.
            Some(cached) => {
                let mut nearest = cached;
                let mut dist_m = vehicle.distance_to(&self.path.points_m[nearest]);

                while nearest + 1 < self.path.num_points() {
                    let next_dist_m =
                        vehicle.distance_to(&self.path.points_m[nearest + 1]);

                    if next_dist_m >= dist_m {
                        break;
                    }

                    nearest += 1;
                    dist_m = next_dist_m;
                }

                nearest
            }
        };

        self.nearest_index = Some(index);

        // Look further ahead the faster the vehicle moves
        let lookahead_m = self.params.lookahead_gain_s * vehicle.speed_ms()
            + self.params.lookahead_base_m;

        // Advance to the first waypoint beyond the look-ahead distance,
        // stopping at the end of the path
        while lookahead_m > vehicle.distance_to(&self.path.points_m[index]) {
            if index + 1 >= self.path.num_points() {
                break;
            }

            index += 1;
        }

        (index, lookahead_m)
    }
}
