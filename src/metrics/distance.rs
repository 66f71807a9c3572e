//! Traveled-distance integration

use super::Pose2D;

/// Integrates successive pose samples into a cumulative traveled distance.
///
/// `total` is monotonically non-decreasing: each `accumulate` call adds the
/// Euclidean step from the previously recorded pose, which is never
/// negative. The caller guarantees a valid previous pose exists by seeding
/// the accumulator at construction.
#[derive(Debug)]
pub struct DistanceAccumulator {
    total: f64,
    last_pose: Pose2D,
}

impl DistanceAccumulator {
    /// Creates an accumulator seeded with the first recorded pose.
    pub fn new(initial_pose: Pose2D) -> Self {
        DistanceAccumulator {
            total: 0.0,
            last_pose: initial_pose,
        }
    }

    /// Adds the step from the last recorded pose to `new_pose`.
    pub fn accumulate(&mut self, new_pose: Pose2D) {
        self.total += self.last_pose.distance_to(&new_pose);
        self.last_pose = new_pose;
    }

    /// Total distance traveled so far (meters).
    pub fn total(&self) -> f64 {
        self.total
    }

    /// The most recently recorded pose.
    pub fn last_pose(&self) -> &Pose2D {
        &self.last_pose
    }
}
