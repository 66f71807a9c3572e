//! Run-metrics aggregation core
//!
//! This module holds all mutable per-run state: the distance accumulator,
//! the goal monitor, and the velocity/range history monitors, all owned by
//! a single [`MetricsAggregator`] that the ROS layer drives.

mod distance;
mod goal;
mod range;
mod velocity;

pub use distance::DistanceAccumulator;
pub use goal::{GoalMonitor, GoalState, GOAL_TOLERANCE};
pub use range::RangeMonitor;
pub use velocity::VelocityMonitor;

use std::time::Instant;

use nalgebra::Point2;

use crate::report::Report;
use crate::{MetricsConfig, MetricsError};

/// A 2D position estimate of the robot in the global frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose2D {
    /// X position (meters)
    pub x: f64,
    /// Y position (meters)
    pub y: f64,
}

impl Pose2D {
    /// Euclidean distance to another pose.
    pub fn distance_to(&self, other: &Pose2D) -> f64 {
        nalgebra::distance(&Point2::new(self.x, self.y), &Point2::new(other.x, other.y))
    }
}

/// Single owner of all run state, fed by the periodic pose tick and the
/// velocity/range streams.
///
/// Every mutating entry point (`tick`, `on_velocity`, `on_range`,
/// `finalize`) must execute one-at-a-time; the ROS layer guarantees this by
/// sharing one instance behind a mutex and dispatching all callbacks on a
/// single-threaded executor.
pub struct MetricsAggregator {
    distance: DistanceAccumulator,
    goal: GoalMonitor,
    velocity: VelocityMonitor,
    range: RangeMonitor,
    start_time: Instant,
}

impl MetricsAggregator {
    /// Creates the aggregator, seeded with the first available pose.
    pub fn new(initial_pose: Pose2D, config: &MetricsConfig, start_time: Instant) -> Self {
        MetricsAggregator {
            distance: DistanceAccumulator::new(initial_pose),
            goal: GoalMonitor::new(
                Pose2D {
                    x: config.goal.x,
                    y: config.goal.y,
                },
                GOAL_TOLERANCE,
            ),
            velocity: VelocityMonitor::new(config.max_lin, config.max_ang),
            range: RangeMonitor::new(),
            start_time,
        }
    }

    /// Periodic pose tick: integrates distance, then checks for goal arrival.
    ///
    /// Once the goal is reached this is a no-op; traveled distance and
    /// elapsed time stay frozen at the first-crossing instant.
    pub fn tick(&mut self, pose: Pose2D, now: Instant) {
        if self.goal.reached() {
            return;
        }
        self.distance.accumulate(pose);
        self.goal.evaluate(&pose, self.start_time, now);
        log::debug!(
            "traveled distance {:.3}, distance to goal {:.3}",
            self.distance.total(),
            self.goal.distance_to_goal(&pose)
        );
    }

    /// Records one velocity-command sample. Runs for the whole run, goal
    /// reached or not.
    pub fn on_velocity(&mut self, linear: f64, angular: f64) {
        self.velocity.record(linear, angular);
    }

    /// Records one laser scan. Runs for the whole run, goal reached or not.
    pub fn on_range(&mut self, ranges: &[f64]) -> Result<(), MetricsError> {
        self.range.record(ranges)
    }

    /// Builds the immutable end-of-run report.
    ///
    /// `last_pose` is the result of one final best-effort pose lookup; when
    /// present it is folded in as one last tick so motion since the previous
    /// periodic tick is counted. A failed lookup (`None`) never blocks the
    /// report.
    pub fn finalize(&mut self, last_pose: Option<Pose2D>, now: Instant) -> Report {
        if let Some(pose) = last_pose {
            self.tick(pose, now);
        }
        Report {
            elapsed_time: self.goal.elapsed_time(),
            traveled_distance: self.distance.total(),
            min_range: self.range.min_range(),
            range_history: self.range.history().to_vec(),
            linear_violation: self.velocity.linear_violation(),
            linear_history: self.velocity.history().iter().map(|&(lin, _)| lin).collect(),
            angular_violation: self.velocity.angular_violation(),
            angular_history: self.velocity.history().iter().map(|&(_, ang)| ang).collect(),
        }
    }
}
