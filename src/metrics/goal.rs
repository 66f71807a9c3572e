//! One-shot goal-arrival detection

use std::time::Instant;

use super::Pose2D;

/// Distance (meters) from the goal point at which arrival is declared.
pub const GOAL_TOLERANCE: f64 = 0.25;

/// Goal progress states
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GoalState {
    /// Still on the way to the goal
    Running,
    /// Goal reached; elapsed time is frozen
    Reached,
}

/// One-shot state machine that latches goal arrival.
///
/// The `Running -> Reached` transition fires at most once and freezes
/// `elapsed_time` at the first-crossing instant; every later `evaluate`
/// call is a cheap no-op.
pub struct GoalMonitor {
    goal: Pose2D,
    tolerance: f64,
    state: GoalState,
    elapsed_time: Option<f64>,
}

impl GoalMonitor {
    /// Creates a monitor for the given goal point and tolerance radius.
    pub fn new(goal: Pose2D, tolerance: f64) -> Self {
        GoalMonitor {
            goal,
            tolerance,
            state: GoalState::Running,
            elapsed_time: None,
        }
    }

    /// Checks `pose` against the goal, latching on the first crossing.
    ///
    /// Arrival requires the distance to be strictly below the tolerance. A
    /// run that never crosses leaves `elapsed_time` unset, which the report
    /// renders distinctly from an instant arrival at 0.0.
    pub fn evaluate(&mut self, pose: &Pose2D, start_time: Instant, now: Instant) {
        if self.state == GoalState::Reached {
            return;
        }
        if pose.distance_to(&self.goal) < self.tolerance {
            let elapsed = now.duration_since(start_time).as_secs_f64();
            self.elapsed_time = Some(elapsed);
            self.state = GoalState::Reached;
            log::info!("goal reached, elapsed time {:.3} s", elapsed);
        }
    }

    /// Distance from `pose` to the goal point.
    pub fn distance_to_goal(&self, pose: &Pose2D) -> f64 {
        pose.distance_to(&self.goal)
    }

    /// Current goal state.
    pub fn state(&self) -> GoalState {
        self.state
    }

    /// True once the goal has been reached.
    pub fn reached(&self) -> bool {
        self.state == GoalState::Reached
    }

    /// Seconds from run start to the first goal crossing, if it happened.
    pub fn elapsed_time(&self) -> Option<f64> {
        self.elapsed_time
    }
}
