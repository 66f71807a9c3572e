//! Argus - navigation performance metrics for ROS 2 mobile robots
//!
//! Argus passively observes a robot executing a point-to-point motion task
//! and produces a single end-of-run performance report: time to reach the
//! goal, traveled distance, minimum obstacle clearance, and velocity-limit
//! violations. It never publishes commands and never corrects the trajectory.

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

pub mod metrics;
pub mod report;
pub mod ros_interface;

// Re-export commonly used items for easier access
pub use metrics::{
    DistanceAccumulator, GoalMonitor, GoalState, MetricsAggregator, Pose2D, RangeMonitor,
    VelocityMonitor, GOAL_TOLERANCE,
};
pub use report::{Report, ReportGenerator};
pub use ros_interface::{PoseLookup, PoseSource, RosInterface, TfPoseSource};

/// Main configuration structure for an Argus run
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct MetricsConfig {
    /// Goal point the robot is expected to reach; required
    pub goal: GoalPoint,
    /// Robot body frame queried from the pose source
    #[serde(default = "default_base_frame")]
    pub base_frame: String,
    /// Fixed reference frame queried from the pose source
    #[serde(default = "default_global_frame")]
    pub global_frame: String,
    /// Destination path for the rendered report
    #[serde(default = "default_output_file")]
    pub output_file: String,
    /// Linear velocity magnitude above which the linear penalty latches
    #[serde(default = "default_max_lin")]
    pub max_lin: f64,
    /// Angular velocity magnitude above which the angular penalty latches
    #[serde(default = "default_max_ang")]
    pub max_ang: f64,
    /// Laser scan topic
    #[serde(default = "default_scan_topic")]
    pub scan_topic: String,
    /// Velocity command topic
    #[serde(default = "default_cmd_vel_topic")]
    pub cmd_vel_topic: String,
}

/// Goal point coordinates in the global frame
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct GoalPoint {
    /// X coordinate (meters)
    pub x: f64,
    /// Y coordinate (meters)
    pub y: f64,
}

fn default_base_frame() -> String {
    "base_link".to_string()
}

fn default_global_frame() -> String {
    "map".to_string()
}

fn default_output_file() -> String {
    "metrics.txt".to_string()
}

fn default_max_lin() -> f64 {
    0.5
}

fn default_max_ang() -> f64 {
    1.0
}

fn default_scan_topic() -> String {
    "/scan".to_string()
}

fn default_cmd_vel_topic() -> String {
    "/cmd_vel".to_string()
}

impl MetricsConfig {
    /// Loads the configuration from a YAML file.
    ///
    /// A missing `goal` section is a configuration error: the node must not
    /// start observing a run it cannot judge, so the caller treats this as
    /// fatal before entering the main loop.
    pub fn load(path: &str) -> Result<Self, MetricsError> {
        let file = std::fs::File::open(path).map_err(|e| MetricsError::Io {
            path: path.to_string(),
            source: e,
        })?;
        serde_yaml::from_reader(file).map_err(|e| MetricsError::Config(format!("{}: {}", path, e)))
    }
}

/// Argus error types
#[derive(Debug)]
pub enum MetricsError {
    /// Configuration file malformed or missing a required field
    Config(String),
    /// A collaborator delivered a sample that violates its contract
    InvalidSample(String),
    /// File I/O failure
    Io {
        /// Path of the file being read or written
        path: String,
        /// Underlying cause
        source: std::io::Error,
    },
    /// ROS 2 communication error
    Ros(String),
    /// The pose source never became available within the retry budget
    PoseUnavailable,
}

impl std::fmt::Display for MetricsError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            MetricsError::Config(msg) => write!(f, "configuration error: {}", msg),
            MetricsError::InvalidSample(msg) => write!(f, "invalid sample: {}", msg),
            MetricsError::Io { path, source } => write!(f, "I/O error on {}: {}", path, source),
            MetricsError::Ros(msg) => write!(f, "ROS error: {}", msg),
            MetricsError::PoseUnavailable => write!(f, "pose source unavailable"),
        }
    }
}

impl std::error::Error for MetricsError {}

impl From<r2r::Error> for MetricsError {
    fn from(e: r2r::Error) -> Self {
        MetricsError::Ros(e.to_string())
    }
}
