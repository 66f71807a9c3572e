//! End-of-run report snapshot and rendering

use std::path::{Path, PathBuf};

use crate::MetricsError;

/// Immutable snapshot of one run's metrics, assembled once at finalize time.
///
/// History-backed fields may be empty when no sample of that kind ever
/// arrived; the renderer omits their sections entirely in that case.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Seconds from run start to the first goal crossing; `None` when the
    /// goal was never reached
    pub elapsed_time: Option<f64>,
    /// Total traveled distance (meters)
    pub traveled_distance: f64,
    /// Smallest obstacle distance over the run, when any scan arrived
    pub min_range: Option<f64>,
    /// Per-scan minimum obstacle distances, in arrival order
    pub range_history: Vec<f64>,
    /// Whether any linear command magnitude exceeded its limit
    pub linear_violation: bool,
    /// Linear component of every velocity command, in arrival order
    pub linear_history: Vec<f64>,
    /// Whether any angular command magnitude exceeded its limit
    pub angular_violation: bool,
    /// Angular component of every velocity command, in arrival order
    pub angular_history: Vec<f64>,
}

/// Serializes a [`Report`] into the plain-text output artifact.
pub struct ReportGenerator {
    output_path: PathBuf,
}

impl ReportGenerator {
    /// Creates a generator writing to `output_path`.
    pub fn new<P: AsRef<Path>>(output_path: P) -> Self {
        ReportGenerator {
            output_path: output_path.as_ref().to_path_buf(),
        }
    }

    /// Renders a report into its text form.
    ///
    /// Pure formatting: the same snapshot always produces byte-identical
    /// output. A never-reached goal renders as the `unreached` sentinel,
    /// kept distinct from a numeric 0.0 arrival.
    pub fn render(report: &Report) -> String {
        let mut out = String::new();
        match report.elapsed_time {
            Some(elapsed) => out.push_str(&format!("Elapsed time: {:.6}\n", elapsed)),
            None => out.push_str("Elapsed time: unreached\n"),
        }
        out.push_str(&format!(
            "Traveled Distance: {:.6}\n",
            report.traveled_distance
        ));
        if let Some(min) = report.min_range {
            out.push_str(&format!("Min distance to obstacles: {:.6}\n", min));
            out.push_str(&format!(
                "Historic range: {}\n",
                join_floats(&report.range_history)
            ));
        }
        if !report.linear_history.is_empty() {
            out.push_str(&format!(
                "Linear penalty: {}\n",
                report.linear_violation as u8
            ));
            out.push_str(&format!(
                "Historic linear cmd_vel: {}\n",
                join_floats(&report.linear_history)
            ));
        }
        if !report.angular_history.is_empty() {
            out.push_str(&format!(
                "Angular penalty: {}\n",
                report.angular_violation as u8
            ));
            out.push_str(&format!(
                "Historic angular cmd_vel: {}\n",
                join_floats(&report.angular_history)
            ));
        }
        out
    }

    /// Writes the rendered report to the configured path, once.
    ///
    /// Failure carries the path and the underlying cause so the operator can
    /// diagnose it; the caller logs it and keeps the process alive.
    pub fn write(&self, report: &Report) -> Result<(), MetricsError> {
        std::fs::write(&self.output_path, Self::render(report)).map_err(|e| MetricsError::Io {
            path: self.output_path.display().to_string(),
            source: e,
        })
    }

    /// The destination path of this generator.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
}

fn join_floats(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
