//! Obstacle-clearance history

use crate::MetricsError;

/// Records the minimum obstacle distance of every laser scan.
pub struct RangeMonitor {
    history: Vec<f64>,
}

impl RangeMonitor {
    /// Creates an empty monitor.
    pub fn new() -> Self {
        RangeMonitor {
            history: Vec::new(),
        }
    }

    /// Appends the minimum of one scan's range readings.
    ///
    /// An empty scan is a contract violation by the transport and is
    /// rejected rather than recorded as a sentinel.
    pub fn record(&mut self, ranges: &[f64]) -> Result<(), MetricsError> {
        if ranges.is_empty() {
            return Err(MetricsError::InvalidSample(
                "empty range scan".to_string(),
            ));
        }
        let min = ranges.iter().copied().fold(f64::INFINITY, f64::min);
        self.history.push(min);
        Ok(())
    }

    /// Per-scan minima, in arrival order.
    pub fn history(&self) -> &[f64] {
        &self.history
    }

    /// Smallest obstacle distance over the whole run, if any scan arrived.
    pub fn min_range(&self) -> Option<f64> {
        self.history.iter().copied().reduce(f64::min)
    }
}

impl Default for RangeMonitor {
    fn default() -> Self {
        RangeMonitor::new()
    }
}
