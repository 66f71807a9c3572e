//! Velocity-command history and limit violations

/// Records every velocity command and latches limit violations.
///
/// The violation flags are latches: once a command exceeds its limit the
/// flag stays set for the rest of the run, regardless of later in-bound
/// samples. The linear and angular checks are independent, each against
/// its own configured limit.
pub struct VelocityMonitor {
    history: Vec<(f64, f64)>,
    max_lin: f64,
    max_ang: f64,
    linear_violation: bool,
    angular_violation: bool,
}

impl VelocityMonitor {
    /// Creates a monitor with the given magnitude limits.
    pub fn new(max_lin: f64, max_ang: f64) -> Self {
        VelocityMonitor {
            history: Vec::new(),
            max_lin,
            max_ang,
            linear_violation: false,
            angular_violation: false,
        }
    }

    /// Appends one `(linear, angular)` command and updates the latches.
    pub fn record(&mut self, linear: f64, angular: f64) {
        self.history.push((linear, angular));
        if linear.abs() > self.max_lin {
            self.linear_violation = true;
        }
        if angular.abs() > self.max_ang {
            self.angular_violation = true;
        }
    }

    /// All `(linear, angular)` commands seen so far, in arrival order.
    pub fn history(&self) -> &[(f64, f64)] {
        &self.history
    }

    /// True once any linear magnitude exceeded its limit.
    pub fn linear_violation(&self) -> bool {
        self.linear_violation
    }

    /// True once any angular magnitude exceeded its limit.
    pub fn angular_violation(&self) -> bool {
        self.angular_violation
    }
}
