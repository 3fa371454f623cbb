//! Tuning for the verify-and-retry protocol.

/// Retry budgets and read-back tolerances used by [`Bk9129b`](crate::psu::Bk9129b).
///
/// The defaults match the 9129B's observed behaviour. Retries re-send immediately, so
/// the worst-case cost of an operation is its retry limit times one round trip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerConfig {
    /// Attempts at selecting a channel before giving up.
    pub select_retry_limit: u8,
    /// Attempts at writing a set point before giving up.
    pub setpoint_retry_limit: u8,
    /// Accepted read-back error for current set points, in amps.
    pub current_tolerance: f64,
    /// Accepted read-back error for voltage set points, in volts.
    pub voltage_tolerance: f64,
}

impl ControllerConfig {
    pub const DEFAULT_RETRY_LIMIT: u8 = 10;
    /// Half of the last digit the device echoes back for currents.
    pub const DEFAULT_CURRENT_TOLERANCE: f64 = 0.0005;
    /// Half of the last digit the device echoes back for voltages.
    pub const DEFAULT_VOLTAGE_TOLERANCE: f64 = 0.005;

    pub const fn new() -> Self {
        Self {
            select_retry_limit: Self::DEFAULT_RETRY_LIMIT,
            setpoint_retry_limit: Self::DEFAULT_RETRY_LIMIT,
            current_tolerance: Self::DEFAULT_CURRENT_TOLERANCE,
            voltage_tolerance: Self::DEFAULT_VOLTAGE_TOLERANCE,
        }
    }

    /// Set how many times channel selection is attempted.
    pub fn with_select_retry_limit(mut self, limit: u8) -> Self {
        self.select_retry_limit = limit;
        self
    }

    /// Set how many times a set point write is attempted.
    pub fn with_setpoint_retry_limit(mut self, limit: u8) -> Self {
        self.setpoint_retry_limit = limit;
        self
    }

    /// Set the current read-back tolerance, in amps.
    pub fn with_current_tolerance(mut self, tolerance: f64) -> Self {
        self.current_tolerance = tolerance;
        self
    }

    /// Set the voltage read-back tolerance, in volts.
    pub fn with_voltage_tolerance(mut self, tolerance: f64) -> Self {
        self.voltage_tolerance = tolerance;
        self
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::new()
    }
}
