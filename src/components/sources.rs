//! Power sources.

/// A battery: the only power source on the workbench.
///
/// The voltage is carried for display and challenge text only; the engine
/// never computes currents from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Battery {
    pub voltage: f64,
}

impl Battery {
    /// Voltage of a battery taken from the palette.
    pub const DEFAULT_VOLTAGE: f64 = 3.3;

    /// Create a new battery.
    pub fn new(voltage: f64) -> Self {
        Self { voltage }
    }

    /// Get the nominal voltage.
    pub fn voltage(&self) -> f64 {
        self.voltage
    }
}

impl Default for Battery {
    fn default() -> Self {
        Self::new(Self::DEFAULT_VOLTAGE)
    }
}
