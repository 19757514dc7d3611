//! Passive conductors: Resistor, Bulb, Wire.
//!
//! All three conduct unconditionally as far as topology is concerned.

/// A resistor component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resistor {
    pub resistance: f64,
}

impl Resistor {
    /// Resistance of a resistor taken from the palette, in ohms.
    pub const DEFAULT_RESISTANCE: f64 = 1.5;

    /// Create a new resistor. Negative values are clamped to zero.
    pub fn new(resistance: f64) -> Self {
        Self {
            resistance: resistance.max(0.0),
        }
    }

    /// Get the resistance in ohms.
    pub fn resistance(&self) -> f64 {
        self.resistance
    }
}

impl Default for Resistor {
    fn default() -> Self {
        Self::new(Self::DEFAULT_RESISTANCE)
    }
}

/// A light bulb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bulb;

/// A plain wire segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Wire;
