//! Control components: Switch.

/// A switch component.
///
/// An open switch anywhere on the board gates the whole simulation unless
/// strict switch handling is requested, in which case it simply stops
/// conducting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Switch {
    pub is_on: bool,
}

impl Switch {
    /// Create a new switch.
    pub fn new(is_on: bool) -> Self {
        Self { is_on }
    }

    /// Set the switch state.
    pub fn set_state(&mut self, is_on: bool) {
        self.is_on = is_on;
    }

    /// Toggle the switch state.
    pub fn toggle(&mut self) {
        self.is_on = !self.is_on;
    }

    /// Check whether current can pass.
    pub fn is_closed(&self) -> bool {
        self.is_on
    }
}

impl Default for Switch {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_switch_toggle() {
        let mut sw = Switch::new(false);
        assert!(!sw.is_closed());
        sw.toggle();
        assert!(sw.is_closed());
        sw.set_state(false);
        assert!(!sw.is_on);
    }
}
