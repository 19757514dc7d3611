//! Component rotation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{LabError, Result};

/// Orientation of a placed component.
///
/// Only two states exist: horizontal and vertical. Rotation never changes
/// electrical behaviour, only where the terminals end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Rotation {
    /// Horizontal (terminals left and right of the centre)
    #[default]
    Deg0,
    /// Vertical (terminals above and below the centre)
    Deg90,
}

impl Rotation {
    /// Parse a rotation from degrees. Only 0 and 90 are accepted.
    pub fn from_degrees(degrees: i64) -> Result<Self> {
        match degrees {
            0 => Ok(Self::Deg0),
            90 => Ok(Self::Deg90),
            _ => Err(LabError::InvalidRotation { degrees }),
        }
    }

    /// Rotation angle in degrees.
    pub fn degrees(&self) -> u16 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
        }
    }

    /// The other orientation (0 <-> 90).
    pub fn toggled(&self) -> Self {
        match self {
            Self::Deg0 => Self::Deg90,
            Self::Deg90 => Self::Deg0,
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_from_degrees() {
        assert_eq!(Rotation::from_degrees(0).unwrap(), Rotation::Deg0);
        assert_eq!(Rotation::from_degrees(90).unwrap(), Rotation::Deg90);
        assert!(matches!(
            Rotation::from_degrees(45),
            Err(LabError::InvalidRotation { degrees: 45 })
        ));
        assert!(Rotation::from_degrees(180).is_err());
    }

    #[test]
    fn test_rotation_toggle() {
        assert_eq!(Rotation::Deg0.toggled(), Rotation::Deg90);
        assert_eq!(Rotation::Deg90.toggled().toggled(), Rotation::Deg90);
        assert_eq!(Rotation::Deg90.degrees(), 90);
    }
}
