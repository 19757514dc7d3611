//! Core identifier types for the circuit graph.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A unique identifier for a junction (component terminal).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JunctionId(pub String);

impl JunctionId {
    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JunctionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for JunctionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A unique identifier for a placed component.
///
/// Ids are prefixed by kind (`bat_`, `res_`, `bulb_`, `switch_`, `wire_`)
/// when generated by the workbench.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentId(pub String);

impl ComponentId {
    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Id of the junction at the component's start terminal.
    pub fn start_junction(&self) -> JunctionId {
        JunctionId(format!("{}_start", self.0))
    }

    /// Id of the junction at the component's end terminal.
    pub fn end_junction(&self) -> JunctionId {
        JunctionId(format!("{}_end", self.0))
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ComponentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ComponentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}
