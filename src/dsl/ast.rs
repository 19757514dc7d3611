//! Abstract Syntax Tree types for the layout format.

use std::collections::HashMap;

use crate::challenge::{Challenge, PaletteItem};
use crate::components::ComponentKind;
use crate::layout::GridPoint;

/// Complete AST representation of a parsed workbench layout.
#[derive(Debug, Clone, Default)]
pub struct LayoutAst {
    /// All component instances, in file order
    pub components: Vec<ComponentDef>,
    /// Grid spacing from `.grid`
    pub grid_size: Option<i32>,
    /// Grid origin from `.origin`
    pub grid_origin: Option<(i32, i32)>,
    /// Palette items required by `.require`
    pub required: Vec<PaletteItem>,
    /// Per-loop switch gating requested by `.strict`
    pub strict_switches: bool,
}

impl LayoutAst {
    /// Create a new empty layout AST.
    pub fn new() -> Self {
        Self::default()
    }

    /// Challenge described by `.require`, if any.
    pub fn challenge(&self) -> Option<Challenge> {
        if self.required.is_empty() {
            return None;
        }
        Some(Challenge::new("Layout requirements", self.required.clone()))
    }
}

/// Where a component sits on the workbench.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Raw centre position; snapped and expanded into terminals on build
    Centered { x: f64, y: f64 },
    /// Explicit terminal coordinates
    Terminals { start: GridPoint, end: GridPoint },
}

/// A component definition from the layout.
#[derive(Debug, Clone)]
pub struct ComponentDef {
    pub kind: ComponentKind,
    /// Unique component id
    pub name: String,
    pub placement: Placement,
    /// Trailing bare value (voltage or resistance)
    pub value: Option<f64>,
    /// Switch state from an `on`/`off` keyword
    pub switch_on: Option<bool>,
    /// `key=value` parameters
    pub params: HashMap<String, f64>,
    /// Source line number for error reporting
    pub line: usize,
}
