//! Component models for the workbench.
//!
//! This module provides the five placeable component kinds:
//! - Sources: Battery
//! - Linear: Resistor, Bulb, Wire
//! - Controls: Switch
//!
//! Every component is a two-terminal element. The terminals are owned
//! [`Junction`]s whose world coordinates are recomputed from fixed local
//! offsets whenever the component moves or rotates.

mod controls;
mod linear;
mod sources;

pub use controls::Switch;
pub use linear::{Bulb, Resistor, Wire};
pub use sources::Battery;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::circuit::{ComponentId, Junction};
use crate::dsl::{ComponentDef, Placement};
use crate::error::{LabError, Result};
use crate::layout::{GridConfig, GridPoint, Offset, Rotation, TERMINAL_OFFSET};

/// Parameter keys accepted on a component line.
const KNOWN_PARAMS: [&str; 4] = ["v", "r", "rot", "state"];

/// Kind tag for a component, without its attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Battery,
    Resistor,
    Bulb,
    Switch,
    Wire,
}

impl ComponentKind {
    /// All kinds, in palette order.
    pub const ALL: [ComponentKind; 5] = [
        Self::Battery,
        Self::Resistor,
        Self::Bulb,
        Self::Switch,
        Self::Wire,
    ];

    /// Lowercase kind name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Battery => "battery",
            Self::Resistor => "resistor",
            Self::Bulb => "bulb",
            Self::Switch => "switch",
            Self::Wire => "wire",
        }
    }

    /// Prefix used for generated component ids.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Self::Battery => "bat",
            Self::Resistor => "res",
            Self::Bulb => "bulb",
            Self::Switch => "switch",
            Self::Wire => "wire",
        }
    }

    /// Parse a kind from a keyword, accepting short aliases.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "battery" | "bat" => Some(Self::Battery),
            "resistor" | "res" => Some(Self::Resistor),
            "bulb" | "lamp" => Some(Self::Bulb),
            "switch" | "sw" => Some(Self::Switch),
            "wire" => Some(Self::Wire),
            _ => None,
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentKind {
    type Err = LabError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_keyword(s).ok_or_else(|| LabError::UnknownComponentKind {
            kind: s.to_string(),
            line: 0,
        })
    }
}

/// Kind-specific part of a component.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Battery(Battery),
    Resistor(Resistor),
    Bulb(Bulb),
    Switch(Switch),
    Wire(Wire),
}

impl Element {
    /// Create an element of the given kind with palette defaults.
    pub fn default_for(kind: ComponentKind) -> Self {
        match kind {
            ComponentKind::Battery => Element::Battery(Battery::default()),
            ComponentKind::Resistor => Element::Resistor(Resistor::default()),
            ComponentKind::Bulb => Element::Bulb(Bulb),
            ComponentKind::Switch => Element::Switch(Switch::default()),
            ComponentKind::Wire => Element::Wire(Wire),
        }
    }

    /// Build an element from a layout definition.
    pub fn from_def(def: &ComponentDef) -> Result<Self> {
        let invalid = |param: &str, message: &str| LabError::InvalidParameter {
            component: def.name.clone(),
            param: param.to_string(),
            message: message.to_string(),
        };

        if def.switch_on.is_some() && def.kind != ComponentKind::Switch {
            return Err(LabError::invalid_component(
                &def.name,
                def.line,
                "on/off only applies to switches",
            ));
        }

        match def.kind {
            ComponentKind::Battery => {
                let voltage = def
                    .params
                    .get("v")
                    .copied()
                    .or(def.value)
                    .unwrap_or(Battery::DEFAULT_VOLTAGE);
                if !voltage.is_finite() || voltage <= 0.0 {
                    return Err(invalid("v", "voltage must be positive"));
                }
                Ok(Element::Battery(Battery::new(voltage)))
            }
            ComponentKind::Resistor => {
                let resistance = def
                    .params
                    .get("r")
                    .copied()
                    .or(def.value)
                    .unwrap_or(Resistor::DEFAULT_RESISTANCE);
                if !resistance.is_finite() || resistance < 0.0 {
                    return Err(invalid("r", "resistance must be non-negative"));
                }
                Ok(Element::Resistor(Resistor::new(resistance)))
            }
            ComponentKind::Switch => {
                let is_on = def
                    .params
                    .get("state")
                    .map(|state| *state > 0.5)
                    .or(def.switch_on)
                    .unwrap_or(true);
                Ok(Element::Switch(Switch::new(is_on)))
            }
            ComponentKind::Bulb | ComponentKind::Wire => {
                if def.value.is_some() {
                    return Err(LabError::invalid_component(
                        &def.name,
                        def.line,
                        format!("a {} takes no value", def.kind),
                    ));
                }
                Ok(Element::default_for(def.kind))
            }
        }
    }

    /// Get the kind tag.
    pub fn kind(&self) -> ComponentKind {
        match self {
            Element::Battery(_) => ComponentKind::Battery,
            Element::Resistor(_) => ComponentKind::Resistor,
            Element::Bulb(_) => ComponentKind::Bulb,
            Element::Switch(_) => ComponentKind::Switch,
            Element::Wire(_) => ComponentKind::Wire,
        }
    }
}

/// A two-terminal component placed on the workbench.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub id: ComponentId,
    pub element: Element,
    /// Start terminal (exclusively owned)
    pub start: Junction,
    /// End terminal (exclusively owned)
    pub end: Junction,
    /// Start terminal position relative to the centre, before rotation
    pub local_start: Offset,
    /// End terminal position relative to the centre, before rotation
    pub local_end: Offset,
    /// Visual centre on the workbench
    pub center: GridPoint,
    pub rotation: Rotation,
}

impl Component {
    /// Local offset of the start terminal.
    pub const LOCAL_START: Offset = Offset::new(-TERMINAL_OFFSET, 0);
    /// Local offset of the end terminal.
    pub const LOCAL_END: Offset = Offset::new(TERMINAL_OFFSET, 0);

    /// Create a component with explicit terminal coordinates.
    ///
    /// The centre is taken as the midpoint of the terminals, and the rotation
    /// is 90° when the terminals are stacked vertically.
    pub fn new(id: impl Into<ComponentId>, element: Element, start: GridPoint, end: GridPoint) -> Self {
        let id = id.into();
        let rotation = if start.x == end.x && start.y != end.y {
            Rotation::Deg90
        } else {
            Rotation::Deg0
        };
        Self {
            start: Junction::at(id.start_junction(), start),
            end: Junction::at(id.end_junction(), end),
            id,
            element,
            local_start: Self::LOCAL_START,
            local_end: Self::LOCAL_END,
            center: GridPoint::new(midpoint(start.x, end.x), midpoint(start.y, end.y)),
            rotation,
        }
    }

    /// Create a component centred at `center`, with terminals derived from
    /// the local offsets, the rotation, and the grid.
    pub fn placed(
        id: impl Into<ComponentId>,
        element: Element,
        center: GridPoint,
        rotation: Rotation,
        grid: &GridConfig,
    ) -> Self {
        let mut component = Self::new(id, element, center, center);
        component.place(center, rotation, grid);
        component
    }

    /// Build a component from a layout definition.
    ///
    /// Centre placements are snapped to the grid and may carry `rot=`.
    /// Explicit terminals are taken as written.
    pub fn from_def(def: &ComponentDef, grid: &GridConfig) -> Result<Self> {
        if let Some(param) = def.params.keys().find(|k| !KNOWN_PARAMS.contains(&k.as_str())) {
            return Err(LabError::InvalidParameter {
                component: def.name.clone(),
                param: param.clone(),
                message: "unknown parameter".to_string(),
            });
        }

        let element = Element::from_def(def)?;
        let rot = def.params.get("rot").copied();

        match def.placement {
            Placement::Centered { x, y } => {
                let rotation = match rot {
                    Some(degrees) if degrees.fract() != 0.0 => {
                        return Err(LabError::InvalidParameter {
                            component: def.name.clone(),
                            param: "rot".to_string(),
                            message: format!("{} is not a whole number of degrees", degrees),
                        });
                    }
                    Some(degrees) => Rotation::from_degrees(degrees as i64)?,
                    None => Rotation::Deg0,
                };
                Ok(Self::placed(
                    def.name.as_str(),
                    element,
                    grid.snap(x, y),
                    rotation,
                    grid,
                ))
            }
            Placement::Terminals { start, end } => {
                if rot.is_some() {
                    return Err(LabError::invalid_component(
                        &def.name,
                        def.line,
                        "rot= needs a centre placement",
                    ));
                }
                if !grid.is_on_grid(start) || !grid.is_on_grid(end) {
                    tracing::warn!(component = %def.name, %start, %end, "terminals are off the grid");
                }
                Ok(Self::new(def.name.as_str(), element, start, end))
            }
        }
    }

    /// Move and/or rotate the component, recomputing both terminals.
    ///
    /// Terminal positions are the centre plus the rotated local offsets,
    /// snapped to the grid. The caller re-registers the junctions afterwards.
    pub fn place(&mut self, center: GridPoint, rotation: Rotation, grid: &GridConfig) {
        self.center = center;
        self.rotation = rotation;
        let start = grid.snap_point(center + self.local_start.rotated(rotation));
        let end = grid.snap_point(center + self.local_end.rotated(rotation));
        self.start.set_position(start);
        self.end.set_position(end);
    }

    /// Toggle between 0° and 90° around the current centre.
    pub fn rotate(&mut self, grid: &GridConfig) {
        let rotation = self.rotation.toggled();
        self.place(self.center, rotation, grid);
    }

    /// Get the kind tag.
    pub fn kind(&self) -> ComponentKind {
        self.element.kind()
    }

    /// Both terminals, start first.
    pub fn terminals(&self) -> [&Junction; 2] {
        [&self.start, &self.end]
    }

    /// Check if this component is a power source.
    pub fn is_battery(&self) -> bool {
        matches!(self.element, Element::Battery(_))
    }

    /// Check if this component is a switch in the open position.
    pub fn is_open_switch(&self) -> bool {
        matches!(self.element, Element::Switch(sw) if !sw.is_closed())
    }

    /// Check whether the component lets current through.
    pub fn conducts(&self) -> bool {
        !self.is_open_switch()
    }

    /// Mutable access to the switch, if this component is one.
    pub fn as_switch_mut(&mut self) -> Option<&mut Switch> {
        match &mut self.element {
            Element::Switch(sw) => Some(sw),
            _ => None,
        }
    }
}

/// Midpoint of two coordinates, truncated towards zero.
fn midpoint(a: i32, b: i32) -> i32 {
    ((i64::from(a) + i64::from(b)) / 2) as i32
}
