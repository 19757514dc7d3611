//! Challenge grading.
//!
//! A challenge lists the palette items a learner must place. A challenge is
//! passed when every required item is on the workbench and the last
//! simulation found a closed circuit. Challenge texts and scoring live in the
//! game, not here.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::circuit::SimulationStatus;
use crate::components::{Component, ComponentKind, Element, Switch};
use crate::error::LabError;

/// An item of the component palette.
///
/// Switches appear twice in the palette, once per initial state. The
/// palette item of a placed switch is the one it was dragged from, even if
/// it has been toggled since.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaletteItem {
    Battery,
    Resistor,
    Bulb,
    SwitchOn,
    SwitchOff,
    Wire,
}

impl PaletteItem {
    /// Palette item name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Battery => "battery",
            Self::Resistor => "resistor",
            Self::Bulb => "bulb",
            Self::SwitchOn => "switch_on",
            Self::SwitchOff => "switch_off",
            Self::Wire => "wire",
        }
    }

    /// Component kind this item places.
    pub fn kind(&self) -> ComponentKind {
        match self {
            Self::Battery => ComponentKind::Battery,
            Self::Resistor => ComponentKind::Resistor,
            Self::Bulb => ComponentKind::Bulb,
            Self::SwitchOn | Self::SwitchOff => ComponentKind::Switch,
            Self::Wire => ComponentKind::Wire,
        }
    }

    /// Element a fresh instance of this item starts with.
    pub fn element(&self) -> Element {
        match self {
            Self::SwitchOn => Element::Switch(Switch::new(true)),
            Self::SwitchOff => Element::Switch(Switch::new(false)),
            other => Element::default_for(other.kind()),
        }
    }

    /// Palette item matching a component's current state.
    pub fn for_component(component: &Component) -> Self {
        match &component.element {
            Element::Battery(_) => Self::Battery,
            Element::Resistor(_) => Self::Resistor,
            Element::Bulb(_) => Self::Bulb,
            Element::Switch(sw) if sw.is_closed() => Self::SwitchOn,
            Element::Switch(_) => Self::SwitchOff,
            Element::Wire(_) => Self::Wire,
        }
    }
}

impl fmt::Display for PaletteItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaletteItem {
    type Err = LabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "battery" | "bat" => Ok(Self::Battery),
            "resistor" | "res" => Ok(Self::Resistor),
            "bulb" | "lamp" => Ok(Self::Bulb),
            "switch_on" | "switch" | "sw" => Ok(Self::SwitchOn),
            "switch_off" => Ok(Self::SwitchOff),
            "wire" => Ok(Self::Wire),
            _ => Err(LabError::UnknownPaletteItem { item: s.to_string() }),
        }
    }
}

/// A challenge: a prompt and the palette items it needs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Challenge {
    pub prompt: String,
    pub required: Vec<PaletteItem>,
}

impl Challenge {
    /// Create a new challenge.
    pub fn new(prompt: impl Into<String>, required: Vec<PaletteItem>) -> Self {
        Self {
            prompt: prompt.into(),
            required,
        }
    }

    /// Grade the challenge against the placed items and the last simulation.
    pub fn check(&self, placed: &[PaletteItem], last_status: Option<SimulationStatus>) -> ChallengeOutcome {
        check_challenge(&self.required, placed, last_status)
    }
}

/// Outcome of grading a challenge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ChallengeOutcome {
    /// Some required palette items are not on the workbench
    MissingComponents { missing: Vec<PaletteItem> },
    /// The circuit has not been simulated yet
    NotSimulated,
    /// The last simulation did not find a closed circuit
    NotClosed { status: SimulationStatus },
    /// All items are present and the circuit is closed
    Passed,
}

impl ChallengeOutcome {
    /// Check whether the challenge was passed.
    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// User-facing message for this outcome.
    pub fn message(&self) -> &'static str {
        match self {
            Self::MissingComponents { .. } => "Components required for the circuit are missing.",
            Self::NotSimulated => "Run the simulation first.",
            Self::NotClosed { .. } => "The circuit is not closed. Check how you built it.",
            Self::Passed => "Congratulations! The circuit is correct.",
        }
    }
}

/// Grade a list of required palette items.
///
/// Requirements are checked by presence: listing `wire` three times needs
/// at least one wire, not three.
pub fn check_challenge(
    required: &[PaletteItem],
    placed: &[PaletteItem],
    last_status: Option<SimulationStatus>,
) -> ChallengeOutcome {
    let mut missing: Vec<PaletteItem> = required
        .iter()
        .filter(|item| !placed.contains(*item))
        .copied()
        .collect();
    missing.sort();
    missing.dedup();

    if !missing.is_empty() {
        return ChallengeOutcome::MissingComponents { missing };
    }

    match last_status {
        None => ChallengeOutcome::NotSimulated,
        Some(SimulationStatus::Closed) => ChallengeOutcome::Passed,
        Some(status) => ChallengeOutcome::NotClosed { status },
    }
}
